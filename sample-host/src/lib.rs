//! Sample-host: host abstraction for chat-triggered how-to galleries.
//!
//! This library provides the traits a Minecraft-style host implements so that
//! sample code never touches a global world handle, the chat-driven sample
//! dispatcher, and a small gameplay-test runner driven tick by tick.
//!
//! # Host Integration
//!
//! Hosts implement:
//! - [`HostAdapter`] - Creates worlds for gameplay tests
//! - [`GameWorld`] - Chat, entity, block and tick operations
//! - [`Player`] - Chat senders and their view target
//!
//! # Example
//!
//! ```ignore
//! use sample_host::{ChatEvent, DispatcherConfig, SampleManager, TickEvent, WorldEvents, step};
//!
//! let mut manager = SampleManager::new(DispatcherConfig::default());
//! manager.register_samples([("greet", vec![step(|ctx, _| ctx.log("hello"))])]);
//!
//! let mut events = WorldEvents::new();
//! let (_manager, _subscription) = manager.attach(&mut events);
//!
//! // Host loop
//! events.chat.emit(&mut world, &ChatEvent::new("howto greet", Some(player)));
//! events.tick.emit(&mut world, &TickEvent);
//! ```

pub mod context;
pub mod events;
pub mod filter;
pub mod gametest;
pub mod manager;
pub mod mock;
pub mod runner;
pub mod traits;

// Re-export main types for convenience
pub use context::{SampleContext, SampleStep, Status, format_log_message, gameplay_log, step};
pub use events::{ChatEvent, EventFeed, SubscriptionId, TickEvent, WorldEvents};
pub use filter::TestFilter;
pub use gametest::{GameTest, GameTestError, GameTestRegistration, GameTestRegistry};
pub use manager::{DispatcherConfig, ManagerSubscription, PendingStep, SampleManager};
pub use mock::{MockAdapter, MockPlayer, MockWorld};
pub use runner::{TestResult, TestRunConfig, TestRunner, TestSummary};
pub use traits::{
    Block, BlockHit, BlockLocation, Entity, EntityId, GameWorld, HostAdapter, HostError, ItemStack,
    Location, Player, ServerInfo,
};
