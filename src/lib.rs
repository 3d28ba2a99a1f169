//! How-to gallery: chat-triggered scripting samples.
//!
//! This crate wires the samples into the `sample-host` dispatcher and
//! gameplay-test registry:
//! - chat `howto <name>` / `help <name>` queues a sample's steps
//! - every tenth tick one queued step runs against the injected world
//! - gameplay-test samples are also registered for the test runner
//!
//! # Example
//!
//! ```ignore
//! let config = howto_gallery::config::GalleryConfig::from_env()?;
//! let gallery = howto_gallery::gallery(&config);
//!
//! let mut events = sample_host::WorldEvents::new();
//! let (_manager, _subscription) = gallery.manager.attach(&mut events);
//! ```

pub mod config;
pub mod samples;
pub mod session;

use std::cell::RefCell;
use std::rc::Rc;

use sample_host::{GameTestRegistry, SampleManager};

use crate::config::GalleryConfig;

/// Dispatcher with every sample registered, plus the shared gameplay-test registry.
pub struct Gallery {
    pub manager: SampleManager,
    pub gametests: Rc<RefCell<GameTestRegistry>>,
}

/// Build the gallery: startup gameplay tests first, then the chat samples.
pub fn gallery(config: &GalleryConfig) -> Gallery {
    let gametests = Rc::new(RefCell::new(GameTestRegistry::new()));
    samples::register_gametests(&mut gametests.borrow_mut());

    let mut manager = SampleManager::new(config.dispatcher()).with_gametests(Rc::clone(&gametests));
    manager.register_samples(samples::catalog());

    tracing::debug!(
        samples = manager.sample_names().len(),
        gametests = gametests.borrow().len(),
        "gallery ready"
    );

    Gallery { manager, gametests }
}
