//! Core traits that host implementations must provide.
//!
//! Hosts implement `HostAdapter` to create worlds for gameplay tests, and
//! `GameWorld`/`Player` to provide the actual world queries and side effects.

use std::fmt::{Display, Formatter};

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Block position in world coordinates [x, y, z]
pub type BlockLocation = [i32; 3];

/// A precise world position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Location {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Location of the block's minimum corner.
    pub fn from_block(pos: BlockLocation) -> Self {
        Self::new(f64::from(pos[0]), f64::from(pos[1]), f64::from(pos[2]))
    }

    /// Location one unit above the given block.
    pub fn above(pos: BlockLocation) -> Self {
        Self::new(f64::from(pos[0]), f64::from(pos[1]) + 1.0, f64::from(pos[2]))
    }

    pub fn distance(&self, other: &Location) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Block containing this location.
    pub fn block(&self) -> BlockLocation {
        [
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        ]
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}, {}", self.x, self.y, self.z)
    }
}

/// An item stack that can be dropped into the world
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemStack {
    /// Item identifier, e.g., "minecraft:feather"
    pub id: String,
    /// Stack size (default 1)
    pub amount: u8,
}

impl ItemStack {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            amount: 1,
        }
    }
}

/// Unique id of a spawned entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of an entity returned from world queries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    pub id: EntityId,
    /// Entity type identifier, e.g., "minecraft:fox"
    pub type_id: String,
    pub location: Location,
    /// Present on dropped item entities
    pub item: Option<ItemStack>,
    /// Entities currently riding this one
    pub riders: Vec<EntityId>,
}

impl Entity {
    /// Compare the type ignoring the "minecraft:" namespace.
    pub fn is_type(&self, type_id: &str) -> bool {
        strip_namespace(&self.type_id) == strip_namespace(type_id)
    }
}

/// Block data returned from get_block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    /// Block identifier, e.g., "minecraft:stone"
    pub id: String,
}

impl Block {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Check if this block is air
    pub fn is_air(&self) -> bool {
        strip_namespace(&self.id) == "air"
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Block hit by a player's view ray
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHit {
    pub block: Block,
    pub location: BlockLocation,
}

/// Host metadata
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub minecraft_version: String,
}

/// Failures reported by host calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("no entity with id {0}")]
    UnknownEntity(EntityId),
    #[error("entity type '{0}' is not rideable")]
    NotRideable(String),
}

/// Removes an optional "minecraft:" prefix.
pub fn strip_namespace(id: &str) -> &str {
    id.strip_prefix("minecraft:").unwrap_or(id)
}

// =============================================================================
// Core Traits
// =============================================================================

/// Main adapter trait - host implements this to create test worlds
pub trait HostAdapter: Send + Sync {
    /// Create a new disposable world for one gameplay test
    fn create_test_world(&self) -> Box<dyn GameWorld>;

    /// Host metadata for logging
    fn server_info(&self) -> ServerInfo;
}

/// World operations - host implements this
///
/// This is the capability handed to the dispatcher and to every sample body
/// in place of a global world handle.
pub trait GameWorld: Send + Sync {
    /// Execute exactly one game tick
    fn do_tick(&mut self);

    /// Get current tick count
    fn current_tick(&self) -> u64;

    /// Broadcast a message to world chat
    fn say(&mut self, message: &str);

    /// Drop an item stack at a location
    fn spawn_item(&mut self, item: &ItemStack, location: Location) -> EntityId;

    /// Spawn an entity of the given type
    fn spawn_entity(&mut self, type_id: &str, location: Location) -> EntityId;

    /// Look up a live entity
    fn entity(&self, id: EntityId) -> Option<Entity>;

    /// All live entities, in spawn order
    fn entities(&self) -> Vec<Entity>;

    /// Live entities within `max_distance` of `location`, in spawn order
    fn entities_near(&self, location: Location, max_distance: f64) -> Vec<Entity> {
        self.entities()
            .into_iter()
            .filter(|e| e.location.distance(&location) <= max_distance)
            .collect()
    }

    /// Remove an entity from the world
    fn remove_entity(&mut self, id: EntityId) -> Result<(), HostError>;

    /// Get block at position
    fn get_block(&self, pos: BlockLocation) -> Block;

    /// Set block at position
    fn set_block(&mut self, pos: BlockLocation, block: &Block);

    /// Mount `rider` onto `vehicle` through the vehicle's rideable component
    fn add_rider(&mut self, vehicle: EntityId, rider: EntityId) -> Result<(), HostError>;
}

/// Player operations - host implements this for chat senders
pub trait Player: Send + Sync {
    fn name(&self) -> &str;

    /// Block the player is currently looking at, if any
    fn block_from_view_direction(&self) -> Option<BlockHit>;
}
