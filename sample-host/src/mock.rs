//! Mock host for running samples and gameplay tests without a real server.
//!
//! This module provides a simple in-memory implementation of the host traits
//! that can be used for unit testing and for the scripted session player.

use rustc_hash::FxHashMap;

use crate::traits::{
    Block, BlockHit, BlockLocation, Entity, EntityId, GameWorld, HostAdapter, HostError,
    ItemStack, Location, Player, ServerInfo, strip_namespace,
};

/// Entity types whose rideable component accepts riders.
const RIDEABLE_TYPES: &[&str] = &["minecart", "boat", "horse", "pig", "strider", "camel"];

/// Mock adapter for testing
pub struct MockAdapter;

impl MockAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MockAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl HostAdapter for MockAdapter {
    fn create_test_world(&self) -> Box<dyn GameWorld> {
        Box::new(MockWorld::new())
    }

    fn server_info(&self) -> ServerInfo {
        ServerInfo {
            minecraft_version: "1.19.50".to_string(),
        }
    }
}

/// Mock world that keeps entities in spawn order and blocks in a HashMap
pub struct MockWorld {
    blocks: FxHashMap<BlockLocation, Block>,
    entities: Vec<Entity>,
    chat: Vec<String>,
    tick: u64,
}

impl MockWorld {
    pub fn new() -> Self {
        Self {
            blocks: FxHashMap::default(),
            entities: Vec::new(),
            chat: Vec::new(),
            tick: 0,
        }
    }

    /// Every message broadcast so far
    pub fn chat_log(&self) -> &[String] {
        &self.chat
    }

    /// Clears the recorded chat.
    pub fn clear_chat(&mut self) {
        self.chat.clear();
    }

    /// Get all blocks in the world (for debugging/testing)
    pub fn all_blocks(&self) -> &FxHashMap<BlockLocation, Block> {
        &self.blocks
    }

    fn insert_entity(
        &mut self,
        type_id: &str,
        location: Location,
        item: Option<ItemStack>,
    ) -> EntityId {
        let id = EntityId::new_random();
        self.entities.push(Entity {
            id,
            type_id: type_id.to_string(),
            location,
            item,
            riders: Vec::new(),
        });
        id
    }
}

impl Default for MockWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl GameWorld for MockWorld {
    fn do_tick(&mut self) {
        self.tick += 1;
    }

    fn current_tick(&self) -> u64 {
        self.tick
    }

    fn say(&mut self, message: &str) {
        self.chat.push(message.to_string());
    }

    fn spawn_item(&mut self, item: &ItemStack, location: Location) -> EntityId {
        self.insert_entity("minecraft:item", location, Some(item.clone()))
    }

    fn spawn_entity(&mut self, type_id: &str, location: Location) -> EntityId {
        let type_id = if type_id.contains(':') {
            type_id.to_string()
        } else {
            format!("minecraft:{type_id}")
        };
        self.insert_entity(&type_id, location, None)
    }

    fn entity(&self, id: EntityId) -> Option<Entity> {
        self.entities.iter().find(|e| e.id == id).cloned()
    }

    fn entities(&self) -> Vec<Entity> {
        self.entities.clone()
    }

    fn remove_entity(&mut self, id: EntityId) -> Result<(), HostError> {
        let index = self
            .entities
            .iter()
            .position(|e| e.id == id)
            .ok_or(HostError::UnknownEntity(id))?;
        self.entities.remove(index);
        for entity in &mut self.entities {
            entity.riders.retain(|rider| *rider != id);
        }
        Ok(())
    }

    fn get_block(&self, pos: BlockLocation) -> Block {
        self.blocks
            .get(&pos)
            .cloned()
            .unwrap_or_else(|| Block::new("minecraft:air"))
    }

    fn set_block(&mut self, pos: BlockLocation, block: &Block) {
        if block.is_air() {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, block.clone());
        }
    }

    fn add_rider(&mut self, vehicle: EntityId, rider: EntityId) -> Result<(), HostError> {
        let rider_location = self
            .entity(vehicle)
            .ok_or(HostError::UnknownEntity(vehicle))?
            .location;
        if self.entity(rider).is_none() {
            return Err(HostError::UnknownEntity(rider));
        }

        for entity in &mut self.entities {
            if entity.id == vehicle {
                if !RIDEABLE_TYPES.contains(&strip_namespace(&entity.type_id)) {
                    return Err(HostError::NotRideable(entity.type_id.clone()));
                }
                if !entity.riders.contains(&rider) {
                    entity.riders.push(rider);
                }
            }
        }
        // Riders move with their vehicle
        for entity in &mut self.entities {
            if entity.id == rider {
                entity.location = rider_location;
            }
        }
        Ok(())
    }
}

/// Mock chat sender with a fixed view target
pub struct MockPlayer {
    name: String,
    looking_at: Option<BlockHit>,
}

impl MockPlayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            looking_at: None,
        }
    }

    /// Player looking at a block of the given type
    pub fn looking_at(mut self, pos: BlockLocation, block: &str) -> Self {
        self.looking_at = Some(BlockHit {
            block: Block::new(block),
            location: pos,
        });
        self
    }
}

impl Player for MockPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn block_from_view_direction(&self) -> Option<BlockHit> {
        self.looking_at.clone()
    }
}
