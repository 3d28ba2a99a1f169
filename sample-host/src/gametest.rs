//! Gameplay-test registration and the per-test context.
//!
//! Tests are registered under `class:name` and later driven tick by tick by
//! [`crate::runner::TestRunner`] in a fresh world from the host adapter.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::traits::{Block, BlockLocation, Entity, EntityId, GameWorld, HostError, Location};

/// Tick budget used when a registration does not set one
pub const DEFAULT_MAX_TICKS: u32 = 100;

/// Suite assigned to tests without an explicit `suite:` tag
pub const DEFAULT_SUITE: &str = "suite:default";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameTestError {
    #[error("expected '{type_id}' to be present in the test area")]
    EntityMissing { type_id: String },
    #[error("expected '{type_id}' to be absent from the test area")]
    UnexpectedEntity { type_id: String },
    #[error("expected '{type_id}' to be present at {pos:?}")]
    EntityMissingAt { type_id: String, pos: BlockLocation },
    #[error("expected '{type_id}' to be absent at {pos:?}")]
    UnexpectedEntityAt { type_id: String, pos: BlockLocation },
    #[error("test declared no success condition")]
    NoSuccessCondition,
    #[error("timed out after {max_ticks} ticks: {last_failure}")]
    Timeout { max_ticks: u32, last_failure: String },
    #[error("{0}")]
    Failed(String),
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Test body, run once to set the scene up.
pub type GameTestFn = Arc<dyn Fn(&mut GameTest) -> Result<(), GameTestError> + Send + Sync>;

type Condition = Box<dyn Fn(&GameTest) -> Result<(), GameTestError>>;

/// A registered gameplay test
#[derive(Clone)]
pub struct GameTestRegistration {
    pub class_name: String,
    pub test_name: String,
    pub max_ticks: u32,
    pub structure_name: Option<String>,
    pub tags: Vec<String>,
    test_fn: GameTestFn,
}

impl GameTestRegistration {
    /// `class:name`
    pub fn full_name(&self) -> String {
        format!("{}:{}", self.class_name, self.test_name)
    }

    /// Declared tags plus the default suite when no suite was named.
    pub fn effective_tags(&self) -> Vec<String> {
        let mut tags = self.tags.clone();
        if !tags.iter().any(|t| t.starts_with("suite:")) {
            tags.push(DEFAULT_SUITE.to_string());
        }
        tags
    }

    pub(crate) fn set_up(&self, test: &mut GameTest) -> Result<(), GameTestError> {
        (self.test_fn)(test)
    }
}

impl std::fmt::Debug for GameTestRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameTestRegistration")
            .field("class_name", &self.class_name)
            .field("test_name", &self.test_name)
            .field("max_ticks", &self.max_ticks)
            .field("structure_name", &self.structure_name)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

/// Chained settings for a fresh registration
pub struct RegistrationBuilder<'a> {
    registration: &'a mut GameTestRegistration,
}

impl RegistrationBuilder<'_> {
    pub fn max_ticks(self, ticks: u32) -> Self {
        self.registration.max_ticks = ticks;
        self
    }

    pub fn structure_name(self, name: impl Into<String>) -> Self {
        self.registration.structure_name = Some(name.into());
        self
    }

    pub fn tag(self, tag: impl Into<String>) -> Self {
        self.registration.tags.push(tag.into());
        self
    }
}

/// Every gameplay test known to the host, in registration order
#[derive(Default)]
pub struct GameTestRegistry {
    tests: Vec<GameTestRegistration>,
    index: FxHashMap<String, usize>,
}

impl GameTestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a test. Registering an existing `class:name` replaces it.
    pub fn register<F>(
        &mut self,
        class_name: impl Into<String>,
        test_name: impl Into<String>,
        test_fn: F,
    ) -> RegistrationBuilder<'_>
    where
        F: Fn(&mut GameTest) -> Result<(), GameTestError> + Send + Sync + 'static,
    {
        let registration = GameTestRegistration {
            class_name: class_name.into(),
            test_name: test_name.into(),
            max_ticks: DEFAULT_MAX_TICKS,
            structure_name: None,
            tags: Vec::new(),
            test_fn: Arc::new(test_fn),
        };
        let full_name = registration.full_name();
        tracing::debug!(test = %full_name, "gametest registered");

        let slot = match self.index.get(&full_name) {
            Some(&slot) => {
                self.tests[slot] = registration;
                slot
            }
            None => {
                self.index.insert(full_name, self.tests.len());
                self.tests.push(registration);
                self.tests.len() - 1
            }
        };

        RegistrationBuilder {
            registration: &mut self.tests[slot],
        }
    }

    pub fn tests(&self) -> &[GameTestRegistration] {
        &self.tests
    }

    pub fn get(&self, full_name: &str) -> Option<&GameTestRegistration> {
        self.index.get(full_name).map(|&slot| &self.tests[slot])
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

/// Context handed to a test body.
///
/// Positions are relative to the test origin. The test area is the whole
/// world the adapter created for this test.
pub struct GameTest {
    world: Box<dyn GameWorld>,
    origin: BlockLocation,
    start_tick: u64,
    conditions: Vec<Condition>,
}

impl GameTest {
    pub fn new(world: Box<dyn GameWorld>, origin: BlockLocation) -> Self {
        let start_tick = world.current_tick();
        Self {
            world,
            origin,
            start_tick,
            conditions: Vec::new(),
        }
    }

    fn absolute(&self, pos: BlockLocation) -> BlockLocation {
        [
            self.origin[0] + pos[0],
            self.origin[1] + pos[1],
            self.origin[2] + pos[2],
        ]
    }

    pub fn world(&self) -> &dyn GameWorld {
        self.world.as_ref()
    }

    /// Ticks elapsed since the test started
    pub fn current_tick(&self) -> u64 {
        self.world.current_tick() - self.start_tick
    }

    pub fn spawn(&mut self, type_id: &str, pos: BlockLocation) -> EntityId {
        let location = Location::from_block(self.absolute(pos));
        self.world.spawn_entity(type_id, location)
    }

    pub fn set_block_type(&mut self, block_id: &str, pos: BlockLocation) {
        let pos = self.absolute(pos);
        self.world.set_block(pos, &Block::new(block_id));
    }

    pub fn entity(&self, id: EntityId) -> Option<Entity> {
        self.world.entity(id)
    }

    /// Mount `rider` onto `vehicle` through its rideable component.
    pub fn add_rider(&mut self, vehicle: EntityId, rider: EntityId) -> Result<(), GameTestError> {
        self.world.add_rider(vehicle, rider)?;
        Ok(())
    }

    pub fn assert_entity_present_in_area(
        &self,
        type_id: &str,
        present: bool,
    ) -> Result<(), GameTestError> {
        let found = self.world.entities().iter().any(|e| e.is_type(type_id));
        match (found, present) {
            (true, false) => Err(GameTestError::UnexpectedEntity {
                type_id: type_id.to_string(),
            }),
            (false, true) => Err(GameTestError::EntityMissing {
                type_id: type_id.to_string(),
            }),
            _ => Ok(()),
        }
    }

    pub fn assert_entity_present(
        &self,
        type_id: &str,
        pos: BlockLocation,
        present: bool,
    ) -> Result<(), GameTestError> {
        let target = self.absolute(pos);
        let found = self
            .world
            .entities()
            .iter()
            .any(|e| e.is_type(type_id) && e.location.block() == target);
        match (found, present) {
            (true, false) => Err(GameTestError::UnexpectedEntityAt {
                type_id: type_id.to_string(),
                pos,
            }),
            (false, true) => Err(GameTestError::EntityMissingAt {
                type_id: type_id.to_string(),
                pos,
            }),
            _ => Ok(()),
        }
    }

    /// The test passes on the first tick where `check` returns `Ok`.
    pub fn succeed_when<F>(&mut self, check: F)
    where
        F: Fn(&GameTest) -> Result<(), GameTestError> + 'static,
    {
        self.conditions.push(Box::new(check));
    }

    pub fn succeed_when_entity_present(
        &mut self,
        type_id: &str,
        pos: BlockLocation,
        present: bool,
    ) {
        let type_id = type_id.to_string();
        self.succeed_when(move |test| test.assert_entity_present(&type_id, pos, present));
    }

    /// `None` when no condition was declared, otherwise the first failure.
    pub(crate) fn check_conditions(&self) -> Option<Result<(), GameTestError>> {
        if self.conditions.is_empty() {
            return None;
        }
        Some(self.conditions.iter().try_for_each(|check| check(self)))
    }

    pub(crate) fn do_tick(&mut self) {
        self.world.do_tick();
    }
}
