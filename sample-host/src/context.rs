//! What a sample step sees when it runs: the world, the gameplay logger and
//! (optionally) the gameplay-test registry.

use std::cell::{RefCell, RefMut};
use std::rc::Rc;
use std::sync::Arc;

use crate::gametest::GameTestRegistry;
use crate::traits::{GameWorld, Location};

/// Outcome signalled alongside a log message. `None` means informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
}

impl Status {
    fn prefix(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS: ",
            Self::Failure => "FAIL: ",
        }
    }
}

/// Apply the status marker to a gameplay log message.
pub fn format_log_message(message: &str, status: Option<Status>) -> String {
    match status {
        Some(status) => format!("{}{message}", status.prefix()),
        None => message.to_string(),
    }
}

/// Write a gameplay log line to world chat and the diagnostic sink.
pub fn gameplay_log(world: &mut dyn GameWorld, message: &str, status: Option<Status>) {
    let message = format_log_message(message, status);
    world.say(&message);
    tracing::warn!("{message}");
}

/// One step of a sample.
pub type SampleStep = Arc<dyn Fn(&mut SampleContext<'_>, Location) + Send + Sync>;

/// Wrap a function or closure as a [`SampleStep`].
pub fn step<F>(f: F) -> SampleStep
where
    F: Fn(&mut SampleContext<'_>, Location) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Handle passed to every running step.
pub struct SampleContext<'a> {
    world: &'a mut dyn GameWorld,
    gametests: Option<Rc<RefCell<GameTestRegistry>>>,
    sample_id: &'a str,
}

impl<'a> SampleContext<'a> {
    pub fn new(world: &'a mut dyn GameWorld, sample_id: &'a str) -> Self {
        Self {
            world,
            gametests: None,
            sample_id,
        }
    }

    pub fn with_gametests(mut self, gametests: Option<Rc<RefCell<GameTestRegistry>>>) -> Self {
        self.gametests = gametests;
        self
    }

    /// Informational log line.
    pub fn log(&mut self, message: &str) {
        gameplay_log(&mut *self.world, message, None);
    }

    /// Log line carrying a success or failure marker.
    pub fn log_status(&mut self, message: &str, status: Status) {
        gameplay_log(&mut *self.world, message, Some(status));
    }

    pub fn world(&mut self) -> &mut dyn GameWorld {
        &mut *self.world
    }

    /// Identifier of the triggered run, e.g. `spawnItem40`.
    pub fn sample_id(&self) -> &str {
        self.sample_id
    }

    /// Gameplay-test facility, when the host wired one in.
    pub fn gametests(&self) -> Option<RefMut<'_, GameTestRegistry>> {
        self.gametests.as_ref().map(|registry| registry.borrow_mut())
    }
}
