//! Chat-triggered sample dispatcher.
//!
//! `SampleManager` keeps the registry of named samples, turns `howto <name>`
//! chat commands into pending steps and drains one pending step every
//! `dispatch_interval` ticks.
//!
//! Pending steps form a stack. A sample's steps are pushed in reverse so they
//! pop in declaration order, but a sample triggered later runs before the
//! remaining steps of an earlier one.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::context::{SampleContext, SampleStep, gameplay_log};
use crate::events::{ChatEvent, SubscriptionId, WorldEvents};
use crate::gametest::GameTestRegistry;
use crate::traits::{GameWorld, Location};

const LOOK_AT_TARGET: &str = "Please look at the block where you want me to run this.";
const SAMPLE_LIST_HEADER: &str = "Here is my list of available samples:";

/// Dispatcher settings
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Ticks between two dispatched steps
    pub dispatch_interval: u64,
    /// Lowercase prefixes that mark a chat message as a command
    pub trigger_phrases: Vec<String>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            dispatch_interval: 10,
            trigger_phrases: vec!["howto".to_string(), "help".to_string()],
        }
    }
}

struct Sample {
    name: String,
    steps: Vec<SampleStep>,
}

/// A step waiting for its dispatch tick.
pub struct PendingStep {
    /// Sample name suffixed with the tick it was triggered on
    pub name: String,
    step: SampleStep,
    pub location: Location,
}

impl fmt::Debug for PendingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingStep")
            .field("name", &self.name)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

/// Subscriptions created by [`SampleManager::attach`].
#[derive(Debug, Clone, Copy)]
pub struct ManagerSubscription {
    pub tick: SubscriptionId,
    pub chat: SubscriptionId,
}

impl ManagerSubscription {
    /// Stop receiving host events.
    pub fn detach(self, events: &mut WorldEvents) {
        events.tick.unsubscribe(self.tick);
        events.chat.unsubscribe(self.chat);
    }
}

pub struct SampleManager {
    config: DispatcherConfig,
    /// Registration order is listing order
    samples: Vec<Sample>,
    index: FxHashMap<String, usize>,
    pending: Vec<PendingStep>,
    tick_count: u64,
    gametests: Option<Rc<RefCell<GameTestRegistry>>>,
}

impl SampleManager {
    pub fn new(config: DispatcherConfig) -> Self {
        Self {
            config,
            samples: Vec::new(),
            index: FxHashMap::default(),
            pending: Vec::new(),
            tick_count: 0,
            gametests: None,
        }
    }

    /// Hand running steps access to a gameplay-test registry.
    pub fn with_gametests(mut self, registry: Rc<RefCell<GameTestRegistry>>) -> Self {
        self.gametests = Some(registry);
        self
    }

    /// Subscribe the dispatcher to the host's tick and chat feeds.
    pub fn attach(self, events: &mut WorldEvents) -> (Rc<RefCell<Self>>, ManagerSubscription) {
        let manager = Rc::new(RefCell::new(self));

        let tick_handle = Rc::clone(&manager);
        let tick = events
            .tick
            .subscribe(move |world, _| tick_handle.borrow_mut().on_tick(world));

        let chat_handle = Rc::clone(&manager);
        let chat = events.chat.subscribe(move |world, event| {
            chat_handle.borrow_mut().on_chat_message(world, event);
        });

        (manager, ManagerSubscription { tick, chat })
    }

    /// Bulk import. Names shorter than two characters and empty step lists
    /// are skipped; an existing name is overwritten in place.
    pub fn register_samples<I, K>(&mut self, set: I)
    where
        I: IntoIterator<Item = (K, Vec<SampleStep>)>,
        K: Into<String>,
    {
        for (name, steps) in set {
            let name = name.into();
            if name.chars().count() <= 1 || steps.is_empty() {
                tracing::debug!(%name, "skipping invalid sample registration");
                continue;
            }

            match self.index.get(&name) {
                Some(&slot) => self.samples[slot].steps = steps,
                None => {
                    self.index.insert(name.clone(), self.samples.len());
                    self.samples.push(Sample { name, steps });
                }
            }
        }
    }

    /// Registered names in listing order.
    pub fn sample_names(&self) -> Vec<&str> {
        self.samples.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Pending steps, next to dispatch first.
    pub fn pending(&self) -> impl Iterator<Item = &PendingStep> {
        self.pending.iter().rev()
    }

    fn is_trigger(&self, message: &str) -> bool {
        self.config
            .trigger_phrases
            .iter()
            .any(|phrase| message.starts_with(phrase.as_str()))
    }

    /// Case-insensitive lookup; the first registered match wins.
    fn find_sample(&self, id: &str) -> Option<&Sample> {
        self.samples.iter().find(|s| s.name.to_lowercase() == id)
    }

    pub fn on_chat_message(&mut self, world: &mut dyn GameWorld, event: &ChatEvent) {
        let message = event.message.to_lowercase();
        if !self.is_trigger(&message) {
            return;
        }
        let Some(sender) = &event.sender else {
            return;
        };

        let Some(hit) = sender.block_from_view_direction() else {
            gameplay_log(world, LOOK_AT_TARGET, None);
            return;
        };
        let target = Location::above(hit.location);

        let sample_id = message
            .split_once(' ')
            .map(|(_, rest)| rest.trim())
            .filter(|id| id.chars().count() >= 2);

        let Some(sample_id) = sample_id else {
            let mut listing = SAMPLE_LIST_HEADER.to_string();
            for sample in &self.samples {
                listing.push(' ');
                listing.push_str(&sample.name);
            }
            world.say(&listing);
            return;
        };

        match self.find_sample(sample_id) {
            Some(sample) => {
                let run_id = format!("{}{}", sample.name, self.tick_count);
                let steps = sample.steps.clone();
                tracing::info!(player = sender.name(), %run_id, "sample triggered");
                self.run_sample(run_id, &steps, target);
            }
            None => world.say(&format!("I couldn't find the sample '{sample_id}'")),
        }
    }

    /// Push every step, last one first, so they pop in declaration order.
    pub fn run_sample(&mut self, sample_id: String, steps: &[SampleStep], target: Location) {
        for step in steps.iter().rev() {
            self.pending.push(PendingStep {
                name: sample_id.clone(),
                step: step.clone(),
                location: target,
            });
        }
        tracing::debug!(%sample_id, queued = self.pending.len(), "sample enqueued");
    }

    pub fn on_tick(&mut self, world: &mut dyn GameWorld) {
        let interval = self.config.dispatch_interval.max(1);
        if self.tick_count % interval == 0
            && let Some(pending) = self.pending.pop()
        {
            tracing::info!(sample = %pending.name, tick = self.tick_count, "dispatching step");
            let mut ctx = SampleContext::new(world, &pending.name)
                .with_gametests(self.gametests.clone());
            (pending.step)(&mut ctx, pending.location);
        }

        self.tick_count += 1;
    }
}

impl Default for SampleManager {
    fn default() -> Self {
        Self::new(DispatcherConfig::default())
    }
}
