//! Scripted chat sessions replayed against the mock host.
//!
//! A session is a JSON document listing players and a timeline of host
//! events. Playback feeds the events through the dispatcher's subscriptions
//! and reports what ended up in chat and in the world.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use sample_host::{
    BlockLocation, ChatEvent, Entity, GameWorld, MockPlayer, MockWorld, Player, SampleManager,
    TickEvent, WorldEvents,
};
use serde::{Deserialize, Serialize};

/// Block reported as the view target of session players
const VIEW_TARGET_BLOCK: &str = "minecraft:grass";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Session {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub players: Vec<SessionPlayer>,
    pub timeline: Vec<SessionEvent>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct SessionPlayer {
    pub name: String,
    pub looking_at: Option<BlockLocation>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum SessionEvent {
    /// A chat line; no sender means a console message
    Chat {
        message: String,
        sender: Option<String>,
    },
    /// Advance the host by this many ticks
    Ticks { count: u64 },
    /// Change (or clear) where a player is looking
    LookAt {
        player: String,
        target: Option<BlockLocation>,
    },
}

impl Session {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid session script")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading session {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("parsing session {}", path.display()))
    }
}

/// What a session left behind
#[derive(Serialize, Debug, Clone)]
pub struct PlaybackReport {
    pub ticks: u64,
    pub chat: Vec<String>,
    pub entities: Vec<Entity>,
}

/// Replay `session` through `manager` on a fresh mock world.
pub fn play(session: &Session, manager: SampleManager) -> PlaybackReport {
    let mut world = MockWorld::new();
    let mut events = WorldEvents::new();
    let (_manager, subscription) = manager.attach(&mut events);

    let mut view_targets: FxHashMap<String, Option<BlockLocation>> = session
        .players
        .iter()
        .map(|p| (p.name.clone(), p.looking_at))
        .collect();

    if !session.description.is_empty() {
        tracing::info!(description = %session.description, "playing session");
    }

    for event in &session.timeline {
        match event {
            SessionEvent::Chat { message, sender } => {
                let sender = sender.as_ref().map(|name| {
                    let mut player = MockPlayer::new(name.as_str());
                    if let Some(Some(pos)) = view_targets.get(name) {
                        player = player.looking_at(*pos, VIEW_TARGET_BLOCK);
                    }
                    Arc::new(player) as Arc<dyn Player>
                });
                events
                    .chat
                    .emit(&mut world, &ChatEvent::new(message.as_str(), sender));
            }
            SessionEvent::Ticks { count } => {
                for _ in 0..*count {
                    events.tick.emit(&mut world, &TickEvent);
                    world.do_tick();
                }
            }
            SessionEvent::LookAt { player, target } => {
                view_targets.insert(player.clone(), *target);
            }
        }
    }

    subscription.detach(&mut events);

    PlaybackReport {
        ticks: world.current_tick(),
        chat: world.chat_log().to_vec(),
        entities: world.entities(),
    }
}
