//! Host event feeds.
//!
//! The host owns a [`WorldEvents`] and emits tick and chat notifications into
//! it at its own cadence. Subscribers get the world handle with every event.

use std::fmt;
use std::sync::Arc;

use crate::traits::{GameWorld, Player};

/// Chat message notification.
#[derive(Clone)]
pub struct ChatEvent {
    pub message: String,
    /// Missing for messages that did not come from a player (e.g. the console)
    pub sender: Option<Arc<dyn Player>>,
}

impl ChatEvent {
    pub fn new(message: impl Into<String>, sender: Option<Arc<dyn Player>>) -> Self {
        Self {
            message: message.into(),
            sender,
        }
    }
}

impl fmt::Debug for ChatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatEvent")
            .field("message", &self.message)
            .field("sender", &self.sender.as_ref().map(|p| p.name().to_string()))
            .finish()
    }
}

/// Tick notification. Carries no payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickEvent;

/// Handle returned by [`EventFeed::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<E> = Box<dyn FnMut(&mut dyn GameWorld, &E)>;

/// A named feed of events delivered to subscribers in subscription order.
pub struct EventFeed<E> {
    name: &'static str,
    next_id: u64,
    handlers: Vec<(SubscriptionId, Handler<E>)>,
}

impl<E> EventFeed<E> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            next_id: 0,
            handlers: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&mut dyn GameWorld, &E) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        tracing::debug!(feed = self.name, ?id, "subscribed");
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        before != self.handlers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn emit(&mut self, world: &mut dyn GameWorld, event: &E) {
        for (_, handler) in &mut self.handlers {
            handler(&mut *world, event);
        }
    }
}

/// The two feeds the sample dispatcher listens to.
pub struct WorldEvents {
    pub tick: EventFeed<TickEvent>,
    pub chat: EventFeed<ChatEvent>,
}

impl WorldEvents {
    pub fn new() -> Self {
        Self {
            tick: EventFeed::new("tick"),
            chat: EventFeed::new("chat"),
        }
    }
}

impl Default for WorldEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::mock::{MockPlayer, MockWorld};

    #[test]
    fn test_emit_reaches_subscribers_in_order() {
        let mut world = MockWorld::new();
        let mut events = WorldEvents::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&seen);
        events.tick.subscribe(move |_, _| first.borrow_mut().push("first"));
        let second = Rc::clone(&seen);
        events.tick.subscribe(move |_, _| second.borrow_mut().push("second"));

        events.tick.emit(&mut world, &TickEvent);
        assert_eq!(*seen.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut world = MockWorld::new();
        let mut events = WorldEvents::new();
        let count = Rc::new(RefCell::new(0));

        let counter = Rc::clone(&count);
        let id = events.tick.subscribe(move |_, _| *counter.borrow_mut() += 1);

        events.tick.emit(&mut world, &TickEvent);
        assert!(events.tick.unsubscribe(id));
        assert!(!events.tick.unsubscribe(id));
        events.tick.emit(&mut world, &TickEvent);

        assert_eq!(*count.borrow(), 1);
        assert_eq!(events.tick.subscriber_count(), 0);
    }

    #[test]
    fn test_chat_handlers_get_world_access() {
        let mut world = MockWorld::new();
        let mut events = WorldEvents::new();
        events
            .chat
            .subscribe(|world, event: &ChatEvent| world.say(&format!("echo {}", event.message)));

        let sender: Arc<dyn Player> = Arc::new(MockPlayer::new("Steve"));
        events
            .chat
            .emit(&mut world, &ChatEvent::new("hi", Some(sender)));

        assert_eq!(world.chat_log(), ["echo hi"]);
        assert_eq!(events.chat.name(), "chat");
    }
}
