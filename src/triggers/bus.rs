//! Event log and subscription point.
//!
//! The core never waits on listeners. Every fired event is appended to a log
//! that collaborators drain once per tick, and synchronous listeners (if any)
//! are called in registration order.

use super::event::GameEvent;

/// Listener callback.
pub type Listener = Box<dyn FnMut(&GameEvent) + Send>;

/// Handle returned by [`EventBus::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

/// Fired events plus subscribers.
#[derive(Default)]
pub struct EventBus {
    log: Vec<GameEvent>,
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u32,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + Send + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `true` if it existed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        before != self.listeners.len()
    }

    /// Record an event and notify listeners.
    pub fn publish(&mut self, event: GameEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
        self.log.push(event);
    }

    /// Events fired since the last drain.
    #[must_use]
    pub fn pending(&self) -> &[GameEvent] {
        &self.log
    }

    /// Take every logged event.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.log)
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("pending", &self.log.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
