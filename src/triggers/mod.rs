//! Game events and their subscription point.
//!
//! The orchestrator raises a [`GameEvent`] for every meaningful step of a
//! round. Dispatch to card tags, status effects, enemy abilities and
//! trinkets happens in a fixed order inside `game::dispatch`; the
//! [`EventBus`] is only the outward-facing log for collaborators.

pub mod bus;
pub mod event;

pub use bus::{EventBus, Listener, ListenerId};
pub use event::{GameEvent, GameEventKind, PlayerAction};
