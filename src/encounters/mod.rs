//! Narrative encounters between combats.

pub mod event;
pub mod pool;

pub use event::{apply_choice, ChoiceOutcome, EncounterEvent, EventChoice, EventType};
pub use pool::{EventPool, PoolEntry};
