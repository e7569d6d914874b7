//! Timed player debuffs.
//!
//! Status effects never touch betting rules; they only modify how a round's
//! outcome is paid out (drain at round start, double losses, halved wins,
//! rake on damage).

pub mod effect;
pub mod manager;

pub use effect::{DurationType, StatusEffectInstance, StatusKind, StatusStat};
pub use manager::{ApplyOutcome, StatusEffectManager};
