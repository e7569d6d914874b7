//! Error types for player-facing operations.
//!
//! Content problems (unknown template keys, unknown stat keys) are never
//! surfaced here. They are logged with `tracing::warn!` and the offending
//! contribution is skipped. `GameError` covers what a caller can actually
//! get wrong: betting out of range, acting in the wrong phase, asking for a
//! transition the state machine does not allow.

use thiserror::Error;

use crate::game::GamePhase;

/// Errors returned by the combat engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid bet {amount} (chips={chips}, min={min})")]
    InvalidBet { amount: i32, chips: i32, min: i32 },

    #[error("bet {amount} above the table limit {max}")]
    BetAboveLimit { amount: i32, max: i32 },

    #[error("action {action} not allowed during {phase:?}")]
    InvalidAction { action: &'static str, phase: GamePhase },

    #[error("illegal transition {from:?} -> {to:?}")]
    IllegalTransition { from: GamePhase, to: GamePhase },

    #[error("draw pile is empty")]
    DeckEmpty,

    #[error("hand index {index} out of range (len={len})")]
    HandIndexOutOfRange { index: usize, len: usize },

    #[error("trinket slot {slot} out of range (slots={slots})")]
    SlotOutOfRange { slot: usize, slots: usize },

    #[error("trinket slot {0} is empty")]
    SlotEmpty(usize),

    #[error("no free trinket slot")]
    NoFreeSlot,

    #[error("event choice {index} out of range (choices={count})")]
    InvalidChoice { index: usize, count: usize },

    #[error("no pending {0}")]
    NothingPending(&'static str),

    #[error("unknown {kind} key '{key}'")]
    UnknownKey { kind: &'static str, key: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, GameError>;

impl From<bincode::Error> for GameError {
    fn from(err: bincode::Error) -> Self {
        GameError::Snapshot(err.to_string())
    }
}
