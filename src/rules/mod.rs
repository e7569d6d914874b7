//! Blackjack rules: round resolution, payout and hit policies.

pub mod policy;
pub mod resolution;

pub use policy::{BasicStrategy, DealerPolicy, HitPolicy};
pub use resolution::{compute_payout, resolve_outcome, Payout, RoundOutcome};
