//! Run progression: acts, encounters and sanity tiers.

pub mod act;
pub mod sanity;

pub use act::{Act, Encounter};
pub use sanity::{BetLimits, BetSize, PlayerClass, SanityEffects, SanityTier};
