//! Enemy abilities.
//!
//! Each ability is a trigger plus an ordered effect chain. Trigger state
//! lives in the [`Ability`] value owned by the enemy; [`AbilitySystem`]
//! checks a whole list against an event and returns the chains that fired.

pub mod ability;
pub mod system;

pub use ability::{Ability, AbilityDefinition, AbilityState, AbilityTrigger, TriggerContext};
pub use system::{AbilitySystem, FiredAbility};
