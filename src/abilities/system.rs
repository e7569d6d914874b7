//! Ability dispatch over an enemy's ability list.

use smallvec::SmallVec;

use crate::core::GameRng;
use crate::effects::Effect;
use crate::triggers::GameEventKind;

use super::ability::{Ability, TriggerContext};

/// An ability that fired, with the effect chain to execute.
#[derive(Clone, Debug, PartialEq)]
pub struct FiredAbility {
    /// Index into the enemy's ability list.
    pub index: usize,
    pub name: String,
    pub effects: SmallVec<[Effect; 2]>,
}

/// Stateless helpers that walk a slice of abilities.
pub struct AbilitySystem;

impl AbilitySystem {
    /// Check every ability against `event` in list order.
    ///
    /// The fired chains are returned rather than executed so the caller can
    /// resolve them against the run state without holding a borrow of the
    /// enemy.
    pub fn dispatch(
        abilities: &mut [Ability],
        event: GameEventKind,
        ctx: &TriggerContext,
        rng: &mut GameRng,
    ) -> Vec<FiredAbility> {
        let mut fired = Vec::new();
        for (index, ability) in abilities.iter_mut().enumerate() {
            if ability.check(event, ctx, rng) {
                tracing::debug!(ability = %ability.name(), %event, "ability fired");
                fired.push(FiredAbility {
                    index,
                    name: ability.def.name.clone(),
                    effects: ability.def.effects.clone(),
                });
            }
        }
        fired
    }

    /// One round passes for every cooldown.
    pub fn tick_cooldowns(abilities: &mut [Ability]) {
        abilities.iter_mut().for_each(Ability::tick_cooldown);
    }

    /// Fresh state for a new combat.
    pub fn reset_states(abilities: &mut [Ability]) {
        abilities.iter_mut().for_each(Ability::reset);
    }
}
