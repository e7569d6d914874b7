//! Player damage pipeline.
//!
//! Every point of damage the player deals to an enemy (winning hands,
//! pushes with push damage, card tags, trinkets) goes through
//! [`apply_damage_modifiers`]. Enemy self-damage from abilities does not.

use serde::{Deserialize, Serialize};

use crate::core::GameRng;

/// The player's effective offensive stats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageModifiers {
    pub damage_flat: i32,
    pub damage_percent: i32,
    /// Percent chance (0..=100).
    pub crit_chance: i32,
    /// Extra crit damage percent on top of the base crit bonus.
    pub crit_bonus: i32,
}

/// Final damage of one hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageRoll {
    pub amount: i32,
    pub is_crit: bool,
}

/// `(base + flat) * (100 + percent) / 100`, then a crit roll.
///
/// Non-positive base damage deals nothing and never crits.
pub fn apply_damage_modifiers(
    mods: &DamageModifiers,
    base: i32,
    base_crit_bonus: i32,
    rng: &mut GameRng,
) -> DamageRoll {
    if base <= 0 {
        return DamageRoll { amount: 0, is_crit: false };
    }

    let mut amount = ((base + mods.damage_flat) * (100 + mods.damage_percent) / 100).max(0);

    let chance = mods.crit_chance.clamp(0, 100);
    let is_crit = chance > 0 && rng.roll_percent() < chance;
    if is_crit {
        amount = amount * (100 + base_crit_bonus + mods.crit_bonus) / 100;
    }

    tracing::debug!(base, amount, is_crit, "damage modifiers applied");
    DamageRoll { amount, is_crit }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_modifiers() {
        let mut rng = GameRng::new(1);
        let roll = apply_damage_modifiers(&DamageModifiers::default(), 20, 50, &mut rng);
        assert_eq!(roll, DamageRoll { amount: 20, is_crit: false });
    }

    #[test]
    fn test_flat_then_percent() {
        let mut rng = GameRng::new(1);
        let mods = DamageModifiers { damage_flat: 5, damage_percent: 20, ..Default::default() };
        let roll = apply_damage_modifiers(&mods, 10, 50, &mut rng);
        assert_eq!(roll.amount, 18);
    }

    #[test]
    fn test_guaranteed_crit() {
        let mut rng = GameRng::new(1);
        let mods = DamageModifiers { crit_chance: 100, crit_bonus: 25, ..Default::default() };
        let roll = apply_damage_modifiers(&mods, 20, 50, &mut rng);
        assert!(roll.is_crit);
        assert_eq!(roll.amount, 35);
    }

    #[test]
    fn test_zero_base() {
        let mut rng = GameRng::new(1);
        let mods = DamageModifiers { damage_flat: 10, crit_chance: 100, ..Default::default() };
        let roll = apply_damage_modifiers(&mods, 0, 50, &mut rng);
        assert_eq!(roll.amount, 0);
        assert!(!roll.is_crit);
    }
}
