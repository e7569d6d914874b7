//! Trinket stat aggregation.
//!
//! [`aggregate_trinket_stats`] is a pure function of the equipped slots: it
//! builds a fresh [`StatBlock`] every call. The player stores the result in
//! its trinket-derived field and leaves card-tag bonuses alone, so the two
//! sources never share a reset.

use serde::{Deserialize, Serialize};

use super::instance::TrinketInstance;
use super::registry::TrinketRegistry;
use super::template::{StatKey, TrinketEffectType, TrinketPassive};

/// Trinket-derived player stats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatBlock {
    pub damage_flat: i32,
    pub damage_percent: i32,
    pub crit_chance: i32,
    pub crit_bonus: i32,
    pub win_bonus_percent: i32,
    pub loss_refund_percent: i32,
    pub push_damage_percent: i32,
    pub flat_chips_on_win: i32,
}

impl StatBlock {
    /// Add `value` to the field named by `stat`.
    pub fn apply(&mut self, stat: StatKey, value: i32) {
        let field = match stat {
            StatKey::DamagePercent => &mut self.damage_percent,
            StatKey::DamageFlat => &mut self.damage_flat,
            StatKey::CritChance => &mut self.crit_chance,
            StatKey::CritBonus => &mut self.crit_bonus,
            StatKey::WinBonusPercent => &mut self.win_bonus_percent,
            StatKey::LossRefundPercent => &mut self.loss_refund_percent,
            StatKey::PushDamagePercent => &mut self.push_damage_percent,
            StatKey::FlatChipsOnWin => &mut self.flat_chips_on_win,
        };
        *field += value;
    }

    fn apply_passive(&mut self, passive: &TrinketPassive, primary: bool) {
        // Win bonus and push damage only count as primary passives, loss
        // refund only as secondary. Any other placement adds nothing.
        match passive.effect {
            TrinketEffectType::AddChipsPercent if primary => {
                self.apply(StatKey::WinBonusPercent, passive.value);
            }
            TrinketEffectType::RefundChipsPercent if !primary => {
                self.apply(StatKey::LossRefundPercent, passive.value);
            }
            TrinketEffectType::PushDamagePercent if primary => {
                self.apply(StatKey::PushDamagePercent, passive.value);
            }
            _ => {}
        }
    }
}

/// Sum every occupied slot into a fresh block.
///
/// Per slot: rolled affixes, then `stacks * per_stack` through the stack
/// rule's stat, then template passives. All contributions are additive so
/// the order inside and across slots does not matter. A slot whose template
/// key is unknown contributes nothing.
#[must_use]
pub fn aggregate_trinket_stats(slots: &[Option<TrinketInstance>], registry: &TrinketRegistry) -> StatBlock {
    let mut stats = StatBlock::default();

    for (slot, instance) in slots.iter().enumerate() {
        let Some(instance) = instance else {
            continue;
        };
        let Some(template) = registry.get(&instance.template_key) else {
            tracing::warn!(slot, key = %instance.template_key, "unknown trinket template, slot skipped");
            continue;
        };

        for affix in &instance.affixes {
            stats.apply(affix.stat, affix.value);
        }

        if let Some(rule) = template.stack {
            stats.apply(rule.stat, instance.stacks as i32 * rule.per_stack);
        }

        stats.apply_passive(&template.primary, true);
        if let Some(secondary) = &template.secondary {
            stats.apply_passive(secondary, false);
        }
    }

    tracing::debug!(?stats, "trinket stats aggregated");
    stats
}
