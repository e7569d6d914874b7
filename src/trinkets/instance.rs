//! Equipped trinket instances.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::CardTag;

use super::template::{StatKey, TrinketRarity, TrinketTemplate};

/// A rolled affix on an instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffixRoll {
    pub stat: StatKey,
    pub value: i32,
}

/// Per-trinket counters shown in tooltips.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum TrackedStat {
    #[strum(serialize = "Damage Dealt")]
    DamageDealt,
    #[strum(serialize = "Bonus Chips")]
    BonusChips,
    #[strum(serialize = "Refunded Chips")]
    RefundedChips,
    #[strum(serialize = "Highest Streak")]
    HighestStreak,
    #[strum(serialize = "Debuffs Blocked")]
    DebuffsBlocked,
    #[strum(serialize = "Heal Damage Dealt")]
    HealDamageDealt,
}

impl TrackedStat {
    pub const COUNT: usize = 6;
}

/// A trinket in a player slot: template key plus rolled state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrinketInstance {
    pub template_key: String,
    pub rarity: TrinketRarity,
    /// Act tier it dropped in.
    pub tier: u32,
    pub sell_value: i32,
    pub affixes: SmallVec<[AffixRoll; 3]>,
    /// Persists across combats.
    pub stacks: u32,
    pub buffed_tag: Option<CardTag>,
    pub tag_buff_value: i32,
    /// Combat-scoped: enemy heals to punish.
    pub heal_punishes: i32,
    /// Combat-scoped: player debuffs to block.
    pub debuff_blocks: i32,
    tracked: [i32; TrackedStat::COUNT],
}

impl TrinketInstance {
    /// Fresh instance of a template with no affixes.
    #[must_use]
    pub fn new(template: &TrinketTemplate, rarity: TrinketRarity, tier: u32) -> Self {
        Self {
            template_key: template.key.clone(),
            rarity,
            tier,
            sell_value: template.base_value,
            affixes: SmallVec::new(),
            stacks: 0,
            buffed_tag: None,
            tag_buff_value: 0,
            heal_punishes: 0,
            debuff_blocks: 0,
            tracked: [0; TrackedStat::COUNT],
        }
    }

    /// Replace affixes and recompute the sell value.
    pub fn set_affixes(&mut self, base_value: i32, affixes: SmallVec<[AffixRoll; 3]>) {
        self.affixes = affixes;
        self.sell_value = base_value + (base_value / 10) * self.affixes.len() as i32;
    }

    #[must_use]
    pub fn tracked(&self, stat: TrackedStat) -> i32 {
        self.tracked[stat as usize]
    }

    pub fn track(&mut self, stat: TrackedStat, amount: i32) {
        self.tracked[stat as usize] += amount;
    }

    /// Keep the larger of the current and `value`.
    pub fn track_max(&mut self, stat: TrackedStat, value: i32) {
        let slot = &mut self.tracked[stat as usize];
        *slot = (*slot).max(value);
    }

    /// Drop combat-scoped charges.
    pub fn reset_combat_charges(&mut self) {
        self.heal_punishes = 0;
        self.debuff_blocks = 0;
    }
}
