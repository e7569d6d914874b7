//! Run configuration.
//!
//! Every tuning constant of a run lives here: economy, deck policy, loot
//! tables, event costs. Content code reads these values instead of
//! hardcoding them, so a balance pass is a config change.
//!
//! ```
//! use rogue_blackjack::core::RunConfig;
//!
//! let config = RunConfig::default()
//!     .with_seed(7)
//!     .with_starting_chips(250)
//!     .with_pity_threshold(3);
//!
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::progression::PlayerClass;

use super::error::{GameError, Result};

/// What happens when the draw pile runs out mid-round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReshufflePolicy {
    /// Shuffle the discard pile back into the draw pile.
    #[default]
    ReshuffleDiscard,
    /// End the round as a player loss.
    Forfeit,
}

/// Rarity weights in common, uncommon, rare, legendary order.
pub type RarityWeights = [f32; 4];

/// Loot table weights for one enemy class.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DropTable {
    /// Weights for a normal roll.
    pub normal: RarityWeights,
    /// Weights once the pity counter hits the threshold.
    pub pity: RarityWeights,
}

/// Complete run configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Seed for every RNG stream of the run.
    pub seed: u64,

    /// Chips at run start. Chips double as the player's health.
    pub starting_chips: i32,

    /// Maximum sanity.
    pub max_sanity: i32,

    /// Player archetype; picks the sanity bet rules.
    pub player_class: PlayerClass,

    /// Min, med and max bet rungs before sanity modifiers.
    pub bet_ladder: [i32; 3],

    /// Number of trinket slots.
    pub trinket_slots: usize,

    /// Reshuffle at round start when fewer cards than this remain.
    pub reshuffle_threshold: usize,

    /// Empty draw pile handling.
    pub reshuffle_policy: ReshufflePolicy,

    /// Dealer stands at or above this total.
    pub dealer_stands_on: u8,

    /// Payout multiplier for a natural blackjack.
    pub blackjack_payout: f32,

    /// Extra crit damage percent before `crit_bonus`.
    pub base_crit_bonus: i32,

    /// Consecutive common drops before the pity table kicks in.
    pub pity_threshold: u32,

    /// Drops from normal enemies.
    pub normal_drops: DropTable,

    /// Drops from elites and bosses.
    pub elite_drops: DropTable,

    /// Affix count per act tier (index 0 = tier 1).
    pub affixes_per_tier: Vec<usize>,

    /// Hard cap on affixes per trinket.
    pub max_affixes: usize,

    /// Affix weight multiplier for rare drops.
    pub rare_affix_scale: f32,

    /// Affix weight multiplier for legendary drops.
    pub legendary_affix_scale: f32,

    /// First event reroll cost; doubles each reroll.
    pub event_reroll_cost: i32,

    /// Attempts when asking the pool for a different event.
    pub event_retry_limit: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            starting_chips: 100,
            max_sanity: 100,
            player_class: PlayerClass::default(),
            bet_ladder: [5, 25, 50],
            trinket_slots: 6,
            reshuffle_threshold: 20,
            reshuffle_policy: ReshufflePolicy::default(),
            dealer_stands_on: 17,
            blackjack_payout: 1.5,
            base_crit_bonus: 50,
            pity_threshold: 5,
            normal_drops: DropTable {
                normal: [50.0, 35.0, 12.0, 3.0],
                pity: [0.0, 70.0, 25.0, 5.0],
            },
            elite_drops: DropTable {
                normal: [0.0, 40.0, 45.0, 15.0],
                pity: [0.0, 0.0, 75.0, 25.0],
            },
            affixes_per_tier: vec![1, 2, 3],
            max_affixes: 3,
            rare_affix_scale: 1.1,
            legendary_affix_scale: 1.2,
            event_reroll_cost: 50,
            event_retry_limit: 10,
        }
    }
}

impl RunConfig {
    /// Set the run seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set starting chips.
    #[must_use]
    pub fn with_starting_chips(mut self, chips: i32) -> Self {
        self.starting_chips = chips;
        self
    }

    /// Set the player class.
    #[must_use]
    pub fn with_player_class(mut self, class: PlayerClass) -> Self {
        self.player_class = class;
        self
    }

    /// Set the pity threshold.
    #[must_use]
    pub fn with_pity_threshold(mut self, threshold: u32) -> Self {
        self.pity_threshold = threshold;
        self
    }

    /// Set the empty-deck policy.
    #[must_use]
    pub fn with_reshuffle_policy(mut self, policy: ReshufflePolicy) -> Self {
        self.reshuffle_policy = policy;
        self
    }

    /// Set the affix count table.
    #[must_use]
    pub fn with_affixes_per_tier(mut self, table: Vec<usize>) -> Self {
        self.affixes_per_tier = table;
        self
    }

    /// Affix count for an act tier, clamped to the table and `max_affixes`.
    #[must_use]
    pub fn affix_count(&self, tier: u32) -> usize {
        let idx = (tier.max(1) as usize - 1).min(self.affixes_per_tier.len().saturating_sub(1));
        self.affixes_per_tier
            .get(idx)
            .copied()
            .unwrap_or(1)
            .min(self.max_affixes)
    }

    /// Check for values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.trinket_slots == 0 {
            return Err(GameError::InvalidConfig("trinket_slots must be > 0".into()));
        }
        if self.starting_chips <= 0 {
            return Err(GameError::InvalidConfig("starting_chips must be > 0".into()));
        }
        if self.bet_ladder[0] <= 0 || self.bet_ladder.windows(2).any(|w| w[0] > w[1]) {
            return Err(GameError::InvalidConfig("bet_ladder must be positive and ascending".into()));
        }
        if self.pity_threshold == 0 {
            return Err(GameError::InvalidConfig("pity_threshold must be > 0".into()));
        }
        if self.affixes_per_tier.is_empty() {
            return Err(GameError::InvalidConfig("affixes_per_tier is empty".into()));
        }
        for (name, table) in [("normal", &self.normal_drops), ("elite", &self.elite_drops)] {
            let empty = |w: &RarityWeights| w.iter().all(|v| *v <= 0.0);
            if empty(&table.normal) || empty(&table.pity) {
                return Err(GameError::InvalidConfig(format!("{} drop table has no weight", name)));
            }
        }
        if !(2..=21).contains(&self.dealer_stands_on) {
            return Err(GameError::InvalidConfig("dealer_stands_on must be in 2..=21".into()));
        }
        Ok(())
    }
}
