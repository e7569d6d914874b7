//! Run statistics.

use serde::{Deserialize, Serialize};

/// Where a point of damage came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum DamageSource {
    TurnWin,
    TurnPush,
    TrinketPassive,
    TrinketActive,
    Ability,
    CardTag,
}

impl DamageSource {
    pub const COUNT: usize = 6;
}

/// Counters for the end-of-run summary.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    damage: [i32; DamageSource::COUNT],
    pub rounds_won: u32,
    pub rounds_lost: u32,
    pub rounds_pushed: u32,
    pub chips_bet: i64,
    pub chips_won: i64,
    pub chips_lost: i64,
    pub chips_drained: i64,
    pub highest_chips: i32,
    pub combats_won: u32,
}

impl RunStats {
    #[must_use]
    pub fn new(starting_chips: i32) -> Self {
        Self {
            highest_chips: starting_chips,
            ..Self::default()
        }
    }

    pub fn record_damage(&mut self, source: DamageSource, amount: i32) {
        self.damage[source as usize] += amount.max(0);
    }

    #[must_use]
    pub fn damage_from(&self, source: DamageSource) -> i32 {
        self.damage[source as usize]
    }

    #[must_use]
    pub fn total_damage(&self) -> i32 {
        self.damage.iter().sum()
    }

    pub fn observe_chips(&mut self, chips: i32) {
        self.highest_chips = self.highest_chips.max(chips);
    }

    #[must_use]
    pub fn rounds_played(&self) -> u32 {
        self.rounds_won + self.rounds_lost + self.rounds_pushed
    }
}
