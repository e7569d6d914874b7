//! Sanity tiers and what they do to the table.
//!
//! Every class has a three-rung bet ladder (min, med, max). Falling sanity
//! strips rungs, inflates the max rung or changes how the round is dealt,
//! depending on the class. Effects are cumulative: a tier keeps everything
//! the tiers above it imposed.
//!
//! | Class      | Medium        | Low             | VeryLow      | Zero           |
//! |------------|---------------|-----------------|--------------|----------------|
//! | Degenerate | no min        | max x2          | no med       | max x4         |
//! | Dealer     | no max        | hole card shown |              | hand auto-plays|
//! | Detective  | med only      |                 |              |                |

use serde::{Deserialize, Serialize};

/// Coarse sanity bands used by events, presentation and bet rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, strum::Display)]
pub enum SanityTier {
    Zero,
    /// At or below 25%.
    VeryLow,
    /// At or below 50%.
    Low,
    /// At or below 75%.
    Medium,
    High,
}

impl SanityTier {
    /// Tier for `sanity` out of `max`.
    #[must_use]
    pub fn from_values(sanity: i32, max: i32) -> Self {
        if sanity <= 0 || max <= 0 {
            return SanityTier::Zero;
        }
        let percent = sanity * 100 / max;
        match percent {
            ..=25 => SanityTier::VeryLow,
            26..=50 => SanityTier::Low,
            51..=75 => SanityTier::Medium,
            _ => SanityTier::High,
        }
    }

    /// How far below full sanity this tier is: High 0, Zero 4.
    #[must_use]
    pub fn severity(self) -> u8 {
        match self {
            SanityTier::High => 0,
            SanityTier::Medium => 1,
            SanityTier::Low => 2,
            SanityTier::VeryLow => 3,
            SanityTier::Zero => 4,
        }
    }
}

/// Player archetype. Picks which sanity rules apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum PlayerClass {
    #[default]
    Degenerate,
    Dealer,
    Detective,
}

/// One rung of the bet ladder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum BetSize {
    Min,
    Med,
    Max,
}

impl BetSize {
    pub const ALL: [BetSize; 3] = [BetSize::Min, BetSize::Med, BetSize::Max];

    fn index(self) -> usize {
        match self {
            BetSize::Min => 0,
            BetSize::Med => 1,
            BetSize::Max => 2,
        }
    }
}

/// Inclusive range of legal bets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BetLimits {
    pub min: i32,
    pub max: i32,
}

impl BetLimits {
    #[must_use]
    pub fn contains(&self, amount: i32) -> bool {
        (self.min..=self.max).contains(&amount)
    }
}

/// Table rules in force for one class at one tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SanityEffects {
    pub min_enabled: bool,
    pub med_enabled: bool,
    pub max_enabled: bool,
    /// Applied to the max rung.
    pub max_multiplier: i32,
    /// Dealer hole card is turned over right after the deal.
    pub reveal_hole: bool,
    /// The player's hand plays itself with the house policy.
    pub auto_play: bool,
}

impl Default for SanityEffects {
    fn default() -> Self {
        Self {
            min_enabled: true,
            med_enabled: true,
            max_enabled: true,
            max_multiplier: 1,
            reveal_hole: false,
            auto_play: false,
        }
    }
}

impl SanityEffects {
    #[must_use]
    pub fn for_class(class: PlayerClass, tier: SanityTier) -> Self {
        let severity = tier.severity();
        let mut effects = Self::default();

        match class {
            PlayerClass::Degenerate => {
                if severity >= 1 {
                    effects.min_enabled = false;
                }
                if severity >= 2 {
                    effects.max_multiplier = 2;
                }
                if severity >= 3 {
                    effects.med_enabled = false;
                }
                if severity >= 4 {
                    effects.max_multiplier = 4;
                }
            }
            PlayerClass::Dealer => {
                if severity >= 1 {
                    effects.max_enabled = false;
                }
                if severity >= 2 {
                    effects.reveal_hole = true;
                }
                if severity >= 4 {
                    effects.auto_play = true;
                }
            }
            PlayerClass::Detective => {
                if severity >= 1 {
                    effects.min_enabled = false;
                    effects.max_enabled = false;
                }
            }
        }
        effects
    }

    #[must_use]
    pub fn allows(&self, size: BetSize) -> bool {
        match size {
            BetSize::Min => self.min_enabled,
            BetSize::Med => self.med_enabled,
            BetSize::Max => self.max_enabled,
        }
    }

    /// Amount a rung stands for: the ladder value raised to `min_bet`, with
    /// the max multiplier on the top rung.
    #[must_use]
    pub fn rung_amount(&self, size: BetSize, ladder: [i32; 3], min_bet: i32) -> i32 {
        let base = ladder[size.index()].max(min_bet).max(1);
        if size == BetSize::Max {
            base * self.max_multiplier.max(1)
        } else {
            base
        }
    }

    /// Legal range from the lowest to the highest enabled rung, clamped to
    /// what the player can afford.
    #[must_use]
    pub fn bet_limits(&self, ladder: [i32; 3], min_bet: i32, chips: i32) -> BetLimits {
        let amounts: Vec<i32> = BetSize::ALL
            .into_iter()
            .filter(|size| self.allows(*size))
            .map(|size| self.rung_amount(size, ladder, min_bet))
            .collect();
        let floor = min_bet.max(1);
        let low = amounts.iter().copied().min().unwrap_or(floor);
        let high = amounts.iter().copied().max().unwrap_or(floor);

        let cap = chips.max(1);
        let min = low.min(cap);
        BetLimits {
            min,
            max: high.min(cap).max(min),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LADDER: [i32; 3] = [5, 25, 50];

    fn limits(class: PlayerClass, tier: SanityTier) -> BetLimits {
        SanityEffects::for_class(class, tier).bet_limits(LADDER, 1, 1_000)
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(SanityTier::from_values(0, 100), SanityTier::Zero);
        assert_eq!(SanityTier::from_values(1, 100), SanityTier::VeryLow);
        assert_eq!(SanityTier::from_values(25, 100), SanityTier::VeryLow);
        assert_eq!(SanityTier::from_values(26, 100), SanityTier::Low);
        assert_eq!(SanityTier::from_values(50, 100), SanityTier::Low);
        assert_eq!(SanityTier::from_values(75, 100), SanityTier::Medium);
        assert_eq!(SanityTier::from_values(76, 100), SanityTier::High);
        assert_eq!(SanityTier::from_values(40, 40), SanityTier::High);
    }

    #[test]
    fn test_high_sanity_is_unrestricted() {
        for class in [PlayerClass::Degenerate, PlayerClass::Dealer, PlayerClass::Detective] {
            assert_eq!(SanityEffects::for_class(class, SanityTier::High), SanityEffects::default());
            assert_eq!(limits(class, SanityTier::High), BetLimits { min: 5, max: 50 });
        }
    }

    #[test]
    fn test_degenerate_tiers() {
        use SanityTier::*;
        assert_eq!(limits(PlayerClass::Degenerate, Medium), BetLimits { min: 25, max: 50 });
        assert_eq!(limits(PlayerClass::Degenerate, Low), BetLimits { min: 25, max: 100 });
        assert_eq!(limits(PlayerClass::Degenerate, VeryLow), BetLimits { min: 100, max: 100 });
        assert_eq!(limits(PlayerClass::Degenerate, Zero), BetLimits { min: 200, max: 200 });

        let zero = SanityEffects::for_class(PlayerClass::Degenerate, Zero);
        assert!(!zero.allows(BetSize::Min) && !zero.allows(BetSize::Med));
        assert!(!zero.reveal_hole && !zero.auto_play);
    }

    #[test]
    fn test_dealer_tiers() {
        use SanityTier::*;
        let medium = SanityEffects::for_class(PlayerClass::Dealer, Medium);
        assert!(!medium.allows(BetSize::Max));
        assert!(!medium.reveal_hole);
        assert_eq!(limits(PlayerClass::Dealer, Medium), BetLimits { min: 5, max: 25 });

        let low = SanityEffects::for_class(PlayerClass::Dealer, Low);
        assert!(low.reveal_hole && !low.auto_play);

        let very_low = SanityEffects::for_class(PlayerClass::Dealer, VeryLow);
        assert_eq!(very_low, low);

        let zero = SanityEffects::for_class(PlayerClass::Dealer, Zero);
        assert!(zero.reveal_hole && zero.auto_play);
        assert_eq!(limits(PlayerClass::Dealer, Zero), BetLimits { min: 5, max: 25 });
    }

    #[test]
    fn test_detective_tiers() {
        for tier in [SanityTier::Medium, SanityTier::Low, SanityTier::VeryLow, SanityTier::Zero] {
            let effects = SanityEffects::for_class(PlayerClass::Detective, tier);
            assert!(effects.allows(BetSize::Med));
            assert!(!effects.allows(BetSize::Min) && !effects.allows(BetSize::Max));
            assert_eq!(limits(PlayerClass::Detective, tier), BetLimits { min: 25, max: 25 });
        }
    }

    #[test]
    fn test_rungs_raised_to_threat_and_clamped_to_chips() {
        let effects = SanityEffects::default();
        assert_eq!(effects.bet_limits(LADDER, 30, 1_000), BetLimits { min: 30, max: 50 });
        assert_eq!(effects.bet_limits(LADDER, 80, 1_000), BetLimits { min: 80, max: 80 });
        assert_eq!(effects.bet_limits(LADDER, 5, 12), BetLimits { min: 5, max: 12 });
        assert_eq!(effects.bet_limits(LADDER, 20, 7), BetLimits { min: 7, max: 7 });
        assert!(effects.bet_limits(LADDER, 5, 40).contains(40));
    }
}
