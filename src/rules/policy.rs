//! Hit/stand policies for the dealer and auto-play.

use crate::cards::{Card, HandTotal};

/// Decides whether a hand should take another card.
pub trait HitPolicy {
    fn should_hit(&self, total: &HandTotal, dealer_upcard: Option<&Card>) -> bool;
}

/// House rule: hit below the stand value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DealerPolicy {
    pub stands_on: u8,
}

impl Default for DealerPolicy {
    fn default() -> Self {
        Self { stands_on: 17 }
    }
}

impl HitPolicy for DealerPolicy {
    fn should_hit(&self, total: &HandTotal, _dealer_upcard: Option<&Card>) -> bool {
        !total.is_bust && total.best < u32::from(self.stands_on)
    }
}

/// Simplified basic strategy: always hit 11 or less, always stand on 17 or
/// more, otherwise hit against a dealer 7 or higher.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BasicStrategy;

impl HitPolicy for BasicStrategy {
    fn should_hit(&self, total: &HandTotal, dealer_upcard: Option<&Card>) -> bool {
        if total.is_bust {
            return false;
        }
        match total.best {
            ..=11 => true,
            17.. => false,
            _ => dealer_upcard.map_or(false, |card| card.value() >= 7),
        }
    }
}
