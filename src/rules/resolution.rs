//! Round resolution and payout.
//!
//! ## Outcome
//!
//! Standard Blackjack: a player bust loses whatever the dealer holds, a
//! natural beats any other 21, two naturals push, and equal non-bust totals
//! push.
//!
//! ## Payout order
//!
//! 1. `bet x multiplier` (1.0 for a win, the blackjack payout for a natural)
//! 2. status effects (Greed caps winnings, Tilt adds a loss)
//! 3. trinket fields, each only for its own outcome: win bonus percent and
//!    flat chips on a win, loss refund percent on a loss, push damage
//!    percent on a push

use serde::{Deserialize, Serialize};

use crate::cards::HandTotal;
use crate::status::StatusEffectManager;
use crate::trinkets::StatBlock;

/// How a round ended for the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum RoundOutcome {
    /// Natural against a non-natural.
    Blackjack,
    Win,
    DealerBust,
    Push,
    Loss,
    Bust,
}

impl RoundOutcome {
    #[must_use]
    pub fn is_win(self) -> bool {
        matches!(self, RoundOutcome::Blackjack | RoundOutcome::Win | RoundOutcome::DealerBust)
    }

    #[must_use]
    pub fn is_loss(self) -> bool {
        matches!(self, RoundOutcome::Loss | RoundOutcome::Bust)
    }

    /// Bet multiplier before any modifier.
    #[must_use]
    pub fn multiplier(self, blackjack_payout: f32) -> f32 {
        match self {
            RoundOutcome::Blackjack => blackjack_payout,
            RoundOutcome::Win | RoundOutcome::DealerBust => 1.0,
            RoundOutcome::Push | RoundOutcome::Loss | RoundOutcome::Bust => 0.0,
        }
    }
}

/// Compare two scored hands.
#[must_use]
pub fn resolve_outcome(player: &HandTotal, dealer: &HandTotal) -> RoundOutcome {
    if player.is_bust {
        return RoundOutcome::Bust;
    }
    match (player.is_blackjack, dealer.is_blackjack) {
        (true, true) => return RoundOutcome::Push,
        (true, false) => return RoundOutcome::Blackjack,
        (false, true) => return RoundOutcome::Loss,
        (false, false) => {}
    }
    if dealer.is_bust {
        return RoundOutcome::DealerBust;
    }
    match player.best.cmp(&dealer.best) {
        std::cmp::Ordering::Greater => RoundOutcome::Win,
        std::cmp::Ordering::Less => RoundOutcome::Loss,
        std::cmp::Ordering::Equal => RoundOutcome::Push,
    }
}

/// Chips and damage produced by a resolved round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    /// Paid on top of the returned bet.
    pub winnings: i32,
    /// Part of a lost bet handed back.
    pub refund: i32,
    /// Chips lost beyond the bet.
    pub extra_loss: i32,
    /// Damage to the enemy before the player's damage modifiers.
    pub base_damage: i32,
}

/// Compute the payout of `outcome` for `bet`.
#[must_use]
pub fn compute_payout(
    outcome: RoundOutcome,
    bet: i32,
    blackjack_payout: f32,
    stats: &StatBlock,
    status: &StatusEffectManager,
) -> Payout {
    let mut payout = Payout::default();
    let base = (bet as f32 * outcome.multiplier(blackjack_payout)).floor() as i32;

    if outcome.is_win() {
        let mut winnings = status.modify_winnings(base, bet);
        winnings += winnings * stats.win_bonus_percent / 100;
        winnings += stats.flat_chips_on_win;
        payout.winnings = winnings.max(0);
        payout.base_damage = base;
    } else if outcome.is_loss() {
        payout.refund = (bet * stats.loss_refund_percent / 100).clamp(0, bet);
        payout.extra_loss = status.extra_loss(bet);
    } else {
        payout.base_damage = bet * stats.push_damage_percent / 100;
    }

    tracing::debug!(%outcome, bet, ?payout, "payout computed");
    payout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusKind;

    fn total(best: u32, cards: usize) -> HandTotal {
        HandTotal {
            hard: best,
            best,
            is_soft: false,
            is_blackjack: cards == 2 && best == 21,
            is_bust: best > 21,
        }
    }

    #[test]
    fn test_outcomes() {
        assert_eq!(resolve_outcome(&total(20, 2), &total(19, 2)), RoundOutcome::Win);
        assert_eq!(resolve_outcome(&total(25, 3), &total(18, 2)), RoundOutcome::Bust);
        assert_eq!(resolve_outcome(&total(25, 3), &total(26, 3)), RoundOutcome::Bust);
        assert_eq!(resolve_outcome(&total(18, 2), &total(18, 3)), RoundOutcome::Push);
        assert_eq!(resolve_outcome(&total(21, 2), &total(21, 3)), RoundOutcome::Blackjack);
        assert_eq!(resolve_outcome(&total(21, 3), &total(21, 2)), RoundOutcome::Loss);
        assert_eq!(resolve_outcome(&total(21, 2), &total(21, 2)), RoundOutcome::Push);
        assert_eq!(resolve_outcome(&total(12, 3), &total(23, 3)), RoundOutcome::DealerBust);
    }

    #[test]
    fn test_plain_win_pays_one_to_one() {
        let payout = compute_payout(
            RoundOutcome::Win,
            20,
            1.5,
            &StatBlock::default(),
            &StatusEffectManager::new(),
        );
        assert_eq!(payout, Payout { winnings: 20, refund: 0, extra_loss: 0, base_damage: 20 });
    }

    #[test]
    fn test_blackjack_payout() {
        let payout = compute_payout(RoundOutcome::Blackjack, 15, 1.5, &StatBlock::default(), &StatusEffectManager::new());
        assert_eq!(payout.winnings, 22);
    }

    #[test]
    fn test_modifiers_match_outcome() {
        let stats = StatBlock {
            win_bonus_percent: 50,
            loss_refund_percent: 25,
            push_damage_percent: 40,
            flat_chips_on_win: 3,
            ..Default::default()
        };
        let status = StatusEffectManager::new();

        let win = compute_payout(RoundOutcome::Win, 20, 1.5, &stats, &status);
        assert_eq!(win.winnings, 33);
        assert_eq!(win.refund, 0);

        let loss = compute_payout(RoundOutcome::Loss, 20, 1.5, &stats, &status);
        assert_eq!(loss.refund, 5);
        assert_eq!(loss.winnings, 0);

        let push = compute_payout(RoundOutcome::Push, 20, 1.5, &stats, &status);
        assert_eq!(push, Payout { winnings: 0, refund: 0, extra_loss: 0, base_damage: 8 });
    }

    #[test]
    fn test_status_modifiers() {
        let mut status = StatusEffectManager::new();
        status.apply(StatusKind::Greed, 0, 2);
        status.apply(StatusKind::Tilt, 0, 2);

        let win = compute_payout(RoundOutcome::Blackjack, 20, 1.5, &StatBlock::default(), &status);
        assert_eq!(win.winnings, 10);
        assert_eq!(win.base_damage, 30);

        let loss = compute_payout(RoundOutcome::Bust, 20, 1.5, &StatBlock::default(), &status);
        assert_eq!(loss.extra_loss, 20);
    }
}
