//! The combat loop and run progression.
//!
//! ## Round
//!
//! `Betting --place_bet--> Dealing --> PlayerTurn --stand/bust/double-->
//! DealerTurn --> RoundResolution`, then one of:
//!
//! - `GameOver` when the player is out of chips
//! - `Reward` when the enemy fell and a trinket dropped
//! - the next encounter (`Betting`, `Event` or `Victory`) when it fell
//!   without a drop
//! - `Betting` for the next round otherwise
//!
//! Sanity can change the round: a low-sanity Dealer sees the hole card as
//! soon as it is dealt and, at zero, watches the hand play itself with the
//! house policy.
//!
//! A natural on either side skips straight to resolution. A player bust
//! still passes through `DealerTurn`, where the hole card is revealed but no
//! card is drawn.

use smallvec::SmallVec;

use crate::abilities::AbilitySystem;
use crate::cards::{CardId, HandId};
use crate::core::{DamageSource, Enemy, GameError, Result};
use crate::encounters::{apply_choice, ChoiceOutcome};
use crate::progression::{BetLimits, Encounter};
use crate::rules::{compute_payout, resolve_outcome, DealerPolicy, HitPolicy, RoundOutcome};
use crate::triggers::{GameEventKind, PlayerAction};
use crate::trinkets::{generate_drop, on_equip, TrinketInstance};

use super::context::GameContext;
use super::state::GamePhase;

impl GameContext {
    // === Run and encounters ===

    /// Leave the menu and enter the first encounter.
    pub fn start_run(&mut self) -> Result<()> {
        self.require_phase(GamePhase::Menu, "start_run")?;
        for act in &mut self.acts {
            act.restart();
        }
        self.act_index = 0;
        tracing::info!(seed = self.config.seed, acts = self.acts.len(), "run started");
        self.enter_encounter()
    }

    /// Enter whatever encounter the acts point at, skipping encounters
    /// whose content is missing. Completing the last act is a victory.
    pub(crate) fn enter_encounter(&mut self) -> Result<()> {
        loop {
            let Some(act) = self.acts.get(self.act_index) else {
                tracing::info!(combats = self.stats.combats_won, "all acts complete");
                return self.transition(GamePhase::Victory);
            };
            let Some(encounter) = act.current_encounter().cloned() else {
                tracing::info!(act = %act.name, "act complete");
                self.act_index += 1;
                continue;
            };

            match &encounter {
                Encounter::Event => {
                    if let Some(event) = self.content.events.pick(&mut self.rngs.events).cloned() {
                        tracing::info!(event = %event.key, "event encounter");
                        self.pending_event = Some(event);
                        self.event_reroll_cost = self.config.event_reroll_cost;
                        return self.transition(GamePhase::Event);
                    }
                    tracing::warn!("event pool is empty, encounter skipped");
                }
                Encounter::Normal(key) | Encounter::Elite(key) | Encounter::Boss(key) => {
                    if let Some(mut enemy) = self.content.enemies.spawn(key) {
                        enemy.is_elite |= matches!(encounter, Encounter::Elite(_));
                        enemy.is_boss |= matches!(encounter, Encounter::Boss(_));
                        return self.begin_combat(enemy);
                    }
                }
            }

            if let Some(act) = self.acts.get_mut(self.act_index) {
                act.advance();
            }
        }
    }

    fn begin_combat(&mut self, mut enemy: Enemy) -> Result<()> {
        AbilitySystem::reset_states(&mut enemy.abilities);
        tracing::info!(enemy = %enemy.name, hp = enemy.max_hp, elite = enemy.is_elite, "combat start");
        self.enemy = Some(enemy);
        self.player.status.clear_all();
        self.player.reset_combat_charges();
        self.transition(GamePhase::Betting)?;
        self.raise(GameEventKind::CombatStart, 0);
        Ok(())
    }

    /// Move past the current encounter.
    fn advance_encounter(&mut self) -> Result<()> {
        if let Some(act) = self.acts.get_mut(self.act_index) {
            act.advance();
        }
        self.enter_encounter()
    }

    /// Legal bet range against the current enemy at the player's sanity.
    #[must_use]
    pub fn bet_limits(&self) -> BetLimits {
        let threat = self.enemy.as_ref().map_or(1, |e| e.chip_threat);
        self.player.bet_limits(threat)
    }

    /// Smallest legal bet right now.
    #[must_use]
    pub fn min_bet(&self) -> i32 {
        self.bet_limits().min
    }

    // === Round ===

    /// Place a bet and deal the round.
    pub fn place_bet(&mut self, amount: i32) -> Result<()> {
        self.require_phase(GamePhase::Betting, "place_bet")?;
        let min = self.enemy.as_ref().map_or(1, |e| e.chip_threat);
        self.player.place_bet(amount, min)?;
        self.stats.chips_bet += i64::from(amount);
        self.transition(GamePhase::Dealing)?;
        self.start_round()
    }

    fn start_round(&mut self) -> Result<()> {
        self.round += 1;
        tracing::info!(round = self.round, bet = self.player.current_bet, "round start");
        self.raise(GameEventKind::RoundStart, self.player.current_bet);

        if self.deck.remaining() < self.config.reshuffle_threshold {
            self.deck.reshuffle_discard(&mut self.rngs.deck);
        }

        // Player, dealer hole card, player, dealer upcard
        for (hand, face_up) in [
            (HandId::Player, true),
            (HandId::Dealer, false),
            (HandId::Player, true),
            (HandId::Dealer, true),
        ] {
            match self.draw_card(hand, face_up) {
                Ok(_) => {}
                Err(GameError::DeckEmpty) => return self.forfeit_round(),
                Err(err) => return Err(err),
            }
        }
        self.check_card_count();
        self.refresh_tag_stats();

        let effects = self.player.sanity_effects();
        if effects.reveal_hole {
            tracing::debug!(tier = %self.player.sanity_tier(), "hole card shown early");
            self.reveal_dealer();
        }

        if self.player.hand.is_blackjack() || self.dealer.is_blackjack() {
            tracing::info!(
                player = self.player.hand.is_blackjack(),
                dealer = self.dealer.is_blackjack(),
                "natural dealt"
            );
            self.reveal_dealer();
            self.transition(GamePhase::RoundResolution)?;
            return self.resolve_round();
        }
        self.transition(GamePhase::PlayerTurn)?;

        if effects.auto_play {
            tracing::info!(tier = %self.player.sanity_tier(), "hand plays itself");
            return self.auto_play_turn(&DealerPolicy::default());
        }
        Ok(())
    }

    /// Take a card. Busting or reaching 21 ends the turn.
    pub fn hit(&mut self) -> Result<()> {
        self.require_phase(GamePhase::PlayerTurn, "hit")?;
        self.raise(GameEventKind::PlayerAction(PlayerAction::Hit), 0);

        match self.draw_card(HandId::Player, true) {
            Ok(_) => {}
            Err(GameError::DeckEmpty) => return self.forfeit_round(),
            Err(err) => return Err(err),
        }
        self.raise(GameEventKind::PlayerActionEnd, 0);

        if self.player.hand.is_bust() {
            return self.end_player_turn();
        }
        if self.player.hand.value() == 21 {
            tracing::debug!("21 reached, auto-stand");
            return self.end_player_turn();
        }
        Ok(())
    }

    pub fn stand(&mut self) -> Result<()> {
        self.require_phase(GamePhase::PlayerTurn, "stand")?;
        self.raise(GameEventKind::PlayerAction(PlayerAction::Stand), 0);
        self.raise(GameEventKind::PlayerActionEnd, 0);
        self.end_player_turn()
    }

    /// Double the bet, take exactly one card, end the turn.
    pub fn double_down(&mut self) -> Result<()> {
        self.require_phase(GamePhase::PlayerTurn, "double_down")?;
        if self.player.hand.len() != 2 {
            return Err(GameError::InvalidAction {
                action: "double_down",
                phase: self.phase,
            });
        }
        let extra = self.player.current_bet;
        self.player.double_bet()?;
        self.stats.chips_bet += i64::from(extra);
        self.raise(GameEventKind::PlayerAction(PlayerAction::Double), self.player.current_bet);

        match self.draw_card(HandId::Player, true) {
            Ok(_) => {}
            Err(GameError::DeckEmpty) => return self.forfeit_round(),
            Err(err) => return Err(err),
        }
        self.raise(GameEventKind::PlayerActionEnd, 0);
        self.end_player_turn()
    }

    /// Play the player's turn with `policy` until it ends.
    pub fn auto_play_turn(&mut self, policy: &impl HitPolicy) -> Result<()> {
        while self.phase == GamePhase::PlayerTurn {
            if policy.should_hit(&self.player.hand.total(), self.dealer.upcard()) {
                self.hit()?;
            } else {
                self.stand()?;
            }
        }
        Ok(())
    }

    /// Hand the table to the dealer. A bust is announced here, whatever
    /// drew the card that caused it.
    fn end_player_turn(&mut self) -> Result<()> {
        if self.player.hand.is_bust() {
            self.raise(GameEventKind::PlayerBust, self.player.hand.value() as i32);
        }
        self.transition(GamePhase::DealerTurn)?;
        self.dealer_turn()
    }

    fn dealer_turn(&mut self) -> Result<()> {
        self.reveal_dealer();

        if !self.player.hand.is_bust() {
            let policy = DealerPolicy {
                stands_on: self.config.dealer_stands_on,
            };
            while policy.should_hit(&self.dealer.total(), None) {
                match self.draw_card(HandId::Dealer, true) {
                    Ok(_) => {}
                    Err(GameError::DeckEmpty) => return self.forfeit_round(),
                    Err(err) => return Err(err),
                }
            }
            self.refresh_tag_stats();
            if self.dealer.is_bust() {
                self.raise(GameEventKind::DealerBust, self.dealer.value() as i32);
            }
        }

        self.transition(GamePhase::RoundResolution)?;
        self.resolve_round()
    }

    fn forfeit_round(&mut self) -> Result<()> {
        tracing::warn!(round = self.round, "round forfeited");
        self.transition(GamePhase::RoundResolution)?;
        self.settle_round(RoundOutcome::Loss)
    }

    fn resolve_round(&mut self) -> Result<()> {
        let outcome = resolve_outcome(&self.player.hand.total(), &self.dealer.total());
        self.settle_round(outcome)
    }

    /// Pay out, damage the enemy, fire outcome events, clear the table and
    /// pick the next phase.
    fn settle_round(&mut self, outcome: RoundOutcome) -> Result<()> {
        let bet = self.player.current_bet;
        let payout = compute_payout(
            outcome,
            bet,
            self.config.blackjack_payout,
            self.player.trinket_stats(),
            &self.player.status,
        );
        tracing::info!(%outcome, bet, player = self.player.hand.value(), dealer = self.dealer.value(), "round resolved");

        if outcome.is_win() {
            self.player.win_bet(payout.winnings);
            self.stats.chips_won += i64::from(payout.winnings);
            self.stats.rounds_won += 1;

            let dealt = self.damage_enemy(payout.base_damage, DamageSource::TurnWin).unwrap_or(0);
            let rake = self.player.status.take_rake(dealt);
            if rake > 0 {
                let lost = self.player.lose_chips(rake);
                self.stats.chips_lost += i64::from(lost);
                tracing::info!(rake = lost, "rake taken");
            }

            if outcome == RoundOutcome::Blackjack {
                self.raise(GameEventKind::PlayerBlackjack, payout.winnings);
            }
            self.raise(GameEventKind::PlayerWin, payout.winnings);
        } else if outcome.is_loss() {
            self.player.lose_bet();
            self.player.add_chips(payout.refund);
            let extra = self.player.lose_chips(payout.extra_loss);
            self.stats.chips_lost += i64::from(bet - payout.refund + extra);
            self.stats.rounds_lost += 1;
            self.raise(GameEventKind::PlayerLoss, bet);
        } else {
            self.player.return_bet();
            self.stats.rounds_pushed += 1;
            if payout.base_damage > 0 {
                self.damage_enemy(payout.base_damage, DamageSource::TurnPush);
            }
            self.raise(GameEventKind::PlayerPush, bet);
        }

        self.last_outcome = Some(outcome);
        self.raise(GameEventKind::HandEnd, 0);
        self.clear_table();
        self.stats.observe_chips(self.player.chips);

        self.after_round()
    }

    fn after_round(&mut self) -> Result<()> {
        if self.player.chips <= 0 {
            tracing::info!(round = self.round, "out of chips");
            return self.transition(GamePhase::GameOver);
        }

        let defeated = self.enemy.as_ref().is_some_and(|e| e.is_defeated);
        if !defeated {
            return self.transition(GamePhase::Betting);
        }

        self.raise(GameEventKind::EnemyDefeated, 0);
        self.stats.combats_won += 1;

        let elite = self.enemy.as_ref().is_some_and(Enemy::uses_elite_drops);
        let tier = self.current_act().map_or(1, |act| act.tier);
        let equipped = self.player.equipped_keys();
        let drop = generate_drop(
            &self.content.trinkets,
            &self.config,
            &mut self.pity,
            elite,
            tier,
            &equipped,
            &mut self.rngs.loot,
        );
        self.enemy = None;

        match drop {
            Some(instance) => {
                self.pending_reward = Some(instance);
                self.transition(GamePhase::Reward)
            }
            None => {
                tracing::warn!("no trinket could drop");
                self.advance_encounter()
            }
        }
    }

    // === Trinkets ===

    /// Put `instance` in `slot`, run its equip setup and refresh stats.
    /// Returns the trinket it replaced.
    pub fn equip_trinket(&mut self, slot: usize, instance: TrinketInstance) -> Result<Option<TrinketInstance>> {
        let key = instance.template_key.clone();
        let previous = self.player.equip(slot, instance)?;

        match self.content.trinkets.get(&key).cloned() {
            Some(template) => {
                if let Some(mut equipped) = self.player.take_slot(slot) {
                    on_equip(&template, &mut equipped, self);
                    self.player.restore_slot(slot, equipped);
                }
            }
            None => tracing::warn!(%key, "equipped trinket has no template"),
        }

        self.player.refresh_stats(&self.content.trinkets);
        tracing::info!(%key, slot, replaced = previous.is_some(), "trinket equipped");
        Ok(previous)
    }

    pub fn unequip_trinket(&mut self, slot: usize) -> Result<TrinketInstance> {
        let instance = self.player.unequip(slot)?;
        self.player.refresh_stats(&self.content.trinkets);
        Ok(instance)
    }

    /// Equip the pending drop into `slot` (or the first free slot) and move on.
    pub fn take_reward(&mut self, slot: Option<usize>) -> Result<Option<TrinketInstance>> {
        self.require_phase(GamePhase::Reward, "take_reward")?;
        let slot = match slot.or_else(|| self.player.first_empty_slot()) {
            Some(slot) => slot,
            None => return Err(GameError::NoFreeSlot),
        };
        let instance = self.pending_reward.take().ok_or(GameError::NothingPending("reward"))?;

        let replaced = match self.equip_trinket(slot, instance.clone()) {
            Ok(replaced) => replaced,
            Err(err) => {
                self.pending_reward = Some(instance);
                return Err(err);
            }
        };
        self.advance_encounter()?;
        Ok(replaced)
    }

    /// Leave the pending drop behind and move on.
    pub fn skip_reward(&mut self) -> Result<()> {
        self.require_phase(GamePhase::Reward, "skip_reward")?;
        if let Some(instance) = self.pending_reward.take() {
            tracing::info!(key = %instance.template_key, "reward skipped");
        }
        self.advance_encounter()
    }

    // === Events ===

    /// Apply choice `index` of the pending event, then move on.
    pub fn choose_event_option(&mut self, index: usize) -> Result<ChoiceOutcome> {
        self.require_phase(GamePhase::Event, "choose_event_option")?;
        let event = self.pending_event.as_ref().ok_or(GameError::NothingPending("event"))?;
        let choice = event.choice(index)?.clone();
        tracing::info!(event = %event.key, choice = %choice.text, "event choice");

        let cards: Vec<CardId> = (0..52).map(CardId::new).collect();
        let outcome = apply_choice(&choice, &mut self.player, &mut self.deck_tags, &cards, &mut self.rngs.events);

        if let Some(key) = &choice.trinket_reward {
            self.grant_trinket(key)?;
        }

        self.pending_event = None;
        if self.player.chips <= 0 {
            self.transition(GamePhase::GameOver)?;
        } else {
            self.advance_encounter()?;
        }
        Ok(outcome)
    }

    fn grant_trinket(&mut self, key: &str) -> Result<()> {
        let Some(template) = self.content.trinkets.get(key) else {
            tracing::warn!(%key, "event rewards unknown trinket");
            return Ok(());
        };
        let tier = self.current_act().map_or(1, |act| act.tier);
        let mut instance = TrinketInstance::new(template, template.rarity, tier);
        instance.set_affixes(template.base_value, SmallVec::new());

        match self.player.first_empty_slot() {
            Some(slot) => self.equip_trinket(slot, instance).map(|_| ()),
            None => {
                tracing::warn!(%key, "no free slot for event trinket");
                Ok(())
            }
        }
    }

    /// Pay to swap the pending event for a different one. The cost doubles.
    pub fn reroll_event(&mut self) -> Result<()> {
        self.require_phase(GamePhase::Event, "reroll_event")?;
        let cost = self.event_reroll_cost;
        if self.player.chips < cost {
            return Err(GameError::InvalidBet {
                amount: cost,
                chips: self.player.chips,
                min: cost,
            });
        }
        let current = self
            .pending_event
            .as_ref()
            .map(|e| e.key.clone())
            .ok_or(GameError::NothingPending("event"))?;

        let Some(next) = self
            .content
            .events
            .pick_different(&current, self.config.event_retry_limit, &mut self.rngs.events)
            .cloned()
        else {
            return Err(GameError::NothingPending("event"));
        };

        self.player.lose_chips(cost);
        self.event_reroll_cost = cost.saturating_mul(2);
        tracing::info!(from = %current, to = %next.key, cost, "event rerolled");
        self.pending_event = Some(next);
        Ok(())
    }
}
