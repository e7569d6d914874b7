//! The player: chips, bet, sanity, status effects, trinket slots and the
//! two-part stat cache.
//!
//! ## Stats
//!
//! Offensive and economic stats come from two independent sources:
//!
//! - `trinket_stats`: rebuilt from equipped trinkets whenever the dirty flag
//!   is set ([`Player::refresh_stats`])
//! - `tag_stats`: passive card tag bonuses, recomputed from the table each
//!   time a card is revealed ([`Player::set_tag_stats`])
//!
//! Neither refresh touches the other field. [`Player::damage_modifiers`]
//! adds them together.

use serde::{Deserialize, Serialize};

use crate::cards::{Hand, HandId, TagBonuses};
use crate::effects::DamageModifiers;
use crate::progression::{BetLimits, PlayerClass, SanityEffects, SanityTier};
use crate::status::StatusEffectManager;
use crate::trinkets::{aggregate_trinket_stats, StatBlock, TrackedStat, TrinketInstance, TrinketRegistry};

use super::config::RunConfig;
use super::error::{GameError, Result};

/// The human player.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    /// Chips double as health.
    pub chips: i32,
    pub current_bet: i32,
    pub sanity: i32,
    pub max_sanity: i32,
    pub class: PlayerClass,
    bet_ladder: [i32; 3],
    pub status: StatusEffectManager,
    pub hand: Hand,
    trinkets: Vec<Option<TrinketInstance>>,
    trinket_stats: StatBlock,
    tag_stats: TagBonuses,
    stats_dirty: bool,
}

impl Player {
    #[must_use]
    pub fn new(config: &RunConfig) -> Self {
        Self {
            chips: config.starting_chips,
            current_bet: 0,
            sanity: config.max_sanity,
            max_sanity: config.max_sanity,
            class: config.player_class,
            bet_ladder: config.bet_ladder,
            status: StatusEffectManager::new(),
            hand: Hand::new(HandId::Player),
            trinkets: vec![None; config.trinket_slots],
            trinket_stats: StatBlock::default(),
            tag_stats: TagBonuses::default(),
            stats_dirty: false,
        }
    }

    // === Betting ===

    /// Legal bet range against an enemy whose threat is `min_bet`, after
    /// the sanity rules of the player's class.
    #[must_use]
    pub fn bet_limits(&self, min_bet: i32) -> BetLimits {
        self.sanity_effects().bet_limits(self.bet_ladder, min_bet, self.chips)
    }

    /// Move `amount` from chips to the bet.
    ///
    /// Rejects non-positive bets, bets above the stack, bets below the
    /// lowest open rung and bets above the highest one (see
    /// [`Player::bet_limits`]).
    pub fn place_bet(&mut self, amount: i32, min_bet: i32) -> Result<()> {
        let limits = self.bet_limits(min_bet);
        if amount <= 0 || amount > self.chips || amount < limits.min {
            return Err(GameError::InvalidBet {
                amount,
                chips: self.chips,
                min: limits.min,
            });
        }
        if amount > limits.max {
            return Err(GameError::BetAboveLimit {
                amount,
                max: limits.max,
            });
        }
        self.chips -= amount;
        self.current_bet = amount;
        tracing::debug!(amount, chips = self.chips, "bet placed");
        Ok(())
    }

    /// Can the current bet be doubled?
    #[must_use]
    pub fn can_double(&self) -> bool {
        self.current_bet > 0 && self.chips >= self.current_bet
    }

    /// Match the current bet from chips.
    pub fn double_bet(&mut self) -> Result<()> {
        if !self.can_double() {
            return Err(GameError::InvalidBet {
                amount: self.current_bet * 2,
                chips: self.chips,
                min: self.current_bet,
            });
        }
        self.chips -= self.current_bet;
        self.current_bet *= 2;
        Ok(())
    }

    /// Bet comes back with `winnings` on top.
    pub fn win_bet(&mut self, winnings: i32) {
        self.chips += self.current_bet + winnings.max(0);
        self.current_bet = 0;
    }

    /// Bet comes back unchanged.
    pub fn return_bet(&mut self) {
        self.chips += self.current_bet;
        self.current_bet = 0;
    }

    /// Bet is gone.
    pub fn lose_bet(&mut self) {
        self.current_bet = 0;
    }

    pub fn add_chips(&mut self, amount: i32) {
        self.chips += amount.max(0);
    }

    /// Remove chips, clamped at zero. Returns what was actually removed.
    pub fn lose_chips(&mut self, amount: i32) -> i32 {
        let lost = amount.clamp(0, self.chips.max(0));
        self.chips -= lost;
        lost
    }

    #[must_use]
    pub fn is_broke(&self) -> bool {
        self.chips <= 0 && self.current_bet <= 0
    }

    // === Sanity ===

    /// Add `delta` to sanity, clamped to `[0, max_sanity]`.
    pub fn change_sanity(&mut self, delta: i32) {
        self.sanity = (self.sanity + delta).clamp(0, self.max_sanity);
    }

    #[must_use]
    pub fn sanity_tier(&self) -> SanityTier {
        SanityTier::from_values(self.sanity, self.max_sanity)
    }

    /// Table rules for the current class and tier.
    #[must_use]
    pub fn sanity_effects(&self) -> SanityEffects {
        SanityEffects::for_class(self.class, self.sanity_tier())
    }

    // === Trinkets ===

    #[must_use]
    pub fn trinkets(&self) -> &[Option<TrinketInstance>] {
        &self.trinkets
    }

    #[must_use]
    pub fn trinket(&self, slot: usize) -> Option<&TrinketInstance> {
        self.trinkets.get(slot).and_then(Option::as_ref)
    }

    pub fn trinket_mut(&mut self, slot: usize) -> Option<&mut TrinketInstance> {
        self.trinkets.get_mut(slot).and_then(Option::as_mut)
    }

    #[must_use]
    pub fn first_empty_slot(&self) -> Option<usize> {
        self.trinkets.iter().position(Option::is_none)
    }

    /// Template keys of everything equipped.
    #[must_use]
    pub fn equipped_keys(&self) -> Vec<&str> {
        self.trinkets.iter().flatten().map(|t| t.template_key.as_str()).collect()
    }

    /// Put a trinket in `slot`, returning whatever was there.
    pub fn equip(&mut self, slot: usize, instance: TrinketInstance) -> Result<Option<TrinketInstance>> {
        let slots = self.trinkets.len();
        let entry = self
            .trinkets
            .get_mut(slot)
            .ok_or(GameError::SlotOutOfRange { slot, slots })?;
        let previous = entry.replace(instance);
        self.stats_dirty = true;
        Ok(previous)
    }

    /// Take the trinket out of `slot`.
    pub fn unequip(&mut self, slot: usize) -> Result<TrinketInstance> {
        let slots = self.trinkets.len();
        let entry = self
            .trinkets
            .get_mut(slot)
            .ok_or(GameError::SlotOutOfRange { slot, slots })?;
        let instance = entry.take().ok_or(GameError::SlotEmpty(slot))?;
        self.stats_dirty = true;
        Ok(instance)
    }

    /// Detach a slot's instance so it can be mutated alongside the rest of
    /// the run state. Pair with [`Player::restore_slot`].
    pub(crate) fn take_slot(&mut self, slot: usize) -> Option<TrinketInstance> {
        self.trinkets.get_mut(slot).and_then(Option::take)
    }

    pub(crate) fn restore_slot(&mut self, slot: usize, instance: TrinketInstance) {
        debug_assert!(self.trinkets.get(slot).is_some_and(Option::is_none));
        if let Some(entry) = self.trinkets.get_mut(slot) {
            *entry = Some(instance);
        }
    }

    /// Spend a debuff-block charge from the first trinket that has one.
    pub fn try_block_debuff(&mut self) -> bool {
        let Some(instance) = self.trinkets.iter_mut().flatten().find(|t| t.debuff_blocks > 0) else {
            return false;
        };
        instance.debuff_blocks -= 1;
        instance.track(TrackedStat::DebuffsBlocked, 1);
        tracing::info!(key = %instance.template_key, "debuff blocked");
        true
    }

    /// Drop combat-scoped charges on every trinket.
    pub fn reset_combat_charges(&mut self) {
        self.trinkets
            .iter_mut()
            .flatten()
            .for_each(TrinketInstance::reset_combat_charges);
    }

    // === Stats ===

    pub fn mark_dirty(&mut self) {
        self.stats_dirty = true;
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.stats_dirty
    }

    /// Rebuild trinket-derived stats if dirty. Returns `true` if rebuilt.
    pub fn refresh_stats(&mut self, registry: &TrinketRegistry) -> bool {
        if !self.stats_dirty {
            return false;
        }
        self.aggregate_stats(registry);
        true
    }

    /// Rebuild trinket-derived stats unconditionally.
    pub fn aggregate_stats(&mut self, registry: &TrinketRegistry) {
        self.trinket_stats = aggregate_trinket_stats(&self.trinkets, registry);
        self.stats_dirty = false;
    }

    #[must_use]
    pub fn trinket_stats(&self) -> &StatBlock {
        &self.trinket_stats
    }

    #[must_use]
    pub fn tag_stats(&self) -> &TagBonuses {
        &self.tag_stats
    }

    pub fn set_tag_stats(&mut self, bonuses: TagBonuses) {
        self.tag_stats = bonuses;
    }

    /// Trinket and tag contributions combined.
    #[must_use]
    pub fn damage_modifiers(&self) -> DamageModifiers {
        DamageModifiers {
            damage_flat: self.trinket_stats.damage_flat + self.tag_stats.damage_flat,
            damage_percent: self.trinket_stats.damage_percent + self.tag_stats.damage_percent,
            crit_chance: self.trinket_stats.crit_chance + self.tag_stats.crit_chance,
            crit_bonus: self.trinket_stats.crit_bonus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trinkets::{AffixRoll, StatKey, TrinketEffectType, TrinketPassive, TrinketRarity, TrinketTemplate};
    use crate::triggers::GameEventKind;
    use smallvec::smallvec;

    fn player() -> Player {
        Player::new(&RunConfig::default())
    }

    #[test]
    fn test_bet_validation() {
        let mut player = player();

        assert!(matches!(player.place_bet(0, 1), Err(GameError::InvalidBet { .. })));
        assert!(player.place_bet(-5, 1).is_err());
        assert!(player.place_bet(101, 1).is_err());
        assert!(player.place_bet(5, 10).is_err());
        assert_eq!(player.chips, 100);

        player.place_bet(40, 10).unwrap();
        assert_eq!(player.chips, 60);
        assert_eq!(player.current_bet, 40);
    }

    #[test]
    fn test_min_bet_clamped_to_chips() {
        let mut player = player();
        player.chips = 5;
        assert!(player.place_bet(5, 20).is_ok());
    }

    #[test]
    fn test_settlement() {
        let mut player = player();
        player.place_bet(20, 1).unwrap();
        player.win_bet(30);
        assert_eq!(player.chips, 130);
        assert_eq!(player.current_bet, 0);

        player.place_bet(30, 1).unwrap();
        player.return_bet();
        assert_eq!(player.chips, 130);

        player.place_bet(30, 1).unwrap();
        player.lose_bet();
        assert_eq!(player.chips, 100);
    }

    #[test]
    fn test_double() {
        let mut player = player();
        player.chips = 80;
        player.place_bet(50, 1).unwrap();
        assert!(!player.can_double());
        assert!(player.double_bet().is_err());

        player.win_bet(0);
        player.place_bet(30, 1).unwrap();
        player.double_bet().unwrap();
        assert_eq!(player.current_bet, 60);
        assert_eq!(player.chips, 20);
    }

    #[test]
    fn test_bet_ceiling_from_ladder() {
        let mut player = player();
        assert_eq!(player.place_bet(60, 1), Err(GameError::BetAboveLimit { amount: 60, max: 50 }));
        player.place_bet(50, 1).unwrap();
        assert_eq!(player.chips, 50);
    }

    #[test]
    fn test_degenerate_bets_by_tier() {
        let mut player = player();

        player.sanity = 70;
        assert_eq!(player.sanity_tier(), SanityTier::Medium);
        assert!(matches!(player.place_bet(10, 5), Err(GameError::InvalidBet { min: 25, .. })));
        assert!(player.place_bet(60, 5).is_err());

        player.sanity = 40;
        assert_eq!(player.sanity_tier(), SanityTier::Low);
        assert!(player.place_bet(10, 5).is_err());
        player.place_bet(100, 5).unwrap();
        player.return_bet();

        player.chips = 300;
        player.sanity = 20;
        assert_eq!(player.sanity_tier(), SanityTier::VeryLow);
        assert!(matches!(player.place_bet(25, 5), Err(GameError::InvalidBet { min: 100, .. })));
        player.place_bet(100, 5).unwrap();
        player.return_bet();

        player.sanity = 0;
        assert_eq!(player.bet_limits(5), BetLimits { min: 200, max: 200 });
        assert!(player.place_bet(100, 5).is_err());
        player.place_bet(200, 5).unwrap();
        assert_eq!(player.chips, 100);
    }

    #[test]
    fn test_dealer_loses_max_rung() {
        let mut player = Player::new(&RunConfig::default().with_player_class(PlayerClass::Dealer));
        player.sanity = 60;
        assert_eq!(player.place_bet(40, 5), Err(GameError::BetAboveLimit { amount: 40, max: 25 }));
        player.place_bet(5, 5).unwrap();
        assert!(!player.sanity_effects().reveal_hole);

        player.sanity = 0;
        let effects = player.sanity_effects();
        assert!(effects.reveal_hole && effects.auto_play);
    }

    #[test]
    fn test_detective_med_only() {
        let mut player = Player::new(&RunConfig::default().with_player_class(PlayerClass::Detective));
        player.place_bet(5, 5).unwrap();
        player.return_bet();

        player.sanity = 50;
        assert!(player.place_bet(5, 5).is_err());
        assert_eq!(player.place_bet(50, 5), Err(GameError::BetAboveLimit { amount: 50, max: 25 }));
        player.place_bet(25, 5).unwrap();
        assert_eq!(player.chips, 75);
    }

    #[test]
    fn test_tier_floor_clamped_to_chips() {
        let mut player = player();
        player.sanity = 10;
        player.chips = 30;
        assert_eq!(player.bet_limits(5), BetLimits { min: 30, max: 30 });
        player.place_bet(30, 5).unwrap();
        assert_eq!(player.chips, 0);
    }

    #[test]
    fn test_sanity_clamps() {
        let mut player = player();
        player.change_sanity(-130);
        assert_eq!(player.sanity, 0);
        assert_eq!(player.sanity_tier(), SanityTier::Zero);
        player.change_sanity(500);
        assert_eq!(player.sanity, 100);
    }

    #[test]
    fn test_equip_slots() {
        let template = TrinketTemplate::new(
            "coin",
            "Coin",
            TrinketRarity::Common,
            TrinketPassive::new(GameEventKind::PlayerWin, TrinketEffectType::AddChips, 1),
        );
        let mut player = player();
        let instance = TrinketInstance::new(&template, TrinketRarity::Common, 1);

        assert!(matches!(
            player.equip(6, instance.clone()),
            Err(GameError::SlotOutOfRange { slot: 6, slots: 6 })
        ));
        assert_eq!(player.equip(2, instance.clone()).unwrap(), None);
        assert!(player.is_dirty());
        assert_eq!(player.first_empty_slot(), Some(0));
        assert_eq!(player.equipped_keys(), vec!["coin"]);

        assert!(player.unequip(2).is_ok());
        assert_eq!(player.unequip(2), Err(GameError::SlotEmpty(2)));
    }

    #[test]
    fn test_tag_stats_survive_aggregation() {
        let template = TrinketTemplate::new(
            "blade",
            "Blade",
            TrinketRarity::Common,
            TrinketPassive::new(GameEventKind::PlayerWin, TrinketEffectType::None, 0),
        );
        let mut registry = TrinketRegistry::new();
        registry.register(template.clone());

        let mut player = player();
        let mut instance = TrinketInstance::new(&template, TrinketRarity::Common, 1);
        instance.affixes = smallvec![AffixRoll { stat: StatKey::DamageFlat, value: 3 }];
        player.equip(0, instance).unwrap();
        player.set_tag_stats(TagBonuses { damage_flat: 2, damage_percent: 10, crit_chance: 10 });

        assert!(player.refresh_stats(&registry));
        assert!(!player.refresh_stats(&registry));

        let mods = player.damage_modifiers();
        assert_eq!(mods.damage_flat, 5);
        assert_eq!(mods.damage_percent, 10);
        assert_eq!(player.tag_stats().crit_chance, 10);
    }

    #[test]
    fn test_debuff_block_charges() {
        let template = TrinketTemplate::new(
            "ward",
            "Ward",
            TrinketRarity::Common,
            TrinketPassive::new(GameEventKind::CombatStart, TrinketEffectType::BlockDebuff, 1),
        );
        let mut player = player();
        let mut instance = TrinketInstance::new(&template, TrinketRarity::Common, 1);
        instance.debuff_blocks = 1;
        player.equip(0, instance).unwrap();

        assert!(player.try_block_debuff());
        assert!(!player.try_block_debuff());
        assert_eq!(player.trinket(0).unwrap().tracked(TrackedStat::DebuffsBlocked), 1);
    }
}
