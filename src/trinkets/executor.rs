//! Trinket effect executors.
//!
//! The executor is selected by the passive's [`TrinketEffectType`], which was
//! parsed once at load. Effect types that only feed aggregated stats (win
//! bonus, loss refund, push damage) do nothing here except update tooltip
//! counters; the payout pipeline reads the aggregated fields.

use crate::cards::CardTag;
use crate::status::StatusKind;

use super::instance::{TrackedStat, TrinketInstance};
use super::template::{TrinketEffectType, TrinketPassive, TrinketTemplate};

/// Run state a trinket effect can touch.
pub trait TrinketHost {
    fn current_bet(&self) -> i32;

    fn add_chips(&mut self, amount: i32);

    /// Remove chips, clamped at zero. Returns the amount removed.
    fn lose_chips(&mut self, amount: i32) -> i32;

    fn apply_status(&mut self, status: StatusKind, magnitude: i32, duration: i32);

    fn clear_status(&mut self, status: StatusKind) -> bool;

    /// Deal damage to the current enemy through the player's modifiers.
    /// `None` outside combat.
    fn deal_damage(&mut self, base: i32) -> Option<i32>;

    /// Tag `count` random untagged deck cards. Returns how many were tagged.
    fn tag_random_cards(&mut self, tag: CardTag, count: usize) -> usize;

    /// Trinket-derived stats need recomputing.
    fn mark_dirty(&mut self);
}

/// Execute one passive of `template` for `instance`.
///
/// Returns `true` when the effect did something.
pub fn execute_trinket_effect<H: TrinketHost + ?Sized>(
    template: &TrinketTemplate,
    instance: &mut TrinketInstance,
    passive: &TrinketPassive,
    host: &mut H,
) -> bool {
    let bet = host.current_bet();
    if template.condition_bet_gte > 0 && bet < template.condition_bet_gte {
        tracing::debug!(trinket = %template.key, bet, "bet condition not met");
        return false;
    }

    tracing::debug!(trinket = %template.key, effect = %passive.effect, value = passive.value, "trinket effect");

    match passive.effect {
        TrinketEffectType::None => false,

        TrinketEffectType::AddChips => {
            host.add_chips(passive.value);
            instance.track(TrackedStat::BonusChips, passive.value);
            true
        }

        TrinketEffectType::AddChipsPercent => {
            instance.track(TrackedStat::BonusChips, bet * passive.value / 100);
            true
        }

        TrinketEffectType::RefundChipsPercent => {
            instance.track(TrackedStat::RefundedChips, bet * passive.value / 100);
            true
        }

        TrinketEffectType::LoseChips => {
            host.lose_chips(passive.value);
            true
        }

        TrinketEffectType::ApplyStatus => match passive.status {
            Some(status) => {
                host.apply_status(status, passive.value, passive.status_stacks);
                true
            }
            None => {
                tracing::warn!(trinket = %template.key, "APPLY_STATUS without status key");
                false
            }
        },

        TrinketEffectType::ClearStatus => match passive.status {
            Some(status) => host.clear_status(status),
            None => {
                tracing::warn!(trinket = %template.key, "CLEAR_STATUS without status key");
                false
            }
        },

        TrinketEffectType::TrinketStack => {
            let Some(rule) = template.stack else {
                tracing::warn!(trinket = %template.key, "TRINKET_STACK without stack rule");
                return false;
            };
            if rule.max == 0 {
                instance.stacks += 1;
                instance.track_max(TrackedStat::HighestStreak, instance.stacks as i32);
            } else if instance.stacks < rule.max {
                instance.stacks += 1;
            } else if rule.reset_to_one {
                instance.stacks = 1;
            }
            host.mark_dirty();
            true
        }

        TrinketEffectType::TrinketStackReset => {
            instance.stacks = 0;
            host.mark_dirty();
            true
        }

        TrinketEffectType::AddDamageFlat => match host.deal_damage(passive.value) {
            Some(dealt) => {
                instance.track(TrackedStat::DamageDealt, dealt);
                true
            }
            None => false,
        },

        TrinketEffectType::AddTagToCards => {
            let Some(rule) = template.tag else {
                tracing::warn!(trinket = %template.key, "ADD_TAG_TO_CARDS without tag rule");
                return false;
            };
            host.tag_random_cards(rule.tag, rule.count) > 0
        }

        TrinketEffectType::BuffTagDamage => {
            let tag = template.tag.map(|rule| rule.tag).or(passive.tag);
            let Some(tag) = tag else {
                tracing::warn!(trinket = %template.key, "BUFF_TAG_DAMAGE without tag");
                return false;
            };
            instance.buffed_tag = Some(tag);
            instance.tag_buff_value = template
                .tag
                .map(|rule| rule.buff_value)
                .filter(|v| *v != 0)
                .unwrap_or(passive.value);
            true
        }

        TrinketEffectType::BlockDebuff => {
            instance.debuff_blocks += passive.value;
            true
        }

        TrinketEffectType::PunishHeal => {
            instance.heal_punishes += passive.value.max(1);
            true
        }

        // Read from aggregated stats at payout time
        TrinketEffectType::DamageMultiplier | TrinketEffectType::PushDamagePercent => false,
    }
}

/// Equip-time setup: tag deck cards and record tag buffs.
pub fn on_equip<H: TrinketHost + ?Sized>(template: &TrinketTemplate, instance: &mut TrinketInstance, host: &mut H) {
    let passives = std::iter::once(template.primary).chain(template.secondary);
    for passive in passives {
        if matches!(
            passive.effect,
            TrinketEffectType::AddTagToCards | TrinketEffectType::BuffTagDamage
        ) {
            execute_trinket_effect(template, instance, &passive, host);
        }
    }
    host.mark_dirty();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusEffectManager;
    use crate::trinkets::{StackRule, StatKey, TagRule, TrinketRarity};
    use crate::triggers::GameEventKind;

    #[derive(Default)]
    struct Table {
        chips: i32,
        bet: i32,
        status: StatusEffectManager,
        in_combat: bool,
        damage: i32,
        tagged: usize,
        dirty: bool,
    }

    impl TrinketHost for Table {
        fn current_bet(&self) -> i32 {
            self.bet
        }
        fn add_chips(&mut self, amount: i32) {
            self.chips += amount;
        }
        fn lose_chips(&mut self, amount: i32) -> i32 {
            let lost = amount.min(self.chips);
            self.chips -= lost;
            lost
        }
        fn apply_status(&mut self, status: StatusKind, magnitude: i32, duration: i32) {
            self.status.apply(status, magnitude, duration);
        }
        fn clear_status(&mut self, status: StatusKind) -> bool {
            self.status.remove(status)
        }
        fn deal_damage(&mut self, base: i32) -> Option<i32> {
            self.in_combat.then(|| {
                self.damage += base;
                base
            })
        }
        fn tag_random_cards(&mut self, _tag: CardTag, count: usize) -> usize {
            self.tagged += count;
            count
        }
        fn mark_dirty(&mut self) {
            self.dirty = true;
        }
    }

    fn passive(effect: TrinketEffectType, value: i32) -> TrinketPassive {
        TrinketPassive::new(GameEventKind::PlayerWin, effect, value)
    }

    fn run(template: &TrinketTemplate, instance: &mut TrinketInstance, table: &mut Table) -> bool {
        let primary = template.primary;
        execute_trinket_effect(template, instance, &primary, table)
    }

    #[test]
    fn test_add_and_lose_chips() {
        let template = TrinketTemplate::new("t", "T", TrinketRarity::Common, passive(TrinketEffectType::AddChips, 5));
        let mut instance = TrinketInstance::new(&template, TrinketRarity::Common, 1);
        let mut table = Table { chips: 10, ..Default::default() };

        assert!(run(&template, &mut instance, &mut table));
        assert_eq!(table.chips, 15);
        assert_eq!(instance.tracked(TrackedStat::BonusChips), 5);

        let drain = TrinketTemplate::new("d", "D", TrinketRarity::Common, passive(TrinketEffectType::LoseChips, 50));
        run(&drain, &mut instance, &mut table);
        assert_eq!(table.chips, 0);
    }

    #[test]
    fn test_stack_cap_and_wrap() {
        let rule = StackRule { stat: StatKey::DamagePercent, per_stack: 2, max: 2, reset_to_one: true };
        let template = TrinketTemplate::new("w", "W", TrinketRarity::Common, passive(TrinketEffectType::TrinketStack, 0))
            .with_stack(rule);
        let mut instance = TrinketInstance::new(&template, TrinketRarity::Common, 1);
        let mut table = Table::default();

        run(&template, &mut instance, &mut table);
        run(&template, &mut instance, &mut table);
        assert_eq!(instance.stacks, 2);
        run(&template, &mut instance, &mut table);
        assert_eq!(instance.stacks, 1);
        assert!(table.dirty);
    }

    #[test]
    fn test_unbounded_stack_tracks_streak() {
        let rule = StackRule { stat: StatKey::DamageFlat, per_stack: 1, max: 0, reset_to_one: false };
        let template = TrinketTemplate::new("s", "S", TrinketRarity::Common, passive(TrinketEffectType::TrinketStack, 0))
            .with_stack(rule)
            .with_secondary(TrinketPassive::new(GameEventKind::PlayerLoss, TrinketEffectType::TrinketStackReset, 0));
        let mut instance = TrinketInstance::new(&template, TrinketRarity::Common, 1);
        let mut table = Table::default();

        for _ in 0..4 {
            run(&template, &mut instance, &mut table);
        }
        let reset = template.secondary.unwrap();
        execute_trinket_effect(&template, &mut instance, &reset, &mut table);

        assert_eq!(instance.stacks, 0);
        assert_eq!(instance.tracked(TrackedStat::HighestStreak), 4);
    }

    #[test]
    fn test_bet_condition() {
        let template = TrinketTemplate::new("h", "H", TrinketRarity::Common, passive(TrinketEffectType::AddChips, 5))
            .with_bet_condition(20);
        let mut instance = TrinketInstance::new(&template, TrinketRarity::Common, 1);
        let mut table = Table { bet: 10, ..Default::default() };

        assert!(!run(&template, &mut instance, &mut table));
        table.bet = 20;
        assert!(run(&template, &mut instance, &mut table));
    }

    #[test]
    fn test_damage_only_in_combat() {
        let template = TrinketTemplate::new("k", "K", TrinketRarity::Common, passive(TrinketEffectType::AddDamageFlat, 7));
        let mut instance = TrinketInstance::new(&template, TrinketRarity::Common, 1);
        let mut table = Table::default();

        assert!(!run(&template, &mut instance, &mut table));
        table.in_combat = true;
        assert!(run(&template, &mut instance, &mut table));
        assert_eq!(instance.tracked(TrackedStat::DamageDealt), 7);
    }

    #[test]
    fn test_equip_tags_cards_and_buffs() {
        let template = TrinketTemplate::new(
            "skull",
            "Cursed Skull",
            TrinketRarity::Rare,
            TrinketPassive::new(GameEventKind::CombatStart, TrinketEffectType::AddTagToCards, 0),
        )
        .with_secondary(TrinketPassive::new(GameEventKind::CombatStart, TrinketEffectType::BuffTagDamage, 0))
        .with_tag(TagRule { tag: CardTag::Cursed, count: 4, buff_value: 5 });
        let mut instance = TrinketInstance::new(&template, TrinketRarity::Rare, 1);
        let mut table = Table::default();

        on_equip(&template, &mut instance, &mut table);

        assert_eq!(table.tagged, 4);
        assert_eq!(instance.buffed_tag, Some(CardTag::Cursed));
        assert_eq!(instance.tag_buff_value, 5);
    }

    #[test]
    fn test_status_effects() {
        let template = TrinketTemplate::new(
            "charm",
            "Charm",
            TrinketRarity::Common,
            passive(TrinketEffectType::ClearStatus, 0).with_status(StatusKind::Tilt, 0),
        );
        let mut instance = TrinketInstance::new(&template, TrinketRarity::Common, 1);
        let mut table = Table::default();
        table.status.apply(StatusKind::Tilt, 0, 3);

        assert!(run(&template, &mut instance, &mut table));
        assert!(!table.status.has(StatusKind::Tilt));
    }
}
