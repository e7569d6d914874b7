//! Event dispatch.
//!
//! [`GameContext::raise`] publishes an event to the bus and then runs the
//! subsystems in a fixed order:
//!
//! 1. card tags of the drawn player card, for draw-related events
//! 2. status effects, for round-boundary events
//! 3. the enemy's abilities
//! 4. the player's trinkets, slot by slot
//! 5. trinket stat re-aggregation, if anything marked the player dirty
//!
//! Tag damage lands before abilities look at damage taken, and stats are
//! rebuilt last so payout always reads current modifiers.
//!
//! Dealer cards are not `CardDrawn` events. Their on-draw tags run through
//! [`GameContext::fire_card_tags`] when they are dealt face up or revealed.
//!
//! Subsystems may raise further events (a tag firing `CardTagCursed`, an
//! ability heal firing `EnemyHeal`). Those dispatch depth-first; nesting is
//! capped at [`MAX_DISPATCH_DEPTH`].

use crate::abilities::AbilitySystem;
use crate::cards::{CardTag, HandId, TagEffectKind, TagEngine};
use crate::core::DamageSource;
use crate::effects::EffectResolver;
use crate::triggers::{GameEvent, GameEventKind};
use crate::trinkets::{execute_trinket_effect, TrinketEffectType};

use super::context::GameContext;

/// Deepest allowed chain of events raised while handling an event.
pub const MAX_DISPATCH_DEPTH: u32 = 4;

impl GameContext {
    /// Raise an event and run every subsystem on it.
    ///
    /// `value` carries the event's amount: the drawn card's hand index for
    /// `CardDrawn`, chips for outcome events, HP for `EnemyHeal`.
    pub fn raise(&mut self, kind: GameEventKind, value: i32) {
        if self.depth >= MAX_DISPATCH_DEPTH {
            tracing::warn!(%kind, depth = self.depth, "event dispatch too deep, dropped");
            return;
        }
        self.depth += 1;
        tracing::debug!(%kind, value, depth = self.depth, "event raised");
        self.bus.publish(GameEvent::new(kind).in_round(self.round).with_value(value));

        if kind.is_draw_related() {
            if let Ok(index) = usize::try_from(value) {
                self.fire_card_tags(HandId::Player, index);
            }
        }
        if kind.is_round_boundary() {
            self.dispatch_status(kind);
        }
        self.dispatch_abilities(kind);
        self.dispatch_trinkets(kind);
        if self.player.refresh_stats(&self.content.trinkets) {
            tracing::debug!(%kind, "trinket stats re-aggregated");
        }

        self.depth -= 1;
    }

    /// Run the on-draw tags of the card at `index` in `hand`.
    ///
    /// Damage always lands on the enemy. Chips only go to the player for
    /// the player's own cards.
    pub(crate) fn fire_card_tags(&mut self, hand: HandId, index: usize) {
        let cards = match hand {
            HandId::Player => &self.player.hand,
            HandId::Dealer => &self.dealer,
        };
        let fired = TagEngine::on_draw(&self.content.tags, cards, index);
        if !fired.is_empty() {
            tracing::debug!(?hand, index, fired = fired.len(), "card tags fired");
        }

        let mut raised: Vec<CardTag> = Vec::new();
        for effect in &fired {
            match effect.effect.kind {
                TagEffectKind::DealDamage => {
                    let bonus = self.tag_damage_bonus(effect.tag);
                    self.damage_enemy(effect.effect.value + bonus, DamageSource::CardTag);
                }
                TagEffectKind::GainChips if hand == HandId::Player => self.player.add_chips(effect.effect.value),
                _ => {}
            }
            if !raised.contains(&effect.tag) {
                raised.push(effect.tag);
            }
        }

        self.refresh_tag_stats();

        for tag in raised {
            match tag {
                CardTag::Cursed => self.raise(GameEventKind::CardTagCursed, index as i32),
                CardTag::Vampiric => self.raise(GameEventKind::CardTagVampiric, index as i32),
                _ => {}
            }
        }
    }

    /// Extra on-draw damage from trinkets buffing `tag`.
    fn tag_damage_bonus(&self, tag: CardTag) -> i32 {
        self.player
            .trinkets()
            .iter()
            .flatten()
            .filter(|t| t.buffed_tag == Some(tag))
            .map(|t| t.tag_buff_value)
            .sum()
    }

    fn dispatch_status(&mut self, kind: GameEventKind) {
        match kind {
            GameEventKind::RoundStart => {
                let drain = self.player.status.round_start_drain(self.player.chips);
                if drain > 0 {
                    let lost = self.player.lose_chips(drain);
                    self.stats.chips_drained += i64::from(lost);
                    tracing::info!(lost, chips = self.player.chips, "chip drain");
                }
            }
            GameEventKind::HandEnd => self.player.status.tick_round(),
            _ => {}
        }
    }

    fn dispatch_abilities(&mut self, kind: GameEventKind) {
        let Some(enemy) = self.enemy.as_mut().filter(|e| !e.is_defeated) else {
            return;
        };
        if kind == GameEventKind::HandEnd {
            AbilitySystem::tick_cooldowns(&mut enemy.abilities);
        }

        let ctx = enemy.trigger_context();
        let fired = AbilitySystem::dispatch(&mut enemy.abilities, kind, &ctx, &mut self.rngs.abilities);
        for ability in fired {
            tracing::info!(ability = %ability.name, %kind, "enemy ability");
            EffectResolver::resolve_chain(self, &ability.effects);
        }
    }

    fn dispatch_trinkets(&mut self, kind: GameEventKind) {
        for slot in 0..self.player.trinkets().len() {
            let Some(key) = self.player.trinket(slot).map(|t| t.template_key.clone()) else {
                continue;
            };
            let Some(template) = self.content.trinkets.get(&key) else {
                tracing::warn!(slot, %key, "unknown trinket template, passive skipped");
                continue;
            };
            // Tagging and tag buffs run once at equip time
            let passives: Vec<_> = template
                .passives_for(kind)
                .into_iter()
                .filter(|(p, _)| {
                    !matches!(
                        p.effect,
                        TrinketEffectType::AddTagToCards | TrinketEffectType::BuffTagDamage
                    )
                })
                .collect();
            if passives.is_empty() {
                continue;
            }
            let template = template.clone();

            let Some(mut instance) = self.player.take_slot(slot) else {
                continue;
            };
            for (passive, _) in &passives {
                execute_trinket_effect(&template, &mut instance, passive, self);
            }
            self.player.restore_slot(slot, instance);
        }
    }
}
