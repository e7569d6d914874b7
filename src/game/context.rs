//! The run context: everything a run owns, in one place.
//!
//! ## Ownership
//!
//! `GameContext` owns the player, the table (deck, dealer hand, deck tags),
//! the current enemy, the acts and every RNG stream. Content registries are
//! owned too but never serialized: a snapshot stores run state only and is
//! restored against freshly loaded content.
//!
//! Nothing outside the context keeps a reference across calls. The current
//! enemy is re-read from `enemy` each time it is needed, so replacing it
//! between encounters cannot leave anything dangling.
//!
//! ## Hosts
//!
//! The context is the [`EffectHost`] for enemy abilities and the
//! [`TrinketHost`] for trinket passives. Both traits are implemented here;
//! the combat flow lives in `combat.rs` and event dispatch in `dispatch.rs`.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId, CardTag, Deck, DeckTags, Hand, HandId, TagEngine};
use crate::content::Content;
use crate::core::{DamageSource, Enemy, GameError, GameRng, Player, ReshufflePolicy, Result, RunConfig, RunStats};
use crate::effects::{apply_damage_modifiers, EffectHost, EffectTarget, ResolveResult};
use crate::encounters::EncounterEvent;
use crate::progression::Act;
use crate::rules::RoundOutcome;
use crate::status::{ApplyOutcome, StatusKind};
use crate::triggers::{EventBus, GameEvent, GameEventKind};
use crate::trinkets::{PityCounters, TrackedStat, TrinketHost, TrinketInstance};

use super::state::GamePhase;

/// Number of physical cards (ids `0..52`).
const DECK_SIZE: u8 = 52;

/// One RNG stream per purpose.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRngs {
    pub deck: GameRng,
    pub loot: GameRng,
    pub events: GameRng,
    pub abilities: GameRng,
    pub crit: GameRng,
}

impl RunRngs {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let root = GameRng::new(seed);
        Self {
            deck: root.for_context("deck"),
            loot: root.for_context("loot"),
            events: root.for_context("events"),
            abilities: root.for_context("abilities"),
            crit: root.for_context("crit"),
        }
    }
}

/// Complete state of one run.
#[derive(Debug, Serialize, Deserialize)]
pub struct GameContext {
    pub(crate) config: RunConfig,
    #[serde(skip)]
    pub(crate) content: Content,

    pub(crate) phase: GamePhase,
    pub(crate) player: Player,
    pub(crate) dealer: Hand,
    pub(crate) deck: Deck,
    pub(crate) deck_tags: DeckTags,
    pub(crate) enemy: Option<Enemy>,

    pub(crate) acts: Vec<Act>,
    pub(crate) act_index: usize,
    pub(crate) round: u32,

    pub(crate) pending_reward: Option<TrinketInstance>,
    pub(crate) pending_event: Option<EncounterEvent>,
    pub(crate) event_reroll_cost: i32,

    pub(crate) pity: PityCounters,
    pub(crate) stats: RunStats,
    pub(crate) last_outcome: Option<RoundOutcome>,
    pub(crate) rngs: RunRngs,

    #[serde(skip)]
    pub(crate) bus: EventBus,
    /// Nesting level of event dispatch.
    #[serde(skip)]
    pub(crate) depth: u32,
}

impl GameContext {
    /// Create a run in the menu with the tutorial act.
    pub fn new(config: RunConfig, content: Content) -> Result<Self> {
        config.validate()?;

        let mut rngs = RunRngs::new(config.seed);
        let deck = Deck::shuffled(&mut rngs.deck);

        Ok(Self {
            player: Player::new(&config),
            dealer: Hand::new(HandId::Dealer),
            deck,
            deck_tags: DeckTags::new(),
            enemy: None,
            acts: vec![Act::tutorial()],
            act_index: 0,
            round: 0,
            pending_reward: None,
            pending_event: None,
            event_reroll_cost: config.event_reroll_cost,
            pity: PityCounters::default(),
            stats: RunStats::new(config.starting_chips),
            last_outcome: None,
            rngs,
            bus: EventBus::new(),
            depth: 0,
            phase: GamePhase::Menu,
            content,
            config,
        })
    }

    /// Replace the act list (builder pattern).
    #[must_use]
    pub fn with_acts(mut self, acts: Vec<Act>) -> Self {
        self.acts = acts;
        self.act_index = 0;
        self
    }

    // === Accessors ===

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    #[must_use]
    pub fn content(&self) -> &Content {
        &self.content
    }

    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable player access for tools and tests. Stats are marked dirty.
    pub fn player_mut(&mut self) -> &mut Player {
        self.player.mark_dirty();
        &mut self.player
    }

    #[must_use]
    pub fn dealer(&self) -> &Hand {
        &self.dealer
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn deck_tags(&self) -> &DeckTags {
        &self.deck_tags
    }

    pub fn deck_tags_mut(&mut self) -> &mut DeckTags {
        &mut self.deck_tags
    }

    #[must_use]
    pub fn enemy(&self) -> Option<&Enemy> {
        self.enemy.as_ref()
    }

    #[must_use]
    pub fn current_act(&self) -> Option<&Act> {
        self.acts.get(self.act_index)
    }

    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn pending_reward(&self) -> Option<&TrinketInstance> {
        self.pending_reward.as_ref()
    }

    #[must_use]
    pub fn pending_event(&self) -> Option<&EncounterEvent> {
        self.pending_event.as_ref()
    }

    #[must_use]
    pub fn event_reroll_cost(&self) -> i32 {
        self.event_reroll_cost
    }

    #[must_use]
    pub fn pity(&self) -> PityCounters {
        self.pity
    }

    #[must_use]
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    #[must_use]
    pub fn last_outcome(&self) -> Option<RoundOutcome> {
        self.last_outcome
    }

    /// Subscription point for UI collaborators.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Take every event fired since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.bus.drain()
    }

    // === State machine ===

    /// Move to `to` if the transition table allows it.
    pub fn transition(&mut self, to: GamePhase) -> Result<()> {
        let from = self.phase;
        if !from.can_transition_to(to) {
            return Err(GameError::IllegalTransition { from, to });
        }
        tracing::info!(%from, %to, "phase transition");
        self.phase = to;
        Ok(())
    }

    pub(crate) fn require_phase(&self, expected: GamePhase, action: &'static str) -> Result<()> {
        if self.phase != expected {
            return Err(GameError::InvalidAction { action, phase: self.phase });
        }
        Ok(())
    }

    // === Snapshots ===

    /// Encode the run state with bincode. Content is not included.
    pub fn snapshot(&self) -> Result<Vec<u8>> {
        if self.phase.in_round() {
            tracing::warn!(phase = %self.phase, "snapshot taken mid-round");
        }
        Ok(bincode::serialize(self)?)
    }

    /// Decode a snapshot and attach `content`.
    pub fn restore(bytes: &[u8], content: Content) -> Result<Self> {
        let mut context: Self = bincode::deserialize(bytes)?;
        context.content = content;
        context.player.mark_dirty();
        context.player.refresh_stats(&context.content.trinkets);
        tracing::info!(phase = %context.phase, round = context.round, "run restored");
        Ok(context)
    }

    // === Table helpers ===

    /// Draw one card into a hand, honoring the reshuffle policy.
    ///
    /// Deck tags of the card are copied into the hand. Player draws raise
    /// `CardDrawn` with the card's index; face-up dealer draws run their
    /// on-draw tags directly. `Err(DeckEmpty)` means the round must be
    /// forfeited.
    pub(crate) fn draw_card(&mut self, hand: HandId, face_up: bool) -> Result<usize> {
        if self.deck.is_empty() {
            match self.config.reshuffle_policy {
                ReshufflePolicy::ReshuffleDiscard => self.deck.reshuffle_discard(&mut self.rngs.deck),
                ReshufflePolicy::Forfeit => {
                    tracing::warn!("draw pile empty, forfeiting round");
                    return Err(GameError::DeckEmpty);
                }
            }
        }
        let Some(mut card) = self.deck.draw() else {
            tracing::warn!("no cards left in either pile");
            return Err(GameError::DeckEmpty);
        };
        card.face_up = face_up;

        let index = self.place_card(hand, card);
        self.check_card_count();
        match hand {
            HandId::Player => self.raise(GameEventKind::CardDrawn, index as i32),
            HandId::Dealer if face_up => self.fire_card_tags(HandId::Dealer, index),
            HandId::Dealer => {}
        }
        Ok(index)
    }

    fn place_card(&mut self, hand: HandId, card: Card) -> usize {
        let target = match hand {
            HandId::Player => &mut self.player.hand,
            HandId::Dealer => &mut self.dealer,
        };
        let index = target.add_card(card);
        for &tag in self.deck_tags.tags_of(card.id) {
            if let Err(err) = target.attach_tag(index, tag, &self.content.tags) {
                debug_assert!(false, "fresh card index rejected: {}", err);
            }
        }
        index
    }

    /// Recompute passive tag bonuses from face-up cards on the table.
    pub(crate) fn refresh_tag_stats(&mut self) {
        let bonuses = TagEngine::passive_bonuses(&self.content.tags, &[&self.player.hand, &self.dealer]);
        if bonuses != *self.player.tag_stats() {
            tracing::debug!(?bonuses, "tag bonuses changed");
        }
        self.player.set_tag_stats(bonuses);
    }

    /// Turn every face-down dealer card up. Each revealed card runs its
    /// on-draw tags.
    pub(crate) fn reveal_dealer(&mut self) {
        let hidden: Vec<usize> = self
            .dealer
            .cards()
            .iter()
            .enumerate()
            .filter(|(_, card)| !card.face_up)
            .map(|(index, _)| index)
            .collect();
        self.dealer.reveal_all();
        self.refresh_tag_stats();
        for index in hidden {
            self.fire_card_tags(HandId::Dealer, index);
        }
    }

    /// Discard both hands.
    pub(crate) fn clear_table(&mut self) {
        self.player.hand.clear(&mut self.deck);
        self.dealer.clear(&mut self.deck);
        self.refresh_tag_stats();
        self.check_card_count();
    }

    /// Cards in both piles and both hands.
    #[must_use]
    pub fn cards_in_play(&self) -> usize {
        self.deck.pile_total() + self.player.hand.len() + self.dealer.len()
    }

    /// Every card is in exactly one place.
    pub(crate) fn check_card_count(&self) {
        debug_assert_eq!(
            self.cards_in_play(),
            self.deck.size(),
            "cards lost or duplicated between piles and hands"
        );
    }

    /// Player-sourced damage to the enemy, through damage modifiers.
    ///
    /// Returns the HP actually removed, or `None` with no live enemy.
    pub(crate) fn damage_enemy(&mut self, base: i32, source: DamageSource) -> Option<i32> {
        let enemy = self.enemy.as_mut().filter(|e| !e.is_defeated)?;
        let mods = self.player.damage_modifiers();
        let roll = apply_damage_modifiers(&mods, base, self.config.base_crit_bonus, &mut self.rngs.crit);
        let dealt = enemy.take_damage(roll.amount);
        self.stats.record_damage(source, dealt);
        tracing::info!(%source, base, dealt, crit = roll.is_crit, "enemy damaged");
        Some(dealt)
    }

    /// Heal the enemy. A heal-punish charge turns the heal back into damage.
    pub(crate) fn heal_enemy(&mut self, amount: i32) -> Option<i32> {
        let enemy = self.enemy.as_mut().filter(|e| !e.is_defeated)?;
        let healed = enemy.heal(amount);
        if healed <= 0 {
            return Some(0);
        }

        let punisher = self
            .player
            .trinkets()
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|t| t.heal_punishes > 0));
        if let Some(slot) = punisher {
            let dealt = enemy.take_damage(healed);
            self.stats.record_damage(DamageSource::TrinketPassive, dealt);
            if let Some(trinket) = self.player.trinket_mut(slot) {
                trinket.heal_punishes -= 1;
                trinket.track(TrackedStat::HealDamageDealt, dealt);
                tracing::info!(key = %trinket.template_key, healed, dealt, "heal punished");
            }
        }

        self.raise(GameEventKind::EnemyHeal, healed);
        Some(healed)
    }

    /// Apply a status to the player unless a debuff-block charge stops it.
    pub(crate) fn apply_player_status(&mut self, status: StatusKind, magnitude: i32, duration: i32) -> bool {
        if status.is_debuff() && self.player.try_block_debuff() {
            return false;
        }
        let outcome = self.player.status.apply(status, magnitude, duration);
        tracing::info!(%status, magnitude, duration, refreshed = outcome == ApplyOutcome::Refreshed, "status applied");
        true
    }

    /// Tag up to `count` random deck cards that carry no tag yet.
    pub(crate) fn tag_untagged_cards(&mut self, tag: CardTag, count: usize) -> usize {
        let mut untagged: Vec<CardId> = (0..DECK_SIZE)
            .map(CardId::new)
            .filter(|id| self.deck_tags.tags_of(*id).is_empty())
            .collect();
        self.rngs.events.shuffle(&mut untagged);

        let mut tagged = 0;
        for id in untagged.into_iter().take(count) {
            if self.deck_tags.add(id, tag) {
                tagged += 1;
            }
        }
        tracing::info!(%tag, tagged, "deck cards tagged");
        tagged
    }
}

impl EffectHost for GameContext {
    fn apply_status(&mut self, status: StatusKind, magnitude: i32, duration: i32) -> ResolveResult {
        if self.apply_player_status(status, magnitude, duration) {
            ResolveResult::Success
        } else {
            ResolveResult::Skipped
        }
    }

    fn remove_status(&mut self, status: StatusKind) -> ResolveResult {
        if self.player.status.remove(status) {
            ResolveResult::Success
        } else {
            ResolveResult::Skipped
        }
    }

    fn heal(&mut self, target: EffectTarget, amount: i32) -> ResolveResult {
        match target {
            EffectTarget::Player => {
                self.player.add_chips(amount);
                ResolveResult::Success
            }
            EffectTarget::Enemy => match self.heal_enemy(amount) {
                Some(_) => ResolveResult::Success,
                None => ResolveResult::Failed("no enemy".into()),
            },
        }
    }

    fn damage(&mut self, target: EffectTarget, amount: i32) -> ResolveResult {
        match target {
            EffectTarget::Player => {
                let lost = self.player.lose_chips(amount);
                self.stats.chips_drained += i64::from(lost);
                ResolveResult::Success
            }
            EffectTarget::Enemy => match self.enemy.as_mut() {
                Some(enemy) => {
                    let dealt = enemy.take_damage(amount);
                    self.stats.record_damage(DamageSource::Ability, dealt);
                    ResolveResult::Success
                }
                None => ResolveResult::Failed("no enemy".into()),
            },
        }
    }

    fn shuffle_deck(&mut self) -> ResolveResult {
        self.deck.reshuffle_discard(&mut self.rngs.deck);
        ResolveResult::Success
    }

    fn discard_hand(&mut self) -> ResolveResult {
        if self.player.hand.is_empty() {
            return ResolveResult::Skipped;
        }
        self.player.hand.clear(&mut self.deck);
        self.refresh_tag_stats();
        ResolveResult::Success
    }

    fn force_hit(&mut self) -> ResolveResult {
        if self.phase != GamePhase::PlayerTurn {
            return ResolveResult::Skipped;
        }
        match self.draw_card(HandId::Player, true) {
            Ok(_) => ResolveResult::Success,
            Err(err) => ResolveResult::Failed(err.to_string()),
        }
    }

    fn reveal_hole(&mut self) -> ResolveResult {
        self.reveal_dealer();
        ResolveResult::Success
    }
}

impl TrinketHost for GameContext {
    fn current_bet(&self) -> i32 {
        self.player.current_bet
    }

    fn add_chips(&mut self, amount: i32) {
        self.player.add_chips(amount);
    }

    fn lose_chips(&mut self, amount: i32) -> i32 {
        self.player.lose_chips(amount)
    }

    fn apply_status(&mut self, status: StatusKind, magnitude: i32, duration: i32) {
        self.apply_player_status(status, magnitude, duration);
    }

    fn clear_status(&mut self, status: StatusKind) -> bool {
        self.player.status.remove(status)
    }

    fn deal_damage(&mut self, base: i32) -> Option<i32> {
        self.damage_enemy(base, DamageSource::TrinketPassive)
    }

    fn tag_random_cards(&mut self, tag: CardTag, count: usize) -> usize {
        self.tag_untagged_cards(tag, count)
    }

    fn mark_dirty(&mut self) {
        self.player.mark_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    fn context() -> GameContext {
        GameContext::new(RunConfig::default().with_seed(3), Content::builtin()).unwrap()
    }

    #[test]
    fn test_new_context() {
        let ctx = context();
        assert_eq!(ctx.phase(), GamePhase::Menu);
        assert_eq!(ctx.deck().remaining(), 52);
        assert_eq!(ctx.player().chips, 100);
        assert!(ctx.enemy().is_none());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RunConfig::default().with_pity_threshold(0);
        assert!(matches!(
            GameContext::new(config, Content::builtin()),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_illegal_transition() {
        let mut ctx = context();
        let err = ctx.transition(GamePhase::DealerTurn).unwrap_err();
        assert_eq!(
            err,
            GameError::IllegalTransition { from: GamePhase::Menu, to: GamePhase::DealerTurn }
        );
        assert_eq!(ctx.phase(), GamePhase::Menu);
        assert!(ctx.transition(GamePhase::Betting).is_ok());
    }

    #[test]
    fn test_deck_tags_copied_on_draw() {
        let mut ctx = context();
        let top = *ctx.deck().draw_pile().last().unwrap();
        ctx.deck_tags_mut().add(top.id, CardTag::Brutal);

        let index = ctx.draw_card(HandId::Dealer, true).unwrap();
        assert!(ctx.dealer().has_tag(index, CardTag::Brutal));
    }

    #[test]
    fn test_passive_tags_face_up_only() {
        let mut ctx = context();
        ctx.dealer.add_card(Card { face_up: false, ..Card::new(Rank::Five, Suit::Clubs) });
        ctx.dealer.attach_tag(0, CardTag::Lucky, &ctx.content.tags).unwrap();

        ctx.refresh_tag_stats();
        assert_eq!(ctx.player().tag_stats().crit_chance, 0);

        EffectHost::reveal_hole(&mut ctx);
        assert_eq!(ctx.player().tag_stats().crit_chance, 10);
    }

    #[test]
    fn test_tag_untagged_cards() {
        let mut ctx = context();
        ctx.deck_tags_mut().add(CardId::new(0), CardTag::Cursed);

        assert_eq!(ctx.tag_untagged_cards(CardTag::Lucky, 3), 3);
        assert_eq!(ctx.deck_tags().cards_with(CardTag::Lucky).len(), 3);
        assert!(!ctx.deck_tags().has(CardId::new(0), CardTag::Lucky));
    }

    #[test]
    fn test_forfeit_policy_signals_empty() {
        let config = RunConfig::default().with_reshuffle_policy(ReshufflePolicy::Forfeit);
        let mut ctx = GameContext::new(config, Content::builtin()).unwrap();
        for _ in 0..52 {
            ctx.draw_card(HandId::Dealer, true).unwrap();
        }
        assert_eq!(ctx.draw_card(HandId::Dealer, true), Err(GameError::DeckEmpty));
    }

    #[test]
    fn test_damage_needs_enemy() {
        let mut ctx = context();
        assert_eq!(ctx.damage_enemy(10, DamageSource::TurnWin), None);

        ctx.enemy = ctx.content.enemies.spawn("didact");
        assert_eq!(ctx.damage_enemy(10, DamageSource::TurnWin), Some(10));
        assert_eq!(ctx.enemy().unwrap().current_hp, 40);
        assert_eq!(ctx.stats().damage_from(DamageSource::TurnWin), 10);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut ctx = context();
        ctx.player.chips = 77;
        ctx.deck_tags.add(CardId::new(4), CardTag::Doubled);

        let bytes = ctx.snapshot().unwrap();
        let restored = GameContext::restore(&bytes, Content::builtin()).unwrap();

        assert_eq!(restored.player().chips, 77);
        assert!(restored.deck_tags().has(CardId::new(4), CardTag::Doubled));
        assert_eq!(restored.deck().draw_pile(), ctx.deck().draw_pile());
        assert_eq!(restored.content().enemies.len(), 2);
    }
}
