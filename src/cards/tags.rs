//! Card tags and the tag engine.
//!
//! Tags are named modifiers attached to card occurrences. They are never
//! stored inside [`Card`](super::Card); two side tables hold them instead:
//!
//! - [`DeckTags`]: run-long tags keyed by [`CardId`], granted by events and
//!   trinkets. Copied into a hand when the card is dealt.
//! - The hand's own table (see [`Hand`]): keyed by position in that hand,
//!   rewritten whenever the hand is mutated, dropped when the hand clears.
//!
//! ## Evaluation
//!
//! - [`TagEngine::on_draw`] fires `OnDraw` tags of one card, in attach order,
//!   synchronously as the card enters a hand.
//! - [`TagEngine::passive_bonuses`] sums `Passive` + `Global` tags on every
//!   face-up card of the given hands. `SingleCard` passives only change their
//!   own card's value and are applied by the hand itself.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::CardId;
use super::hand::Hand;
use super::registry::TagRegistry;

/// A named card modifier.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CardTag {
    Cursed,
    Vampiric,
    Lucky,
    Brutal,
    Doubled,
}

/// When a tag's effects run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TagTrigger {
    OnDraw,
    Passive,
}

/// Which cards a passive tag affects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TagScope {
    Global,
    SingleCard,
}

/// Tag effect kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::EnumString, strum::AsRefStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TagEffectKind {
    /// Passive: flat damage bonus.
    AddFlatDamage,
    /// Passive: damage percent bonus.
    AddDamagePercent,
    /// Passive: crit chance bonus.
    AddCritPercent,
    /// On draw: damage the enemy (through player damage modifiers).
    DealDamage,
    /// On draw: the drawer gains chips.
    GainChips,
    /// Single card: multiply this card's value.
    MultiplyValue,
}

/// One effect of a tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEffect {
    pub kind: TagEffectKind,
    pub value: i32,
}

impl TagEffect {
    #[must_use]
    pub const fn new(kind: TagEffectKind, value: i32) -> Self {
        Self { kind, value }
    }
}

/// Parsed tag template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TagDefinition {
    pub tag: CardTag,
    pub name: String,
    pub description: String,
    pub trigger: TagTrigger,
    pub scope: TagScope,
    pub effects: SmallVec<[TagEffect; 2]>,
}

impl TagDefinition {
    /// Create a definition with no effects.
    pub fn new(tag: CardTag, name: impl Into<String>, trigger: TagTrigger, scope: TagScope) -> Self {
        Self {
            tag,
            name: name.into(),
            description: String::new(),
            trigger,
            scope,
            effects: SmallVec::new(),
        }
    }

    /// Set the description (builder pattern).
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add an effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, kind: TagEffectKind, value: i32) -> Self {
        self.effects.push(TagEffect::new(kind, value));
        self
    }

    /// Value multiplier this tag applies to its own card (1 = none).
    #[must_use]
    pub fn value_multiplier(&self) -> u8 {
        if self.trigger != TagTrigger::Passive || self.scope != TagScope::SingleCard {
            return 1;
        }
        self.effects
            .iter()
            .filter(|e| e.kind == TagEffectKind::MultiplyValue)
            .fold(1u8, |acc, e| acc.saturating_mul(e.value.clamp(1, 10) as u8))
    }

    /// Convert a raw definition. Unknown tag returns `None`; unknown
    /// trigger/scope/effect strings are logged and defaulted or skipped.
    pub fn from_def(def: &TagDef) -> Option<Self> {
        let Ok(tag) = def.tag.parse::<CardTag>() else {
            tracing::warn!(tag = %def.tag, "unknown card tag in definition, skipping");
            return None;
        };
        let trigger = def.trigger.parse().unwrap_or_else(|_| {
            tracing::warn!(tag = %def.tag, trigger = %def.trigger, "unknown tag trigger, using passive");
            TagTrigger::Passive
        });
        let scope = def.scope.parse().unwrap_or_else(|_| {
            tracing::warn!(tag = %def.tag, scope = %def.scope, "unknown tag scope, using global");
            TagScope::Global
        });

        let mut out = TagDefinition::new(tag, def.name.clone(), trigger, scope)
            .with_description(def.description.clone());
        for effect in &def.effects {
            match effect.kind.parse::<TagEffectKind>() {
                Ok(kind) => out.effects.push(TagEffect::new(kind, effect.value)),
                Err(_) => tracing::warn!(tag = %def.tag, effect = %effect.kind, "unknown tag effect, ignored"),
            }
        }
        Some(out)
    }
}

/// Raw tag definition as handed over by a content loader.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TagDef {
    pub tag: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub trigger: String,
    pub scope: String,
    #[serde(default)]
    pub effects: Vec<TagEffectDef>,
}

/// Raw tag effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TagEffectDef {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: i32,
}

/// Run-long tags per physical card.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DeckTags {
    tags: FxHashMap<CardId, SmallVec<[CardTag; 2]>>,
}

impl DeckTags {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a tag. Returns `false` if the card already had it.
    pub fn add(&mut self, card: CardId, tag: CardTag) -> bool {
        let entry = self.tags.entry(card).or_default();
        if entry.contains(&tag) {
            return false;
        }
        entry.push(tag);
        true
    }

    /// Detach a tag from one card.
    pub fn remove(&mut self, card: CardId, tag: CardTag) -> bool {
        let Some(entry) = self.tags.get_mut(&card) else {
            return false;
        };
        let before = entry.len();
        entry.retain(|t| *t != tag);
        let removed = entry.len() != before;
        if entry.is_empty() {
            self.tags.remove(&card);
        }
        removed
    }

    /// Strip a tag from every card. Returns how many cards lost it.
    pub fn remove_everywhere(&mut self, tag: CardTag) -> usize {
        let mut count = 0;
        for entry in self.tags.values_mut() {
            let before = entry.len();
            entry.retain(|t| *t != tag);
            count += before - entry.len();
        }
        self.tags.retain(|_, v| !v.is_empty());
        count
    }

    #[must_use]
    pub fn tags_of(&self, card: CardId) -> &[CardTag] {
        self.tags.get(&card).map_or(&[], |v| v.as_slice())
    }

    #[must_use]
    pub fn has(&self, card: CardId, tag: CardTag) -> bool {
        self.tags_of(card).contains(&tag)
    }

    /// Cards carrying a tag, sorted by id.
    #[must_use]
    pub fn cards_with(&self, tag: CardTag) -> Vec<CardId> {
        let mut cards: Vec<_> = self
            .tags
            .iter()
            .filter(|(_, tags)| tags.contains(&tag))
            .map(|(id, _)| *id)
            .collect();
        cards.sort();
        cards
    }

    /// Number of tagged cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// An on-draw effect produced by a tag, to be applied by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FiredTagEffect {
    pub tag: CardTag,
    pub card_index: usize,
    pub effect: TagEffect,
}

/// Summed passive tag contributions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagBonuses {
    pub damage_flat: i32,
    pub damage_percent: i32,
    pub crit_chance: i32,
}

/// Stateless tag evaluation.
pub struct TagEngine;

impl TagEngine {
    /// Effects of `OnDraw` tags on the card at `index`, in attach order.
    pub fn on_draw(registry: &TagRegistry, hand: &Hand, index: usize) -> SmallVec<[FiredTagEffect; 2]> {
        let mut fired = SmallVec::new();
        for tag in hand.tags_at(index) {
            let Some(def) = registry.get(tag) else {
                tracing::warn!(%tag, "tag has no definition");
                continue;
            };
            if def.trigger != TagTrigger::OnDraw {
                continue;
            }
            for effect in &def.effects {
                fired.push(FiredTagEffect {
                    tag,
                    card_index: index,
                    effect: *effect,
                });
            }
        }
        fired
    }

    /// Sum of global passive tags on face-up cards across `hands`.
    #[must_use]
    pub fn passive_bonuses(registry: &TagRegistry, hands: &[&Hand]) -> TagBonuses {
        let mut bonuses = TagBonuses::default();

        for hand in hands {
            for (index, card) in hand.cards().iter().enumerate() {
                if !card.face_up {
                    continue;
                }
                for tag in hand.tags_at(index) {
                    let Some(def) = registry.get(tag) else {
                        continue;
                    };
                    if def.trigger != TagTrigger::Passive || def.scope != TagScope::Global {
                        continue;
                    }
                    for effect in &def.effects {
                        match effect.kind {
                            TagEffectKind::AddFlatDamage => bonuses.damage_flat += effect.value,
                            TagEffectKind::AddDamagePercent => bonuses.damage_percent += effect.value,
                            TagEffectKind::AddCritPercent => bonuses.crit_chance += effect.value,
                            _ => {}
                        }
                    }
                }
            }
        }

        tracing::debug!(?bonuses, "passive tag bonuses");
        bonuses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, HandId, Rank, Suit};

    #[test]
    fn test_tag_parse_is_case_insensitive() {
        assert_eq!("cursed".parse::<CardTag>(), Ok(CardTag::Cursed));
        assert_eq!("LUCKY".parse::<CardTag>(), Ok(CardTag::Lucky));
        assert!("shiny".parse::<CardTag>().is_err());
        assert_eq!(CardTag::Vampiric.to_string(), "vampiric");
    }

    #[test]
    fn test_deck_tags() {
        let mut tags = DeckTags::new();
        let card = CardId::new(4);

        assert!(tags.add(card, CardTag::Cursed));
        assert!(!tags.add(card, CardTag::Cursed));
        assert!(tags.add(card, CardTag::Lucky));
        assert!(tags.add(CardId::new(9), CardTag::Cursed));

        assert_eq!(tags.tags_of(card), &[CardTag::Cursed, CardTag::Lucky]);
        assert_eq!(tags.cards_with(CardTag::Cursed), vec![CardId::new(4), CardId::new(9)]);

        assert_eq!(tags.remove_everywhere(CardTag::Cursed), 2);
        assert_eq!(tags.len(), 1);
        assert!(tags.remove(card, CardTag::Lucky));
        assert!(tags.is_empty());
    }

    #[test]
    fn test_from_def_skips_unknown_effects() {
        let def = TagDef {
            tag: "brutal".into(),
            name: "Brutal".into(),
            description: String::new(),
            trigger: "passive".into(),
            scope: "global".into(),
            effects: vec![
                TagEffectDef { kind: "add_damage_percent".into(), value: 10 },
                TagEffectDef { kind: "summon_dragon".into(), value: 1 },
            ],
        };

        let parsed = TagDefinition::from_def(&def).unwrap();
        assert_eq!(parsed.tag, CardTag::Brutal);
        assert_eq!(parsed.effects.len(), 1);

        let bad = TagDef { tag: "glitter".into(), ..def };
        assert!(TagDefinition::from_def(&bad).is_none());
    }

    #[test]
    fn test_passive_bonuses_skip_face_down() {
        let registry = TagRegistry::with_builtin();
        let mut hand = Hand::new(HandId::Dealer);

        let mut hole = Card::new(Rank::Two, Suit::Clubs);
        hole.face_up = false;
        hand.add_card(hole);
        hand.attach_tag(0, CardTag::Lucky, &registry).unwrap();

        hand.add_card(Card::new(Rank::Three, Suit::Clubs));
        hand.attach_tag(1, CardTag::Brutal, &registry).unwrap();

        let bonuses = TagEngine::passive_bonuses(&registry, &[&hand]);
        assert_eq!(bonuses.crit_chance, 0);
        assert_eq!(bonuses.damage_percent, 10);

        hand.reveal_all();
        let bonuses = TagEngine::passive_bonuses(&registry, &[&hand]);
        assert_eq!(bonuses.crit_chance, 10);
    }

    #[test]
    fn test_on_draw_order() {
        let registry = TagRegistry::with_builtin();
        let mut hand = Hand::new(HandId::Player);
        hand.add_card(Card::new(Rank::Five, Suit::Hearts));
        hand.attach_tag(0, CardTag::Vampiric, &registry).unwrap();
        hand.attach_tag(0, CardTag::Lucky, &registry).unwrap();

        let fired = TagEngine::on_draw(&registry, &hand, 0);
        let kinds: Vec<_> = fired.iter().map(|f| f.effect.kind).collect();
        assert_eq!(kinds, vec![TagEffectKind::DealDamage, TagEffectKind::GainChips]);
    }
}
