//! Narrative encounter events and their consequences.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, CardTag, DeckTags};
use crate::core::{GameError, GameRng, Player, Result};

/// Flavor of an encounter event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum EventType {
    #[default]
    Dialogue,
    Choice,
    Shop,
    Rest,
    Blessing,
    Curse,
}

/// One option the player can pick.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventChoice {
    pub text: String,
    pub result_text: String,
    /// Positive gains, negative costs. Chips never go below zero.
    pub chips_delta: i32,
    /// Clamped to `[0, max_sanity]`.
    pub sanity_delta: i32,
    /// Each is attached to one random untagged deck card.
    pub granted_tags: Vec<CardTag>,
    /// Stripped from every card in the deck.
    pub removed_tags: Vec<CardTag>,
    /// Trinket template key handed out by this choice.
    pub trinket_reward: Option<String>,
}

impl EventChoice {
    #[must_use]
    pub fn new(text: impl Into<String>, result_text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            result_text: result_text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_chips(mut self, delta: i32) -> Self {
        self.chips_delta = delta;
        self
    }

    #[must_use]
    pub fn with_sanity(mut self, delta: i32) -> Self {
        self.sanity_delta = delta;
        self
    }

    #[must_use]
    pub fn granting(mut self, tag: CardTag) -> Self {
        self.granted_tags.push(tag);
        self
    }

    #[must_use]
    pub fn removing(mut self, tag: CardTag) -> Self {
        self.removed_tags.push(tag);
        self
    }

    #[must_use]
    pub fn with_trinket(mut self, key: impl Into<String>) -> Self {
        self.trinket_reward = Some(key.into());
        self
    }
}

/// An encounter event template.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterEvent {
    pub key: String,
    pub title: String,
    pub description: String,
    pub event_type: EventType,
    pub choices: Vec<EventChoice>,
}

impl EncounterEvent {
    #[must_use]
    pub fn new(key: impl Into<String>, title: impl Into<String>, event_type: EventType) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            event_type,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_choice(mut self, choice: EventChoice) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn choice(&self, index: usize) -> Result<&EventChoice> {
        self.choices.get(index).ok_or(GameError::InvalidChoice {
            index,
            count: self.choices.len(),
        })
    }
}

/// What a choice actually changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChoiceOutcome {
    pub chips_delta: i32,
    pub sanity_delta: i32,
    pub tagged: Vec<(CardId, CardTag)>,
    pub tags_removed: usize,
}

/// Apply a choice's chip, sanity and tag consequences.
///
/// `deck_cards` is the pool granted tags are drawn from; a card is eligible
/// only while it carries no tag at all.
pub fn apply_choice(
    choice: &EventChoice,
    player: &mut Player,
    deck_tags: &mut DeckTags,
    deck_cards: &[CardId],
    rng: &mut GameRng,
) -> ChoiceOutcome {
    let mut outcome = ChoiceOutcome::default();

    let chips_before = player.chips;
    if choice.chips_delta >= 0 {
        player.add_chips(choice.chips_delta);
    } else {
        player.lose_chips(-choice.chips_delta);
    }
    outcome.chips_delta = player.chips - chips_before;

    let sanity_before = player.sanity;
    player.change_sanity(choice.sanity_delta);
    outcome.sanity_delta = player.sanity - sanity_before;

    for &tag in &choice.granted_tags {
        let untagged: Vec<CardId> = deck_cards
            .iter()
            .copied()
            .filter(|id| deck_tags.tags_of(*id).is_empty())
            .collect();
        let Some(&card) = rng.choose(&untagged) else {
            tracing::warn!(%tag, "no untagged card left to tag");
            continue;
        };
        deck_tags.add(card, tag);
        outcome.tagged.push((card, tag));
    }

    for &tag in &choice.removed_tags {
        outcome.tags_removed += deck_tags.remove_everywhere(tag);
    }

    tracing::info!(
        chips = outcome.chips_delta,
        sanity = outcome.sanity_delta,
        tagged = outcome.tagged.len(),
        removed = outcome.tags_removed,
        "event choice applied"
    );
    outcome
}
