//! Effect definitions.
//!
//! Effects are the atomic actions an enemy ability chains together. They
//! name a target side and carry plain numbers; the orchestrator decides
//! what "heal the player" means (chips) versus "heal self" (enemy HP).

use serde::{Deserialize, Serialize};

use crate::status::StatusKind;

/// Which side an effect lands on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, strum::EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum EffectTarget {
    #[default]
    Player,
    /// The enemy owning the ability.
    #[strum(serialize = "SELF", serialize = "ENEMY")]
    Enemy,
}

/// An atomic ability effect.
///
/// ## Status
///
/// - `ApplyStatus`: apply or refresh a status on the player
/// - `RemoveStatus`: drop a status from the player
///
/// ## Resources
///
/// - `Heal`: enemy HP (target `Enemy`) or player chips (target `Player`)
/// - `Damage`: enemy HP, unmodified (target `Enemy`) or player chips, clamped at 0
///
/// ## Table manipulation
///
/// - `ShuffleDeck`, `DiscardHand`, `ForceHit`, `RevealHole`
///
/// ## Flavor
///
/// - `Message`: logged line of text
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    ApplyStatus {
        status: StatusKind,
        magnitude: i32,
        duration: i32,
    },

    RemoveStatus {
        status: StatusKind,
    },

    Heal {
        target: EffectTarget,
        amount: i32,
    },

    Damage {
        target: EffectTarget,
        amount: i32,
    },

    /// Reshuffle discard into the draw pile.
    ShuffleDeck,

    /// Discard the player's current hand.
    DiscardHand,

    /// Draw one card into the player's hand.
    ForceHit,

    /// Turn the dealer's hole card face up.
    RevealHole,

    Message(String),
}

impl Effect {
    // === Convenience constructors ===

    /// Apply a status to the player.
    #[must_use]
    pub fn apply_status(status: StatusKind, magnitude: i32, duration: i32) -> Self {
        Effect::ApplyStatus { status, magnitude, duration }
    }

    #[must_use]
    pub fn remove_status(status: StatusKind) -> Self {
        Effect::RemoveStatus { status }
    }

    /// Enemy heals itself.
    #[must_use]
    pub fn heal_self(amount: i32) -> Self {
        Effect::Heal { target: EffectTarget::Enemy, amount }
    }

    /// Player loses chips.
    #[must_use]
    pub fn drain_chips(amount: i32) -> Self {
        Effect::Damage { target: EffectTarget::Player, amount }
    }

    #[must_use]
    pub fn message(text: impl Into<String>) -> Self {
        Effect::Message(text.into())
    }

    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Effect::ApplyStatus { .. } => "apply_status",
            Effect::RemoveStatus { .. } => "remove_status",
            Effect::Heal { .. } => "heal",
            Effect::Damage { .. } => "damage",
            Effect::ShuffleDeck => "shuffle_deck",
            Effect::DiscardHand => "discard_hand",
            Effect::ForceHit => "force_hit",
            Effect::RevealHole => "reveal_hole",
            Effect::Message(_) => "message",
        }
    }
}
