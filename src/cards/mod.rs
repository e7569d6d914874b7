//! Cards, decks, hands and card tags.
//!
//! Cards are plain values. Everything that decorates a card occurrence
//! (tags, value multipliers) lives in side tables owned by the hand or,
//! for run-long tags, by [`DeckTags`].

pub mod card;
pub mod deck;
pub mod hand;
pub mod registry;
pub mod tags;

pub use card::{Card, CardId, Rank, Suit};
pub use deck::Deck;
pub use hand::{CardTagInstance, Hand, HandId, HandTag, HandTotal};
pub use registry::TagRegistry;
pub use tags::{
    CardTag, DeckTags, FiredTagEffect, TagBonuses, TagDef, TagDefinition, TagEffect, TagEffectDef,
    TagEffectKind, TagEngine, TagScope, TagTrigger,
};
