//! # rogue-blackjack
//!
//! Combat engine for a roguelike Blackjack run: rounds against enemies whose
//! HP falls when you win hands, chips that double as health, card tags,
//! enemy abilities, status effects and trinkets.
//!
//! ## Design Principles
//!
//! 1. **One owner**: [`GameContext`] owns all run state. Subsystems receive
//!    what they need by reference for one call and keep nothing.
//!
//! 2. **Content is data**: enemies, trinkets, affixes, tags and events are
//!    templates in registries. String keys from content are parsed into
//!    enums once, at load.
//!
//! 3. **Fixed dispatch order**: every game event runs card tags, status
//!    effects, enemy abilities, trinkets, then stat re-aggregation.
//!
//! 4. **Deterministic**: every random roll comes from a seeded stream, and a
//!    run can be snapshotted and restored with bincode.
//!
//! ## Modules
//!
//! - `core`: player, enemy, config, errors, RNG, logging, run stats
//! - `cards`: cards, deck, hands and the card tag engine
//! - `effects`: ability effects, their resolver and the damage pipeline
//! - `status`: timed player debuffs
//! - `triggers`: game events and the event bus
//! - `abilities`: enemy ability triggers and state
//! - `trinkets`: templates, instances, aggregation, executors, drops
//! - `encounters`: narrative events and the event pool
//! - `progression`: acts and sanity
//! - `rules`: round resolution, payout and hit policies
//! - `game`: phases, the run context and the combat loop
//! - `content`: registries bundle and built-in content

pub mod abilities;
pub mod cards;
pub mod content;
pub mod core;
pub mod effects;
pub mod encounters;
pub mod game;
pub mod progression;
pub mod rules;
pub mod status;
pub mod triggers;
pub mod trinkets;

// Re-export commonly used types
pub use crate::core::{
    init_tracing, DamageSource, Enemy, GameError, GameRng, Player, ReshufflePolicy, Result, RunConfig, RunStats,
};

pub use crate::cards::{Card, CardId, CardTag, Deck, DeckTags, Hand, HandId, HandTotal, Rank, Suit, TagRegistry};

pub use crate::content::Content;

pub use crate::effects::{Effect, EffectTarget};

pub use crate::status::{StatusEffectManager, StatusKind};

pub use crate::triggers::{EventBus, GameEvent, GameEventKind, PlayerAction};

pub use crate::abilities::{AbilityDefinition, AbilityTrigger};

pub use crate::trinkets::{StatBlock, TrinketInstance, TrinketRarity, TrinketRegistry, TrinketTemplate};

pub use crate::encounters::{EncounterEvent, EventChoice, EventPool};

pub use crate::progression::{Act, Encounter, PlayerClass, SanityTier};

pub use crate::rules::{BasicStrategy, DealerPolicy, HitPolicy, RoundOutcome};

pub use crate::game::{GameContext, GamePhase};
