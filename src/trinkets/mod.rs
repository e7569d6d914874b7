//! Trinkets: templates, rolled instances, stat aggregation, effect
//! executors and loot drops.

pub mod aggregate;
pub mod drop;
pub mod executor;
pub mod instance;
pub mod registry;
pub mod template;

pub use aggregate::{aggregate_trinket_stats, StatBlock};
pub use drop::{generate_drop, reroll_affixes, roll_affixes, roll_rarity, select_template, PityCounters};
pub use executor::{execute_trinket_effect, on_equip, TrinketHost};
pub use instance::{AffixRoll, TrackedStat, TrinketInstance};
pub use registry::TrinketRegistry;
pub use template::{
    AffixDef, AffixTemplate, PassiveDef, StackRule, StatKey, TagRule, TrinketDef, TrinketEffectType,
    TrinketPassive, TrinketRarity, TrinketTemplate,
};
