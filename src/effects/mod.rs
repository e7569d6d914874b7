//! Effect primitives, their resolver and the damage pipeline.

pub mod damage;
pub mod effect;
pub mod resolver;

pub use damage::{apply_damage_modifiers, DamageModifiers, DamageRoll};
pub use effect::{Effect, EffectTarget};
pub use resolver::{EffectHost, EffectResolver, ResolveResult};
