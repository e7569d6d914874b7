//! Trinket drops.
//!
//! ## Rarity and pity
//!
//! Each enemy class (normal, elite) has its own pity counter. Every roll
//! that comes up common increments it; anything better resets it. Once the
//! counter reaches the configured threshold the roll uses the pity table
//! with common removed, so the next drop is at least uncommon.
//!
//! ## Affixes
//!
//! Affix count comes from the act tier. Affixes are drawn weighted from the
//! pool without repeats, rare and legendary drops scale the weights, and each
//! value is uniform in the affix's `[min, max]`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{DropTable, GameRng, RunConfig};

use super::instance::{AffixRoll, TrinketInstance};
use super::registry::TrinketRegistry;
use super::template::{TrinketRarity, TrinketTemplate};

/// Consecutive-common counters, one per enemy class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PityCounters {
    pub normal: u32,
    pub elite: u32,
}

impl PityCounters {
    fn get_mut(&mut self, elite: bool) -> &mut u32 {
        if elite {
            &mut self.elite
        } else {
            &mut self.normal
        }
    }
}

/// Roll a rarity against `table`, updating `counter`.
pub fn roll_rarity(table: &DropTable, threshold: u32, counter: &mut u32, rng: &mut GameRng) -> TrinketRarity {
    let pity = *counter >= threshold;
    let mut weights = if pity { table.pity } else { table.normal };
    if pity {
        weights[TrinketRarity::Common.index()] = 0.0;
    }

    let rarity = rng
        .choose_weighted(&weights)
        .and_then(TrinketRarity::from_index)
        .unwrap_or(if pity { TrinketRarity::Uncommon } else { TrinketRarity::Common });

    if rarity > TrinketRarity::Common {
        *counter = 0;
    } else {
        *counter += 1;
    }

    tracing::debug!(%rarity, pity, counter = *counter, "rarity rolled");
    rarity
}

/// Pick a template of `rarity` the player does not already hold.
///
/// Falls back to any unheld template when the tier is exhausted.
pub fn select_template<'a>(
    registry: &'a TrinketRegistry,
    rarity: TrinketRarity,
    equipped: &[&str],
    rng: &mut GameRng,
) -> Option<&'a TrinketTemplate> {
    let unheld = |t: &&TrinketTemplate| !equipped.contains(&t.key.as_str());

    let mut candidates: Vec<_> = registry.of_rarity(rarity).into_iter().filter(unheld).collect();
    if candidates.is_empty() {
        tracing::warn!(%rarity, "no unheld templates of rarity, widening pool");
        candidates = registry.sorted().into_iter().filter(unheld).collect();
    }

    let weights: Vec<f32> = candidates.iter().map(|t| t.drop_weight).collect();
    rng.choose_weighted(&weights).map(|i| candidates[i])
}

/// Roll affixes for a drop of `rarity` in act `tier`.
pub fn roll_affixes(
    registry: &TrinketRegistry,
    config: &RunConfig,
    rarity: TrinketRarity,
    tier: u32,
    rng: &mut GameRng,
) -> SmallVec<[AffixRoll; 3]> {
    let pool = registry.affixes();
    let scale = match rarity {
        TrinketRarity::Rare => config.rare_affix_scale,
        TrinketRarity::Legendary => config.legendary_affix_scale,
        _ => 1.0,
    };
    let mut weights: Vec<f32> = pool.iter().map(|a| a.weight * scale).collect();

    let count = config.affix_count(tier).min(pool.len());
    let mut rolls = SmallVec::new();
    for _ in 0..count {
        let Some(index) = rng.choose_weighted(&weights) else {
            break;
        };
        weights[index] = 0.0;

        let affix = &pool[index];
        let value = rng.gen_inclusive(affix.min, affix.max);
        rolls.push(AffixRoll { stat: affix.stat, value });
    }
    rolls
}

/// Roll a complete drop for a defeated enemy.
pub fn generate_drop(
    registry: &TrinketRegistry,
    config: &RunConfig,
    pity: &mut PityCounters,
    elite: bool,
    tier: u32,
    equipped: &[&str],
    rng: &mut GameRng,
) -> Option<TrinketInstance> {
    let table = if elite { &config.elite_drops } else { &config.normal_drops };
    let rarity = roll_rarity(table, config.pity_threshold, pity.get_mut(elite), rng);

    let template = select_template(registry, rarity, equipped, rng)?;
    let mut instance = TrinketInstance::new(template, rarity, tier);
    let affixes = roll_affixes(registry, config, rarity, tier, rng);
    instance.set_affixes(template.base_value, affixes);

    tracing::info!(key = %instance.template_key, %rarity, affixes = instance.affixes.len(), "trinket dropped");
    Some(instance)
}

/// Replace an instance's affixes with a fresh roll at its own rarity and tier.
pub fn reroll_affixes(instance: &mut TrinketInstance, registry: &TrinketRegistry, config: &RunConfig, rng: &mut GameRng) {
    let Some(template) = registry.get(&instance.template_key) else {
        tracing::warn!(key = %instance.template_key, "cannot reroll unknown trinket");
        return;
    };
    let affixes = roll_affixes(registry, config, instance.rarity, instance.tier, rng);
    instance.set_affixes(template.base_value, affixes);
}
