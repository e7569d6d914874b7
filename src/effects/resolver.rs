//! Effect resolution.
//!
//! The resolver walks an effect chain in order and hands each effect to an
//! [`EffectHost`], the object that owns the mutable run state. Chains are
//! best-effort: a failed effect is logged and the next one still runs.

use crate::status::StatusKind;

use super::effect::{Effect, EffectTarget};

/// Result of resolving an effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveResult {
    /// Effect resolved successfully.
    Success,
    /// Effect failed (e.g., no enemy present).
    Failed(String),
    /// Effect was skipped (e.g., blocked by a trinket).
    Skipped,
}

impl ResolveResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ResolveResult::Success)
    }
}

/// Mutable run state that effects act on.
pub trait EffectHost {
    /// Apply a status to the player.
    fn apply_status(&mut self, status: StatusKind, magnitude: i32, duration: i32) -> ResolveResult;

    /// Remove a status from the player.
    fn remove_status(&mut self, status: StatusKind) -> ResolveResult;

    /// Heal enemy HP or give the player chips.
    fn heal(&mut self, target: EffectTarget, amount: i32) -> ResolveResult;

    /// Damage enemy HP or take player chips.
    fn damage(&mut self, target: EffectTarget, amount: i32) -> ResolveResult;

    fn shuffle_deck(&mut self) -> ResolveResult;

    fn discard_hand(&mut self) -> ResolveResult;

    fn force_hit(&mut self) -> ResolveResult;

    fn reveal_hole(&mut self) -> ResolveResult;
}

/// Resolves effects against a host.
pub struct EffectResolver;

impl EffectResolver {
    /// Resolve a chain in order. One result per effect.
    pub fn resolve_chain<H: EffectHost + ?Sized>(host: &mut H, effects: &[Effect]) -> Vec<ResolveResult> {
        effects
            .iter()
            .map(|effect| {
                let result = Self::resolve(host, effect);
                if let ResolveResult::Failed(reason) = &result {
                    tracing::warn!(effect = effect.name(), %reason, "effect failed, continuing chain");
                }
                result
            })
            .collect()
    }

    /// Resolve a single effect.
    pub fn resolve<H: EffectHost + ?Sized>(host: &mut H, effect: &Effect) -> ResolveResult {
        match effect {
            Effect::ApplyStatus { status, magnitude, duration } => {
                host.apply_status(*status, *magnitude, *duration)
            }
            Effect::RemoveStatus { status } => host.remove_status(*status),
            Effect::Heal { target, amount } => {
                if *amount <= 0 {
                    return ResolveResult::Skipped;
                }
                host.heal(*target, *amount)
            }
            Effect::Damage { target, amount } => {
                if *amount <= 0 {
                    return ResolveResult::Skipped;
                }
                host.damage(*target, *amount)
            }
            Effect::ShuffleDeck => host.shuffle_deck(),
            Effect::DiscardHand => host.discard_hand(),
            Effect::ForceHit => host.force_hit(),
            Effect::RevealHole => host.reveal_hole(),
            Effect::Message(text) => {
                tracing::info!(message = %text, "ability message");
                ResolveResult::Success
            }
        }
    }
}
