//! Per-player status effect collection.
//!
//! At most one instance per [`StatusKind`]: applying a kind that is already
//! active replaces its magnitude and duration.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::effect::{DurationType, StatusEffectInstance, StatusKind, StatusStat};

/// Result of [`StatusEffectManager::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    Added,
    Refreshed,
}

/// Active status effects of one player.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatusEffectManager {
    effects: SmallVec<[StatusEffectInstance; 4]>,
}

impl StatusEffectManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply or refresh an effect.
    pub fn apply(&mut self, kind: StatusKind, magnitude: i32, duration: i32) -> ApplyOutcome {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
            existing.magnitude = magnitude;
            existing.duration = duration;
            tracing::info!(%kind, magnitude, duration, "status refreshed");
            return ApplyOutcome::Refreshed;
        }

        self.effects.push(StatusEffectInstance::new(kind, magnitude, duration));
        tracing::info!(%kind, magnitude, duration, "status applied");
        ApplyOutcome::Added
    }

    /// Remove one kind. Returns `true` if it was active.
    pub fn remove(&mut self, kind: StatusKind) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| e.kind != kind);
        before != self.effects.len()
    }

    pub fn clear_all(&mut self) {
        if !self.effects.is_empty() {
            tracing::info!(count = self.effects.len(), "clearing status effects");
        }
        self.effects.clear();
    }

    #[must_use]
    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    #[must_use]
    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffectInstance> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffectInstance> {
        self.effects.iter()
    }

    /// Round-end countdown. Round-based effects lose one round and are
    /// dropped at zero; stack-based effects are untouched.
    pub fn tick_round(&mut self) {
        for i in (0..self.effects.len()).rev() {
            let effect = &mut self.effects[i];
            if effect.duration_type != DurationType::Rounds {
                continue;
            }
            effect.duration -= 1;
            if effect.is_expired() {
                tracing::info!(kind = %effect.kind, "status expired");
                self.effects.swap_remove(i);
            }
        }
    }

    /// Use one stack of a stack-based effect. Returns `false` if absent.
    pub fn consume_stack(&mut self, kind: StatusKind) -> bool {
        let Some(pos) = self.effects.iter().position(|e| e.kind == kind) else {
            return false;
        };
        let effect = &mut self.effects[pos];
        effect.duration -= 1;
        if effect.is_expired() {
            self.effects.swap_remove(pos);
        }
        true
    }

    /// Sum of magnitudes feeding a stat.
    #[must_use]
    pub fn active_modifier(&self, stat: StatusStat) -> i32 {
        self.effects
            .iter()
            .filter(|e| e.kind.stat() == stat)
            .map(|e| e.magnitude)
            .sum()
    }

    /// Chips to drain at round start, capped at what the player has.
    #[must_use]
    pub fn round_start_drain(&self, chips: i32) -> i32 {
        self.active_modifier(StatusStat::RoundStartDrain).clamp(0, chips.max(0))
    }

    /// Winnings after Greed: half the bet regardless of payout.
    #[must_use]
    pub fn modify_winnings(&self, base_winnings: i32, bet: i32) -> i32 {
        if self.has(StatusKind::Greed) {
            let capped = bet / 2;
            tracing::info!(base_winnings, capped, "greed caps winnings");
            capped
        } else {
            base_winnings
        }
    }

    /// Extra chips lost on a loss (Tilt doubles the loss).
    #[must_use]
    pub fn extra_loss(&self, base_loss: i32) -> i32 {
        if self.has(StatusKind::Tilt) {
            base_loss
        } else {
            0
        }
    }

    /// Chips raked from a win that dealt `damage`; consumes one Rake stack.
    pub fn take_rake(&mut self, damage: i32) -> i32 {
        let percent = self.active_modifier(StatusStat::DamageRake);
        if percent <= 0 || damage <= 0 || !self.consume_stack(StatusKind::Rake) {
            return 0;
        }
        damage * percent / 100
    }
}
