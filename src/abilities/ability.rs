//! Ability definitions and per-enemy ability state.
//!
//! An [`AbilityDefinition`] is immutable template data. An [`Ability`] pairs
//! it with the runtime state of one enemy: counter progress, cooldown,
//! single-use flag, crossed HP segments. Abilities are stored by value in the
//! enemy and referenced by index, never by pointer.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::GameRng;
use crate::effects::Effect;
use crate::triggers::{GameEventKind, PlayerAction};

/// When an ability fires.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum AbilityTrigger {
    /// Never fires from events.
    Passive,
    /// Every time the event is raised.
    OnEvent(GameEventKind),
    /// After the event has been raised `threshold` times.
    Counter { event: GameEventKind, threshold: u32 },
    /// When enemy HP fraction is at or below `threshold` (0.0..=1.0).
    HpThreshold { threshold: f32 },
    /// With probability `chance` when the event is raised.
    Random { event: GameEventKind, chance: f32 },
    /// When the player takes a specific action.
    OnAction(PlayerAction),
    /// Each time HP crosses another `percent` boundary (must divide 100).
    HpSegment { percent: u32 },
    /// Every `threshold` points of damage taken.
    DamageAccumulator { threshold: i32 },
}

/// Ability lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityState {
    #[default]
    Ready,
    /// Counter trigger with this much progress.
    Counting(u32),
    /// Single-use ability that already fired. Terminal until reset.
    Used,
}

/// Template data for an ability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AbilityDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub trigger: AbilityTrigger,
    /// Executed in this order when the ability fires.
    pub effects: SmallVec<[Effect; 2]>,
    /// Rounds to wait after firing (0 = none).
    #[serde(default)]
    pub cooldown: u32,
    /// `false` means single-use per combat.
    #[serde(default = "default_repeatable")]
    pub repeatable: bool,
}

fn default_repeatable() -> bool {
    true
}

impl AbilityDefinition {
    /// Create a repeatable ability with no effects.
    pub fn new(name: impl Into<String>, trigger: AbilityTrigger) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            trigger,
            effects: SmallVec::new(),
            cooldown: 0,
            repeatable: true,
        }
    }

    /// Add an effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Set the description (builder pattern).
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set a cooldown in rounds (builder pattern).
    #[must_use]
    pub fn with_cooldown(mut self, rounds: u32) -> Self {
        self.cooldown = rounds;
        self
    }

    /// Make this ability fire at most once per combat (builder pattern).
    #[must_use]
    pub fn once(mut self) -> Self {
        self.repeatable = false;
        self
    }
}

/// Inputs a trigger check may need besides the event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerContext {
    /// Enemy HP fraction, 0.0..=1.0.
    pub hp_percent: f32,
    /// Total damage the enemy has taken this combat.
    pub total_damage_taken: i32,
}

/// An ability with its runtime state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub def: AbilityDefinition,
    pub state: AbilityState,
    /// Rounds until the ability can fire again.
    pub cooldown_remaining: u32,
    segments_triggered: u32,
    damage_accounted: i32,
}

impl Ability {
    #[must_use]
    pub fn new(def: AbilityDefinition) -> Self {
        Self {
            def,
            state: AbilityState::Ready,
            cooldown_remaining: 0,
            segments_triggered: 0,
            damage_accounted: 0,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.def.name
    }

    #[must_use]
    pub fn is_used(&self) -> bool {
        self.state == AbilityState::Used
    }

    /// Counter progress as (current, threshold), for display.
    #[must_use]
    pub fn progress(&self) -> Option<(u32, u32)> {
        match self.def.trigger {
            AbilityTrigger::Counter { threshold, .. } => {
                let current = match self.state {
                    AbilityState::Counting(n) => n,
                    _ => 0,
                };
                Some((current, threshold))
            }
            _ => None,
        }
    }

    /// Update trigger state for `event` and report whether the ability fires.
    ///
    /// Firing starts the cooldown and, for single-use abilities, moves the
    /// ability to `Used`.
    pub fn check(&mut self, event: GameEventKind, ctx: &TriggerContext, rng: &mut GameRng) -> bool {
        if self.is_used() || self.cooldown_remaining > 0 {
            return false;
        }

        let fires = match self.def.trigger {
            AbilityTrigger::Passive => false,
            AbilityTrigger::OnEvent(kind) => kind == event,
            AbilityTrigger::Counter { event: kind, threshold } => {
                if kind != event {
                    false
                } else {
                    let progress = match self.state {
                        AbilityState::Counting(n) => n + 1,
                        _ => 1,
                    };
                    if progress >= threshold.max(1) {
                        true
                    } else {
                        self.state = AbilityState::Counting(progress);
                        false
                    }
                }
            }
            AbilityTrigger::HpThreshold { threshold } => ctx.hp_percent <= threshold,
            AbilityTrigger::Random { event: kind, chance } => kind == event && rng.chance(chance),
            AbilityTrigger::OnAction(action) => event == GameEventKind::PlayerAction(action),
            AbilityTrigger::HpSegment { percent } => self.check_segment(percent, ctx.hp_percent),
            AbilityTrigger::DamageAccumulator { threshold } => {
                if threshold > 0 && ctx.total_damage_taken - self.damage_accounted >= threshold {
                    self.damage_accounted += threshold;
                    true
                } else {
                    false
                }
            }
        };

        if fires {
            self.state = if self.def.repeatable {
                AbilityState::Ready
            } else {
                AbilityState::Used
            };
            self.cooldown_remaining = self.def.cooldown;
        }
        fires
    }

    fn check_segment(&mut self, percent: u32, hp_percent: f32) -> bool {
        if percent == 0 || 100 % percent != 0 {
            tracing::warn!(ability = %self.def.name, percent, "segment percent must divide 100");
            return false;
        }

        let segments = (100 / percent).saturating_sub(1).min(32);
        for i in 0..segments {
            let threshold = (100 - (i + 1) * percent) as f32 / 100.0;
            let bit = 1u32 << i;
            if hp_percent <= threshold && self.segments_triggered & bit == 0 {
                self.segments_triggered |= bit;
                return true;
            }
        }
        false
    }

    /// Count one round off the cooldown.
    pub fn tick_cooldown(&mut self) {
        self.cooldown_remaining = self.cooldown_remaining.saturating_sub(1);
    }

    /// Back to a fresh state for a new combat.
    pub fn reset(&mut self) {
        self.state = AbilityState::Ready;
        self.cooldown_remaining = 0;
        self.segments_triggered = 0;
        self.damage_accounted = 0;
    }
}
