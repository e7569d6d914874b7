//! Weighted event pool.

use serde::{Deserialize, Serialize};

use crate::core::GameRng;

use super::event::EncounterEvent;

/// An event with its selection weight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoolEntry {
    pub event: EncounterEvent,
    pub weight: f32,
}

/// Events an act can draw from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPool {
    entries: Vec<PoolEntry>,
}

impl EventPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event. Non-positive weights count as 1.
    pub fn add(&mut self, event: EncounterEvent, weight: f32) {
        let weight = if weight > 0.0 { weight } else { 1.0 };
        self.entries.push(PoolEntry { event, weight });
    }

    #[must_use]
    pub fn with_event(mut self, event: EncounterEvent, weight: f32) -> Self {
        self.add(event, weight);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&EncounterEvent> {
        self.entries.iter().map(|e| &e.event).find(|e| e.key == key)
    }

    /// Weighted random event.
    pub fn pick(&self, rng: &mut GameRng) -> Option<&EncounterEvent> {
        let weights: Vec<f32> = self.entries.iter().map(|e| e.weight).collect();
        rng.choose_weighted(&weights).map(|i| &self.entries[i].event)
    }

    /// Weighted random event other than `current`, retrying up to `retries`
    /// times. Gives back the last pick if every retry hit `current`.
    pub fn pick_different(&self, current: &str, retries: usize, rng: &mut GameRng) -> Option<&EncounterEvent> {
        let mut picked = self.pick(rng)?;
        for _ in 1..retries.max(1) {
            if picked.key != current {
                break;
            }
            picked = self.pick(rng)?;
        }
        if picked.key == current {
            tracing::debug!(%current, "could not find a different event");
        }
        Some(picked)
    }
}
