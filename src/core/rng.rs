//! Seeded random number generation for a run.
//!
//! ## Streams
//!
//! A run draws randomness for unrelated purposes: shuffling, crit rolls,
//! loot, event selection, random ability triggers. Each purpose gets its own
//! stream via [`GameRng::for_context`], so rolling extra loot never changes
//! the order of the next shuffle.
//!
//! ```
//! use rogue_blackjack::core::GameRng;
//!
//! let run = GameRng::new(7);
//! let mut deck = run.for_context("deck");
//! let mut loot = run.for_context("loot");
//!
//! let _ = loot.roll_percent();
//!
//! let mut deck_again = GameRng::new(7).for_context("deck");
//! assert_eq!(deck.gen_range(0..52), deck_again.gen_range(0..52));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Derive an independent stream for a named purpose.
    ///
    /// The same seed and context always give the same stream.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Random integer in a half-open range.
    pub fn gen_range(&mut self, range: std::ops::Range<i32>) -> i32 {
        self.inner.gen_range(range)
    }

    /// Random integer in an inclusive range. `min > max` returns `min`.
    pub fn gen_inclusive(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.inner.gen_range(min..=max)
    }

    /// Random index in `0..len`.
    pub fn gen_index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }

    /// Uniform float in `[0, 1)`.
    pub fn gen_unit(&mut self) -> f32 {
        self.inner.gen::<f32>()
    }

    /// Roll 0..100, used for percent chances.
    pub fn roll_percent(&mut self) -> i32 {
        self.inner.gen_range(0..100)
    }

    /// True with the given probability (clamped to [0, 1]).
    pub fn chance(&mut self, probability: f32) -> bool {
        self.gen_unit() < probability.clamp(0.0, 1.0)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Choose an index with weighted probability.
    ///
    /// Weights do not need to sum to 1.0. Returns `None` if weights are
    /// empty or all zero.
    pub fn choose_weighted(&mut self, weights: &[f32]) -> Option<usize> {
        if weights.is_empty() {
            return None;
        }

        let total: f32 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }

        let mut threshold = self.gen_unit() * total;

        for (i, &weight) in weights.iter().enumerate() {
            if weight <= 0.0 {
                continue;
            }
            threshold -= weight;
            if threshold <= 0.0 {
                return Some(i);
            }
        }

        // Float rounding: fall back to the last positive weight
        weights.iter().rposition(|w| *w > 0.0)
    }

    /// Capture the stream position for a run snapshot.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore a stream from a snapshot.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl Serialize for GameRng {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.state().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GameRng {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let state = GameRngState::deserialize(deserializer)?;
        Ok(Self::from_state(&state))
    }
}

/// Serializable RNG position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Stream seed
    pub seed: u64,
    /// ChaCha8 word position
    pub word_pos: u128,
}
