//! Core run types: player, enemy, configuration, errors, RNG, logging and
//! run statistics.
//!
//! Everything here is plain data owned by the run context. Subsystems get
//! what they need by reference for the duration of a call.

pub mod config;
pub mod enemy;
pub mod error;
pub mod logging;
pub mod player;
pub mod rng;
pub mod stats;

pub use config::{DropTable, RarityWeights, ReshufflePolicy, RunConfig};
pub use enemy::{Enemy, EnemyRegistry, EnemyTemplate};
pub use error::{GameError, Result};
pub use logging::init_tracing;
pub use player::Player;
pub use rng::{GameRng, GameRngState};
pub use stats::{DamageSource, RunStats};
