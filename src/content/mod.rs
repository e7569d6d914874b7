//! Content bundle: every template registry a run looks things up in.
//!
//! Loaders (outside this crate) fill a [`Content`] once before the run
//! starts. The run context owns it and hands out references; nothing here
//! is global.

pub mod builtin;

use crate::cards::TagRegistry;
use crate::core::EnemyRegistry;
use crate::encounters::EventPool;
use crate::trinkets::TrinketRegistry;

/// All template data for a run.
#[derive(Clone, Debug, Default)]
pub struct Content {
    pub tags: TagRegistry,
    pub trinkets: TrinketRegistry,
    pub enemies: EnemyRegistry,
    pub events: EventPool,
}

impl Content {
    /// The built-in tutorial content.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            tags: TagRegistry::with_builtin(),
            trinkets: builtin::trinkets(),
            enemies: builtin::enemies(),
            events: builtin::events(),
        }
    }
}
