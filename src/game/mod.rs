//! The run orchestrator: phases, the run context, event dispatch and the
//! combat loop.
//!
//! ```
//! use rogue_blackjack::content::Content;
//! use rogue_blackjack::core::RunConfig;
//! use rogue_blackjack::game::{GameContext, GamePhase};
//! use rogue_blackjack::rules::BasicStrategy;
//!
//! let mut game = GameContext::new(RunConfig::default().with_seed(1), Content::builtin()).unwrap();
//! game.start_run().unwrap();
//! assert_eq!(game.phase(), GamePhase::Betting);
//!
//! game.place_bet(game.min_bet()).unwrap();
//! game.auto_play_turn(&BasicStrategy).unwrap();
//! assert!(game.last_outcome().is_some());
//! ```

pub mod combat;
pub mod context;
pub mod dispatch;
pub mod state;

pub use context::{GameContext, RunRngs};
pub use dispatch::MAX_DISPATCH_DEPTH;
pub use state::GamePhase;
