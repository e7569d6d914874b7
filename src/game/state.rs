//! Game phases and the transition table.
//!
//! Every phase change goes through [`GamePhase::can_transition_to`]. There
//! is no implicit fallthrough: the orchestrator names each step.

use serde::{Deserialize, Serialize};

/// Where the run is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum GamePhase {
    #[default]
    Menu,
    /// Waiting for a bet.
    Betting,
    Dealing,
    PlayerTurn,
    DealerTurn,
    RoundResolution,
    /// A trinket drop is waiting to be taken or skipped.
    Reward,
    /// A narrative event is waiting for a choice.
    Event,
    GameOver,
    Victory,
}

impl GamePhase {
    /// Is `self -> to` a legal step?
    #[must_use]
    pub fn can_transition_to(self, to: GamePhase) -> bool {
        use GamePhase::*;
        matches!(
            (self, to),
            (Menu, Betting | Event | Victory)
                | (Betting, Dealing | GameOver)
                | (Dealing, PlayerTurn | RoundResolution)
                | (PlayerTurn, DealerTurn | RoundResolution)
                | (DealerTurn, RoundResolution)
                | (RoundResolution, Betting | Reward | Event | Victory | GameOver)
                | (Reward, Betting | Event | Victory)
                | (Event, Betting | Event | Victory | GameOver)
                | (GameOver | Victory, Menu)
        )
    }

    /// A round is in progress.
    #[must_use]
    pub fn in_round(self) -> bool {
        matches!(
            self,
            GamePhase::Dealing | GamePhase::PlayerTurn | GamePhase::DealerTurn | GamePhase::RoundResolution
        )
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Victory)
    }
}
