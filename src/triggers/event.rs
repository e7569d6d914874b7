//! Game event types.
//!
//! Events are raised by the orchestrator whenever something meaningful
//! happens in a round. Abilities and trinkets listen for event kinds; UI
//! collaborators read them from the [`EventBus`](super::EventBus) to play
//! animations and sounds.

use serde::{Deserialize, Serialize};

/// A player action during their turn.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum PlayerAction {
    Hit,
    Stand,
    Double,
}

/// What happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum GameEventKind {
    /// A new combat began.
    CombatStart,
    /// A round is starting (betting done, before the deal).
    RoundStart,
    /// A card entered the player's hand.
    CardDrawn,
    /// The player took an action.
    #[strum(disabled)]
    PlayerAction(PlayerAction),
    /// The player's action finished resolving.
    PlayerActionEnd,
    PlayerBust,
    PlayerBlackjack,
    DealerBust,
    PlayerWin,
    PlayerLoss,
    PlayerPush,
    /// Round resolution is complete.
    HandEnd,
    EnemyDefeated,
    EnemyHeal,
    CardTagCursed,
    CardTagVampiric,
}

impl GameEventKind {
    /// Is this a round-boundary event (status effects consult/tick)?
    #[must_use]
    pub const fn is_round_boundary(self) -> bool {
        matches!(self, GameEventKind::RoundStart | GameEventKind::HandEnd)
    }

    /// Is this a draw-related event (card tags evaluate)?
    #[must_use]
    pub const fn is_draw_related(self) -> bool {
        matches!(self, GameEventKind::CardDrawn)
    }
}

impl std::fmt::Display for GameEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameEventKind::PlayerAction(action) => write!(f, "PLAYER_ACTION({})", action),
            other => write!(f, "{:?}", other),
        }
    }
}

/// A fired event with context.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub kind: GameEventKind,

    /// Round number when fired.
    pub round: u32,

    /// Amount associated with the event (damage, chips, card index).
    pub value: i32,
}

impl GameEvent {
    /// Create a new event with just a kind.
    #[must_use]
    pub fn new(kind: GameEventKind) -> Self {
        Self { kind, round: 0, value: 0 }
    }

    /// Set the round (builder pattern).
    #[must_use]
    pub fn in_round(mut self, round: u32) -> Self {
        self.round = round;
        self
    }

    /// Set the value (builder pattern).
    #[must_use]
    pub fn with_value(mut self, value: i32) -> Self {
        self.value = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_builder() {
        let event = GameEvent::new(GameEventKind::CardDrawn).in_round(3).with_value(1);
        assert_eq!(event.kind, GameEventKind::CardDrawn);
        assert_eq!(event.round, 3);
        assert_eq!(event.value, 1);
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("PLAYER_WIN".parse::<GameEventKind>(), Ok(GameEventKind::PlayerWin));
        assert_eq!("card_drawn".parse::<GameEventKind>(), Ok(GameEventKind::CardDrawn));
        assert!("PLAYER_ACTION".parse::<GameEventKind>().is_err());
        assert_eq!("double".parse::<PlayerAction>(), Ok(PlayerAction::Double));
    }

    #[test]
    fn test_classification() {
        assert!(GameEventKind::CardDrawn.is_draw_related());
        assert!(GameEventKind::RoundStart.is_round_boundary());
        assert!(GameEventKind::HandEnd.is_round_boundary());
        assert!(!GameEventKind::PlayerWin.is_round_boundary());
    }

    #[test]
    fn test_display() {
        assert_eq!(GameEventKind::PlayerAction(PlayerAction::Hit).to_string(), "PLAYER_ACTION(HIT)");
        assert_eq!(GameEventKind::PlayerWin.to_string(), "PlayerWin");
    }
}
