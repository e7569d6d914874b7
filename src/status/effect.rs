//! Status effect kinds and instances.

use serde::{Deserialize, Serialize};

/// Status effects are outcome modifiers on the player.
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
    strum::AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum StatusKind {
    /// Lose `magnitude` chips at round start.
    ChipDrain,
    /// Losses cost double.
    Tilt,
    /// Wins pay only half the bet.
    Greed,
    /// Lose `magnitude`% of damage dealt as chips on each win. Stack based.
    Rake,
}

/// How an effect's duration runs down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationType {
    /// One per round, at round end.
    Rounds,
    /// One per trigger.
    Stacks,
}

/// The quantity a status effect feeds into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusStat {
    /// Chips lost at round start.
    RoundStartDrain,
    /// Extra loss penalty.
    LossPenalty,
    /// Win penalty.
    WinPenalty,
    /// Percent of damage dealt lost as chips.
    DamageRake,
}

impl StatusKind {
    pub const ALL: [StatusKind; 4] = [
        StatusKind::ChipDrain,
        StatusKind::Tilt,
        StatusKind::Greed,
        StatusKind::Rake,
    ];

    #[must_use]
    pub const fn duration_type(self) -> DurationType {
        match self {
            StatusKind::Rake => DurationType::Stacks,
            _ => DurationType::Rounds,
        }
    }

    #[must_use]
    pub const fn stat(self) -> StatusStat {
        match self {
            StatusKind::ChipDrain => StatusStat::RoundStartDrain,
            StatusKind::Tilt => StatusStat::LossPenalty,
            StatusKind::Greed => StatusStat::WinPenalty,
            StatusKind::Rake => StatusStat::DamageRake,
        }
    }

    /// Every current kind hurts the player.
    #[must_use]
    pub const fn is_debuff(self) -> bool {
        true
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            StatusKind::ChipDrain => "Chip Drain",
            StatusKind::Tilt => "Tilt",
            StatusKind::Greed => "Greed",
            StatusKind::Rake => "Rake",
        }
    }

    #[must_use]
    pub const fn abbreviation(self) -> &'static str {
        match self {
            StatusKind::ChipDrain => "Cd",
            StatusKind::Tilt => "Ti",
            StatusKind::Greed => "Gr",
            StatusKind::Rake => "Rk",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            StatusKind::ChipDrain => "Lose chips each round",
            StatusKind::Tilt => "Lose 2x chips on loss",
            StatusKind::Greed => "Win only 50% chips",
            StatusKind::Rake => "Lose a share of damage dealt as chips",
        }
    }
}

/// An active effect on a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffectInstance {
    pub kind: StatusKind,
    pub magnitude: i32,
    /// Rounds or stacks remaining, per `duration_type`.
    pub duration: i32,
    pub duration_type: DurationType,
}

impl StatusEffectInstance {
    #[must_use]
    pub fn new(kind: StatusKind, magnitude: i32, duration: i32) -> Self {
        Self {
            kind,
            magnitude,
            duration,
            duration_type: kind.duration_type(),
        }
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.duration <= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("CHIP_DRAIN".parse::<StatusKind>(), Ok(StatusKind::ChipDrain));
        assert_eq!("rake".parse::<StatusKind>(), Ok(StatusKind::Rake));
        assert_eq!(StatusKind::Tilt.to_string(), "TILT");
        assert!("MADNESS".parse::<StatusKind>().is_err());
    }

    #[test]
    fn test_duration_types() {
        assert_eq!(StatusKind::Rake.duration_type(), DurationType::Stacks);
        assert_eq!(StatusKind::Greed.duration_type(), DurationType::Rounds);
        assert_eq!(StatusEffectInstance::new(StatusKind::Rake, 20, 3).duration_type, DurationType::Stacks);
    }
}
