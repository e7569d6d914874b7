//! Acts: ordered encounter lists.

use serde::{Deserialize, Serialize};

/// One stop in an act.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encounter {
    /// Combat against a normal enemy, by template key.
    Normal(String),
    Elite(String),
    Boss(String),
    /// A narrative event drawn from the event pool.
    Event,
}

impl Encounter {
    #[must_use]
    pub fn enemy_key(&self) -> Option<&str> {
        match self {
            Encounter::Normal(key) | Encounter::Elite(key) | Encounter::Boss(key) => Some(key),
            Encounter::Event => None,
        }
    }

    #[must_use]
    pub fn is_combat(&self) -> bool {
        self.enemy_key().is_some()
    }
}

/// An act: a tier and its encounters, walked front to back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Act {
    pub name: String,
    /// Drives affix counts on drops (1..=3).
    pub tier: u32,
    encounters: Vec<Encounter>,
    current: usize,
}

impl Act {
    #[must_use]
    pub fn new(name: impl Into<String>, tier: u32) -> Self {
        Self {
            name: name.into(),
            tier,
            encounters: Vec::new(),
            current: 0,
        }
    }

    /// Append an encounter (builder pattern).
    #[must_use]
    pub fn with_encounter(mut self, encounter: Encounter) -> Self {
        self.encounters.push(encounter);
        self
    }

    /// The tutorial act: didact, event, daemon (elite), event.
    #[must_use]
    pub fn tutorial() -> Self {
        Self::new("Tutorial", 1)
            .with_encounter(Encounter::Normal("didact".into()))
            .with_encounter(Encounter::Event)
            .with_encounter(Encounter::Elite("daemon".into()))
            .with_encounter(Encounter::Event)
    }

    #[must_use]
    pub fn current_encounter(&self) -> Option<&Encounter> {
        self.encounters.get(self.current)
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn encounters(&self) -> &[Encounter] {
        &self.encounters
    }

    /// Move to the next encounter. Returns it, or `None` when the act is done.
    pub fn advance(&mut self) -> Option<&Encounter> {
        if self.current < self.encounters.len() {
            self.current += 1;
        }
        self.current_encounter()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current >= self.encounters.len()
    }

    pub fn restart(&mut self) {
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tutorial_walk() {
        let mut act = Act::tutorial();
        assert_eq!(act.current_encounter().and_then(Encounter::enemy_key), Some("didact"));
        assert_eq!(act.advance(), Some(&Encounter::Event));
        assert_eq!(act.advance(), Some(&Encounter::Elite("daemon".into())));
        assert_eq!(act.advance(), Some(&Encounter::Event));
        assert!(!act.is_complete());
        assert_eq!(act.advance(), None);
        assert!(act.is_complete());
        assert_eq!(act.advance(), None);
    }

    #[test]
    fn test_empty_act_is_complete() {
        assert!(Act::new("Empty", 1).is_complete());
    }
}
