//! Enemies and enemy templates.
//!
//! An [`Enemy`] is built fresh from its [`EnemyTemplate`] for every
//! encounter. The run context owns it by value, so replacing the enemy
//! between encounters never leaves anything pointing at the old one.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::abilities::{Ability, AbilityDefinition, TriggerContext};

/// Immutable enemy archetype.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub max_hp: i32,
    /// Minimum bet while fighting this enemy.
    pub chip_threat: i32,
    #[serde(default)]
    pub abilities: Vec<AbilityDefinition>,
    #[serde(default)]
    pub is_elite: bool,
    #[serde(default)]
    pub is_boss: bool,
}

impl EnemyTemplate {
    #[must_use]
    pub fn new(key: impl Into<String>, name: impl Into<String>, max_hp: i32, chip_threat: i32) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: String::new(),
            max_hp,
            chip_threat,
            abilities: Vec::new(),
            is_elite: false,
            is_boss: false,
        }
    }

    #[must_use]
    pub fn with_ability(mut self, ability: AbilityDefinition) -> Self {
        self.abilities.push(ability);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn elite(mut self) -> Self {
        self.is_elite = true;
        self
    }

    #[must_use]
    pub fn boss(mut self) -> Self {
        self.is_boss = true;
        self
    }
}

/// A live enemy in combat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub key: String,
    pub name: String,
    pub max_hp: i32,
    pub current_hp: i32,
    pub chip_threat: i32,
    pub abilities: Vec<Ability>,
    pub total_damage_taken: i32,
    pub is_defeated: bool,
    pub is_elite: bool,
    pub is_boss: bool,
}

impl Enemy {
    #[must_use]
    pub fn from_template(template: &EnemyTemplate) -> Self {
        Self {
            key: template.key.clone(),
            name: template.name.clone(),
            max_hp: template.max_hp.max(1),
            current_hp: template.max_hp.max(1),
            chip_threat: template.chip_threat.max(1),
            abilities: template.abilities.iter().cloned().map(Ability::new).collect(),
            total_damage_taken: 0,
            is_defeated: false,
            is_elite: template.is_elite,
            is_boss: template.is_boss,
        }
    }

    /// Elites and bosses drop from the elite loot table.
    #[must_use]
    pub fn uses_elite_drops(&self) -> bool {
        self.is_elite || self.is_boss
    }

    /// Lose HP, clamped at zero. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        if amount <= 0 || self.is_defeated {
            return 0;
        }
        let dealt = amount.min(self.current_hp);
        self.current_hp -= dealt;
        self.total_damage_taken += dealt;
        if self.current_hp == 0 {
            self.is_defeated = true;
            tracing::info!(enemy = %self.name, "enemy defeated");
        }
        tracing::debug!(enemy = %self.name, dealt, hp = self.current_hp, "enemy damaged");
        dealt
    }

    /// Gain HP, clamped at max. Returns the HP actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if amount <= 0 || self.is_defeated {
            return 0;
        }
        let healed = amount.min(self.max_hp - self.current_hp);
        self.current_hp += healed;
        healed
    }

    /// Current HP as a fraction of max.
    #[must_use]
    pub fn hp_percent(&self) -> f32 {
        self.current_hp as f32 / self.max_hp as f32
    }

    #[must_use]
    pub fn trigger_context(&self) -> TriggerContext {
        TriggerContext {
            hp_percent: self.hp_percent(),
            total_damage_taken: self.total_damage_taken,
        }
    }
}

/// Enemy templates by key.
#[derive(Clone, Debug, Default)]
pub struct EnemyRegistry {
    templates: FxHashMap<String, EnemyTemplate>,
}

impl EnemyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, template: EnemyTemplate) {
        self.templates.insert(template.key.clone(), template);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&EnemyTemplate> {
        self.templates.get(key)
    }

    /// Build a fresh enemy, or `None` (with a warning) for an unknown key.
    #[must_use]
    pub fn spawn(&self, key: &str) -> Option<Enemy> {
        match self.get(key) {
            Some(template) => Some(Enemy::from_template(template)),
            None => {
                tracing::warn!(%key, "unknown enemy template");
                None
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::AbilityTrigger;
    use crate::effects::Effect;
    use crate::triggers::GameEventKind;

    fn template() -> EnemyTemplate {
        EnemyTemplate::new("didact", "The Didact", 50, 5).with_ability(
            AbilityDefinition::new("Lesson", AbilityTrigger::OnEvent(GameEventKind::PlayerBust))
                .with_effect(Effect::heal_self(5)),
        )
    }

    #[test]
    fn test_damage_and_defeat() {
        let mut enemy = Enemy::from_template(&template());
        assert_eq!(enemy.take_damage(30), 30);
        assert!((enemy.hp_percent() - 0.4).abs() < f32::EPSILON);
        assert_eq!(enemy.take_damage(30), 20);
        assert!(enemy.is_defeated);
        assert_eq!(enemy.total_damage_taken, 50);
        assert_eq!(enemy.take_damage(5), 0);
    }

    #[test]
    fn test_heal_clamps() {
        let mut enemy = Enemy::from_template(&template());
        enemy.take_damage(10);
        assert_eq!(enemy.heal(25), 10);
        assert_eq!(enemy.current_hp, 50);
    }

    #[test]
    fn test_registry_spawn() {
        let mut registry = EnemyRegistry::new();
        registry.register(template());

        let enemy = registry.spawn("didact").unwrap();
        assert_eq!(enemy.abilities.len(), 1);
        assert!(registry.spawn("nobody").is_none());
    }

    #[test]
    fn test_template_from_json() {
        let json = r#"{
            "key": "daemon",
            "name": "The Daemon",
            "max_hp": 120,
            "chip_threat": 15,
            "is_elite": true,
            "abilities": [{
                "name": "House Edge",
                "trigger": { "Counter": { "event": "PlayerWin", "threshold": 2 } },
                "effects": [{ "ApplyStatus": { "status": "Greed", "magnitude": 0, "duration": 2 } }]
            }]
        }"#;
        let template: EnemyTemplate = serde_json::from_str(json).unwrap();
        assert!(template.is_elite);
        assert_eq!(template.abilities[0].name, "House Edge");
        assert!(template.abilities[0].repeatable);
    }
}
