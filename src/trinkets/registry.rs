//! Trinket and affix template registry.

use rustc_hash::FxHashMap;

use super::template::{AffixDef, AffixTemplate, TrinketDef, TrinketRarity, TrinketTemplate};

/// Trinket templates by key, plus the affix pool.
#[derive(Clone, Debug, Default)]
pub struct TrinketRegistry {
    templates: FxHashMap<String, TrinketTemplate>,
    affixes: Vec<AffixTemplate>,
}

impl TrinketRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a template.
    pub fn register(&mut self, template: TrinketTemplate) {
        if let Some(old) = self.templates.insert(template.key.clone(), template) {
            tracing::debug!(key = %old.key, "trinket template replaced");
        }
    }

    pub fn register_affix(&mut self, affix: AffixTemplate) {
        self.affixes.push(affix);
    }

    /// Parse and register raw trinket definitions. Returns how many loaded.
    pub fn load_trinkets(&mut self, defs: &[TrinketDef]) -> usize {
        let mut loaded = 0;
        for template in defs.iter().filter_map(TrinketTemplate::from_def) {
            self.register(template);
            loaded += 1;
        }
        loaded
    }

    /// Parse and register raw affix definitions. Returns how many loaded.
    pub fn load_affixes(&mut self, defs: &[AffixDef]) -> usize {
        let mut loaded = 0;
        for affix in defs.iter().filter_map(AffixTemplate::from_def) {
            self.register_affix(affix);
            loaded += 1;
        }
        loaded
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TrinketTemplate> {
        self.templates.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    /// Templates of one rarity, sorted by key for deterministic rolls.
    #[must_use]
    pub fn of_rarity(&self, rarity: TrinketRarity) -> Vec<&TrinketTemplate> {
        let mut out: Vec<_> = self.templates.values().filter(|t| t.rarity == rarity).collect();
        out.sort_by(|a, b| a.key.cmp(&b.key));
        out
    }

    /// All templates, sorted by key.
    #[must_use]
    pub fn sorted(&self) -> Vec<&TrinketTemplate> {
        let mut out: Vec<_> = self.templates.values().collect();
        out.sort_by(|a, b| a.key.cmp(&b.key));
        out
    }

    #[must_use]
    pub fn affixes(&self) -> &[AffixTemplate] {
        &self.affixes
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
    use crate::trinkets::{TrinketEffectType, TrinketPassive};
    use crate::triggers::GameEventKind;

    #[test]
    fn test_register_and_filter() {
        let mut registry = TrinketRegistry::new();
        let passive = TrinketPassive::new(GameEventKind::PlayerWin, TrinketEffectType::AddChips, 5);
        registry.register(TrinketTemplate::new("b", "B", TrinketRarity::Rare, passive));
        registry.register(TrinketTemplate::new("a", "A", TrinketRarity::Rare, passive));
        registry.register(TrinketTemplate::new("c", "C", TrinketRarity::Common, passive));

        assert_eq!(registry.len(), 3);
        let rares: Vec<_> = registry.of_rarity(TrinketRarity::Rare).iter().map(|t| t.key.as_str()).collect();
        assert_eq!(rares, vec!["a", "b"]);
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_load_skips_bad_affixes() {
        let mut registry = TrinketRegistry::new();
        let defs = vec![
            AffixDef { stat_key: "crit_chance".into(), min: 1, max: 5, weight: 1.0, ..Default::default() },
            AffixDef { stat_key: "wisdom".into(), min: 1, max: 5, weight: 1.0, ..Default::default() },
        ];
        assert_eq!(registry.load_affixes(&defs), 1);
        assert_eq!(registry.affixes().len(), 1);
    }
}
