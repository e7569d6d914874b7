//! Tag definition registry.
//!
//! Content loaders hand parsed [`TagDefinition`]s to a `TagRegistry`;
//! the engine only ever looks them up by [`CardTag`].

use rustc_hash::FxHashMap;

use super::tags::{CardTag, TagDef, TagDefinition, TagEffectKind, TagScope, TagTrigger};

/// Card tag definitions by tag.
#[derive(Clone, Debug, Default)]
pub struct TagRegistry {
    defs: FxHashMap<CardTag, TagDefinition>,
}

impl TagRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the five built-in tags.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for def in builtin_tags() {
            registry.register(def);
        }
        registry
    }

    /// Register or replace a definition.
    pub fn register(&mut self, def: TagDefinition) {
        if self.defs.insert(def.tag, def).is_some() {
            tracing::debug!("tag definition replaced");
        }
    }

    /// Parse and register raw definitions. Returns how many were accepted.
    pub fn load_defs(&mut self, defs: &[TagDef]) -> usize {
        let mut loaded = 0;
        for def in defs {
            if let Some(parsed) = TagDefinition::from_def(def) {
                self.register(parsed);
                loaded += 1;
            }
        }
        loaded
    }

    #[must_use]
    pub fn get(&self, tag: CardTag) -> Option<&TagDefinition> {
        self.defs.get(&tag)
    }

    /// Value multiplier for a tag; unknown tags multiply by 1.
    #[must_use]
    pub fn value_multiplier(&self, tag: CardTag) -> u8 {
        self.get(tag).map_or(1, TagDefinition::value_multiplier)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagDefinition> {
        self.defs.values()
    }
}

fn builtin_tags() -> Vec<TagDefinition> {
    vec![
        TagDefinition::new(CardTag::Cursed, "Cursed", TagTrigger::OnDraw, TagScope::SingleCard)
            .with_description("Deals 10 damage to the enemy when drawn")
            .with_effect(TagEffectKind::DealDamage, 10),
        TagDefinition::new(CardTag::Vampiric, "Vampiric", TagTrigger::OnDraw, TagScope::SingleCard)
            .with_description("Deals 5 damage and restores 5 chips when drawn")
            .with_effect(TagEffectKind::DealDamage, 5)
            .with_effect(TagEffectKind::GainChips, 5),
        TagDefinition::new(CardTag::Lucky, "Lucky", TagTrigger::Passive, TagScope::Global)
            .with_description("+10% crit chance while face up")
            .with_effect(TagEffectKind::AddCritPercent, 10),
        TagDefinition::new(CardTag::Brutal, "Brutal", TagTrigger::Passive, TagScope::Global)
            .with_description("+10% damage while face up")
            .with_effect(TagEffectKind::AddDamagePercent, 10),
        TagDefinition::new(CardTag::Doubled, "Doubled", TagTrigger::Passive, TagScope::SingleCard)
            .with_description("This card counts double (max 10)")
            .with_effect(TagEffectKind::MultiplyValue, 2),
    ]
}
