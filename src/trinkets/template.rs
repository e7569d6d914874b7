//! Trinket and affix templates.
//!
//! ## Loading
//!
//! Content arrives as raw [`TrinketDef`] / [`AffixDef`] records with string
//! fields. `from_def` converts every string into a closed enum exactly once;
//! unknown strings are logged and replaced with an inert default so a bad
//! definition degrades instead of failing the run.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::CardTag;
use crate::status::StatusKind;
use crate::triggers::GameEventKind;

/// Trinket rarity tier.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TrinketRarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl TrinketRarity {
    pub const ALL: [TrinketRarity; 4] = [
        TrinketRarity::Common,
        TrinketRarity::Uncommon,
        TrinketRarity::Rare,
        TrinketRarity::Legendary,
    ];

    /// Index into a rarity weight table.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// What a trinket passive does when its trigger fires.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum TrinketEffectType {
    #[default]
    None,
    AddChips,
    AddChipsPercent,
    LoseChips,
    ApplyStatus,
    ClearStatus,
    TrinketStack,
    TrinketStackReset,
    RefundChipsPercent,
    AddDamageFlat,
    DamageMultiplier,
    AddTagToCards,
    BuffTagDamage,
    PushDamagePercent,
    BlockDebuff,
    PunishHeal,
}

/// A player stat an affix or stack rule feeds.
///
/// The string forms are the content keys.
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
#[strum(ascii_case_insensitive)]
pub enum StatKey {
    #[strum(serialize = "damage_bonus_percent")]
    DamagePercent,
    #[strum(serialize = "damage_flat")]
    DamageFlat,
    #[strum(serialize = "crit_chance")]
    CritChance,
    #[strum(serialize = "crit_bonus")]
    CritBonus,
    #[strum(serialize = "won_chips_bonus_percent")]
    WinBonusPercent,
    #[strum(serialize = "lost_chips_refund_percent")]
    LossRefundPercent,
    #[strum(serialize = "push_damage_percent")]
    PushDamagePercent,
    #[strum(serialize = "flat_chips_on_win")]
    FlatChipsOnWin,
}

/// One trigger/effect pair of a template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrinketPassive {
    pub trigger: GameEventKind,
    pub effect: TrinketEffectType,
    pub value: i32,
    pub status: Option<StatusKind>,
    pub status_stacks: i32,
    pub tag: Option<CardTag>,
}

impl TrinketPassive {
    #[must_use]
    pub fn new(trigger: GameEventKind, effect: TrinketEffectType, value: i32) -> Self {
        Self {
            trigger,
            effect,
            value,
            status: None,
            status_stacks: 0,
            tag: None,
        }
    }

    /// Status to apply or clear (builder pattern).
    #[must_use]
    pub fn with_status(mut self, status: StatusKind, stacks: i32) -> Self {
        self.status = Some(status);
        self.status_stacks = stacks;
        self
    }
}

/// Stack counter rule (e.g. +2% damage per consecutive win).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackRule {
    pub stat: StatKey,
    pub per_stack: i32,
    /// 0 = unlimited.
    pub max: u32,
    /// Wrap back to one stack instead of staying at max.
    pub reset_to_one: bool,
}

/// Card tag handed out or buffed by a trinket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRule {
    pub tag: CardTag,
    /// Deck cards to tag on equip.
    pub count: usize,
    /// Extra on-draw damage for cards carrying the tag.
    pub buff_value: i32,
}

/// Immutable trinket archetype.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrinketTemplate {
    pub key: String,
    pub name: String,
    pub flavor: String,
    pub rarity: TrinketRarity,
    pub base_value: i32,
    pub primary: TrinketPassive,
    pub secondary: Option<TrinketPassive>,
    pub stack: Option<StackRule>,
    pub tag: Option<TagRule>,
    /// Passives only fire when the current bet is at least this (0 = always).
    pub condition_bet_gte: i32,
    /// Relative weight among templates of the same rarity.
    pub drop_weight: f32,
}

impl TrinketTemplate {
    #[must_use]
    pub fn new(key: impl Into<String>, name: impl Into<String>, rarity: TrinketRarity, primary: TrinketPassive) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            flavor: String::new(),
            rarity,
            base_value: 50,
            primary,
            secondary: None,
            stack: None,
            tag: None,
            condition_bet_gte: 0,
            drop_weight: 1.0,
        }
    }

    #[must_use]
    pub fn with_flavor(mut self, flavor: impl Into<String>) -> Self {
        self.flavor = flavor.into();
        self
    }

    #[must_use]
    pub fn with_base_value(mut self, value: i32) -> Self {
        self.base_value = value;
        self
    }

    #[must_use]
    pub fn with_secondary(mut self, passive: TrinketPassive) -> Self {
        self.secondary = Some(passive);
        self
    }

    #[must_use]
    pub fn with_stack(mut self, rule: StackRule) -> Self {
        self.stack = Some(rule);
        self
    }

    #[must_use]
    pub fn with_tag(mut self, rule: TagRule) -> Self {
        self.tag = Some(rule);
        self
    }

    #[must_use]
    pub fn with_bet_condition(mut self, min_bet: i32) -> Self {
        self.condition_bet_gte = min_bet;
        self
    }

    /// Passives whose trigger matches `event`, primary first.
    pub fn passives_for(&self, event: GameEventKind) -> SmallVec<[(TrinketPassive, bool); 2]> {
        let mut out = SmallVec::new();
        if self.primary.effect != TrinketEffectType::None && self.primary.trigger == event {
            out.push((self.primary, false));
        }
        if let Some(secondary) = self.secondary {
            if secondary.effect != TrinketEffectType::None && secondary.trigger == event {
                out.push((secondary, true));
            }
        }
        out
    }

    /// Parse a raw definition. Returns `None` only when the key is empty.
    pub fn from_def(def: &TrinketDef) -> Option<Self> {
        if def.key.is_empty() {
            tracing::warn!(name = %def.name, "trinket definition without key");
            return None;
        }

        let rarity = parse_or(&def.key, "rarity", &def.rarity, TrinketRarity::Common);
        let primary = parse_passive(&def.key, &def.primary);
        let secondary = def.secondary.as_ref().map(|p| parse_passive(&def.key, p));

        let stack = def.stack_stat.as_deref().and_then(|stat| match stat.parse::<StatKey>() {
            Ok(stat) => Some(StackRule {
                stat,
                per_stack: def.stack_value,
                max: def.stack_max,
                reset_to_one: def.stack_on_max.as_deref() == Some("reset_to_one"),
            }),
            Err(_) => {
                tracing::warn!(trinket = %def.key, %stat, "unknown stack stat, ignoring stack rule");
                None
            }
        });

        let tag = def.tag.as_deref().and_then(|tag| match tag.parse::<CardTag>() {
            Ok(tag) => Some(TagRule {
                tag,
                count: def.tag_count,
                buff_value: def.tag_buff_value,
            }),
            Err(_) => {
                tracing::warn!(trinket = %def.key, %tag, "unknown card tag");
                None
            }
        });

        Some(Self {
            key: def.key.clone(),
            name: def.name.clone(),
            flavor: def.flavor.clone(),
            rarity,
            base_value: def.base_value,
            primary,
            secondary,
            stack,
            tag,
            condition_bet_gte: def.condition_bet_gte,
            drop_weight: if def.drop_weight > 0.0 { def.drop_weight } else { 1.0 },
        })
    }
}

fn parse_or<T: std::str::FromStr>(owner: &str, field: &'static str, raw: &str, fallback: T) -> T {
    raw.parse().unwrap_or_else(|_| {
        tracing::warn!(%owner, field, value = %raw, "unknown value, using default");
        fallback
    })
}

fn parse_passive(owner: &str, def: &PassiveDef) -> TrinketPassive {
    let effect = parse_or(owner, "effect", &def.effect, TrinketEffectType::None);
    let trigger = match def.trigger.parse::<GameEventKind>() {
        Ok(trigger) => trigger,
        Err(_) => {
            tracing::warn!(%owner, trigger = %def.trigger, "unknown trigger, passive disabled");
            return TrinketPassive::new(GameEventKind::HandEnd, TrinketEffectType::None, 0);
        }
    };

    let status = def.status.as_deref().and_then(|s| match s.parse::<StatusKind>() {
        Ok(status) => Some(status),
        Err(_) => {
            tracing::warn!(%owner, status = %s, "unknown status key");
            None
        }
    });
    let tag = def.tag.as_deref().and_then(|t| t.parse::<CardTag>().ok());

    TrinketPassive {
        trigger,
        effect,
        value: def.value,
        status,
        status_stacks: def.status_stacks,
        tag,
    }
}

/// Raw trinket passive as loaded from content.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassiveDef {
    pub trigger: String,
    pub effect: String,
    pub value: i32,
    pub status: Option<String>,
    pub status_stacks: i32,
    pub tag: Option<String>,
}

/// Raw trinket template as loaded from content.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrinketDef {
    pub key: String,
    pub name: String,
    pub flavor: String,
    pub rarity: String,
    pub base_value: i32,
    pub primary: PassiveDef,
    pub secondary: Option<PassiveDef>,
    pub stack_stat: Option<String>,
    pub stack_value: i32,
    pub stack_max: u32,
    pub stack_on_max: Option<String>,
    pub tag: Option<String>,
    pub tag_count: usize,
    pub tag_buff_value: i32,
    pub condition_bet_gte: i32,
    pub drop_weight: f32,
}

/// A stat bonus that can roll on a trinket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AffixTemplate {
    pub stat: StatKey,
    pub name: String,
    /// Text with a `{value}` placeholder.
    pub description: String,
    pub min: i32,
    pub max: i32,
    pub weight: f32,
}

impl AffixTemplate {
    #[must_use]
    pub fn new(stat: StatKey, name: impl Into<String>, min: i32, max: i32) -> Self {
        Self {
            stat,
            name: name.into(),
            description: String::new(),
            min,
            max,
            weight: 1.0,
        }
    }

    #[must_use]
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Description with the rolled value filled in.
    #[must_use]
    pub fn describe(&self, value: i32) -> String {
        self.description.replace("{value}", &value.to_string())
    }

    /// Parse a raw definition; unknown stat keys are dropped with a warning.
    pub fn from_def(def: &AffixDef) -> Option<Self> {
        let Ok(stat) = def.stat_key.parse::<StatKey>() else {
            tracing::warn!(stat_key = %def.stat_key, "unknown affix stat key, skipping affix");
            return None;
        };
        let (min, max) = if def.min <= def.max { (def.min, def.max) } else { (def.max, def.min) };
        Some(Self {
            stat,
            name: def.name.clone(),
            description: def.description.clone(),
            min,
            max,
            weight: def.weight.max(0.0),
        })
    }
}

/// Raw affix as loaded from content.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffixDef {
    pub stat_key: String,
    pub name: String,
    pub description: String,
    pub min: i32,
    pub max: i32,
    pub weight: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_key_strings() {
        assert_eq!("damage_bonus_percent".parse::<StatKey>(), Ok(StatKey::DamagePercent));
        assert_eq!("won_chips_bonus_percent".parse::<StatKey>(), Ok(StatKey::WinBonusPercent));
        assert_eq!(StatKey::LossRefundPercent.as_ref(), "lost_chips_refund_percent");
        assert!("luck".parse::<StatKey>().is_err());
    }

    #[test]
    fn test_effect_type_parse() {
        assert_eq!("ADD_CHIPS".parse::<TrinketEffectType>(), Ok(TrinketEffectType::AddChips));
        assert_eq!(
            "trinket_stack_reset".parse::<TrinketEffectType>(),
            Ok(TrinketEffectType::TrinketStackReset)
        );
        assert!("EXPLODE".parse::<TrinketEffectType>().is_err());
    }

    #[test]
    fn test_from_def_falls_back() {
        let def = TrinketDef {
            key: "odd_coin".into(),
            name: "Odd Coin".into(),
            rarity: "mythic".into(),
            primary: PassiveDef {
                trigger: "PLAYER_WIN".into(),
                effect: "SUMMON".into(),
                value: 3,
                ..Default::default()
            },
            stack_stat: Some("mystery".into()),
            ..Default::default()
        };

        let template = TrinketTemplate::from_def(&def).unwrap();
        assert_eq!(template.rarity, TrinketRarity::Common);
        assert_eq!(template.primary.trigger, GameEventKind::PlayerWin);
        assert_eq!(template.primary.effect, TrinketEffectType::None);
        assert!(template.stack.is_none());
        assert!(template.passives_for(GameEventKind::PlayerWin).is_empty());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "key": "broken_watch",
            "name": "Broken Watch",
            "rarity": "uncommon",
            "base_value": 80,
            "primary": { "trigger": "PLAYER_WIN", "effect": "TRINKET_STACK" },
            "secondary": { "trigger": "PLAYER_LOSS", "effect": "TRINKET_STACK_RESET" },
            "stack_stat": "damage_bonus_percent",
            "stack_value": 2,
            "stack_max": 12
        }"#;
        let def: TrinketDef = serde_json::from_str(json).unwrap();
        let template = TrinketTemplate::from_def(&def).unwrap();

        assert_eq!(template.rarity, TrinketRarity::Uncommon);
        let stack = template.stack.unwrap();
        assert_eq!(stack.stat, StatKey::DamagePercent);
        assert_eq!(stack.max, 12);
        assert!(!stack.reset_to_one);

        let on_loss = template.passives_for(GameEventKind::PlayerLoss);
        assert_eq!(on_loss.len(), 1);
        assert!(on_loss[0].1);
    }

    #[test]
    fn test_affix_from_def() {
        let def = AffixDef {
            stat_key: "crit_chance".into(),
            name: "Keen".into(),
            description: "+{value}% crit chance".into(),
            min: 8,
            max: 3,
            weight: 2.0,
        };
        let affix = AffixTemplate::from_def(&def).unwrap();
        assert_eq!((affix.min, affix.max), (3, 8));
        assert_eq!(affix.describe(5), "+5% crit chance");

        let bad = AffixDef { stat_key: "charisma".into(), ..def };
        assert!(AffixTemplate::from_def(&bad).is_none());
    }
}
