//! Built-in enemies, trinkets, affixes and events for the tutorial act.

use crate::abilities::{AbilityDefinition, AbilityTrigger};
use crate::cards::CardTag;
use crate::core::{EnemyRegistry, EnemyTemplate};
use crate::effects::Effect;
use crate::encounters::{EncounterEvent, EventChoice, EventPool, EventType};
use crate::status::StatusKind;
use crate::trinkets::{
    AffixTemplate, StackRule, StatKey, TagRule, TrinketEffectType, TrinketPassive, TrinketRarity, TrinketRegistry,
    TrinketTemplate,
};
use crate::triggers::{GameEventKind, PlayerAction};

#[must_use]
pub fn enemies() -> EnemyRegistry {
    let mut registry = EnemyRegistry::new();

    registry.register(
        EnemyTemplate::new("didact", "The Didact", 50, 5)
            .with_description("A patient instructor of the house's rules.")
            .with_ability(
                AbilityDefinition::new(
                    "The House Remembers",
                    AbilityTrigger::OnEvent(GameEventKind::PlayerBlackjack),
                )
                .with_description("Answers a blackjack with Greed.")
                .with_effect(Effect::apply_status(StatusKind::Greed, 0, 2))
                .with_effect(Effect::message("The house remembers.")),
            )
            .with_ability(
                AbilityDefinition::new(
                    "Second Lesson",
                    AbilityTrigger::HpThreshold { threshold: 0.5 },
                )
                .with_description("Heals once when bloodied.")
                .with_effect(Effect::heal_self(10))
                .once(),
            ),
    );

    registry.register(
        EnemyTemplate::new("daemon", "The Daemon", 120, 15)
            .with_description("It counts every card you touch.")
            .elite()
            .with_ability(
                AbilityDefinition::new(
                    "Irregularity Detected",
                    AbilityTrigger::Counter { event: GameEventKind::CardDrawn, threshold: 5 },
                )
                .with_description("Every fifth card drawn reshuffles the shoe.")
                .with_effect(Effect::ShuffleDeck),
            )
            .with_ability(
                AbilityDefinition::new("Double Jeopardy", AbilityTrigger::OnAction(PlayerAction::Double))
                    .with_description("Doubling down invites Tilt.")
                    .with_effect(Effect::apply_status(StatusKind::Tilt, 0, 2))
                    .with_cooldown(2),
            )
            .with_ability(
                AbilityDefinition::new("Tithe", AbilityTrigger::HpSegment { percent: 25 })
                    .with_description("Drains chips each quarter of its health lost.")
                    .with_effect(Effect::apply_status(StatusKind::ChipDrain, 5, 3)),
            )
            .with_ability(
                AbilityDefinition::new("The Cut", AbilityTrigger::DamageAccumulator { threshold: 40 })
                    .with_description("Rakes a share of the damage it takes.")
                    .with_effect(Effect::apply_status(StatusKind::Rake, 25, 2)),
            ),
    );

    registry
}

#[must_use]
pub fn trinkets() -> TrinketRegistry {
    let mut registry = TrinketRegistry::new();

    registry.register(
        TrinketTemplate::new(
            "lucky_chip",
            "Lucky Chip",
            TrinketRarity::Common,
            TrinketPassive::new(GameEventKind::PlayerWin, TrinketEffectType::AddChipsPercent, 10),
        )
        .with_flavor("Warm to the touch after a win.")
        .with_base_value(40)
        .with_secondary(TrinketPassive::new(
            GameEventKind::PlayerLoss,
            TrinketEffectType::RefundChipsPercent,
            10,
        )),
    );

    registry.register(
        TrinketTemplate::new(
            "loaded_die",
            "Loaded Die",
            TrinketRarity::Common,
            TrinketPassive::new(GameEventKind::PlayerWin, TrinketEffectType::AddChips, 5),
        )
        .with_flavor("Always lands the same way.")
        .with_base_value(30),
    );

    registry.register(
        TrinketTemplate::new(
            "broken_watch",
            "Broken Watch",
            TrinketRarity::Uncommon,
            TrinketPassive::new(GameEventKind::PlayerWin, TrinketEffectType::TrinketStack, 0),
        )
        .with_flavor("Ticks faster every time you win.")
        .with_base_value(60)
        .with_stack(StackRule {
            stat: StatKey::DamagePercent,
            per_stack: 2,
            max: 12,
            reset_to_one: true,
        }),
    );

    registry.register(
        TrinketTemplate::new(
            "streak_counter",
            "Streak Counter",
            TrinketRarity::Uncommon,
            TrinketPassive::new(GameEventKind::PlayerWin, TrinketEffectType::TrinketStack, 0),
        )
        .with_flavor("Resets the moment you stumble.")
        .with_base_value(60)
        .with_secondary(TrinketPassive::new(
            GameEventKind::PlayerLoss,
            TrinketEffectType::TrinketStackReset,
            0,
        ))
        .with_stack(StackRule {
            stat: StatKey::DamageFlat,
            per_stack: 1,
            max: 0,
            reset_to_one: false,
        }),
    );

    registry.register(
        TrinketTemplate::new(
            "warded_charm",
            "Warded Charm",
            TrinketRarity::Uncommon,
            TrinketPassive::new(GameEventKind::CombatStart, TrinketEffectType::BlockDebuff, 1),
        )
        .with_flavor("Shrugs off the first curse of every fight.")
        .with_base_value(70),
    );

    registry.register(
        TrinketTemplate::new(
            "iron_knuckles",
            "Iron Knuckles",
            TrinketRarity::Rare,
            TrinketPassive::new(GameEventKind::PlayerBlackjack, TrinketEffectType::AddDamageFlat, 15),
        )
        .with_flavor("A natural hits harder.")
        .with_base_value(90)
        .with_bet_condition(10),
    );

    registry.register(
        TrinketTemplate::new(
            "cursed_skull",
            "Cursed Skull",
            TrinketRarity::Rare,
            TrinketPassive::new(GameEventKind::CombatStart, TrinketEffectType::AddTagToCards, 0),
        )
        .with_flavor("Its gaze darkens your cards.")
        .with_base_value(100)
        .with_secondary(TrinketPassive::new(
            GameEventKind::CombatStart,
            TrinketEffectType::BuffTagDamage,
            0,
        ))
        .with_tag(TagRule {
            tag: CardTag::Cursed,
            count: 4,
            buff_value: 5,
        }),
    );

    registry.register(
        TrinketTemplate::new(
            "bleeding_heart",
            "Bleeding Heart",
            TrinketRarity::Legendary,
            TrinketPassive::new(GameEventKind::CombatStart, TrinketEffectType::PunishHeal, 2),
        )
        .with_flavor("Every wound it closes, it reopens.")
        .with_base_value(150)
        .with_secondary(TrinketPassive::new(
            GameEventKind::PlayerLoss,
            TrinketEffectType::RefundChipsPercent,
            15,
        )),
    );

    registry.register(
        TrinketTemplate::new(
            "split_ace",
            "Split Ace",
            TrinketRarity::Legendary,
            TrinketPassive::new(GameEventKind::PlayerPush, TrinketEffectType::PushDamagePercent, 100),
        )
        .with_flavor("A tie is still a cut.")
        .with_base_value(150),
    );

    for affix in affixes() {
        registry.register_affix(affix);
    }

    registry
}

fn affixes() -> Vec<AffixTemplate> {
    vec![
        AffixTemplate::new(StatKey::DamagePercent, "Violent", 5, 15)
            .with_description("+{value}% damage")
            .with_weight(10.0),
        AffixTemplate::new(StatKey::DamageFlat, "Heavy", 1, 5)
            .with_description("+{value} damage")
            .with_weight(10.0),
        AffixTemplate::new(StatKey::CritChance, "Keen", 3, 10)
            .with_description("+{value}% crit chance")
            .with_weight(8.0),
        AffixTemplate::new(StatKey::CritBonus, "Savage", 10, 30)
            .with_description("+{value}% crit damage")
            .with_weight(5.0),
        AffixTemplate::new(StatKey::WinBonusPercent, "Greedy", 5, 15)
            .with_description("+{value}% chips won")
            .with_weight(8.0),
        AffixTemplate::new(StatKey::LossRefundPercent, "Insured", 5, 20)
            .with_description("{value}% of lost bets refunded")
            .with_weight(6.0),
        AffixTemplate::new(StatKey::PushDamagePercent, "Stubborn", 10, 30)
            .with_description("Pushes deal {value}% damage")
            .with_weight(4.0),
        AffixTemplate::new(StatKey::FlatChipsOnWin, "Tipped", 1, 5)
            .with_description("+{value} chips per win")
            .with_weight(6.0),
    ]
}

#[must_use]
pub fn events() -> EventPool {
    EventPool::new()
        .with_event(
            EncounterEvent::new("gamblers_bargain", "The Gambler's Bargain", EventType::Choice)
                .with_description("A shadowy figure offers you a deal with a deck of cards.")
                .with_choice(
                    EventChoice::new("Accept the cursed chips", "They feel cold in your hand.")
                        .with_chips(20)
                        .with_sanity(-5)
                        .granting(CardTag::Cursed),
                )
                .with_choice(
                    EventChoice::new("Pay for vampiric power", "One card pulses with crimson light.")
                        .with_chips(-10)
                        .with_sanity(5)
                        .granting(CardTag::Vampiric),
                )
                .with_choice(EventChoice::new("Walk away", "The figure vanishes.")),
            1.0,
        )
        .with_event(
            EncounterEvent::new("rigged_deck", "The Rigged Deck", EventType::Choice)
                .with_description("A dealer's hidden stash of marked cards.")
                .with_choice(
                    EventChoice::new("Cleanse the corruption", "Your deck is pure again.")
                        .with_sanity(-15)
                        .removing(CardTag::Cursed),
                )
                .with_choice(
                    EventChoice::new("Steal the best cards", "Three cards now carry their luck.")
                        .with_chips(-30)
                        .granting(CardTag::Lucky)
                        .granting(CardTag::Lucky)
                        .granting(CardTag::Lucky),
                )
                .with_choice(EventChoice::new("Leave it untouched", "Some mysteries stay unsolved.")),
            1.0,
        )
        .with_event(
            EncounterEvent::new("broken_slot_machine", "The Broken Slot Machine", EventType::Choice)
                .with_description("An ancient slot machine sparks in the corner.")
                .with_choice(
                    EventChoice::new("Try to fix it", "One card glows with violent energy.")
                        .with_chips(-20)
                        .granting(CardTag::Brutal),
                )
                .with_choice(EventChoice::new("Walk past it", "It keeps sparking as you leave.")),
            1.0,
        )
        .with_event(
            EncounterEvent::new("quiet_table", "A Quiet Table", EventType::Rest)
                .with_description("An empty table and a chair that fits you.")
                .with_choice(EventChoice::new("Rest", "Your head clears.").with_sanity(20))
                .with_choice(
                    EventChoice::new("Pocket the tip jar", "Nobody saw. Probably.")
                        .with_chips(15)
                        .with_sanity(-10),
                ),
            0.5,
        )
}
