//! Integration tests for trinket aggregation, drops and status effects.

use rogue_blackjack::cards::TagBonuses;
use rogue_blackjack::content::builtin;
use rogue_blackjack::core::DropTable;
use rogue_blackjack::status::ApplyOutcome;
use rogue_blackjack::trinkets::{generate_drop, AffixRoll, PityCounters, StatKey};
use rogue_blackjack::{GameRng, Player, RunConfig, StatusEffectManager, StatusKind, TrinketInstance, TrinketRarity};
use smallvec::smallvec;

fn instance(key: &str) -> TrinketInstance {
    let registry = builtin::trinkets();
    let template = registry.get(key).unwrap();
    TrinketInstance::new(template, template.rarity, 1)
}

/// Test that aggregating twice gives the same block and leaves tag bonuses alone.
#[test]
fn test_aggregation_idempotent() {
    let registry = builtin::trinkets();
    let mut player = Player::new(&RunConfig::default());

    let mut watch = instance("broken_watch");
    watch.stacks = 3;
    watch.set_affixes(10, smallvec![AffixRoll { stat: StatKey::DamageFlat, value: 4 }]);
    player.equip(0, watch).unwrap();
    player.equip(1, instance("lucky_chip")).unwrap();

    let tags = TagBonuses {
        damage_flat: 0,
        damage_percent: 10,
        crit_chance: 10,
    };
    player.set_tag_stats(tags);

    player.aggregate_stats(&registry);
    let first = *player.trinket_stats();
    player.aggregate_stats(&registry);
    let second = *player.trinket_stats();

    assert_eq!(first, second);
    assert_eq!(first.damage_percent, 6);
    assert_eq!(first.damage_flat, 4);
    assert_eq!(first.win_bonus_percent, 10);
    assert_eq!(first.loss_refund_percent, 10);
    assert_eq!(*player.tag_stats(), tags);
}

/// Test that an unknown template key contributes nothing.
#[test]
fn test_unknown_template_skipped() {
    let registry = builtin::trinkets();
    let mut player = Player::new(&RunConfig::default());
    let mut ghost = instance("loaded_die");
    ghost.template_key = "ghost".to_string();
    player.equip(0, ghost).unwrap();

    player.aggregate_stats(&registry);
    assert_eq!(*player.trinket_stats(), Default::default());
}

/// Test that pity guarantees an uncommon or better after five commons.
#[test]
fn test_pity_after_five_commons() {
    let registry = builtin::trinkets();
    let mut config = RunConfig::default().with_pity_threshold(5);
    config.normal_drops = DropTable {
        normal: [1.0, 0.0, 0.0, 0.0],
        pity: [1.0, 1.0, 1.0, 1.0],
    };
    let mut pity = PityCounters::default();
    let mut rng = GameRng::new(99);

    for _ in 0..5 {
        let drop = generate_drop(&registry, &config, &mut pity, false, 1, &[], &mut rng).unwrap();
        assert_eq!(drop.rarity, TrinketRarity::Common);
    }
    assert_eq!(pity.normal, 5);

    let sixth = generate_drop(&registry, &config, &mut pity, false, 1, &[], &mut rng).unwrap();
    assert!(sixth.rarity >= TrinketRarity::Uncommon);
    assert_eq!(pity.normal, 0);
    assert_eq!(pity.elite, 0);
}

/// Test that drops skip templates the player already holds.
#[test]
fn test_drop_excludes_equipped() {
    let registry = builtin::trinkets();
    let mut config = RunConfig::default();
    config.normal_drops = DropTable {
        normal: [1.0, 0.0, 0.0, 0.0],
        pity: [1.0, 1.0, 1.0, 1.0],
    };
    let mut pity = PityCounters::default();
    let mut rng = GameRng::new(3);

    for _ in 0..4 {
        let drop = generate_drop(&registry, &config, &mut pity, false, 1, &["lucky_chip"], &mut rng).unwrap();
        assert_ne!(drop.template_key, "lucky_chip");
    }
}

/// Test that re-applying Greed refreshes rather than stacks.
#[test]
fn test_greed_refresh() {
    let mut status = StatusEffectManager::new();
    assert_eq!(status.apply(StatusKind::Greed, 0, 2), ApplyOutcome::Added);
    status.tick_round();
    assert_eq!(status.apply(StatusKind::Greed, 0, 2), ApplyOutcome::Refreshed);

    assert_eq!(status.len(), 1);
    assert_eq!(status.get(StatusKind::Greed).unwrap().duration, 2);
    assert_eq!(status.modify_winnings(30, 20), 10);
}

/// Test chip drain caps at the player's chips.
#[test]
fn test_chip_drain_capped() {
    let mut status = StatusEffectManager::new();
    status.apply(StatusKind::ChipDrain, 8, 3);
    assert_eq!(status.round_start_drain(100), 8);
    assert_eq!(status.round_start_drain(5), 5);
}
