//! Integration tests for cards, hands and card tags.

use proptest::prelude::*;
use rogue_blackjack::cards::TagEngine;
use rogue_blackjack::{Card, CardTag, Deck, GameRng, Hand, HandId, Rank, Suit, TagRegistry};

fn hand_of(ranks: &[Rank]) -> Hand {
    Hand::from_cards(
        HandId::Player,
        ranks.iter().enumerate().map(|(i, r)| Card::new(*r, Suit::ALL[i % 4])),
    )
}

proptest! {
    /// Test that any seed shuffles the deck into a permutation of 52 distinct cards.
    #[test]
    fn test_shuffle_is_permutation(seed in any::<u64>()) {
        let mut rng = GameRng::new(seed);
        let deck = Deck::shuffled(&mut rng);

        let mut ids: Vec<u8> = deck.draw_pile().iter().map(|c| c.id.0).collect();
        ids.sort_unstable();
        prop_assert_eq!(ids, (0..52).collect::<Vec<u8>>());
    }

    /// Test that hand totals stay within bounds for any cards.
    #[test]
    fn test_total_bounds(ids in proptest::collection::vec(0u8..52, 1..8)) {
        let cards: Vec<Card> = ids.iter().filter_map(|i| Card::from_id(rogue_blackjack::CardId(*i))).collect();
        let hand = Hand::from_cards(HandId::Player, cards);
        let total = hand.total();

        prop_assert!(total.best >= total.hard);
        prop_assert!(total.best <= total.hard + 10);
        prop_assert_eq!(total.is_bust, total.hard > 21);
        if total.is_soft {
            prop_assert!(total.best <= 21);
        }
    }
}

/// Test that every card lands in each third of the deck at a plausible rate.
#[test]
fn test_shuffle_roughly_uniform() {
    let mut rng = GameRng::new(2024);
    let mut top_third = [0u32; 52];
    let trials = 3000;

    for _ in 0..trials {
        let deck = Deck::shuffled(&mut rng);
        for card in deck.draw_pile().iter().rev().take(17) {
            top_third[card.id.0 as usize] += 1;
        }
    }

    // Expected ~981 per card (17/52 of 3000)
    for (id, count) in top_third.iter().enumerate() {
        assert!((800..1170).contains(count), "card {id} drawn {count} times in top third");
    }
}

/// Test the canonical hand totals.
#[test]
fn test_hand_totals() {
    let blackjack = hand_of(&[Rank::Ace, Rank::King]);
    assert_eq!(blackjack.value(), 21);
    assert!(blackjack.is_blackjack());

    let soft = hand_of(&[Rank::Ace, Rank::Ace, Rank::Nine]);
    assert_eq!(soft.value(), 21);
    assert!(soft.total().is_soft);
    assert!(!soft.is_blackjack());

    let bust = hand_of(&[Rank::Ten, Rank::Ten, Rank::Five]);
    assert_eq!(bust.value(), 25);
    assert!(bust.is_bust());
}

/// Test that DOUBLED doubles a pip card and detaching it restores the value.
#[test]
fn test_doubled_tag_round_trip() {
    let registry = TagRegistry::with_builtin();
    let mut hand = hand_of(&[Rank::Four, Rank::Seven]);
    assert_eq!(hand.value(), 11);

    hand.attach_tag(0, CardTag::Doubled, &registry).unwrap();
    assert_eq!(hand.value(), 15);

    assert!(hand.detach_tag(0, CardTag::Doubled));
    assert_eq!(hand.value(), 11);
}

/// Test that DOUBLED never lifts a card past ten.
#[test]
fn test_doubled_caps_at_ten() {
    let registry = TagRegistry::with_builtin();
    let mut hand = hand_of(&[Rank::Eight, Rank::King]);
    hand.attach_tag(0, CardTag::Doubled, &registry).unwrap();
    hand.attach_tag(1, CardTag::Doubled, &registry).unwrap();
    assert_eq!(hand.value(), 20);
}

/// Test that a hidden hole card contributes no passive bonus until revealed.
#[test]
fn test_passive_tags_need_face_up_cards() {
    let registry = TagRegistry::with_builtin();
    let player = Hand::new(HandId::Player);
    let mut hole = Card::new(Rank::Six, Suit::Clubs);
    hole.face_up = false;
    let mut dealer = Hand::from_cards(HandId::Dealer, [hole, Card::new(Rank::Nine, Suit::Hearts)]);
    dealer.attach_tag(0, CardTag::Brutal, &registry).unwrap();

    let hidden = TagEngine::passive_bonuses(&registry, &[&player, &dealer]);
    assert_eq!(hidden.damage_percent, 0);

    dealer.reveal_all();
    let shown = TagEngine::passive_bonuses(&registry, &[&player, &dealer]);
    assert_eq!(shown.damage_percent, 10);
}

/// Test that removing a card out of range fails instead of clamping.
#[test]
fn test_remove_out_of_range() {
    let mut hand = hand_of(&[Rank::Two]);
    assert!(hand.remove_card(3).is_err());
    assert_eq!(hand.len(), 1);
}
