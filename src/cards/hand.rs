//! Hands and Blackjack scoring.
//!
//! A hand owns its cards and a side table of tags keyed by card position.
//! Every mutation recomputes the cached total, and removing a card rewrites
//! the positions of the tags after it, so a stale index is never read.
//!
//! ## Scoring
//!
//! Each card contributes its value, after any single-card multiplier tag.
//! Multipliers only apply to pip cards 2..=9 and cap at 10. Aces count 1,
//! and one Ace is promoted to 11 when that keeps the hand at 21 or under.
//! A hand busts when even the all-Aces-low total exceeds 21.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{GameError, Result};

use super::card::Card;
use super::deck::Deck;
use super::registry::TagRegistry;
use super::tags::CardTag;

/// Which seat a hand belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandId {
    Player,
    Dealer,
}

/// A tag attached to a card position in a hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandTag {
    pub index: usize,
    pub tag: CardTag,
    /// Value multiplier resolved from the tag definition when attached.
    pub multiplier: u8,
    /// Optional numeric parameter supplied by whoever attached the tag.
    pub param: Option<i32>,
}

/// Public view of a tag occurrence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTagInstance {
    pub hand: HandId,
    pub index: usize,
    pub tag: CardTag,
    pub param: Option<i32>,
}

/// Scored hand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandTotal {
    /// Every Ace counted as 1.
    pub hard: u32,
    /// Best total: one Ace promoted to 11 when that stays at or under 21.
    pub best: u32,
    /// An Ace is currently counted as 11.
    pub is_soft: bool,
    /// Two cards totalling 21.
    pub is_blackjack: bool,
    /// Hard total over 21.
    pub is_bust: bool,
}

/// Ordered cards plus the tag side table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Hand {
    id: HandId,
    cards: Vec<Card>,
    tags: SmallVec<[HandTag; 4]>,
    total: HandTotal,
}

impl Hand {
    #[must_use]
    pub fn new(id: HandId) -> Self {
        Self {
            id,
            cards: Vec::new(),
            tags: SmallVec::new(),
            total: HandTotal::default(),
        }
    }

    /// Build a hand from cards (tests and scripted deals).
    #[must_use]
    pub fn from_cards(id: HandId, cards: impl IntoIterator<Item = Card>) -> Self {
        let mut hand = Self::new(id);
        for card in cards {
            hand.add_card(card);
        }
        hand
    }

    #[must_use]
    pub fn id(&self) -> HandId {
        self.id
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Append a card. Returns its index.
    pub fn add_card(&mut self, card: Card) -> usize {
        self.cards.push(card);
        self.recompute();
        self.cards.len() - 1
    }

    /// Remove the card at `index`, dropping its tags and shifting the rest.
    pub fn remove_card(&mut self, index: usize) -> Result<Card> {
        if index >= self.cards.len() {
            return Err(GameError::HandIndexOutOfRange {
                index,
                len: self.cards.len(),
            });
        }

        let card = self.cards.remove(index);
        self.tags.retain(|t| t.index != index);
        for tag in &mut self.tags {
            if tag.index > index {
                tag.index -= 1;
            }
        }
        self.recompute();
        Ok(card)
    }

    /// Discard every card into `deck` and drop all hand tags.
    pub fn clear(&mut self, deck: &mut Deck) {
        for card in self.cards.drain(..) {
            deck.discard(card);
        }
        self.tags.clear();
        self.total = HandTotal::default();
    }

    /// Attach a tag to a card, resolving its multiplier from `registry`.
    ///
    /// Attaching a tag the card already has is a no-op.
    pub fn attach_tag(&mut self, index: usize, tag: CardTag, registry: &TagRegistry) -> Result<()> {
        let multiplier = registry.value_multiplier(tag);
        self.attach(HandTag {
            index,
            tag,
            multiplier,
            param: None,
        })
    }

    /// Attach a fully specified tag entry.
    pub fn attach(&mut self, entry: HandTag) -> Result<()> {
        if entry.index >= self.cards.len() {
            return Err(GameError::HandIndexOutOfRange {
                index: entry.index,
                len: self.cards.len(),
            });
        }
        if self.has_tag(entry.index, entry.tag) {
            return Ok(());
        }
        self.tags.push(entry);
        self.recompute();
        Ok(())
    }

    /// Detach a tag. Returns `true` if it was present.
    pub fn detach_tag(&mut self, index: usize, tag: CardTag) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| !(t.index == index && t.tag == tag));
        let removed = self.tags.len() != before;
        if removed {
            self.recompute();
        }
        removed
    }

    #[must_use]
    pub fn has_tag(&self, index: usize, tag: CardTag) -> bool {
        self.tags.iter().any(|t| t.index == index && t.tag == tag)
    }

    /// Tags on the card at `index`, in attach order.
    pub fn tags_at(&self, index: usize) -> impl Iterator<Item = CardTag> + '_ {
        self.tags.iter().filter(move |t| t.index == index).map(|t| t.tag)
    }

    /// Every tag occurrence in this hand.
    pub fn tag_instances(&self) -> impl Iterator<Item = CardTagInstance> + '_ {
        self.tags.iter().map(move |t| CardTagInstance {
            hand: self.id,
            index: t.index,
            tag: t.tag,
            param: t.param,
        })
    }

    /// Turn every card face up.
    pub fn reveal_all(&mut self) {
        for card in &mut self.cards {
            card.face_up = true;
        }
    }

    /// Dealer upcard: the second card dealt.
    #[must_use]
    pub fn upcard(&self) -> Option<&Card> {
        self.cards.get(1)
    }

    /// Contribution of one card with Aces counted as 1.
    #[must_use]
    pub fn card_value(&self, index: usize) -> u32 {
        let Some(card) = self.cards.get(index) else {
            return 0;
        };
        if card.is_ace() {
            return 1;
        }

        let base = u32::from(card.value());
        let multiplier: u32 = self
            .tags
            .iter()
            .filter(|t| t.index == index)
            .map(|t| u32::from(t.multiplier.max(1)))
            .product();

        if multiplier > 1 && base < 10 {
            (base * multiplier).min(10)
        } else {
            base
        }
    }

    /// Score the hand from scratch.
    #[must_use]
    pub fn compute_total(&self) -> HandTotal {
        let mut hard = 0;
        let mut has_ace = false;
        for (index, card) in self.cards.iter().enumerate() {
            has_ace |= card.is_ace();
            hard += self.card_value(index);
        }

        let is_soft = has_ace && hard + 10 <= 21;
        let best = if is_soft { hard + 10 } else { hard };

        HandTotal {
            hard,
            best,
            is_soft,
            is_blackjack: self.cards.len() == 2 && best == 21,
            is_bust: hard > 21,
        }
    }

    /// Cached total.
    #[must_use]
    pub fn total(&self) -> HandTotal {
        self.total
    }

    /// Best total.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.total.best
    }

    #[must_use]
    pub fn is_bust(&self) -> bool {
        self.total.is_bust
    }

    #[must_use]
    pub fn is_blackjack(&self) -> bool {
        self.total.is_blackjack
    }

    fn recompute(&mut self) {
        self.total = self.compute_total();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    fn hand(ranks: &[Rank]) -> Hand {
        Hand::from_cards(HandId::Player, ranks.iter().map(|&r| Card::new(r, Suit::Spades)))
    }

    #[test]
    fn test_ace_king_is_blackjack() {
        let total = hand(&[Rank::Ace, Rank::King]).total();
        assert_eq!(total.best, 21);
        assert!(total.is_soft);
        assert!(total.is_blackjack);
        assert!(!total.is_bust);
    }

    #[test]
    fn test_two_aces_and_nine() {
        let total = hand(&[Rank::Ace, Rank::Ace, Rank::Nine]).total();
        assert_eq!(total.best, 21);
        assert_eq!(total.hard, 11);
        assert!(!total.is_blackjack);
    }

    #[test]
    fn test_bust() {
        let total = hand(&[Rank::Ten, Rank::Ten, Rank::Five]).total();
        assert_eq!(total.best, 25);
        assert!(total.is_bust);
    }

    #[test]
    fn test_soft_hand_goes_hard() {
        let h = hand(&[Rank::Ace, Rank::Six, Rank::Nine]);
        assert_eq!(h.value(), 16);
        assert!(!h.total().is_soft);
    }

    #[test]
    fn test_three_card_21_not_blackjack() {
        let total = hand(&[Rank::Seven, Rank::Seven, Rank::Seven]).total();
        assert_eq!(total.best, 21);
        assert!(!total.is_blackjack);
    }

    #[test]
    fn test_doubled_tag_and_removal() {
        let registry = TagRegistry::with_builtin();
        let mut h = hand(&[Rank::Four, Rank::Nine]);
        assert_eq!(h.value(), 13);

        h.attach_tag(0, CardTag::Doubled, &registry).unwrap();
        assert_eq!(h.value(), 17);

        h.remove_card(0).unwrap();
        assert_eq!(h.value(), 9);
        assert_eq!(h.tag_instances().count(), 0);
    }

    #[test]
    fn test_doubled_caps_and_skips() {
        let registry = TagRegistry::with_builtin();
        let mut h = hand(&[Rank::Seven, Rank::King, Rank::Ace]);
        for i in 0..3 {
            h.attach_tag(i, CardTag::Doubled, &registry).unwrap();
        }
        assert_eq!(h.card_value(0), 10);
        assert_eq!(h.card_value(1), 10);
        assert_eq!(h.card_value(2), 1);
    }

    #[test]
    fn test_remove_shifts_tag_indices() {
        let registry = TagRegistry::with_builtin();
        let mut h = hand(&[Rank::Two, Rank::Three, Rank::Four]);
        h.attach_tag(2, CardTag::Lucky, &registry).unwrap();

        h.remove_card(0).unwrap();
        assert!(h.has_tag(1, CardTag::Lucky));
        assert!(!h.has_tag(2, CardTag::Lucky));
    }

    #[test]
    fn test_remove_out_of_range_fails() {
        let mut h = hand(&[Rank::Two]);
        assert_eq!(
            h.remove_card(3),
            Err(GameError::HandIndexOutOfRange { index: 3, len: 1 })
        );
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn test_attach_out_of_range_fails() {
        let registry = TagRegistry::with_builtin();
        let mut h = hand(&[Rank::Two]);
        assert!(h.attach_tag(1, CardTag::Lucky, &registry).is_err());
    }

    #[test]
    fn test_clear_discards_into_deck() {
        let mut deck = Deck::standard();
        let mut h = Hand::new(HandId::Player);
        h.add_card(deck.draw().unwrap());
        h.add_card(deck.draw().unwrap());

        h.clear(&mut deck);
        assert!(h.is_empty());
        assert_eq!(deck.discard_count(), 2);
        assert_eq!(deck.pile_total(), 52);
        assert_eq!(h.total(), HandTotal::default());
    }
}
