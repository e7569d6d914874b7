//! Draw and discard piles.
//!
//! A card is always in exactly one place: the draw pile, the discard pile or
//! some hand. The deck only sees the first two; the orchestrator checks the
//! three-way total against [`Deck::size`].

use serde::{Deserialize, Serialize};

use crate::core::GameRng;

use super::card::{Card, CardId};

/// Draw pile plus discard pile.
///
/// The top of the draw pile is the end of the vector.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Deck {
    draw: Vec<Card>,
    discard: Vec<Card>,
    size: usize,
}

impl Deck {
    /// Standard 52-card deck in id order (unshuffled).
    #[must_use]
    pub fn standard() -> Self {
        Self::from_cards(Card::standard_deck())
    }

    /// Deck from an explicit card list (unshuffled, last card on top).
    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        let size = cards.len();
        Self {
            draw: cards,
            discard: Vec::new(),
            size,
        }
    }

    /// Standard deck, shuffled.
    #[must_use]
    pub fn shuffled(rng: &mut GameRng) -> Self {
        let mut deck = Self::standard();
        deck.shuffle(rng);
        deck
    }

    /// Total cards owned by this deck, wherever they are.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cards left to draw.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.draw.len()
    }

    #[must_use]
    pub fn discard_count(&self) -> usize {
        self.discard.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.draw.is_empty()
    }

    /// Draw pile, bottom first.
    #[must_use]
    pub fn draw_pile(&self) -> &[Card] {
        &self.draw
    }

    /// Discard pile, oldest first.
    #[must_use]
    pub fn discard_pile(&self) -> &[Card] {
        &self.discard
    }

    /// Shuffle the draw pile (Fisher-Yates).
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.draw);
    }

    /// Take the top card. `None` when the draw pile is exhausted.
    pub fn draw(&mut self) -> Option<Card> {
        let mut card = self.draw.pop()?;
        card.face_up = true;
        Some(card)
    }

    /// Put a card on the discard pile.
    pub fn discard(&mut self, mut card: Card) {
        debug_assert!(
            !self.draw.iter().chain(self.discard.iter()).any(|c| c.id == card.id),
            "card {} discarded twice",
            card.id
        );
        card.face_up = true;
        self.discard.push(card);
    }

    /// Move the discard pile under the draw pile and shuffle everything.
    pub fn reshuffle_discard(&mut self, rng: &mut GameRng) {
        tracing::debug!(
            draw = self.draw.len(),
            discard = self.discard.len(),
            "reshuffling discard into draw pile"
        );
        self.draw.append(&mut self.discard);
        self.shuffle(rng);
    }

    /// Is this card id in either pile?
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.draw.iter().chain(self.discard.iter()).any(|c| c.id == id)
    }

    /// Cards in both piles.
    #[must_use]
    pub fn pile_total(&self) -> usize {
        self.draw.len() + self.discard.len()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_until_empty() {
        let mut deck = Deck::standard();
        let mut drawn = 0;
        while deck.draw().is_some() {
            drawn += 1;
        }
        assert_eq!(drawn, 52);
        assert!(deck.is_empty());
        assert!(deck.draw().is_none());
    }

    #[test]
    fn test_discard_and_reshuffle() {
        let mut rng = GameRng::new(5);
        let mut deck = Deck::shuffled(&mut rng);

        for _ in 0..40 {
            let card = deck.draw().unwrap();
            deck.discard(card);
        }
        assert_eq!(deck.remaining(), 12);
        assert_eq!(deck.discard_count(), 40);
        assert_eq!(deck.pile_total(), 52);

        deck.reshuffle_discard(&mut rng);
        assert_eq!(deck.remaining(), 52);
        assert_eq!(deck.discard_count(), 0);
    }

    #[test]
    fn test_drawn_card_is_face_up() {
        let mut deck = Deck::standard();
        let card = deck.draw().unwrap();
        assert!(card.face_up);
        assert!(!deck.contains(card.id));
    }

    #[test]
    fn test_custom_size() {
        let cards = Card::standard_deck().into_iter().take(10).collect();
        let deck = Deck::from_cards(cards);
        assert_eq!(deck.size(), 10);
        assert_eq!(deck.remaining(), 10);
    }
}
