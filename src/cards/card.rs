//! Playing card value type.

use serde::{Deserialize, Serialize};

/// Card suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    /// All suits in deck order.
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    /// Position in deck order.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// Card rank. Discriminants are the printed pip values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Ace = 1,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    /// All ranks, Ace first.
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Blackjack value. Aces count 11 here; hand scoring softens them.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Rank::Ace => 11,
            Rank::Jack | Rank::Queen | Rank::King => 10,
            other => other as u8,
        }
    }

    /// Rank from a pip number (1..=13).
    #[must_use]
    pub fn from_number(n: u8) -> Option<Rank> {
        Rank::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }
}

/// Stable identity of a physical card in a 52-card deck.
///
/// Suit-major: Hearts are 0..13, Diamonds 13..26, and so on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u8);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// A playing card. Cheap to copy; tags live in side tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub rank: Rank,
    pub suit: Suit,
    pub face_up: bool,
}

impl Card {
    /// Create a face-up card. The id is derived from rank and suit.
    #[must_use]
    pub fn new(rank: Rank, suit: Suit) -> Self {
        let id = suit.index() * 13 + (rank as u8 - 1);
        Self {
            id: CardId::new(id),
            rank,
            suit,
            face_up: true,
        }
    }

    /// Rebuild a card from its deck id.
    #[must_use]
    pub fn from_id(id: CardId) -> Option<Self> {
        let suit = *Suit::ALL.get(usize::from(id.raw() / 13))?;
        let rank = Rank::from_number(id.raw() % 13 + 1)?;
        Some(Self::new(rank, suit))
    }

    /// Blackjack value with Aces as 11.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.rank.value()
    }

    #[must_use]
    pub const fn is_ace(&self) -> bool {
        matches!(self.rank, Rank::Ace)
    }

    /// The 52 cards in id order.
    #[must_use]
    pub fn standard_deck() -> Vec<Card> {
        Suit::ALL
            .iter()
            .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card::new(rank, suit)))
            .collect()
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} of {:?}", self.rank, self.suit)
    }
}
