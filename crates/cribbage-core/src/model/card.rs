use crate::model::face::Face;
use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NUM_SUITS: usize = 4;
pub const NUM_FACES: usize = 13;
pub const NUM_CARDS: usize = NUM_SUITS * NUM_FACES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub face: Face,
    pub suit: Suit,
}

impl Card {
    pub const fn new(face: Face, suit: Suit) -> Self {
        Self { face, suit }
    }

    /// Maps `0..52` onto the universe: thirteen faces per suit, suits in `Suit::ALL` order.
    pub const fn from_index(index: usize) -> Option<Self> {
        if index >= NUM_CARDS {
            return None;
        }
        let suit = match Suit::from_index(index / NUM_FACES) {
            Some(suit) => suit,
            None => return None,
        };
        let face = match Face::from_rank((index % NUM_FACES) as u8 + 1) {
            Some(face) => face,
            None => return None,
        };
        Some(Self::new(face, suit))
    }

    pub const fn index(self) -> usize {
        self.suit.index() * NUM_FACES + (self.face.rank() as usize - 1)
    }

    pub fn universe() -> impl Iterator<Item = Card> {
        (0..NUM_CARDS).filter_map(Card::from_index)
    }

    pub const fn value(self) -> u8 {
        self.face.value()
    }

    pub const fn is_jack(self) -> bool {
        matches!(self.face, Face::Jack)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.face, self.suit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardParseError {
    #[error("card text is empty")]
    Empty,
    #[error("unknown suit in card '{0}'")]
    Suit(String),
    #[error("unknown face in card '{0}'")]
    Face(String),
}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        let suit_symbol = text.chars().last().ok_or(CardParseError::Empty)?;
        let suit =
            Suit::from_symbol(suit_symbol).ok_or_else(|| CardParseError::Suit(text.to_string()))?;
        let face_text = &text[..text.len() - suit_symbol.len_utf8()];
        let face =
            Face::from_symbol(face_text).ok_or_else(|| CardParseError::Face(text.to_string()))?;
        Ok(Card::new(face, suit))
    }
}
