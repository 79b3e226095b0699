use core::fmt;
use serde::{Deserialize, Serialize};

/// Highest counting value; Jack, Queen and King are worth this much.
pub const FACE_CARD_VALUE: u8 = 10;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum Face {
    Ace = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
}

impl Face {
    pub const ORDERED: [Face; 13] = [
        Face::Ace,
        Face::Two,
        Face::Three,
        Face::Four,
        Face::Five,
        Face::Six,
        Face::Seven,
        Face::Eight,
        Face::Nine,
        Face::Ten,
        Face::Jack,
        Face::Queen,
        Face::King,
    ];

    pub const fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            1 => Some(Face::Ace),
            2 => Some(Face::Two),
            3 => Some(Face::Three),
            4 => Some(Face::Four),
            5 => Some(Face::Five),
            6 => Some(Face::Six),
            7 => Some(Face::Seven),
            8 => Some(Face::Eight),
            9 => Some(Face::Nine),
            10 => Some(Face::Ten),
            11 => Some(Face::Jack),
            12 => Some(Face::Queen),
            13 => Some(Face::King),
            _ => None,
        }
    }

    /// Ordinal position used for runs, Ace low.
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Counting value used for fifteens.
    pub const fn value(self) -> u8 {
        let rank = self.rank();
        if rank > FACE_CARD_VALUE {
            FACE_CARD_VALUE
        } else {
            rank
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.to_ascii_uppercase().as_str() {
            "A" | "1" => Some(Face::Ace),
            "J" => Some(Face::Jack),
            "Q" => Some(Face::Queen),
            "K" => Some(Face::King),
            "T" => Some(Face::Ten),
            digits => digits.parse::<u8>().ok().and_then(Self::from_rank),
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Face::Ace => "A",
            Face::Two => "2",
            Face::Three => "3",
            Face::Four => "4",
            Face::Five => "5",
            Face::Six => "6",
            Face::Seven => "7",
            Face::Eight => "8",
            Face::Nine => "9",
            Face::Ten => "10",
            Face::Jack => "J",
            Face::Queen => "Q",
            Face::King => "K",
        };
        f.write_str(text)
    }
}
