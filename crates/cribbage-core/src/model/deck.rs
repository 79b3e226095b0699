use crate::model::card::Card;
use core::fmt;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("deck exhausted after {drawn} draws")]
    Exhausted { drawn: usize },
}

/// 52 distinct cards plus a stack-style draw cursor.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    top: usize,
}

impl Deck {
    pub fn standard() -> Self {
        Self {
            cards: Card::universe().collect(),
            top: 0,
        }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    /// Shuffles every card back into play and resets the cursor to the top.
    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.top = 0;
    }

    pub fn draw(&mut self) -> Result<Card, DeckError> {
        let card = self
            .cards
            .get(self.top)
            .copied()
            .ok_or(DeckError::Exhausted { drawn: self.top })?;
        self.top += 1;
        Ok(card)
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.top
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for card in &self.cards {
            writeln!(f, "{card}")?;
        }
        Ok(())
    }
}
