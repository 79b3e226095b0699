//! Dealt hand with throw markers.
//!
//! The hand is drawn once from the deck and never changes; only the per-card
//! "thrown" markers move. `final_hand` and `thrown_cards` are only produced once
//! exactly `size - FINAL_HAND_SIZE` cards are marked.

use crate::model::card::Card;
use crate::model::deck::{Deck, DeckError};
use std::collections::HashSet;
use thiserror::Error;

pub const DEFAULT_STARTING_HAND_SIZE: usize = 6;
pub const FINAL_HAND_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandError {
    #[error("hand index {index} is out of range for a hand of {size}")]
    IndexOutOfRange { index: usize, size: usize },
    #[error("a hand of {size} cards cannot keep four")]
    TooSmall { size: usize },
    #[error("card {0} appears more than once")]
    DuplicateCard(Card),
    #[error(transparent)]
    Deck(#[from] DeckError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealtHand {
    cards: Vec<Card>,
    thrown: Vec<bool>,
    num_thrown: usize,
}

impl DealtHand {
    pub fn deal(deck: &mut Deck) -> Result<Self, HandError> {
        Self::deal_sized(deck, DEFAULT_STARTING_HAND_SIZE)
    }

    pub fn deal_sized(deck: &mut Deck, size: usize) -> Result<Self, HandError> {
        if size < FINAL_HAND_SIZE {
            return Err(HandError::TooSmall { size });
        }
        let mut cards = Vec::with_capacity(size);
        for _ in 0..size {
            cards.push(deck.draw()?);
        }
        Self::from_cards(cards)
    }

    pub fn from_cards(cards: Vec<Card>) -> Result<Self, HandError> {
        if cards.len() < FINAL_HAND_SIZE {
            return Err(HandError::TooSmall { size: cards.len() });
        }
        let mut seen = HashSet::with_capacity(cards.len());
        if let Some(dup) = cards.iter().find(|card| !seen.insert(**card)) {
            return Err(HandError::DuplicateCard(*dup));
        }
        let size = cards.len();
        Ok(Self {
            cards,
            thrown: vec![false; size],
            num_thrown: 0,
        })
    }

    pub fn size(&self) -> usize {
        self.cards.len()
    }

    /// Number of cards that must be thrown before the hand is valid.
    pub fn throw_count(&self) -> usize {
        self.size() - FINAL_HAND_SIZE
    }

    pub fn num_thrown(&self) -> usize {
        self.num_thrown
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Result<Card, HandError> {
        self.cards
            .get(index)
            .copied()
            .ok_or(HandError::IndexOutOfRange {
                index,
                size: self.size(),
            })
    }

    pub fn cards_at(&self, indices: &[usize]) -> Result<Vec<Card>, HandError> {
        indices.iter().map(|&index| self.card(index)).collect()
    }

    /// Copies every card whose position is not listed in `indices`.
    pub fn cards_except(&self, indices: &[usize]) -> Vec<Card> {
        self.cards
            .iter()
            .enumerate()
            .filter(|(index, _)| !indices.contains(index))
            .map(|(_, card)| *card)
            .collect()
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Every card of the 52-card universe that was not dealt into this hand.
    pub fn unseen_cards(&self) -> Vec<Card> {
        Card::universe().filter(|card| !self.contains(*card)).collect()
    }

    pub fn is_thrown(&self, index: usize) -> Result<bool, HandError> {
        self.check_index(index)?;
        Ok(self.thrown[index])
    }

    pub fn is_valid(&self) -> bool {
        self.num_thrown == self.throw_count()
    }

    pub fn mark_thrown(&mut self, index: usize) -> Result<(), HandError> {
        self.check_index(index)?;
        if !self.thrown[index] {
            self.thrown[index] = true;
            self.num_thrown += 1;
        }
        Ok(())
    }

    pub fn unmark_thrown(&mut self, index: usize) -> Result<(), HandError> {
        self.check_index(index)?;
        if self.thrown[index] {
            self.thrown[index] = false;
            self.num_thrown -= 1;
        }
        Ok(())
    }

    pub fn unmark_all(&mut self) {
        self.thrown.iter_mut().for_each(|flag| *flag = false);
        self.num_thrown = 0;
    }

    /// Clears every marker, then throws each position not in `keep`.
    pub fn apply_keep(&mut self, keep: &[usize]) -> Result<(), HandError> {
        if let Some(&index) = keep.iter().find(|&&index| index >= self.size()) {
            return Err(HandError::IndexOutOfRange {
                index,
                size: self.size(),
            });
        }
        self.unmark_all();
        for index in 0..self.size() {
            if !keep.contains(&index) {
                self.mark_thrown(index)?;
            }
        }
        Ok(())
    }

    pub fn final_hand(&self) -> Option<Vec<Card>> {
        if !self.is_valid() {
            return None;
        }
        Some(self.partition(false))
    }

    pub fn thrown_cards(&self) -> Option<Vec<Card>> {
        if !self.is_valid() {
            return None;
        }
        Some(self.partition(true))
    }

    pub(crate) fn thrown_flags(&self) -> &[bool] {
        &self.thrown
    }

    fn partition(&self, thrown: bool) -> Vec<Card> {
        self.cards
            .iter()
            .zip(&self.thrown)
            .filter(|(_, flag)| **flag == thrown)
            .map(|(card, _)| *card)
            .collect()
    }

    fn check_index(&self, index: usize) -> Result<(), HandError> {
        if index < self.size() {
            Ok(())
        } else {
            Err(HandError::IndexOutOfRange {
                index,
                size: self.size(),
            })
        }
    }
}
