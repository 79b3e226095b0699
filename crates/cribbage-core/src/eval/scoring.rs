//! The five independent counting categories of a five-card hand.

use super::{EvalError, FULL_HAND_SIZE};
use crate::combinatorics::Combination;
use crate::model::card::{Card, NUM_FACES};

pub const FIFTEEN_TARGET: u32 = 15;
pub const FIFTEEN_POINTS: u32 = 2;
pub const PAIR_POINTS: u32 = 2;
pub const KNOBS_POINTS: u32 = 1;
pub const MIN_RUN_LENGTH: u32 = 3;

/// Two points for every subset of counting values that sums to exactly fifteen.
pub fn score_fifteens(cards: &[Card; FULL_HAND_SIZE], powerset: &[Combination]) -> u32 {
    let values = cards.map(|card| u32::from(card.value()));
    let mut total = 0;
    for subset in powerset {
        let mut sum = 0;
        for index in subset.iter() {
            sum += values[index];
            if sum > FIFTEEN_TARGET {
                break;
            }
        }
        if sum == FIFTEEN_TARGET {
            total += FIFTEEN_POINTS;
        }
    }
    total
}

/// Two points per pair of matching faces; trips and quads fall out as 6 and 12.
pub fn score_pairs(cards: &[Card; FULL_HAND_SIZE]) -> u32 {
    let mut total = 0;
    for i in 0..cards.len() {
        for j in (i + 1)..cards.len() {
            if cards[i].face == cards[j].face {
                total += PAIR_POINTS;
            }
        }
    }
    total
}

/// Length times multiplicity for the first block of three or more consecutive ranks.
///
/// The multiplicity is the product of per-rank counts, so 5-5-6-6-7 is a
/// double-double run worth 3 * 4 = 12. Five cards cannot hold two disjoint
/// runs of three, so scanning stops after the first qualifying block.
pub fn score_runs(cards: &[Card; FULL_HAND_SIZE]) -> u32 {
    let mut counts = [0u32; NUM_FACES + 1];
    for card in cards {
        counts[usize::from(card.face.rank())] += 1;
    }

    let mut length = 0;
    let mut multiplier = 1;
    for &count in &counts[1..] {
        if count == 0 {
            if length >= MIN_RUN_LENGTH {
                return length * multiplier;
            }
            length = 0;
            multiplier = 1;
        } else {
            length += 1;
            multiplier *= count;
        }
    }

    if length >= MIN_RUN_LENGTH {
        length * multiplier
    } else {
        0
    }
}

fn cut_card(cards: &[Card; FULL_HAND_SIZE], cut_index: usize) -> Result<Card, EvalError> {
    cards
        .get(cut_index)
        .copied()
        .ok_or(EvalError::CutIndexOutOfRange { index: cut_index })
}

/// One point for a jack in hand matching the cut card's suit. A cut jack never scores knobs.
pub fn score_knobs(cards: &[Card; FULL_HAND_SIZE], cut_index: usize) -> Result<u32, EvalError> {
    let cut = cut_card(cards, cut_index)?;
    if cut.is_jack() {
        return Ok(0);
    }
    let matched = cards
        .iter()
        .any(|card| card.is_jack() && card.suit == cut.suit);
    Ok(if matched { KNOBS_POINTS } else { 0 })
}

/// Four when every non-cut card shares a suit, five when the cut matches as well.
pub fn score_flush(cards: &[Card; FULL_HAND_SIZE], cut_index: usize) -> Result<u32, EvalError> {
    let cut = cut_card(cards, cut_index)?;
    let reference = cards[if cut_index != 0 { 0 } else { 1 }].suit;
    let uniform = cards
        .iter()
        .enumerate()
        .all(|(index, card)| index == cut_index || card.suit == reference);
    if !uniform {
        return Ok(0);
    }
    Ok(if cut.suit == reference {
        FULL_HAND_SIZE as u32
    } else {
        FULL_HAND_SIZE as u32 - 1
    })
}
