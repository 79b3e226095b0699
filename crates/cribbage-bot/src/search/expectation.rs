//! Exact expectations over the cards the player has not seen.

use super::SearchError;
use cribbage_core::combinatorics::CombinationCache;
use cribbage_core::eval::{EvalError, FULL_HAND_SIZE, HandEvaluator};
use cribbage_core::model::card::Card;
use cribbage_core::model::face::Face;
use cribbage_core::model::hand::FINAL_HAND_SIZE;
use cribbage_core::model::suit::Suit;

/// Mean score of `keep` over every unseen card drawn as the cut.
///
/// Each cut is weighted by `1 / unseen.len()`, which is `1 / (52 - hand size)`
/// when `unseen` is the complement of the dealt hand.
pub fn expected_hand_score(
    evaluator: &HandEvaluator,
    keep: &[Card; FINAL_HAND_SIZE],
    unseen: &[Card],
) -> Result<f64, EvalError> {
    if unseen.is_empty() {
        return Ok(0.0);
    }
    let mut cards = [keep[0], keep[1], keep[2], keep[3], keep[0]];
    let mut total = 0u32;
    for &cut in unseen {
        cards[FINAL_HAND_SIZE] = cut;
        total += evaluator.evaluate(&cards, FINAL_HAND_SIZE)?;
    }
    // Summing before dividing keeps equal hands exactly equal.
    Ok(f64::from(total) / unseen.len() as f64)
}

/// Expected value of a crib seeded with `thrown`, completed from `unseen`.
///
/// Every completion of `5 - thrown.len()` unseen cards is scored once per
/// completion slot acting as the cut. The summed points are divided by the
/// number of completions, not by the number of cut trials, so a crib with
/// three open slots reads roughly three times a single-cut mean.
pub fn expected_crib_score(
    evaluator: &HandEvaluator,
    cache: &CombinationCache,
    thrown: &[Card],
    unseen: &[Card],
) -> Result<f64, SearchError> {
    let seeded = thrown.len();
    if seeded >= FULL_HAND_SIZE {
        return Err(SearchError::CribOverfilled { thrown: seeded });
    }
    let needed = FULL_HAND_SIZE - seeded;
    let completions = cache.combinations(unseen.len(), needed)?;

    let mut crib = [Card::new(Face::Ace, Suit::Clubs); FULL_HAND_SIZE];
    crib[..seeded].copy_from_slice(thrown);

    let mut total = 0u64;
    for completion in completions.iter() {
        for (slot, index) in completion.iter().enumerate() {
            crib[seeded + slot] = unseen[index];
        }
        total += u64::from(evaluator.total_over_cuts(&crib, seeded..FULL_HAND_SIZE)?);
    }
    Ok(total as f64 / completions.len() as f64)
}
