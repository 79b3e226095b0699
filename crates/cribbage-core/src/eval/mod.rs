//! Deterministic point count for four cards plus a designated cut card.

pub mod scoring;

use crate::combinatorics::{Combination, CombinationCache, CombinatoricsError};
use crate::model::card::Card;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

pub use scoring::{score_fifteens, score_flush, score_knobs, score_pairs, score_runs};

/// Kept cards plus the cut.
pub const FULL_HAND_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("cut index {index} is out of range for a five-card hand")]
    CutIndexOutOfRange { index: usize },
    #[error(transparent)]
    Combinatorics(#[from] CombinatoricsError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub fifteens: u32,
    pub pairs: u32,
    pub runs: u32,
    pub knobs: u32,
    pub flush: u32,
    pub total: u32,
}

/// Scores five-card hands against a powerset fetched once from a cache.
#[derive(Debug, Clone)]
pub struct HandEvaluator {
    powerset: Arc<[Combination]>,
}

impl HandEvaluator {
    pub fn new(cache: &CombinationCache) -> Result<Self, CombinatoricsError> {
        Ok(Self {
            powerset: cache.powerset(FULL_HAND_SIZE)?,
        })
    }

    pub fn evaluate(
        &self,
        cards: &[Card; FULL_HAND_SIZE],
        cut_index: usize,
    ) -> Result<u32, EvalError> {
        self.breakdown(cards, cut_index).map(|score| score.total)
    }

    pub fn breakdown(
        &self,
        cards: &[Card; FULL_HAND_SIZE],
        cut_index: usize,
    ) -> Result<ScoreBreakdown, EvalError> {
        if cut_index >= FULL_HAND_SIZE {
            return Err(EvalError::CutIndexOutOfRange { index: cut_index });
        }

        let fifteens = score_fifteens(cards, &self.powerset);
        let pairs = score_pairs(cards);
        let runs = score_runs(cards);
        let knobs = score_knobs(cards, cut_index)?;
        let flush = score_flush(cards, cut_index)?;

        Ok(ScoreBreakdown {
            fifteens,
            pairs,
            runs,
            knobs,
            flush,
            total: fifteens + pairs + runs + knobs + flush,
        })
    }

    /// Sum of the hand's score with each of `cut_indices` designated as the cut in turn.
    ///
    /// Fifteens, pairs and runs do not depend on the cut, so they are counted
    /// once and multiplied.
    pub fn total_over_cuts(
        &self,
        cards: &[Card; FULL_HAND_SIZE],
        cut_indices: std::ops::Range<usize>,
    ) -> Result<u32, EvalError> {
        if cut_indices.end > FULL_HAND_SIZE {
            return Err(EvalError::CutIndexOutOfRange {
                index: cut_indices.end - 1,
            });
        }
        let trials = cut_indices.len() as u32;
        let fixed = score_fifteens(cards, &self.powerset) + score_pairs(cards) + score_runs(cards);
        let mut total = fixed * trials;
        for cut_index in cut_indices {
            total += score_knobs(cards, cut_index)? + score_flush(cards, cut_index)?;
        }
        Ok(total)
    }
}

/// Scores a hand using the process-wide combination cache.
pub fn evaluate(cards: &[Card; FULL_HAND_SIZE], cut_index: usize) -> Result<u32, EvalError> {
    HandEvaluator::new(CombinationCache::global())?.evaluate(cards, cut_index)
}
