mod expectation;

pub use expectation::{expected_crib_score, expected_hand_score};

use crate::strategy::Strategy;
use cribbage_core::combinatorics::{Combination, CombinationCache, CombinatoricsError, index_complement};
use cribbage_core::eval::{EvalError, HandEvaluator};
use cribbage_core::model::card::Card;
use cribbage_core::model::hand::{DealtHand, FINAL_HAND_SIZE, HandError};
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{Level, event};

/// Largest dealt hand the search accepts; it throws at most four into the crib.
pub const MAX_SEARCH_HAND_SIZE: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("no strategy was specified for scoring")]
    UnspecifiedStrategy,
    #[error("discard search supports hands of 4 to 8 cards, got {size}")]
    UnsupportedHandSize { size: usize },
    #[error("a crib cannot be seeded with {thrown} cards")]
    CribOverfilled { thrown: usize },
    #[error(transparent)]
    Hand(#[from] HandError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Combinatorics(#[from] CombinatoricsError),
}

/// Score of one keep candidate, in enumeration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateScore {
    pub keep: Combination,
    pub hand_score: f64,
    /// Only computed for strategies that look at the crib.
    pub crib_score: Option<f64>,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscardDecision {
    pub strategy: Strategy,
    pub keep: Combination,
    pub throw: Vec<usize>,
    pub score: f64,
    pub candidates: Vec<CandidateScore>,
}

impl DiscardDecision {
    /// Fails when `hand` is smaller than the hand this decision was made for.
    pub fn keep_cards(&self, hand: &DealtHand) -> Result<Vec<Card>, HandError> {
        hand.cards_at(self.keep.as_slice())
    }

    pub fn throw_cards(&self, hand: &DealtHand) -> Result<Vec<Card>, HandError> {
        hand.cards_at(&self.throw)
    }

    pub fn chosen(&self) -> Option<&CandidateScore> {
        self.candidates.iter().find(|candidate| candidate.keep == self.keep)
    }
}

/// Stateless exhaustive search over every four-card keep of a dealt hand.
///
/// Holds nothing but the combination cache, so one instance can serve any
/// number of hands (and threads).
#[derive(Debug, Clone)]
pub struct DiscardSearch {
    cache: Arc<CombinationCache>,
}

impl Default for DiscardSearch {
    fn default() -> Self {
        Self::new(CombinationCache::shared())
    }
}

impl DiscardSearch {
    pub fn new(cache: Arc<CombinationCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &CombinationCache {
        &self.cache
    }

    /// Picks the keep with the highest combined score; ties go to the earliest candidate.
    ///
    /// The hand is only read. Use [`DiscardSearch::throw_away`] to also mark it.
    pub fn select_discard<R: Rng + ?Sized>(
        &self,
        hand: &DealtHand,
        strategy: Strategy,
        rng: &mut R,
    ) -> Result<DiscardDecision, SearchError> {
        if strategy == Strategy::Invalid {
            return Err(SearchError::UnspecifiedStrategy);
        }
        let size = hand.size();
        if !(FINAL_HAND_SIZE..=MAX_SEARCH_HAND_SIZE).contains(&size) {
            return Err(SearchError::UnsupportedHandSize { size });
        }
        if strategy == Strategy::Random {
            tracing::warn!(
                target: "cribbage_bot::discard",
                hand_size = size,
                message = "random strategy selected; scores are noise"
            );
        }

        let evaluator = HandEvaluator::new(&self.cache)?;
        let keeps = self.cache.combinations(size, FINAL_HAND_SIZE)?;
        let cards = hand.cards();
        let unseen = hand.unseen_cards();

        let mut candidates = Vec::with_capacity(keeps.len());
        let mut best: Option<usize> = None;
        let mut best_score = f64::NEG_INFINITY;

        for keep in keeps.iter() {
            let kept: [Card; FINAL_HAND_SIZE] =
                std::array::from_fn(|slot| cards[keep.as_slice()[slot]]);
            let hand_score = expected_hand_score(&evaluator, &kept, &unseen)?;
            let crib_score = if strategy.requires_crib() {
                let thrown = hand.cards_except(keep.as_slice());
                Some(expected_crib_score(&evaluator, &self.cache, &thrown, &unseen)?)
            } else {
                None
            };
            let score = strategy.combine(hand_score, crib_score.unwrap_or_default(), rng)?;

            if tracing::enabled!(Level::DEBUG) {
                event!(
                    target: "cribbage_bot::discard",
                    Level::DEBUG,
                    strategy = %strategy,
                    keep = %keep,
                    hand_score,
                    crib_score = crib_score.unwrap_or(f64::NAN),
                    score,
                );
            }

            if score > best_score {
                best_score = score;
                best = Some(candidates.len());
            }
            candidates.push(CandidateScore {
                keep: keep.clone(),
                hand_score,
                crib_score,
                score,
            });
        }

        let best = best.ok_or(SearchError::UnsupportedHandSize { size })?;
        let keep = candidates[best].keep.clone();
        let throw = index_complement(size, keep.as_slice());
        let decision = DiscardDecision {
            strategy,
            keep,
            throw,
            score: best_score,
            candidates,
        };
        log_decision(hand, &decision);
        Ok(decision)
    }

    /// Selects a discard and marks the thrown cards on `hand`.
    pub fn throw_away<R: Rng + ?Sized>(
        &self,
        hand: &mut DealtHand,
        strategy: Strategy,
        rng: &mut R,
    ) -> Result<DiscardDecision, SearchError> {
        let decision = self.select_discard(hand, strategy, rng)?;
        hand.apply_keep(decision.keep.as_slice())?;
        Ok(decision)
    }
}

fn log_decision(hand: &DealtHand, decision: &DiscardDecision) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    let (Ok(keep), Ok(throw)) = (decision.keep_cards(hand), decision.throw_cards(hand)) else {
        return;
    };
    let keep: Vec<String> = keep.iter().map(ToString::to_string).collect();
    let throw: Vec<String> = throw.iter().map(ToString::to_string).collect();

    event!(
        target: "cribbage_bot::discard",
        Level::INFO,
        strategy = %decision.strategy,
        hand_size = hand.size(),
        keep = ?keep,
        throw = ?throw,
        score = decision.score,
        candidates = decision.candidates.len(),
    );
}
