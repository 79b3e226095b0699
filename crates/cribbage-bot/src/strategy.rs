use crate::search::SearchError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Upper bound (exclusive) of the uniform noise used by [`Strategy::Random`].
pub const RANDOM_SCORE_CEILING: u32 = 29;

/// Objective the discard search maximizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Own hand only.
    IgnoreCrib,
    /// Own hand plus the crib we threw into.
    Optimize,
    /// Own hand minus the crib, for when the crib belongs to the opponent.
    Deoptimize,
    /// Uniform noise, independent of the cards.
    Random,
    /// Placeholder for "nothing chosen"; scoring with it is an error.
    Invalid,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::IgnoreCrib,
        Strategy::Optimize,
        Strategy::Deoptimize,
        Strategy::Random,
        Strategy::Invalid,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Strategy::IgnoreCrib => "ignore_crib",
            Strategy::Optimize => "optimize",
            Strategy::Deoptimize => "deoptimize",
            Strategy::Random => "random",
            Strategy::Invalid => "invalid",
        }
    }

    /// Whether the expected crib value feeds into the combined score.
    pub const fn requires_crib(self) -> bool {
        matches!(self, Strategy::Optimize | Strategy::Deoptimize)
    }

    /// Combines the two expectations for one keep candidate.
    ///
    /// `crib_score` is only read by the crib-aware arms.
    pub fn combine<R: Rng + ?Sized>(
        self,
        hand_score: f64,
        crib_score: f64,
        rng: &mut R,
    ) -> Result<f64, SearchError> {
        match self {
            Strategy::IgnoreCrib => Ok(combine_ignore(hand_score)),
            Strategy::Optimize => Ok(combine_optimize(hand_score, crib_score)),
            Strategy::Deoptimize => Ok(combine_deoptimize(hand_score, crib_score)),
            Strategy::Random => Ok(random_baseline(rng)),
            Strategy::Invalid => Err(SearchError::UnspecifiedStrategy),
        }
    }
}

pub fn combine_ignore(hand_score: f64) -> f64 {
    hand_score
}

pub fn combine_optimize(hand_score: f64, crib_score: f64) -> f64 {
    hand_score + crib_score
}

pub fn combine_deoptimize(hand_score: f64, crib_score: f64) -> f64 {
    hand_score - crib_score
}

/// Integer noise in `[0, 29)`.
pub fn random_baseline<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    f64::from(rng.gen_range(0..RANDOM_SCORE_CEILING))
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy '{0}' (expected ignore_crib, optimize, deoptimize, random or invalid)")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == normalized)
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}
