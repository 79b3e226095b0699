pub mod search;
pub mod strategy;

pub use search::{
    CandidateScore, DiscardDecision, DiscardSearch, SearchError, expected_crib_score,
    expected_hand_score,
};
pub use strategy::{Strategy, UnknownStrategy};
