use std::time::{Duration, Instant};

use cribbage_bot::{DiscardDecision, DiscardSearch, SearchError, Strategy};
use cribbage_core::model::hand::DealtHand;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::AgentConfig;

/// A configured strategy plus the per-agent salt for its noise source.
pub(super) struct AgentBlueprint {
    pub(super) name: String,
    pub(super) strategy: Strategy,
    salt: u64,
}

pub(super) struct AgentDecision {
    pub(super) hand: DealtHand,
    pub(super) decision: DiscardDecision,
    pub(super) elapsed: Duration,
}

impl AgentBlueprint {
    pub(super) fn from_configs(configs: &[AgentConfig]) -> Vec<Self> {
        configs
            .iter()
            .enumerate()
            .map(|(index, config)| Self {
                name: config.name.clone(),
                strategy: config.strategy,
                salt: (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15),
            })
            .collect()
    }

    /// Runs the search on a private copy of `hand` and applies the result to that copy.
    pub(super) fn decide(
        &self,
        search: &DiscardSearch,
        hand: &DealtHand,
        deal_seed: u64,
    ) -> Result<AgentDecision, SearchError> {
        let mut own = hand.clone();
        let mut rng = StdRng::seed_from_u64(deal_seed ^ self.salt);
        let start = Instant::now();
        let decision = search.throw_away(&mut own, self.strategy, &mut rng)?;
        Ok(AgentDecision {
            hand: own,
            decision,
            elapsed: start.elapsed(),
        })
    }
}
