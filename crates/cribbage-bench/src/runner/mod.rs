mod agent;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cribbage_bot::{DiscardSearch, SearchError, Strategy};
use cribbage_core::combinatorics::{CombinationCache, CombinatoricsError};
use cribbage_core::eval::{EvalError, FULL_HAND_SIZE, HandEvaluator};
use cribbage_core::model::card::Card;
use cribbage_core::model::deck::{Deck, DeckError};
use cribbage_core::model::hand::{DealtHand, HandError};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::analytics::{AnalyticsCollector, AnalyticsError};
use crate::config::{BenchmarkConfig, ResolvedOutputs};
use crate::logging::TELEMETRY_FILE;

use agent::AgentBlueprint;

/// Deals hands and lets every configured strategy discard from each one.
pub struct ComparisonRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
    search: DiscardSearch,
    evaluator: HandEvaluator,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub hands_played: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
}

impl ComparisonRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        if config.baseline().is_none() {
            return Err(RunnerError::MissingBaseline {
                name: config.metrics.baseline.clone().unwrap_or_default(),
            });
        }

        let cache = Arc::new(CombinationCache::new());
        let evaluator = HandEvaluator::new(&cache)?;
        Ok(Self {
            agents: AgentBlueprint::from_configs(&config.agents),
            search: DiscardSearch::new(cache),
            evaluator,
            config,
            outputs,
        })
    }

    /// Execute every deal, streaming one JSONL row per agent per hand.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.deals.seed.unwrap_or(0));
        let mut rows_written = 0usize;
        let mut analytics = AnalyticsCollector::new(&self.config)?;

        for hand_index in 0..self.config.deals.hands {
            let deal_seed = rng.next_u64();
            let outcome = self.play_hand(hand_index, deal_seed)?;
            analytics.record_hand(&outcome)?;
            rows_written += write_hand_rows(&mut writer, &self.config.run_id, &outcome)?;
        }

        writer.flush()?;

        let summary = analytics.finalize()?;
        summary.write_markdown(&self.outputs.summary_md)?;

        let telemetry_path = self
            .config
            .logging
            .enable_structured
            .then(|| self.outputs.report_dir().join(TELEMETRY_FILE));

        Ok(RunSummary {
            hands_played: self.config.deals.hands,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
        })
    }

    /// Deals one hand from `deal_seed`, cuts the next card and scores every agent's keep.
    pub fn play_hand(&self, hand_index: usize, deal_seed: u64) -> Result<HandOutcome, RunnerError> {
        let mut deck = Deck::shuffled_with_seed(deal_seed);
        let hand = DealtHand::deal_sized(&mut deck, self.config.deals.hand_size)?;
        let cut = deck.draw()?;

        let mut results = Vec::with_capacity(self.agents.len());
        for agent in &self.agents {
            let decided = agent.decide(&self.search, &hand, deal_seed)?;
            let keep = decided
                .hand
                .final_hand()
                .ok_or_else(|| RunnerError::IncompleteDiscard {
                    agent: agent.name.clone(),
                })?;
            let throw = decided.hand.thrown_cards().unwrap_or_default();
            let realized_score = self.realized_score(&keep, cut)?;
            let chosen = decided.decision.chosen();

            results.push(AgentResult {
                agent_name: agent.name.clone(),
                strategy: agent.strategy,
                keep_indices: decided.decision.keep.as_slice().to_vec(),
                keep,
                throw,
                expected_score: decided.decision.score,
                expected_hand_score: chosen.map(|c| c.hand_score).unwrap_or_default(),
                expected_crib_score: chosen.and_then(|c| c.crib_score),
                realized_score,
                agrees_with_baseline: false,
                decision_ms: decided.elapsed.as_secs_f64() * 1000.0,
            });
        }

        let baseline = self.config.metrics.baseline.as_deref().unwrap_or_default();
        let baseline_keep = results
            .iter()
            .find(|result| result.agent_name == baseline)
            .map(|result| result.keep_indices.clone())
            .ok_or_else(|| RunnerError::MissingBaseline {
                name: baseline.to_string(),
            })?;
        for result in &mut results {
            result.agrees_with_baseline = result.keep_indices == baseline_keep;
        }

        if tracing::enabled!(Level::DEBUG) {
            let agreeing = results.iter().filter(|r| r.agrees_with_baseline).count();
            event!(
                target: "cribbage_bench::runner",
                Level::DEBUG,
                run_id = %self.config.run_id,
                hand_index,
                deal_seed,
                cut = %cut,
                agents = results.len(),
                agreeing,
            );
        }

        Ok(HandOutcome {
            hand_index,
            deal_seed,
            hand: hand.cards().to_vec(),
            cut,
            results,
        })
    }

    fn realized_score(&self, keep: &[Card], cut: Card) -> Result<u32, RunnerError> {
        let [a, b, c, d] = keep else {
            return Err(RunnerError::KeepSize { found: keep.len() });
        };
        let cards: [Card; FULL_HAND_SIZE] = [*a, *b, *c, *d, cut];
        Ok(self.evaluator.evaluate(&cards, FULL_HAND_SIZE - 1)?)
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn card_labels(cards: &[Card]) -> Vec<String> {
    cards.iter().map(ToString::to_string).collect()
}

fn write_hand_rows(
    writer: &mut BufWriter<File>,
    run_id: &str,
    outcome: &HandOutcome,
) -> Result<usize, RunnerError> {
    let deal_id = format!("H{:05}", outcome.hand_index);
    let hand = card_labels(&outcome.hand);

    let mut rows_written = 0usize;
    for result in &outcome.results {
        let row = DealLogRow {
            run_id,
            deal_id: &deal_id,
            hand_index: outcome.hand_index,
            deal_seed: outcome.deal_seed,
            agent: &result.agent_name,
            strategy: result.strategy,
            hand: &hand,
            cut: outcome.cut.to_string(),
            keep: card_labels(&result.keep),
            throw: card_labels(&result.throw),
            expected_score: result.expected_score,
            expected_hand_score: result.expected_hand_score,
            expected_crib_score: result.expected_crib_score,
            realized_score: result.realized_score,
            agrees_with_baseline: result.agrees_with_baseline,
            decision_ms: result.decision_ms,
        };

        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }

    Ok(rows_written)
}

/// Everything that happened to one dealt hand.
#[derive(Debug, Clone)]
pub struct HandOutcome {
    pub hand_index: usize,
    pub deal_seed: u64,
    pub hand: Vec<Card>,
    pub cut: Card,
    pub results: Vec<AgentResult>,
}

#[derive(Debug, Clone)]
pub struct AgentResult {
    pub agent_name: String,
    pub strategy: Strategy,
    pub keep_indices: Vec<usize>,
    pub keep: Vec<Card>,
    pub throw: Vec<Card>,
    pub expected_score: f64,
    pub expected_hand_score: f64,
    pub expected_crib_score: Option<f64>,
    pub realized_score: u32,
    pub agrees_with_baseline: bool,
    pub decision_ms: f64,
}

#[derive(Serialize)]
struct DealLogRow<'a> {
    run_id: &'a str,
    deal_id: &'a str,
    hand_index: usize,
    deal_seed: u64,
    agent: &'a str,
    strategy: Strategy,
    hand: &'a [String],
    cut: String,
    keep: Vec<String>,
    throw: Vec<String>,
    expected_score: f64,
    expected_hand_score: f64,
    expected_crib_score: Option<f64>,
    realized_score: u32,
    agrees_with_baseline: bool,
    decision_ms: f64,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("baseline agent '{name}' is not configured")]
    MissingBaseline { name: String },
    #[error("agent '{agent}' left its hand without a valid discard")]
    IncompleteDiscard { agent: String },
    #[error("expected four kept cards, found {found}")]
    KeepSize { found: usize },
    #[error("dealing failed: {0}")]
    Hand(#[from] HandError),
    #[error("cutting failed: {0}")]
    Deck(#[from] DeckError),
    #[error("discard search failed: {0}")]
    Search(#[from] SearchError),
    #[error("scoring failed: {0}")]
    Eval(#[from] EvalError),
    #[error("combinatorics failed: {0}")]
    Combinatorics(#[from] CombinatoricsError),
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}
