use std::collections::HashMap;
use std::fs;
use std::path::Path;

use cribbage_bot::Strategy;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::config::BenchmarkConfig;
use crate::runner::{AgentResult, HandOutcome};

const CONFIDENCE_Z: f64 = 1.96; // 95% CI

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("baseline agent '{0}' not present in run results")]
    MissingBaseline(String),
    #[error("agent '{0}' defined in results but missing from configuration")]
    UnknownAgent(String),
    #[error("baseline '{0}' missing for hand {1}")]
    MissingBaselineHand(String, usize),
    #[error("normal distribution unavailable: {0}")]
    Distribution(String),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

pub struct AnalyticsCollector {
    baseline: String,
    agents: HashMap<String, AgentAccumulator>,
    comparisons: HashMap<String, ComparisonAccumulator>,
    agent_order: Vec<String>,
    latency_budget_ms: u64,
}

impl AnalyticsCollector {
    pub fn new(config: &BenchmarkConfig) -> Result<Self, AnalyticsError> {
        let baseline = config
            .metrics
            .baseline
            .clone()
            .ok_or_else(|| AnalyticsError::MissingBaseline("<unset>".into()))?;

        let mut agents = HashMap::new();
        let mut order = Vec::new();
        for agent in &config.agents {
            agents.insert(
                agent.name.clone(),
                AgentAccumulator::new(agent.name.clone(), agent.strategy),
            );
            order.push(agent.name.clone());
        }

        if !agents.contains_key(&baseline) {
            return Err(AnalyticsError::MissingBaseline(baseline));
        }

        Ok(Self {
            baseline,
            agents,
            comparisons: HashMap::new(),
            agent_order: order,
            latency_budget_ms: config.metrics.latency_budget_ms,
        })
    }

    pub fn record_hand(&mut self, outcome: &HandOutcome) -> Result<(), AnalyticsError> {
        let baseline_points = outcome
            .results
            .iter()
            .find(|result| result.agent_name == self.baseline)
            .map(|result| f64::from(result.realized_score))
            .ok_or_else(|| {
                AnalyticsError::MissingBaselineHand(self.baseline.clone(), outcome.hand_index)
            })?;

        for result in &outcome.results {
            let acc = self
                .agents
                .get_mut(&result.agent_name)
                .ok_or_else(|| AnalyticsError::UnknownAgent(result.agent_name.clone()))?;
            acc.record_hand(result);

            if result.agent_name != self.baseline {
                self.comparisons
                    .entry(result.agent_name.clone())
                    .or_default()
                    .record(f64::from(result.realized_score) - baseline_points);
            }
        }

        Ok(())
    }

    pub fn finalize(mut self) -> Result<AnalyticsSummary, AnalyticsError> {
        let standard_normal =
            Normal::new(0.0, 1.0).map_err(|e| AnalyticsError::Distribution(e.to_string()))?;

        let mut reports = Vec::new();
        for name in &self.agent_order {
            if let Some(acc) = self.agents.remove(name) {
                reports.push(acc.into_report(self.latency_budget_ms));
            }
        }

        let mut comparisons = Vec::new();
        for report in &reports {
            let comparison = if report.name == self.baseline {
                ComparisonReport::identity(&report.name, report.hands)
            } else {
                self.comparisons
                    .remove(&report.name)
                    .unwrap_or_default()
                    .paired_z_test(&report.name, &standard_normal)
            };
            comparisons.push(comparison);
        }

        Ok(AnalyticsSummary {
            baseline: self.baseline,
            agents: reports,
            comparisons,
            latency_budget_ms: self.latency_budget_ms,
        }
        .enrich())
    }
}

struct AgentAccumulator {
    name: String,
    strategy: Strategy,
    realized: Vec<f64>,
    expected_hand: Vec<f64>,
    strategy_score: Vec<f64>,
    agreements: u32,
    total_latency_ms: f64,
}

impl AgentAccumulator {
    fn new(name: String, strategy: Strategy) -> Self {
        Self {
            name,
            strategy,
            realized: Vec::new(),
            expected_hand: Vec::new(),
            strategy_score: Vec::new(),
            agreements: 0,
            total_latency_ms: 0.0,
        }
    }

    fn record_hand(&mut self, result: &AgentResult) {
        self.realized.push(f64::from(result.realized_score));
        self.expected_hand.push(result.expected_hand_score);
        self.strategy_score.push(result.expected_score);
        if result.agrees_with_baseline {
            self.agreements += 1;
        }
        self.total_latency_ms += result.decision_ms;
    }

    fn into_report(self, latency_budget_ms: u64) -> AgentReport {
        let hands = self.realized.len();
        let (mean_realized, stddev_realized) = mean_and_stddev(&self.realized);
        let (mean_expected_hand, stddev_expected_hand) = mean_and_stddev(&self.expected_hand);
        let (mean_strategy_score, _) = mean_and_stddev(&self.strategy_score);
        let (agreement_rate, avg_latency) = if hands == 0 {
            (0.0, 0.0)
        } else {
            (
                f64::from(self.agreements) / hands as f64,
                self.total_latency_ms / hands as f64,
            )
        };

        AgentReport {
            name: self.name,
            strategy: self.strategy,
            hands,
            mean_realized,
            stddev_realized,
            ci95: confidence_interval(&self.realized),
            mean_expected_hand,
            stddev_expected_hand,
            mean_strategy_score,
            agreement_rate,
            average_ms_per_decision: avg_latency,
            delta_vs_baseline: 0.0, // Filled by `enrich` once the baseline is known.
            over_budget: avg_latency > latency_budget_ms as f64,
        }
    }
}

/// Per-hand realized score differences against the baseline.
#[derive(Clone, Default)]
struct ComparisonAccumulator {
    diffs: Vec<f64>,
}

impl ComparisonAccumulator {
    fn record(&mut self, diff: f64) {
        self.diffs.push(diff);
    }

    /// Two-sided test of a zero mean difference using the normal approximation.
    fn paired_z_test(self, agent: &str, normal: &Normal) -> ComparisonReport {
        let n = self.diffs.len();
        let (mean, stddev) = mean_and_stddev(&self.diffs);
        if n < 2 {
            return ComparisonReport {
                agent: agent.to_string(),
                mean_diff: mean,
                ci95: (mean, mean),
                p_value: 1.0,
                sample_size: n,
            };
        }

        let std_error = stddev / (n as f64).sqrt();
        let p_value = if std_error <= f64::EPSILON {
            if mean.abs() <= f64::EPSILON { 1.0 } else { 0.0 }
        } else {
            let z = (mean / std_error).abs();
            (2.0 * (1.0 - normal.cdf(z))).clamp(0.0, 1.0)
        };
        let margin = CONFIDENCE_Z * std_error;

        ComparisonReport {
            agent: agent.to_string(),
            mean_diff: mean,
            ci95: (mean - margin, mean + margin),
            p_value,
            sample_size: n,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub baseline: String,
    pub agents: Vec<AgentReport>,
    pub comparisons: Vec<ComparisonReport>,
    pub latency_budget_ms: u64,
}

impl AnalyticsSummary {
    pub fn enrich(mut self) -> Self {
        let baseline_avg = self
            .agents
            .iter()
            .find(|agent| agent.name == self.baseline)
            .map(|agent| agent.mean_realized)
            .unwrap_or(0.0);

        for agent in &mut self.agents {
            agent.delta_vs_baseline = agent.mean_realized - baseline_avg;
        }

        self
    }

    pub fn comparison(&self, agent: &str) -> Option<&ComparisonReport> {
        self.comparisons.iter().find(|c| c.agent == agent)
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        let mut rows = String::new();
        rows.push_str("# Discard Strategy Summary\n\n");
        rows.push_str(&format!(
            "Baseline: `{}`. Latency budget: {} ms average per decision.\n\n",
            self.baseline, self.latency_budget_ms
        ));
        rows.push_str("| Agent | Strategy | Hands | Mean hand | Std dev | Δ vs baseline | 95% CI | Expected hand | Strategy score | Agreement % | Avg ms/decision | Over Budget |\n");
        rows.push_str("|-------|----------|-------|-----------|---------|----------------|--------|---------------|----------------|-------------|-----------------|-------------|\n");

        for agent in &self.agents {
            rows.push_str(&format!(
                "| {name} | {strategy} | {hands} | {mean:.3} | {sd:.3} | {delta:+.3} | [{ci_low:.3}, {ci_high:.3}] | {expected:.3} | {strategy_score:.3} | {agree:.1}% | {latency:.2} | {over_budget} |\n",
                name = agent.name,
                strategy = agent.strategy,
                hands = agent.hands,
                mean = agent.mean_realized,
                sd = agent.stddev_realized,
                delta = agent.delta_vs_baseline,
                ci_low = agent.ci95.0,
                ci_high = agent.ci95.1,
                expected = agent.mean_expected_hand,
                strategy_score = agent.mean_strategy_score,
                agree = agent.agreement_rate * 100.0,
                latency = agent.average_ms_per_decision,
                over_budget = if agent.over_budget { "Yes" } else { "No" },
            ));
        }

        rows.push_str("\n## Paired difference vs baseline\n\n");
        rows.push_str("| Agent | Mean diff | 95% CI | p-value | n |\n");
        rows.push_str("|-------|-----------|--------|---------|---|\n");
        for comparison in &self.comparisons {
            rows.push_str(&format!(
                "| {agent} | {mean:+.3} | [{low:.3}, {high:.3}] | {p:.3} | {n} |\n",
                agent = comparison.agent,
                mean = comparison.mean_diff,
                low = comparison.ci95.0,
                high = comparison.ci95.1,
                p = comparison.p_value,
                n = comparison.sample_size,
            ));
        }

        fs::write(path.as_ref(), rows).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    pub name: String,
    pub strategy: Strategy,
    pub hands: usize,
    pub mean_realized: f64,
    pub stddev_realized: f64,
    pub ci95: (f64, f64),
    /// Expected points of the kept four over every cut; comparable across strategies.
    pub mean_expected_hand: f64,
    pub stddev_expected_hand: f64,
    /// Mean of the score each strategy maximized. Crib-aware strategies fold
    /// in the crib term and Random is noise, so this only ranks within one agent.
    pub mean_strategy_score: f64,
    pub agreement_rate: f64,
    pub average_ms_per_decision: f64,
    #[serde(skip)]
    pub delta_vs_baseline: f64,
    #[serde(skip)]
    pub over_budget: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub agent: String,
    pub mean_diff: f64,
    pub ci95: (f64, f64),
    pub p_value: f64,
    pub sample_size: usize,
}

impl ComparisonReport {
    fn identity(agent: &str, sample_size: usize) -> Self {
        Self {
            agent: agent.to_string(),
            mean_diff: 0.0,
            ci95: (0.0, 0.0),
            p_value: 1.0,
            sample_size,
        }
    }
}

/// Mean and sample standard deviation; the deviation is zero below two samples.
fn mean_and_stddev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if values.len() == 1 {
        return (mean, 0.0);
    }
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (values.len() as f64 - 1.0);
    (mean, variance.sqrt())
}

fn confidence_interval(points: &[f64]) -> (f64, f64) {
    let (mean, stddev) = mean_and_stddev(points);
    if points.len() < 2 {
        return (mean, mean);
    }
    let margin = CONFIDENCE_Z * stddev / (points.len() as f64).sqrt();
    (mean - margin, mean + margin)
}
