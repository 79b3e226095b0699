//! YAML description of a comparison run: which deals, which strategies, and
//! where the rows and summary go.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use cribbage_bot::Strategy;
use cribbage_bot::search::MAX_SEARCH_HAND_SIZE;
use cribbage_core::model::hand::{DEFAULT_STARTING_HAND_SIZE, FINAL_HAND_SIZE};
use serde::Deserialize;
use thiserror::Error;
use tracing::Level;

use crate::logging::TELEMETRY_FILE;

const DEFAULT_LATENCY_BUDGET_MS: u64 = 2_000;
const RUN_ID_TOKEN: &str = "{run_id}";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    pub run_id: String,
    pub deals: DealConfig,
    pub agents: Vec<AgentConfig>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DealConfig {
    /// Seed for the stream of per-hand deal seeds; absent means 0.
    pub seed: Option<u64>,
    pub hands: usize,
    #[serde(default = "default_hand_size")]
    pub hand_size: usize,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AgentConfig {
    pub name: String,
    pub strategy: Strategy,
}

/// Output paths; `{run_id}` is substituted wherever it appears.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MetricsConfig {
    /// Agent whose keeps and realized points every other agent is paired with.
    #[serde(default)]
    pub baseline: Option<String>,
    #[serde(default = "default_latency_budget_ms")]
    pub latency_budget_ms: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

fn default_hand_size() -> usize {
    DEFAULT_STARTING_HAND_SIZE
}

fn default_latency_budget_ms() -> u64 {
    DEFAULT_LATENCY_BUDGET_MS
}

fn default_tracing_level() -> String {
    "info".to_string()
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            baseline: None,
            latency_budget_ms: DEFAULT_LATENCY_BUDGET_MS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    /// Falls back to INFO for a level that `validate` would reject.
    pub fn level(&self) -> Level {
        Level::from_str(self.tracing_level.trim()).unwrap_or(Level::INFO)
    }
}

impl BenchmarkConfig {
    /// Reads, parses and validates a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: BenchmarkConfig =
            serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(cfg)
    }

    /// Checks the run can be executed as described. Reports the first problem found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_name("run_id", &self.run_id)?;
        self.check_deals()?;
        self.check_agents()?;
        self.check_baseline()?;
        self.check_outputs()?;
        if Level::from_str(self.logging.tracing_level.trim()).is_err() {
            return Err(ValidationError::UnknownLevel {
                level: self.logging.tracing_level.clone(),
            });
        }
        Ok(())
    }

    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        let resolve = |template: &str| PathBuf::from(template.replace(RUN_ID_TOKEN, &self.run_id));
        ResolvedOutputs {
            jsonl: resolve(&self.outputs.jsonl),
            summary_md: resolve(&self.outputs.summary_md),
        }
    }

    pub fn baseline(&self) -> Option<&AgentConfig> {
        let name = self.metrics.baseline.as_deref()?;
        self.agents.iter().find(|agent| agent.name == name)
    }

    fn check_deals(&self) -> Result<(), ValidationError> {
        let deals = &self.deals;
        if deals.hands == 0 {
            return Err(ValidationError::NoHands);
        }
        if !(FINAL_HAND_SIZE..=MAX_SEARCH_HAND_SIZE).contains(&deals.hand_size) {
            return Err(ValidationError::HandSize {
                size: deals.hand_size,
                min: FINAL_HAND_SIZE,
                max: MAX_SEARCH_HAND_SIZE,
            });
        }
        Ok(())
    }

    fn check_agents(&self) -> Result<(), ValidationError> {
        if self.agents.is_empty() {
            return Err(ValidationError::NoAgents);
        }

        for (position, agent) in self.agents.iter().enumerate() {
            check_name("agents.name", &agent.name)?;
            if self.agents[..position]
                .iter()
                .any(|earlier| earlier.name == agent.name)
            {
                return Err(ValidationError::DuplicateAgent {
                    name: agent.name.clone(),
                });
            }
            if agent.strategy == Strategy::Invalid {
                return Err(ValidationError::UnusableStrategy {
                    agent: agent.name.clone(),
                });
            }
        }

        // Random keeps carry no signal, so at least one agent has to search.
        if self
            .agents
            .iter()
            .all(|agent| agent.strategy == Strategy::Random)
        {
            return Err(ValidationError::OnlyRandomAgents);
        }
        Ok(())
    }

    fn check_baseline(&self) -> Result<(), ValidationError> {
        let name = self
            .metrics
            .baseline
            .as_deref()
            .ok_or(ValidationError::MissingBaseline)?;
        if self.baseline().is_none() {
            return Err(ValidationError::UnknownBaseline {
                name: name.to_string(),
            });
        }
        if self.metrics.latency_budget_ms == 0 {
            return Err(ValidationError::ZeroLatencyBudget);
        }
        Ok(())
    }

    fn check_outputs(&self) -> Result<(), ValidationError> {
        if self.outputs.jsonl.trim().is_empty() {
            return Err(ValidationError::EmptyPath {
                field: "outputs.jsonl",
            });
        }
        if self.outputs.summary_md.trim().is_empty() {
            return Err(ValidationError::EmptyPath {
                field: "outputs.summary_md",
            });
        }

        let resolved = self.resolved_outputs();
        if resolved.jsonl == resolved.summary_md {
            return Err(ValidationError::OutputsCollide {
                path: resolved.jsonl,
            });
        }
        if self.logging.enable_structured {
            let telemetry = resolved.report_dir().join(TELEMETRY_FILE);
            if let Some(clash) = [&resolved.jsonl, &resolved.summary_md]
                .into_iter()
                .find(|path| **path == telemetry)
            {
                return Err(ValidationError::OutputsCollide {
                    path: clash.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Run ids and agent names end up in file paths and log fields.
fn check_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyName { field });
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(ValidationError::BadName {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

impl ResolvedOutputs {
    /// Directory that receives the summary and, when enabled, `telemetry.jsonl`.
    pub fn report_dir(&self) -> PathBuf {
        self.summary_md
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not a valid comparison config: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("{}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyName { field: &'static str },
    #[error("{field} '{value}' may only use ASCII letters, digits, '.', '_' and '-'")]
    BadName { field: &'static str, value: String },
    #[error("deals.hands must be at least 1")]
    NoHands,
    #[error("deals.hand_size {size} is outside the searchable range {min}..={max}")]
    HandSize { size: usize, min: usize, max: usize },
    #[error("no agents configured")]
    NoAgents,
    #[error("agent '{name}' is configured more than once")]
    DuplicateAgent { name: String },
    #[error("agent '{agent}': strategy 'invalid' cannot be used to score hands")]
    UnusableStrategy { agent: String },
    #[error("every agent uses the random strategy; add one that searches")]
    OnlyRandomAgents,
    #[error("metrics.baseline must name the agent to compare against")]
    MissingBaseline,
    #[error("metrics.baseline '{name}' is not one of the configured agents")]
    UnknownBaseline { name: String },
    #[error("metrics.latency_budget_ms must be greater than zero")]
    ZeroLatencyBudget,
    #[error("{field} must not be empty")]
    EmptyPath { field: &'static str },
    #[error("two outputs resolve to {}", path.display())]
    OutputsCollide { path: PathBuf },
    #[error("logging.tracing_level '{level}' is not a tracing level")]
    UnknownLevel { level: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(name: &str, strategy: Strategy) -> AgentConfig {
        AgentConfig {
            name: name.to_string(),
            strategy,
        }
    }

    fn sample() -> BenchmarkConfig {
        BenchmarkConfig {
            run_id: "unit".to_string(),
            deals: DealConfig {
                seed: Some(5),
                hands: 10,
                hand_size: DEFAULT_STARTING_HAND_SIZE,
            },
            agents: vec![
                agent("hand_only", Strategy::IgnoreCrib),
                agent("noise", Strategy::Random),
            ],
            outputs: OutputsConfig {
                jsonl: "out/{run_id}/deals.jsonl".to_string(),
                summary_md: "out/{run_id}/summary.md".to_string(),
            },
            metrics: MetricsConfig {
                baseline: Some("hand_only".to_string()),
                ..MetricsConfig::default()
            },
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn yaml_defaults_fill_optional_blocks() {
        let cfg: BenchmarkConfig = serde_yaml::from_str(
            r#"
run_id: "stage0"
deals:
  hands: 16
agents:
  - name: "hand_only"
    strategy: "ignore_crib"
  - name: "dealer"
    strategy: "optimize"
outputs:
  jsonl: "bench/out/{run_id}/deals.jsonl"
  summary_md: "bench/out/{run_id}/{run_id}.md"
metrics:
  baseline: "hand_only"
"#,
        )
        .unwrap();
        cfg.validate().unwrap();

        assert_eq!(cfg.deals.seed, None);
        assert_eq!(cfg.deals.hand_size, DEFAULT_STARTING_HAND_SIZE);
        assert_eq!(cfg.metrics.latency_budget_ms, DEFAULT_LATENCY_BUDGET_MS);
        assert!(!cfg.logging.enable_structured);
        assert_eq!(cfg.logging.level(), Level::INFO);
        assert_eq!(cfg.baseline().map(|a| a.strategy), Some(Strategy::IgnoreCrib));

        let outputs = cfg.resolved_outputs();
        assert_eq!(outputs.summary_md, PathBuf::from("bench/out/stage0/stage0.md"));
        assert_eq!(outputs.report_dir(), PathBuf::from("bench/out/stage0"));
    }

    #[test]
    fn unknown_strategy_names_fail_to_parse() {
        let yaml = "name: \"x\"\nstrategy: \"greedy\"\n";
        assert!(serde_yaml::from_str::<AgentConfig>(yaml).is_err());
        let yaml = "name: \"x\"\nstrategy: \"ignore-crib\"\n";
        assert!(serde_yaml::from_str::<AgentConfig>(yaml).is_err());
    }

    #[test]
    fn deals_must_be_playable() {
        let mut cfg = sample();
        cfg.deals.hands = 0;
        assert_eq!(cfg.validate(), Err(ValidationError::NoHands));

        for size in [3, MAX_SEARCH_HAND_SIZE + 1] {
            let mut cfg = sample();
            cfg.deals.hand_size = size;
            assert!(matches!(
                cfg.validate(),
                Err(ValidationError::HandSize { size: s, .. }) if s == size
            ));
        }

        let mut cfg = sample();
        cfg.deals.hand_size = FINAL_HAND_SIZE;
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn roster_needs_a_searching_agent() {
        let mut cfg = sample();
        cfg.agents = vec![agent("a", Strategy::Random), agent("b", Strategy::Random)];
        cfg.metrics.baseline = Some("a".to_string());
        assert_eq!(cfg.validate(), Err(ValidationError::OnlyRandomAgents));

        cfg.agents[1].strategy = Strategy::Deoptimize;
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn roster_rejects_invalid_strategy_and_duplicates() {
        let mut cfg = sample();
        cfg.agents[1].strategy = Strategy::Invalid;
        let err = cfg.validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnusableStrategy {
                agent: "noise".to_string()
            }
        );
        assert!(err.to_string().contains("strategy 'invalid' cannot be used"));

        let mut cfg = sample();
        cfg.agents[1].name = "hand_only".to_string();
        assert!(matches!(
            cfg.validate(),
            Err(ValidationError::DuplicateAgent { name }) if name == "hand_only"
        ));

        let mut cfg = sample();
        cfg.agents.clear();
        assert_eq!(cfg.validate(), Err(ValidationError::NoAgents));
    }

    #[test]
    fn baseline_must_be_a_configured_agent() {
        let mut cfg = sample();
        cfg.metrics.baseline = None;
        assert_eq!(cfg.validate(), Err(ValidationError::MissingBaseline));

        cfg.metrics.baseline = Some("dealer".to_string());
        assert!(matches!(
            cfg.validate(),
            Err(ValidationError::UnknownBaseline { name }) if name == "dealer"
        ));

        let mut cfg = sample();
        cfg.metrics.latency_budget_ms = 0;
        assert_eq!(cfg.validate(), Err(ValidationError::ZeroLatencyBudget));
    }

    #[test]
    fn names_are_path_safe() {
        let mut cfg = sample();
        cfg.run_id = "stage 0".to_string();
        assert!(matches!(
            cfg.validate(),
            Err(ValidationError::BadName { field: "run_id", .. })
        ));

        let mut cfg = sample();
        cfg.run_id.clear();
        assert_eq!(
            cfg.validate(),
            Err(ValidationError::EmptyName { field: "run_id" })
        );

        let mut cfg = sample();
        cfg.agents[0].name = "../up".to_string();
        assert!(matches!(
            cfg.validate(),
            Err(ValidationError::BadName { field: "agents.name", .. })
        ));
    }

    #[test]
    fn outputs_must_not_overwrite_each_other() {
        let mut cfg = sample();
        cfg.outputs.summary_md = "  ".to_string();
        assert_eq!(
            cfg.validate(),
            Err(ValidationError::EmptyPath {
                field: "outputs.summary_md"
            })
        );

        let mut cfg = sample();
        cfg.outputs.summary_md = "out/unit/deals.jsonl".to_string();
        assert_eq!(
            cfg.validate(),
            Err(ValidationError::OutputsCollide {
                path: PathBuf::from("out/unit/deals.jsonl")
            })
        );

        let mut cfg = sample();
        cfg.outputs.jsonl = "out/{run_id}/telemetry.jsonl".to_string();
        assert_eq!(cfg.validate(), Ok(()));
        cfg.logging.enable_structured = true;
        assert_eq!(
            cfg.validate(),
            Err(ValidationError::OutputsCollide {
                path: PathBuf::from("out/unit/telemetry.jsonl")
            })
        );
    }

    #[test]
    fn tracing_level_is_parsed_case_insensitively() {
        let mut cfg = sample();
        cfg.logging.tracing_level = "DEBUG".to_string();
        assert_eq!(cfg.validate(), Ok(()));
        assert_eq!(cfg.logging.level(), Level::DEBUG);

        cfg.logging.tracing_level = "chatty".to_string();
        assert!(matches!(
            cfg.validate(),
            Err(ValidationError::UnknownLevel { level }) if level == "chatty"
        ));
        assert_eq!(cfg.logging.level(), Level::INFO);
    }
}
