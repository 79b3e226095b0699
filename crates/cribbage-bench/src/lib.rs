//! Head-to-head comparison of discard strategies over seeded deals.
//!
//! - `config`: YAML configuration and validation.
//! - `runner`: deals hands, runs each agent's discard search, streams JSONL rows.
//! - `analytics`: per-agent statistics and paired comparison against the baseline.
//! - `logging`: optional structured telemetry via `tracing`.

pub mod analytics;
pub mod config;
pub mod logging;
pub mod runner;
