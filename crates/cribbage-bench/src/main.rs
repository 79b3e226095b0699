use std::path::PathBuf;

use clap::Parser;

use cribbage_bench::config::{BenchmarkConfig, ResolvedOutputs};
use cribbage_bench::logging::init_logging;
use cribbage_bench::runner::ComparisonRunner;

/// Comparison harness for cribbage discard strategies.
#[derive(Debug, Parser)]
#[command(
    name = "cribbage-bench",
    author,
    version,
    about = "Deterministic discard-strategy comparison harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of hands to deal.
    #[arg(long, value_name = "HANDS")]
    hands: Option<usize>,

    /// Override the RNG seed for deal generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no hands are dealt).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(hands) = cli.hands {
        config.deals.hands = hands;
    }

    if let Some(seed) = cli.seed {
        config.deals.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let agent_count = config.agents.len();
    let run_id = config.run_id.clone();
    let hands = config.deals.hands;
    let hand_size = config.deals.hand_size;

    println!(
        "Loaded configuration '{run_id}' with {agent_count} agent{} ({hands} hands of {hand_size} cards)",
        if agent_count == 1 { "" } else { "s" }
    );

    if cli.validate_only {
        println!("Validation-only mode: no hands dealt.");
        return Ok(());
    }

    let _logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = ComparisonRunner::new(config, outputs)?;

    let summary = runner.run()?;
    println!(
        "Comparison complete for '{run_id}': {} hands → {} rows at {}",
        summary.hands_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
