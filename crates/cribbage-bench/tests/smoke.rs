use std::fs;
use std::path::Path;

use cribbage_bench::config::BenchmarkConfig;
use cribbage_bench::runner::ComparisonRunner;
use sha2::{Digest, Sha256};
use tempfile::tempdir;

fn load_config(output_dir: &Path) -> BenchmarkConfig {
    let yaml = format!(
        r#"
run_id: "test_smoke"
deals:
  seed: 4242
  hands: 3
  hand_size: 7
agents:
  - name: "hand_only"
    strategy: "ignore_crib"
  - name: "dealer"
    strategy: "optimize"
  - name: "pone"
    strategy: "deoptimize"
  - name: "noise"
    strategy: "random"
outputs:
  jsonl: "{jsonl}"
  summary_md: "{summary}"
metrics:
  baseline: "hand_only"
logging:
  enable_structured: false
"#,
        jsonl = output_dir.join("deals.jsonl").display(),
        summary = output_dir.join("summary.md").display(),
    );

    let cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

/// Hash of the JSONL rows with wall-clock latency zeroed out.
fn normalized_digest(jsonl: &str) -> String {
    let mut normalized = String::new();
    for line in jsonl.lines() {
        let mut value: serde_json::Value = serde_json::from_str(line).expect("row decodes to JSON");
        if let Some(obj) = value.as_object_mut() {
            obj.insert("decision_ms".to_string(), serde_json::json!(0.0));
        }
        normalized.push_str(&serde_json::to_string(&value).expect("re-serialize normalized row"));
        normalized.push('\n');
    }

    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

fn run_once(dir: &Path) -> (String, String) {
    let config = load_config(dir);
    let outputs = config.resolved_outputs();
    let runner = ComparisonRunner::new(config, outputs).expect("runner created");
    let summary = runner.run().expect("comparison completes");

    assert_eq!(summary.hands_played, 3);
    assert_eq!(summary.rows_written, 12);
    assert!(summary.telemetry_path.is_none());

    let jsonl = fs::read_to_string(&summary.jsonl_path).expect("jsonl readable");
    let markdown = fs::read_to_string(&summary.summary_path).expect("summary readable");
    (jsonl, markdown)
}

#[test]
fn comparison_smoke_run_is_reproducible() {
    let first_dir = tempdir().expect("temp dir");
    let second_dir = tempdir().expect("temp dir");

    let (first, markdown) = run_once(first_dir.path());
    let (second, _) = run_once(second_dir.path());
    assert_eq!(normalized_digest(&first), normalized_digest(&second));

    let rows: Vec<serde_json::Value> = first
        .lines()
        .map(|line| serde_json::from_str(line).expect("row decodes"))
        .collect();
    for row in &rows {
        assert_eq!(row["run_id"], "test_smoke");
        assert_eq!(row["hand"].as_array().map(Vec::len), Some(7));
        assert_eq!(row["keep"].as_array().map(Vec::len), Some(4));
        assert_eq!(row["throw"].as_array().map(Vec::len), Some(3));
        assert!(row["realized_score"].as_u64().expect("score") <= 29);
    }
    assert!(
        rows.iter()
            .filter(|row| row["agent"] == "hand_only")
            .all(|row| row["agrees_with_baseline"] == true)
    );
    assert!(
        rows.iter()
            .filter(|row| row["agent"] == "dealer")
            .all(|row| row["expected_crib_score"].is_number())
    );

    assert!(markdown.contains("| hand_only | ignore_crib | 3 |"));
    assert!(markdown.contains("| noise |"));
}
