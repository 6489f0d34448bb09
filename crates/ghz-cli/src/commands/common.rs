//! Shared helpers for CLI commands.

use anyhow::{Context, Result};
use console::style;

use ghz_adapter_sim::{SimulationMethod, SimulatorBackend};
use ghz_hal::{BackendConfig, BackendFactory, ExecutionResult};

/// Rows shown by the table format before the remainder is summarised.
const TABLE_ROWS: usize = 16;

/// Build the simulator for a method and optional seed.
pub fn create_backend(method: SimulationMethod, seed: Option<u64>) -> Result<SimulatorBackend> {
    let mut config = BackendConfig::new("simulator")
        .with_extra("method", serde_json::json!(method.as_str()));
    if let Some(seed) = seed {
        config = config.with_extra("seed", serde_json::json!(seed));
    }
    SimulatorBackend::from_config(config).context("Failed to configure simulator")
}

/// Dump format, matching `Counts`' `Display`.
pub fn format_dump(result: &ExecutionResult) -> String {
    result.counts.to_string()
}

/// Pretty-printed JSON of the whole result.
pub fn format_json(result: &ExecutionResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize result")
}

/// Print execution results in a table format.
pub fn print_results(result: &ExecutionResult) {
    println!(
        "\n{} Results ({} shots):",
        style("✓").green().bold(),
        result.shots
    );

    let sorted = result.counts.sorted();
    let total = result.counts.total_shots() as f64;

    for (bitstring, count) in sorted.iter().take(TABLE_ROWS) {
        let prob = **count as f64 / total * 100.0;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > TABLE_ROWS {
        println!("  ... and {} more outcomes", sorted.len() - TABLE_ROWS);
    }

    if let Some(method) = result.metadata.get("method").and_then(|m| m.as_str()) {
        println!("\n  Engine: {}", style(method).yellow());
    }
    if let Some(time_ms) = result.execution_time_ms {
        println!("  Execution time: {} ms", style(time_ms).yellow());
    }
}
