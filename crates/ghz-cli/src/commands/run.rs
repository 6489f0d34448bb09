//! Run command implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use ghz_hal::{Backend, ExecutionResult, sample};
use ghz_ir::ghz_state;

use super::common::{create_backend, format_dump, format_json, print_results};
use crate::cli::{OutputFormat, RunArgs};

/// Build the GHZ kernel and sample it on the configured simulator.
pub async fn sample_ghz(args: &RunArgs) -> Result<ExecutionResult> {
    let kernel = ghz_state(args.qubits).context("Failed to build GHZ kernel")?;
    let backend = create_backend(args.backend, args.seed)?;
    info!(
        "Sampling {} ({} ops, depth {}) on {}",
        kernel.name(),
        kernel.num_ops(),
        kernel.depth(),
        backend.name()
    );

    let result = sample(&backend, &kernel, args.shots).await?;
    Ok(result)
}

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    println!("Preparing GHZ state for {} qubits.", args.qubits);

    match args.format {
        OutputFormat::Dump => {
            let result = sample_ghz(args).await?;
            println!("{}", format_dump(&result));
        }
        OutputFormat::Json => {
            let result = sample_ghz(args).await?;
            println!("{}", format_json(&result)?);
        }
        OutputFormat::Table => {
            println!(
                "{} Sampling on {} ({} shots)",
                style("→").cyan().bold(),
                style(args.backend).yellow(),
                args.shots
            );

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
            spinner.set_message("Sampling...");
            spinner.enable_steady_tick(Duration::from_millis(100));

            let result = sample_ghz(args).await;
            spinner.finish_and_clear();

            print_results(&result?);
        }
    }

    Ok(())
}
