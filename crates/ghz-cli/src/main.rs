//! GHZ Command-Line Interface
//!
//! Prepares an N-qubit GHZ state (H on the first qubit, a chain of CX gates,
//! a full measurement) and prints the sampled histogram.
//!
//! ```text
//! $ ghz
//! Preparing GHZ state for 34 qubits.
//! { 0000000000000000000000000000000000:503 1111111111111111111111111111111111:497 }
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use ghz_cli::commands::{backends, circuit, run, version};
use ghz_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cli.log_filter()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.into_command() {
        Commands::Run(args) => run::execute(&args).await,
        Commands::Circuit { qubits, format } => circuit::execute(qubits, format),
        Commands::Backends => backends::execute().await,
        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
