//! Command-line arguments.

use clap::{Args, Parser, Subcommand, ValueEnum};

use ghz_adapter_sim::{DEFAULT_MAX_QUBITS, SimulationMethod};
use ghz_hal::DEFAULT_SHOTS;
use ghz_ir::DEFAULT_NUM_QUBITS;

/// Upper bound accepted for `--qubits`, the simulator's default limit.
const MAX_QUBITS: i64 = DEFAULT_MAX_QUBITS as i64;

/// GHZ - prepare an N-qubit GHZ state and sample it
#[derive(Parser, Debug)]
#[command(name = "ghz")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Command to run; without one the 34-qubit demonstration runs
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The command to execute, falling back to the default run.
    pub fn into_command(self) -> Commands {
        self.command
            .unwrap_or_else(|| Commands::Run(RunArgs::default()))
    }

    /// Log filter for the verbosity count.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prepare a GHZ state and sample it
    Run(RunArgs),

    /// Print the GHZ kernel without running it
    Circuit {
        /// Number of qubits
        #[arg(
            short = 'n',
            long,
            default_value_t = DEFAULT_NUM_QUBITS,
            env = "GHZ_QUBITS",
            value_parser = clap::value_parser!(u32).range(1..=MAX_QUBITS)
        )]
        qubits: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = CircuitFormat::Text)]
        format: CircuitFormat,
    },

    /// List simulation methods and their limits
    Backends,

    /// Show version information
    Version,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    /// Number of qubits in the GHZ state
    #[arg(
        short = 'n',
        long,
        default_value_t = DEFAULT_NUM_QUBITS,
        env = "GHZ_QUBITS",
        value_parser = clap::value_parser!(u32).range(1..=MAX_QUBITS)
    )]
    pub qubits: u32,

    /// Number of shots
    #[arg(short, long, default_value_t = DEFAULT_SHOTS, env = "GHZ_SHOTS")]
    pub shots: u32,

    /// Simulation method (auto, statevector, stabilizer)
    #[arg(short, long, default_value = "auto", env = "GHZ_BACKEND")]
    pub backend: SimulationMethod,

    /// Seed for reproducible sampling
    #[arg(long, env = "GHZ_SEED")]
    pub seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Dump)]
    pub format: OutputFormat,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            qubits: DEFAULT_NUM_QUBITS,
            shots: DEFAULT_SHOTS,
            backend: SimulationMethod::Auto,
            seed: None,
            format: OutputFormat::Dump,
        }
    }
}

/// How `run` prints the histogram.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `{ 00:503 11:497 }`
    Dump,
    /// Bar chart with probabilities
    Table,
    /// Full result as JSON
    Json,
}

/// How `circuit` prints the kernel.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitFormat {
    /// One instruction per line
    Text,
    /// OpenQASM 3.0
    Qasm,
    /// Kernel as JSON
    Json,
}
