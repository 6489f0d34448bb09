//! Circuit command implementation.

use anyhow::{Context, Result};

use ghz_ir::{Kernel, ghz_state};

use crate::cli::CircuitFormat;

/// Render a kernel in the requested format.
pub fn render(kernel: &Kernel, format: CircuitFormat) -> Result<String> {
    match format {
        CircuitFormat::Text => Ok(kernel.to_string()),
        CircuitFormat::Qasm => Ok(kernel.to_qasm()),
        CircuitFormat::Json => {
            serde_json::to_string_pretty(kernel).context("Failed to serialize kernel")
        }
    }
}

/// Execute the circuit command.
pub fn execute(qubits: u32, format: CircuitFormat) -> Result<()> {
    let kernel = ghz_state(qubits).context("Failed to build GHZ kernel")?;
    print!("{}", render(&kernel, format)?);
    if format == CircuitFormat::Json {
        println!();
    }
    Ok(())
}
