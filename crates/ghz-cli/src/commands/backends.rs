//! Backends command implementation.

use anyhow::Result;
use console::style;

use ghz_adapter_sim::{SimulationMethod, SimulatorBackend};
use ghz_hal::Backend;

/// Execute the backends command.
pub async fn execute() -> Result<()> {
    println!("{} Simulation methods:\n", style("GHZ").cyan().bold());

    for method in [
        SimulationMethod::Auto,
        SimulationMethod::Statevector,
        SimulationMethod::Stabilizer,
    ] {
        let sim = SimulatorBackend::new().with_method(method);
        let caps = sim.capabilities();
        let available = sim.availability().await?.is_available;

        println!(
            "  {} {} {}",
            if available {
                style("●").green()
            } else {
                style("○").red()
            },
            style(method).bold(),
            if caps.is_simulator { "(local)" } else { "" }
        );
        println!("    Qubits: {}", caps.num_qubits);
        println!("    Max shots: {}", caps.max_shots);
        println!("    Gates: {}", caps.gate_set.join(", "));
        if !caps.features.is_empty() {
            println!("    Engines: {}", caps.features.join(", "));
        }
        println!();
    }

    Ok(())
}
