//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - GHZ state preparation and sampling",
        style("GHZ").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  ghz-ir           Kernel builder and GHZ constructor");
    println!("  ghz-hal          Backend abstraction and sampling");
    println!("  ghz-adapter-sim  Statevector and stabilizer simulator");
    println!("  ghz-cli          Command-line interface");
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}
