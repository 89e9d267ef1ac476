//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - pairwise quantum state tomography circuit generation",
        style("Pairtomo").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  pairtomo-ir          Circuit representation");
    println!("  pairtomo-tomography  Measurement settings and variant generation");
    println!("  pairtomo-qasm3       OpenQASM 3.0 / 2.0 emitter");
    println!("  pairtomo-cli         Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
