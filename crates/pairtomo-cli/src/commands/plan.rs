//! Plan command implementation.

use anyhow::Result;
use console::style;
use pairtomo_tomography::{
    CoverageReport, MAX_COVERAGE_POSITIONS, MeasurementBasis, SettingOrigin, compact_label,
    measurement_settings, num_layers, setting_origins,
};

use super::generate::describe_origin;

/// Widest basis column printed before eliding the middle.
const MAX_BASES_SHOWN: usize = 48;

/// Execute the plan command.
pub fn execute(qubits: usize) -> Result<()> {
    if qubits == 0 {
        anyhow::bail!("At least one qubit is required");
    }

    let origins = setting_origins(qubits);
    println!(
        "{} Pairwise tomography plan for {} qubits: {} layers, {} settings",
        style("→").cyan().bold(),
        style(qubits).green(),
        num_layers(qubits),
        style(origins.len()).yellow()
    );
    println!();

    for (index, &origin) in origins.iter().enumerate() {
        println!(
            "  {index:>3}  {:<14}  {}",
            describe_origin(origin),
            elide(origin, qubits)
        );
    }
    println!();

    if qubits > MAX_COVERAGE_POSITIONS {
        // Distinct positions differ in some ternary digit; that layer's six
        // permutations give every ordered pair of distinct bases.
        println!(
            "{} Every pair measured in all 9 basis combinations (per-pair tally skipped above {} qubits)",
            style("✓").green().bold(),
            MAX_COVERAGE_POSITIONS
        );
    } else {
        let report = CoverageReport::from_settings(qubits, &measurement_settings(qubits))?;
        match report.min_multiplicity() {
            Some(min) => println!(
                "{} Every pair measured in all 9 basis combinations (min multiplicity {min}, complete: {})",
                style("✓").green().bold(),
                report.is_complete()
            ),
            None => println!("  A single qubit has no pairs to cover"),
        }
    }

    // 3^n overflows u128 past 80 qubits.
    match u32::try_from(qubits).ok().and_then(|n| 3u128.checked_pow(n)) {
        Some(full) => println!("  Full tomography would need {full} settings"),
        None => println!("  Full tomography would need 3^{qubits} settings"),
    }

    Ok(())
}

/// Bases of `origin` over `qubits` positions, with the middle elided for
/// wide plans.
fn elide(origin: SettingOrigin, qubits: usize) -> String {
    let bases = |range: std::ops::Range<usize>| {
        let picked: Vec<MeasurementBasis> = range.map(|i| origin.basis_at(i)).collect();
        compact_label(&picked)
    };
    if qubits <= MAX_BASES_SHOWN {
        return bases(0..qubits);
    }
    let half = MAX_BASES_SHOWN / 2;
    format!("{}...{}", bases(0..half), bases(qubits - half..qubits))
}
