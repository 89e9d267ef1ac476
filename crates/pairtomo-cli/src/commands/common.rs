//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use pairtomo_ir::Circuit;
use pairtomo_qasm3::{emit, emit_qasm2};

use crate::config::OutputFormat;

/// Built-in preparation circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preparation {
    /// Two-qubit Bell state
    Bell,
    /// n-qubit GHZ state
    Ghz,
}

/// Load a circuit from a JSON file.
pub fn load_circuit(path: &Path) -> Result<Circuit> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if matches!(ext.to_lowercase().as_str(), "qasm" | "qasm2" | "qasm3") {
        anyhow::bail!(
            "QASM input is not supported: {}. Provide the circuit as JSON",
            path.display()
        );
    }

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    Circuit::from_json(&source)
        .with_context(|| format!("Invalid circuit JSON: {}", path.display()))
}

/// Build a built-in preparation circuit.
pub fn build_preparation(prep: Preparation, qubits: u32) -> Result<Circuit> {
    let circuit = match prep {
        Preparation::Bell => {
            if qubits != 2 {
                tracing::warn!(qubits, "bell preparation always uses 2 qubits");
            }
            Circuit::bell()?
        }
        Preparation::Ghz => {
            if qubits == 0 {
                anyhow::bail!("GHZ preparation needs at least one qubit");
            }
            Circuit::ghz(qubits)?
        }
    };
    Ok(circuit)
}

/// Serialize a circuit in the requested format.
pub fn render(circuit: &Circuit, format: OutputFormat) -> Result<String> {
    let text = match format {
        OutputFormat::Qasm3 => emit(circuit)?,
        OutputFormat::Qasm2 => emit_qasm2(circuit)?,
        OutputFormat::Json => circuit.to_json()?,
    };
    Ok(text)
}

/// Create `dir` if it does not exist.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    }
    Ok(())
}
