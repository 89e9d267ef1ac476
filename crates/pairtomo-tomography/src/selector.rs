//! Selection of the qubits that take part in a tomography experiment.

use std::fmt;
use std::str::FromStr;

use pairtomo_ir::{Circuit, IrError, QuantumRegister, QubitId};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{TomographyError, TomographyResult};

/// Which qubits of a circuit to measure.
///
/// Every form is flattened by [`QubitSelector::resolve`] into one ordered
/// list; the position of a qubit in that list is the index of the classical
/// bit it is measured into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QubitSelector {
    /// Every qubit of the circuit, in circuit order.
    #[default]
    All,
    /// One quantum register by name.
    Register(String),
    /// Several quantum registers, concatenated in the given order.
    Registers(Vec<String>),
    /// Explicit qubit handles.
    Qubits(Vec<QubitId>),
}

impl QubitSelector {
    /// Flatten the selection against `circuit`.
    ///
    /// Duplicates are dropped, keeping the first occurrence. Unknown
    /// registers or qubits fail with the circuit's own lookup error.
    pub fn resolve(&self, circuit: &Circuit) -> TomographyResult<Vec<QubitId>> {
        if circuit.num_qubits() == 0 {
            return Err(IrError::NoQuantumRegister(circuit.name().to_string()).into());
        }

        let flat: Vec<QubitId> = match self {
            QubitSelector::All => circuit.qubits().iter().map(|q| q.id).collect(),
            QubitSelector::Register(name) => circuit.qreg(name)?.qubits().to_vec(),
            QubitSelector::Registers(names) => {
                let mut flat = Vec::new();
                for name in names {
                    flat.extend(circuit.qreg(name)?.iter());
                }
                flat
            }
            QubitSelector::Qubits(ids) => {
                if let Some(&qubit) = ids.iter().find(|q| circuit.qubit(**q).is_none()) {
                    return Err(IrError::QubitNotFound {
                        qubit,
                        op_name: None,
                    }
                    .into());
                }
                ids.clone()
            }
        };

        let mut seen = FxHashSet::default();
        let resolved: Vec<QubitId> = flat.into_iter().filter(|q| seen.insert(*q)).collect();

        if resolved.is_empty() {
            return Err(TomographyError::EmptySelection);
        }
        Ok(resolved)
    }
}

impl From<&QuantumRegister> for QubitSelector {
    fn from(register: &QuantumRegister) -> Self {
        QubitSelector::Register(register.name().to_string())
    }
}

impl From<Vec<QubitId>> for QubitSelector {
    fn from(qubits: Vec<QubitId>) -> Self {
        QubitSelector::Qubits(qubits)
    }
}

impl From<&[u32]> for QubitSelector {
    fn from(indices: &[u32]) -> Self {
        QubitSelector::Qubits(indices.iter().copied().map(QubitId).collect())
    }
}

impl FromStr for QubitSelector {
    type Err = TomographyError;

    /// Parse `all`, a register name, a comma-separated list of register
    /// names, or a comma-separated list of qubit indices.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TomographyError::InvalidSelector("empty selector".into()));
        }
        if s.eq_ignore_ascii_case("all") {
            return Ok(QubitSelector::All);
        }

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(TomographyError::InvalidSelector(format!(
                "empty entry in '{s}'"
            )));
        }

        if parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit())) {
            let ids = parts
                .iter()
                .map(|p| {
                    p.parse::<u32>()
                        .map(QubitId)
                        .map_err(|e| TomographyError::InvalidSelector(format!("'{p}': {e}")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(QubitSelector::Qubits(ids));
        }

        if let Some(bad) = parts
            .iter()
            .find(|p| !p.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
        {
            return Err(TomographyError::InvalidSelector(format!(
                "'{bad}' is neither a register name nor a qubit index"
            )));
        }

        match parts.as_slice() {
            [single] => Ok(QubitSelector::Register((*single).to_string())),
            _ => Ok(QubitSelector::Registers(
                parts.iter().map(|p| (*p).to_string()).collect(),
            )),
        }
    }
}

impl fmt::Display for QubitSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QubitSelector::All => write!(f, "all"),
            QubitSelector::Register(name) => write!(f, "{name}"),
            QubitSelector::Registers(names) => write!(f, "{}", names.join(",")),
            QubitSelector::Qubits(ids) => {
                let ids: Vec<String> = ids.iter().map(|q| q.0.to_string()).collect();
                write!(f, "{}", ids.join(","))
            }
        }
    }
}
