//! Named quantum and classical registers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::qubit::{ClbitId, QubitId};

/// An ordered, named group of qubits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuantumRegister {
    name: String,
    qubits: Vec<QubitId>,
}

impl QuantumRegister {
    /// Create a register over the given qubits.
    pub fn new(name: impl Into<String>, qubits: Vec<QubitId>) -> Self {
        Self {
            name: name.into(),
            qubits,
        }
    }

    /// Register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits in the register.
    pub fn len(&self) -> usize {
        self.qubits.len()
    }

    /// Whether the register holds no qubits.
    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty()
    }

    /// Qubit at position `index`.
    pub fn get(&self, index: usize) -> Option<QubitId> {
        self.qubits.get(index).copied()
    }

    /// Qubits in register order.
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Iterate over the qubits in register order.
    pub fn iter(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.qubits.iter().copied()
    }
}

impl fmt::Display for QuantumRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "qreg {}[{}]", self.name, self.qubits.len())
    }
}

/// An ordered, named group of classical bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassicalRegister {
    name: String,
    clbits: Vec<ClbitId>,
}

impl ClassicalRegister {
    /// Create a register over the given classical bits.
    pub fn new(name: impl Into<String>, clbits: Vec<ClbitId>) -> Self {
        Self {
            name: name.into(),
            clbits,
        }
    }

    /// Register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of bits in the register.
    pub fn len(&self) -> usize {
        self.clbits.len()
    }

    /// Whether the register holds no bits.
    pub fn is_empty(&self) -> bool {
        self.clbits.is_empty()
    }

    /// Bit at position `index`.
    pub fn get(&self, index: usize) -> Option<ClbitId> {
        self.clbits.get(index).copied()
    }

    /// Bits in register order.
    pub fn clbits(&self) -> &[ClbitId] {
        &self.clbits
    }

    /// Position of `clbit` within this register.
    pub fn position(&self, clbit: ClbitId) -> Option<usize> {
        self.clbits.iter().position(|&c| c == clbit)
    }

    /// Iterate over the bits in register order.
    pub fn iter(&self) -> impl Iterator<Item = ClbitId> + '_ {
        self.clbits.iter().copied()
    }
}

impl fmt::Display for ClassicalRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "creg {}[{}]", self.name, self.clbits.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantum_register_access() {
        let qr = QuantumRegister::new("q", vec![QubitId(4), QubitId(5)]);
        assert_eq!(qr.len(), 2);
        assert_eq!(qr.get(1), Some(QubitId(5)));
        assert_eq!(qr.get(2), None);
        assert_eq!(qr.to_string(), "qreg q[2]");
    }

    #[test]
    fn test_classical_register_position() {
        let cr = ClassicalRegister::new("meas", vec![ClbitId(2), ClbitId(3), ClbitId(4)]);
        assert_eq!(cr.position(ClbitId(4)), Some(2));
        assert_eq!(cr.position(ClbitId(0)), None);
        assert_eq!(cr.iter().count(), 3);
    }
}
