//! High-level circuit builder API.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{Clbit, ClbitId, Qubit, QubitId};
use crate::register::{ClassicalRegister, QuantumRegister};

/// A quantum circuit.
///
/// Qubit and classical bit handles are dense: the n-th bit added to a circuit
/// gets id n. Instructions are kept in program order and every operand is
/// validated when the instruction is appended. `Clone` produces an
/// independent circuit that shares nothing with the original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Qubits in the circuit.
    qubits: Vec<Qubit>,
    /// Classical bits in the circuit.
    #[serde(default)]
    clbits: Vec<Clbit>,
    /// Quantum registers, in declaration order.
    #[serde(default)]
    qregs: Vec<QuantumRegister>,
    /// Classical registers, in declaration order.
    #[serde(default)]
    cregs: Vec<ClassicalRegister>,
    /// Instructions in program order.
    #[serde(default)]
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            clbits: vec![],
            qregs: vec![],
            cregs: vec![],
            instructions: vec![],
        }
    }

    /// Create a circuit with a quantum register `q` of `num_qubits` qubits and
    /// a classical register `c` of `num_clbits` bits. Empty registers are
    /// not declared.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        if num_qubits > 0 {
            circuit.push_qreg("q".into(), num_qubits);
        }
        if num_clbits > 0 {
            circuit.push_creg("c".into(), num_clbits);
        }
        circuit
    }

    /// Add a single qubit outside any register.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = self.next_qubit_id();
        self.qubits.push(Qubit::new(id));
        id
    }

    /// Add a quantum register with `size` fresh qubits.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> IrResult<QuantumRegister> {
        let name = name.into();
        self.ensure_register_name_free(&name)?;
        Ok(self.push_qreg(name, size))
    }

    /// Add a single classical bit outside any register.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = self.next_clbit_id();
        self.clbits.push(Clbit::new(id));
        id
    }

    /// Add a classical register with `size` fresh bits.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> IrResult<ClassicalRegister> {
        let name = name.into();
        self.ensure_register_name_free(&name)?;
        Ok(self.push_creg(name, size))
    }

    fn push_qreg(&mut self, name: String, size: u32) -> QuantumRegister {
        let mut ids = Vec::with_capacity(size as usize);
        for i in 0..size {
            let id = self.next_qubit_id();
            self.qubits.push(Qubit::with_register(id, &name, i));
            ids.push(id);
        }
        let register = QuantumRegister::new(name, ids);
        self.qregs.push(register.clone());
        register
    }

    fn push_creg(&mut self, name: String, size: u32) -> ClassicalRegister {
        let mut ids = Vec::with_capacity(size as usize);
        for i in 0..size {
            let id = self.next_clbit_id();
            self.clbits.push(Clbit::with_register(id, &name, i));
            ids.push(id);
        }
        let register = ClassicalRegister::new(name, ids);
        self.cregs.push(register.clone());
        register
    }

    fn ensure_register_name_free(&self, name: &str) -> IrResult<()> {
        let taken = self.qregs.iter().any(|r| r.name() == name)
            || self.cregs.iter().any(|r| r.name() == name);
        if taken {
            return Err(IrError::DuplicateRegister(name.to_string()));
        }
        Ok(())
    }

    fn next_qubit_id(&self) -> QubitId {
        QubitId(self.qubits.len() as u32)
    }

    fn next_clbit_id(&self) -> ClbitId {
        ClbitId(self.clbits.len() as u32)
    }

    // =========================================================================
    // Instruction append
    // =========================================================================

    /// Validate and append an instruction.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.check_instruction(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    fn check_instruction(&self, instruction: &Instruction) -> IrResult<()> {
        let op_name = Some(instruction.name().to_string());

        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let expected = gate.num_qubits();
                let got = instruction.qubits.len() as u32;
                if expected != got {
                    return Err(IrError::QubitCountMismatch {
                        gate_name: gate.name().to_string(),
                        expected,
                        got,
                    });
                }
            }
            InstructionKind::Measure => {
                if instruction.qubits.len() != instruction.clbits.len() {
                    return Err(IrError::MeasureArityMismatch {
                        qubits: instruction.qubits.len(),
                        clbits: instruction.clbits.len(),
                    });
                }
            }
            InstructionKind::Reset | InstructionKind::Barrier => {}
        }

        for &qubit in &instruction.qubits {
            if qubit.0 as usize >= self.qubits.len() {
                return Err(IrError::QubitNotFound {
                    qubit,
                    op_name: op_name.clone(),
                });
            }
        }

        for &clbit in &instruction.clbits {
            if clbit.0 as usize >= self.clbits.len() {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    op_name: op_name.clone(),
                });
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    op_name: op_name.clone(),
                });
            }
        }

        Ok(())
    }

    fn single(&mut self, gate: StandardGate, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(gate, qubit))
    }

    fn pair(&mut self, gate: StandardGate, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(gate, q1, q2))
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::H, qubit)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::X, qubit)
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Y, qubit)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Z, qubit)
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::S, qubit)
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Sdg, qubit)
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::T, qubit)
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Tdg, qubit)
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::SX, qubit)
    }

    /// Apply sqrt(X)-dagger gate.
    pub fn sxdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::SXdg, qubit)
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Rx(theta), qubit)
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Ry(theta), qubit)
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Rz(theta), qubit)
    }

    /// Apply phase gate.
    pub fn p(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::P(theta), qubit)
    }

    /// Apply universal U gate.
    pub fn u(&mut self, theta: f64, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::U(theta, phi, lambda), qubit)
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.pair(StandardGate::CX, control, target)
    }

    /// Apply CY gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.pair(StandardGate::CY, control, target)
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.pair(StandardGate::CZ, control, target)
    }

    /// Apply controlled-Hadamard gate.
    pub fn ch(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.pair(StandardGate::CH, control, target)
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.pair(StandardGate::Swap, q1, q2)
    }

    /// Apply controlled-phase gate.
    pub fn cp(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.pair(StandardGate::CP(theta), control, target)
    }

    /// Apply controlled-Rz gate.
    pub fn crz(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.pair(StandardGate::CRz(theta), control, target)
    }

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::CCX, [c1, c2, target]))
    }

    /// Apply Fredkin (CSWAP) gate.
    pub fn cswap(&mut self, control: QubitId, t1: QubitId, t2: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::CSwap, [control, t1, t2]))
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.apply(Instruction::measure(qubit, clbit))
    }

    /// Reset a qubit to |0⟩.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::reset(qubit))
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.apply(Instruction::barrier(qubits))
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        self.apply(Instruction::barrier(qubits))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the circuit.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Get the qubits in the circuit.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Get the classical bits in the circuit.
    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }

    /// Look up a qubit by handle.
    pub fn qubit(&self, id: QubitId) -> Option<&Qubit> {
        self.qubits.get(id.0 as usize)
    }

    /// Look up a classical bit by handle.
    pub fn clbit(&self, id: ClbitId) -> Option<&Clbit> {
        self.clbits.get(id.0 as usize)
    }

    /// Quantum registers in declaration order.
    pub fn qregs(&self) -> &[QuantumRegister] {
        &self.qregs
    }

    /// Classical registers in declaration order.
    pub fn cregs(&self) -> &[ClassicalRegister] {
        &self.cregs
    }

    /// Look up a quantum register by name.
    pub fn qreg(&self, name: &str) -> IrResult<&QuantumRegister> {
        self.qregs
            .iter()
            .find(|r| r.name() == name)
            .ok_or_else(|| IrError::RegisterNotFound(name.to_string()))
    }

    /// Look up a classical register by name.
    pub fn creg(&self, name: &str) -> IrResult<&ClassicalRegister> {
        self.cregs
            .iter()
            .find(|r| r.name() == name)
            .ok_or_else(|| IrError::RegisterNotFound(name.to_string()))
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn num_ops(&self) -> usize {
        self.instructions.len()
    }

    /// Instruction counts keyed by instruction name.
    pub fn count_ops(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for inst in &self.instructions {
            *counts.entry(inst.name()).or_insert(0) += 1;
        }
        counts
    }

    /// Measurement instructions in program order.
    pub fn measurements(&self) -> impl Iterator<Item = &Instruction> + '_ {
        self.instructions.iter().filter(|i| i.is_measure())
    }

    /// Get the circuit depth: the longest chain of instructions sharing a
    /// qubit or classical bit.
    pub fn depth(&self) -> usize {
        let mut qubit_depth = vec![0usize; self.qubits.len()];
        let mut clbit_depth = vec![0usize; self.clbits.len()];
        let mut max_depth = 0;

        for inst in &self.instructions {
            let start = inst
                .qubits
                .iter()
                .map(|q| qubit_depth[q.0 as usize])
                .chain(inst.clbits.iter().map(|c| clbit_depth[c.0 as usize]))
                .max()
                .unwrap_or(0);
            let level = start + 1;
            for q in &inst.qubits {
                qubit_depth[q.0 as usize] = level;
            }
            for c in &inst.clbits {
                clbit_depth[c.0 as usize] = level;
            }
            max_depth = max_depth.max(level);
        }

        max_depth
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Serialize the circuit as pretty-printed JSON.
    pub fn to_json(&self) -> IrResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a circuit from JSON and validate it.
    pub fn from_json(source: &str) -> IrResult<Self> {
        let circuit: Circuit = serde_json::from_str(source)?;
        circuit.validate()?;
        Ok(circuit)
    }

    /// Check that bit handles are dense, registers reference existing bits,
    /// register names are unique and every instruction has valid operands.
    pub fn validate(&self) -> IrResult<()> {
        for (i, qubit) in self.qubits.iter().enumerate() {
            if qubit.id.0 as usize != i {
                return Err(IrError::QubitNotFound {
                    qubit: QubitId(i as u32),
                    op_name: None,
                });
            }
        }
        for (i, clbit) in self.clbits.iter().enumerate() {
            if clbit.id.0 as usize != i {
                return Err(IrError::ClbitNotFound {
                    clbit: ClbitId(i as u32),
                    op_name: None,
                });
            }
        }

        let mut names = FxHashSet::default();
        for reg in &self.qregs {
            if !names.insert(reg.name()) {
                return Err(IrError::DuplicateRegister(reg.name().to_string()));
            }
            if let Some(&qubit) = reg.qubits().iter().find(|q| self.qubit(**q).is_none()) {
                return Err(IrError::QubitNotFound {
                    qubit,
                    op_name: None,
                });
            }
        }
        for reg in &self.cregs {
            if !names.insert(reg.name()) {
                return Err(IrError::DuplicateRegister(reg.name().to_string()));
            }
            if let Some(&clbit) = reg.clbits().iter().find(|c| self.clbit(**c).is_none()) {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    op_name: None,
                });
            }
        }

        for inst in &self.instructions {
            self.check_instruction(inst)?;
        }
        Ok(())
    }

    // =========================================================================
    // Preparation circuits
    // =========================================================================

    /// Create a Bell state preparation circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 0);
        circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
        Ok(circuit)
    }

    /// Create an n-qubit GHZ state preparation circuit.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::with_size("ghz", n, 0);
        if n == 0 {
            return Ok(circuit);
        }

        circuit.h(QubitId(0))?;
        for i in 0..n - 1 {
            circuit.cx(QubitId(i), QubitId(i + 1))?;
        }

        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test");
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.num_clbits(), 0);
        assert!(circuit.qregs().is_empty());
    }

    #[test]
    fn test_circuit_with_size() {
        let circuit = Circuit::with_size("test", 3, 2);
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.qreg("q").unwrap().len(), 3);
        assert_eq!(circuit.creg("c").unwrap().len(), 2);
    }

    #[test]
    fn test_add_registers() {
        let mut circuit = Circuit::new("test");
        let data = circuit.add_qreg("data", 4).unwrap();
        let anc = circuit.add_qreg("anc", 2).unwrap();
        let creg = circuit.add_creg("meas", 4).unwrap();

        assert_eq!(data.qubits(), &[QubitId(0), QubitId(1), QubitId(2), QubitId(3)]);
        assert_eq!(anc.qubits(), &[QubitId(4), QubitId(5)]);
        assert_eq!(creg.len(), 4);
        assert_eq!(circuit.num_qubits(), 6);
        assert_eq!(circuit.qubit(QubitId(5)).unwrap().to_string(), "anc[1]");
    }

    #[test]
    fn test_duplicate_register_name() {
        let mut circuit = Circuit::with_size("test", 2, 2);
        assert!(matches!(
            circuit.add_creg("c", 2),
            Err(IrError::DuplicateRegister(name)) if name == "c"
        ));
        assert!(matches!(
            circuit.add_creg("q", 1),
            Err(IrError::DuplicateRegister(_))
        ));
        assert_eq!(circuit.num_clbits(), 2);
    }

    #[test]
    fn test_operand_validation() {
        let mut circuit = Circuit::with_size("test", 2, 1);

        assert!(matches!(
            circuit.h(QubitId(2)),
            Err(IrError::QubitNotFound { .. })
        ));
        assert!(matches!(
            circuit.measure(QubitId(0), ClbitId(1)),
            Err(IrError::ClbitNotFound { .. })
        ));
        assert!(matches!(
            circuit.cx(QubitId(1), QubitId(1)),
            Err(IrError::DuplicateQubit { .. })
        ));
        assert!(matches!(
            circuit.apply(Instruction::gate(StandardGate::CX, [QubitId(0)])),
            Err(IrError::QubitCountMismatch { expected: 2, got: 1, .. })
        ));
        assert_eq!(circuit.num_ops(), 0);
    }

    #[test]
    fn test_bell_state() {
        let circuit = Circuit::bell().unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 0);
        assert_eq!(circuit.depth(), 2);
        assert_eq!(circuit.measurements().count(), 0);
    }

    #[test]
    fn test_ghz_state() {
        let circuit = Circuit::ghz(5).unwrap();
        assert_eq!(circuit.num_qubits(), 5);
        assert_eq!(circuit.depth(), 5);
        assert_eq!(circuit.count_ops().get("cx"), Some(&4));
    }

    #[test]
    fn test_depth_follows_clbit_wires() {
        let mut circuit = Circuit::with_size("test", 2, 1);
        circuit
            .h(QubitId(0))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .measure(QubitId(1), ClbitId(0))
            .unwrap();
        // Second measure waits on the shared classical bit.
        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = Circuit::with_size("test", 2, 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .rx(PI / 2.0, QubitId(1))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .measure(QubitId(1), ClbitId(1))
            .unwrap();

        assert_eq!(circuit.depth(), 3);
        assert_eq!(circuit.measurements().count(), 2);
    }

    #[test]
    fn test_clone_is_independent() {
        let base = Circuit::bell().unwrap();
        let mut copy = base.clone();
        copy.add_creg("meas", 2).unwrap();
        copy.sdg(QubitId(1)).unwrap();
        copy.set_name("variant");

        assert_eq!(base.num_clbits(), 0);
        assert_eq!(base.num_ops(), 2);
        assert_eq!(base.name(), "bell");
        assert_eq!(copy.num_ops(), 3);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut circuit = Circuit::ghz(3).unwrap();
        circuit.rz(0.25, QubitId(2)).unwrap();
        let json = circuit.to_json().unwrap();
        let back = Circuit::from_json(&json).unwrap();
        assert_eq!(back, circuit);
    }

    #[test]
    fn test_from_json_rejects_bad_operands() {
        let source = r#"{
            "name": "broken",
            "qubits": [{"id": 0}],
            "instructions": [
                {"kind": {"gate": {"gate": "cx"}}, "qubits": [0, 1]}
            ]
        }"#;
        assert!(matches!(
            Circuit::from_json(source),
            Err(IrError::QubitNotFound { .. })
        ));
    }

    #[test]
    fn test_from_json_rejects_sparse_ids() {
        let source = r#"{"name": "sparse", "qubits": [{"id": 0}, {"id": 5}]}"#;
        assert!(Circuit::from_json(source).is_err());
    }
}
