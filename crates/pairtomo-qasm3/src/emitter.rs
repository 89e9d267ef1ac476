//! QASM emitter for serializing circuits.

use pairtomo_ir::{Circuit, ClbitId, Instruction, InstructionKind, QubitId, StandardGate};

use crate::error::{EmitError, EmitResult};

/// Words that cannot name a register in either dialect.
const RESERVED: &[&str] = &[
    // Declarations and statements
    "OPENQASM", "include", "defcalgrammar", "def", "cal", "defcal", "gate", "opaque", "extern",
    "box", "let", "break", "continue", "if", "else", "end", "return", "for", "while", "in",
    "switch", "case", "default", "nop", "pragma", "input", "output", "const", "readonly",
    "mutable", "measure", "reset", "barrier", "delay",
    // Types
    "qreg", "qubit", "creg", "bool", "bit", "int", "uint", "float", "angle", "complex", "array",
    "void", "duration", "stretch", "dim",
    // Modifiers and built-ins
    "gphase", "inv", "pow", "ctrl", "negctrl", "durationof", "sizeof", "U", "CX",
    // Literals and constants
    "true", "false", "pi", "tau", "euler", "im",
    // Functions
    "sin", "cos", "tan", "exp", "ln", "sqrt", "arcsin", "arccos", "arctan", "ceiling", "floor",
    "log", "mod", "popcount", "rotl", "rotr", "real", "imag",
];

/// Emit a circuit as OpenQASM 3.0 source code.
pub fn emit(circuit: &Circuit) -> EmitResult<String> {
    Emitter::new(Dialect::Qasm3).emit_circuit(circuit)
}

/// Emit a circuit as OpenQASM 2.0 source code.
///
/// Register declarations use `qreg`/`creg` and measurements use
/// `measure q[i] -> c[j];`. Loose bits are declared as one-element registers.
pub fn emit_qasm2(circuit: &Circuit) -> EmitResult<String> {
    Emitter::new(Dialect::Qasm2).emit_circuit(circuit)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Qasm2,
    Qasm3,
}

struct Emitter {
    dialect: Dialect,
    output: String,
}

impl Emitter {
    fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            output: String::new(),
        }
    }

    fn emit_circuit(mut self, circuit: &Circuit) -> EmitResult<String> {
        circuit.validate()?;
        for name in circuit
            .qregs()
            .iter()
            .map(|r| r.name())
            .chain(circuit.cregs().iter().map(|r| r.name()))
        {
            check_identifier(name)?;
        }

        match self.dialect {
            Dialect::Qasm3 => {
                self.writeln("OPENQASM 3.0;");
                self.writeln("include \"stdgates.inc\";");
            }
            Dialect::Qasm2 => {
                self.writeln("OPENQASM 2.0;");
                self.writeln("include \"qelib1.inc\";");
            }
        }
        self.writeln("");

        if !circuit.name().is_empty() {
            let name = circuit.name().replace(['\n', '\r'], " ");
            self.writeln(&format!("// {name}"));
        }

        // stdgates.inc has no sxdg.
        let uses_sxdg = circuit
            .instructions()
            .iter()
            .any(|i| matches!(i.as_gate(), Some(StandardGate::SXdg)));
        if self.dialect == Dialect::Qasm3 && uses_sxdg {
            self.writeln("gate sxdg a { inv @ sx a; }");
        }

        self.emit_declarations(circuit);
        self.writeln("");

        for instruction in circuit.instructions() {
            self.emit_instruction(circuit, instruction);
        }

        Ok(self.output)
    }

    fn emit_declarations(&mut self, circuit: &Circuit) {
        for reg in circuit.qregs() {
            let line = match self.dialect {
                Dialect::Qasm3 => format!("qubit[{}] {};", reg.len(), reg.name()),
                Dialect::Qasm2 => format!("qreg {}[{}];", reg.name(), reg.len()),
            };
            self.writeln(&line);
        }
        for qubit in circuit.qubits().iter().filter(|q| q.register.is_none()) {
            let line = match self.dialect {
                Dialect::Qasm3 => format!("qubit _q{};", qubit.id.0),
                Dialect::Qasm2 => format!("qreg _q{}[1];", qubit.id.0),
            };
            self.writeln(&line);
        }
        for reg in circuit.cregs() {
            let line = match self.dialect {
                Dialect::Qasm3 => format!("bit[{}] {};", reg.len(), reg.name()),
                Dialect::Qasm2 => format!("creg {}[{}];", reg.name(), reg.len()),
            };
            self.writeln(&line);
        }
        for clbit in circuit.clbits().iter().filter(|c| c.register.is_none()) {
            let line = match self.dialect {
                Dialect::Qasm3 => format!("bit _c{};", clbit.id.0),
                Dialect::Qasm2 => format!("creg _c{}[1];", clbit.id.0),
            };
            self.writeln(&line);
        }
    }

    fn emit_instruction(&mut self, circuit: &Circuit, instruction: &Instruction) {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let name = self.gate_name(gate);
                let params: Vec<String> = gate.parameters().into_iter().map(format_angle).collect();
                let qubits = self.qubit_list(circuit, &instruction.qubits);

                if params.is_empty() {
                    self.writeln(&format!("{name} {qubits};"));
                } else {
                    self.writeln(&format!("{name}({}) {qubits};", params.join(", ")));
                }
            }

            InstructionKind::Measure => {
                for (&q, &c) in instruction.qubits.iter().zip(&instruction.clbits) {
                    let qubit = self.qubit_operand(circuit, q);
                    let clbit = self.clbit_operand(circuit, c);
                    let line = match self.dialect {
                        Dialect::Qasm3 => format!("{clbit} = measure {qubit};"),
                        Dialect::Qasm2 => format!("measure {qubit} -> {clbit};"),
                    };
                    self.writeln(&line);
                }
            }

            InstructionKind::Reset => {
                let qubits = self.qubit_list(circuit, &instruction.qubits);
                self.writeln(&format!("reset {qubits};"));
            }

            InstructionKind::Barrier => {
                let qubits = self.qubit_list(circuit, &instruction.qubits);
                if qubits.is_empty() {
                    self.writeln("barrier;");
                } else {
                    self.writeln(&format!("barrier {qubits};"));
                }
            }
        }
    }

    fn gate_name(&self, gate: &StandardGate) -> &'static str {
        match (self.dialect, gate) {
            (Dialect::Qasm3, StandardGate::U(..)) => "U",
            (Dialect::Qasm2, StandardGate::U(..)) => "u3",
            _ => gate.name(),
        }
    }

    fn qubit_operand(&self, circuit: &Circuit, id: QubitId) -> String {
        let member = circuit
            .qubit(id)
            .and_then(|q| q.register.as_deref().zip(q.index));
        match (member, self.dialect) {
            (Some((reg, idx)), _) => format!("{reg}[{idx}]"),
            (None, Dialect::Qasm3) => format!("_q{}", id.0),
            (None, Dialect::Qasm2) => format!("_q{}[0]", id.0),
        }
    }

    fn clbit_operand(&self, circuit: &Circuit, id: ClbitId) -> String {
        let member = circuit
            .clbit(id)
            .and_then(|c| c.register.as_deref().zip(c.index));
        match (member, self.dialect) {
            (Some((reg, idx)), _) => format!("{reg}[{idx}]"),
            (None, Dialect::Qasm3) => format!("_c{}", id.0),
            (None, Dialect::Qasm2) => format!("_c{}[0]", id.0),
        }
    }

    fn qubit_list(&self, circuit: &Circuit, qubits: &[QubitId]) -> String {
        qubits
            .iter()
            .map(|&q| self.qubit_operand(circuit, q))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

fn check_identifier(name: &str) -> EmitResult<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid = valid_start
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !RESERVED.contains(&name);
    if valid {
        Ok(())
    } else {
        Err(EmitError::InvalidIdentifier(name.to_string()))
    }
}

/// Render an angle, recognizing common fractions of pi.
fn format_angle(v: f64) -> String {
    use std::f64::consts::PI;

    const TOLERANCE: f64 = 1e-10;
    let named = [
        (PI, "pi"),
        (-PI, "-pi"),
        (PI / 2.0, "pi/2"),
        (-PI / 2.0, "-pi/2"),
        (PI / 4.0, "pi/4"),
        (-PI / 4.0, "-pi/4"),
    ];
    named
        .iter()
        .find(|(value, _)| (v - value).abs() < TOLERANCE)
        .map_or_else(|| format!("{v:.6}"), |(_, text)| (*text).to_string())
}
