//! `OpenQASM` Emitter for Pairtomo
//!
//! Serializes tomography variants to `OpenQASM` text so they can be handed to
//! any execution service that accepts QASM. Register names are kept as
//! declared in the circuit, so a variant's measurement register appears under
//! its own name (`meas` by default) next to the preparation's registers.
//!
//! # Supported Features
//!
//! | Feature | QASM 3.0 | QASM 2.0 |
//! |---------|----------|----------|
//! | Register declarations | `qubit[2] q;`, `bit[2] meas;` | `qreg q[2];`, `creg meas[2];` |
//! | Loose bits | `qubit _q3;` | `qreg _q3[1];` |
//! | Standard gates | `h q[0];`, `cx q[0], q[1];` | same |
//! | Parameterized gates | `rz(pi/4) q[0];` | same |
//! | Measurements | `meas[0] = measure q[1];` | `measure q[1] -> meas[0];` |
//! | Barriers, reset | `barrier q[0], q[1];`, `reset q[0];` | same |
//!
//! The circuit name is written as a comment after the header, which carries
//! a variant's basis label into the file.
//!
//! # Example
//!
//! ```rust
//! use pairtomo_ir::Circuit;
//! use pairtomo_qasm3::emit;
//! use pairtomo_tomography::{QubitSelector, generate_pairwise_tomography_variants};
//!
//! let bell = Circuit::bell().unwrap();
//! let variants = generate_pairwise_tomography_variants(&bell, &QubitSelector::All).unwrap();
//!
//! let qasm = emit(variants[0].circuit()).unwrap();
//! assert!(qasm.starts_with("OPENQASM 3.0;"));
//! assert!(qasm.contains("// ('X', 'X')"));
//! assert!(qasm.contains("bit[2] meas;"));
//! assert!(qasm.contains("meas[1] = measure q[1];"));
//! ```

mod emitter;
mod error;

pub use emitter::{emit, emit_qasm2};
pub use error::{EmitError, EmitResult};
