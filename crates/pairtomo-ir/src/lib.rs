//! Pairtomo Circuit Representation
//!
//! This crate provides the circuit value type that the tomography generator
//! copies and instruments. A [`Circuit`] is an ordered instruction list over
//! named quantum and classical registers; cloning it yields a fully
//! independent circuit, so every measurement variant can be built from its
//! own copy of the preparation circuit.
//!
//! # Core Components
//!
//! - **Bits**: [`QubitId`], [`ClbitId`] handles plus [`Qubit`], [`Clbit`] with
//!   register membership
//! - **Registers**: [`QuantumRegister`], [`ClassicalRegister`]
//! - **Gates**: [`StandardGate`] for the built-in gate set
//! - **Instructions**: [`Instruction`] combining an operation with its operands
//! - **Circuit**: [`Circuit`] builder API with operand validation
//!
//! # Example: Preparing a Bell State
//!
//! ```rust
//! use pairtomo_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell", 2, 0);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let creg = circuit.add_creg("meas", 2).unwrap();
//! circuit.measure(QubitId(0), creg.get(0).unwrap()).unwrap();
//! circuit.measure(QubitId(1), creg.get(1).unwrap()).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.measurements().count(), 2);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg` | 1 | S and S-dagger gates |
//! | `T`, `Tdg` | 1 | T and T-dagger gates |
//! | `SX`, `SXdg` | 1 | sqrt(X) and its inverse |
//! | `Rx`, `Ry`, `Rz`, `P` | 1 | Rotation and phase gates |
//! | `U` | 1 | Universal single-qubit gate U(θ,φ,λ) |
//! | `CX`, `CY`, `CZ`, `CH` | 2 | Controlled gates |
//! | `CP`, `CRz` | 2 | Controlled phase and Z rotation |
//! | `Swap` | 2 | SWAP gate |
//! | `CCX`, `CSwap` | 3 | Toffoli and Fredkin gates |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;
pub mod register;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{Clbit, ClbitId, Qubit, QubitId};
pub use register::{ClassicalRegister, QuantumRegister};
