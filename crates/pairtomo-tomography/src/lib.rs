//! Pairwise Quantum State Tomography
//!
//! Given a preparation circuit and a choice of qubits, this crate builds the
//! family of measurement circuits from which every two-qubit reduced density
//! matrix can be estimated. Each qubit is measured in the X, Y or Z Pauli
//! basis; a ternary coloring of qubit positions keeps the number of circuits
//! at `3 + 6 * ceil(log3 N)` while still measuring every pair of qubits in all
//! nine basis combinations.
//!
//! # Core Components
//!
//! - **Bases**: [`MeasurementBasis`] and the six [`BasisSequence`] permutations
//! - **Selection**: [`QubitSelector`] flattens registers or qubit lists
//! - **Settings**: [`measurement_settings`] enumerates per-qubit basis assignments
//! - **Generation**: [`PairwiseTomography`] instruments copies of the circuit
//! - **Coverage**: [`verify_pairwise_coverage`] checks the generated circuits
//!
//! # Example
//!
//! ```rust
//! use pairtomo_ir::Circuit;
//! use pairtomo_tomography::{QubitSelector, generate_pairwise_tomography_variants};
//!
//! let bell = Circuit::bell().unwrap();
//! let variants = generate_pairwise_tomography_variants(&bell, &QubitSelector::All).unwrap();
//!
//! let labels: Vec<_> = variants.iter().map(|v| v.label()).collect();
//! assert_eq!(labels.len(), 9);
//! assert_eq!(labels[0], "('X', 'X')");
//! assert_eq!(labels[3], "('X', 'Y')");
//! ```
//!
//! # Basis Recipes
//!
//! | Basis | Gates before measurement |
//! |-------|--------------------------|
//! | X | `h` |
//! | Y | `sdg`, `h` |
//! | Z | none |

pub mod basis;
pub mod coloring;
pub mod coverage;
pub mod error;
pub mod generator;
pub mod label;
pub mod selector;

pub use basis::{BasisSequence, MeasurementBasis};
pub use coloring::{
    MeasurementSetting, SettingOrigin, expected_variant_count, measurement_settings, num_layers,
    setting_origins, ternary_digit,
};
pub use coverage::{
    CoverageReport, MAX_COVERAGE_POSITIONS, MissingPair, applied_bases, verify_pairwise_coverage,
};
pub use error::{TomographyError, TomographyResult};
pub use generator::{
    DEFAULT_REGISTER_NAME, PairwiseTomography, TomographyVariant,
    generate_pairwise_tomography_variants, pairwise_tomography_circuits,
};
pub use label::{compact_label, format_label, parse_label};
pub use selector::QubitSelector;
