//! Error types for tomography circuit generation.

use pairtomo_ir::{ClbitId, IrError};
use thiserror::Error;

/// Errors that can occur while generating or inspecting tomography circuits.
///
/// Circuit-level faults are not re-described here: they surface unchanged as
/// [`TomographyError::Ir`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TomographyError {
    /// Error raised by the circuit representation.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// The qubit selection resolved to no qubits.
    #[error("No qubits selected for measurement")]
    EmptySelection,

    /// A selector string could not be parsed.
    #[error("Invalid qubit selector: {0}")]
    InvalidSelector(String),

    /// A variant label could not be parsed back into bases.
    #[error("Invalid basis label: {0}")]
    InvalidLabel(String),

    /// The gates preceding a measurement match no basis recipe.
    #[error("Measurement into {clbit} is preceded by [{}], which matches no basis", .gates.join(", "))]
    UnrecognizedMeasurement {
        /// The classical bit that was written.
        clbit: ClbitId,
        /// Names of the rotation gates found before the measurement.
        gates: Vec<String>,
    },

    /// A classical bit of the measurement register is never written.
    #[error("Classical bit {0} is never measured into")]
    UnmeasuredBit(ClbitId),

    /// More qubits than an operation can handle.
    #[error("{count} qubits exceed the limit of {max}")]
    TooManyQubits {
        /// Requested number of qubits.
        count: usize,
        /// Largest supported number.
        max: usize,
    },
}

/// Result type for tomography operations.
pub type TomographyResult<T> = Result<T, TomographyError>;
