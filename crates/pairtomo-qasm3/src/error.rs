//! Error types for the QASM emitter.

use pairtomo_ir::IrError;
use thiserror::Error;

/// Errors that can occur during emission.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmitError {
    /// The circuit failed validation before emission.
    #[error("Circuit error: {0}")]
    Circuit(#[from] IrError),

    /// A register name cannot be written as a QASM identifier.
    #[error("Register name '{0}' is not a valid QASM identifier")]
    InvalidIdentifier(String),
}

/// Result type for emission.
pub type EmitResult<T> = Result<T, EmitError>;
