//! Error types for CNF compilation and solving.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building, persisting or solving a CNF encoding.
#[derive(Error, Debug)]
pub enum CnfxError {
    /// Invalid encoder configuration or mismatched operand shapes
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A constant does not fit the configured digit width
    #[error("value {value} cannot be encoded: {reason}")]
    EncodingRange {
        /// The offending input
        value: f64,
        /// Why it was rejected
        reason: String,
    },

    /// Underlying file or pipe failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The external solver could not be started or terminated abnormally
    #[error("solver `{program}` unavailable: {reason}")]
    SolverUnavailable {
        /// Program that was invoked
        program: PathBuf,
        /// Failure description
        reason: String,
    },

    /// The solver printed a model that cannot be trusted
    #[error("malformed model: {0}")]
    MalformedModel(String),

    /// The clause body on disk disagrees with the clause counter
    #[error("clause count mismatch: counter says {expected}, file holds {found}")]
    ClauseCountMismatch {
        /// Clauses recorded by the store
        expected: usize,
        /// Clause lines found in the file body
        found: usize,
    },

    /// Invalid DIMACS input
    #[error("DIMACS error: {0}")]
    Dimacs(String),

    /// A value handle that this encoder never issued
    #[error("unknown value handle #{0}")]
    UnknownValue(usize),

    /// A value handle issued by a different encoder
    #[error("value handle #{0} belongs to another encoder")]
    ForeignValue(usize),
}

impl CnfxError {
    /// Shorthand for [`CnfxError::Configuration`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Shorthand for [`CnfxError::EncodingRange`].
    pub fn range(value: f64, reason: impl Into<String>) -> Self {
        Self::EncodingRange {
            value,
            reason: reason.into(),
        }
    }
}

/// Result type used across the cnfx crates.
pub type Result<T> = std::result::Result<T, CnfxError>;
