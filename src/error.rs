//! Error types for the license key gate.

use thiserror::Error;

/// Gate-specific errors.
///
/// Malformed persisted data is deliberately absent: the stores recover from
/// it locally (reseeding defaults or clearing the session) and never surface
/// it as an error.
#[derive(Debug, Error)]
pub enum GateError {
    /// Underlying file I/O failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Batch generation count outside the accepted range.
    #[error("key count out of range: got {got}, expected {min}-{max}")]
    CountOutOfRange {
        /// The rejected count.
        got: usize,
        /// Inclusive lower bound.
        min: usize,
        /// Inclusive upper bound.
        max: usize,
    },
}

/// Result type for gate operations.
pub type GateResult<T> = Result<T, GateError>;
