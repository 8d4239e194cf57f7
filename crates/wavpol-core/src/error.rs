//! Error types for the polarization engine.

use thiserror::Error;

/// Errors returned by the polarization engine.
///
/// Numeric degeneracies (zero power, NaN samples, collinear geometry) are
/// never reported here; they surface as NaN in the affected output cells.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WavpolError {
    /// Analysis parameters violate a precondition.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Which precondition failed.
        reason: String,
    },

    /// Time and channel arrays have different lengths.
    #[error("length mismatch: time={time}, x={x}, y={y}, z={z}")]
    LengthMismatch {
        /// Number of time stamps.
        time: usize,
        /// Number of x samples.
        x: usize,
        /// Number of y samples.
        y: usize,
        /// Number of z samples.
        z: usize,
    },

    /// The time axis has more discontinuities than the engine will batch.
    #[error("too many batches: {discontinuities} discontinuities exceeds limit of {limit}")]
    BatchOverflow {
        /// Discontinuities found in the time axis.
        discontinuities: usize,
        /// Ceiling that was exceeded.
        limit: usize,
    },
}

impl WavpolError {
    /// Create an invalid configuration error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        WavpolError::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// True for the batch-count ceiling abort.
    pub fn is_batch_overflow(&self) -> bool {
        matches!(self, WavpolError::BatchOverflow { .. })
    }
}
