//! Error types for raster access.

use thiserror::Error;

/// Result type alias using RasterError.
pub type RasterResult<T> = Result<T, RasterError>;

/// Errors raised while opening or validating a raster.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("failed to open raster {path}: {message}")]
    OpenFailed { path: String, message: String },

    #[error("missing variable: {0}")]
    MissingVariable(String),

    #[error("missing dimension or coordinate: {0}")]
    MissingDimension(String),

    #[error("shape mismatch for '{variable}': expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        variable: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("time axis is not strictly increasing at index {0}")]
    NonMonotonicTime(usize),

    #[error("invalid time units: {0}")]
    InvalidTimeUnits(String),

    #[error("time offset {0} cannot be represented as a timestamp")]
    InvalidTimeValue(f64),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl RasterError {
    /// Create an OpenFailed error.
    pub fn open_failed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OpenFailed {
            path: path.into(),
            message: message.into(),
        }
    }
}
