//! Error types for geometry parsing and loading.

use thiserror::Error;

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Degenerate ring: {0}")]
    DegenerateRing(String),

    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(#[from] serde_json::Error),

    #[error("Feature {index} has no usable '{field}' property")]
    MissingIdentifier { index: usize, field: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
