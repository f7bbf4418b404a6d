//! Error types for NetCDF reading.

use std::path::Path;

use climate_common::RasterError;
use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF reading.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// Error reported by libnetcdf
    #[error("NetCDF error: {0}")]
    Library(#[from] netcdf::Error),

    /// Missing required variable, dimension or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data layout
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Raster validation failure
    #[error(transparent)]
    Raster(#[from] RasterError),
}

impl NetCdfError {
    /// Convert into the source-agnostic raster error for `path`.
    pub fn into_raster_error(self, path: &Path) -> RasterError {
        match self {
            Self::Raster(err) => err,
            Self::MissingData(what) => RasterError::MissingVariable(format!(
                "{} in {}",
                what,
                path.display()
            )),
            other => RasterError::open_failed(path.display().to_string(), other.to_string()),
        }
    }
}
