//! Error types for area processing.

use std::path::{Path, PathBuf};

use climate_common::RasterError;
use thiserror::Error;

/// Errors that can occur while aggregating rasters to areas.
#[derive(Error, Debug)]
pub enum ProcessorError {
    /// An area references a unit the geometry registry does not know.
    #[error("area '{area}' references unknown unit '{unit_id}'")]
    UnknownUnit { area: String, unit_id: String },

    /// An area was configured without any units.
    #[error("area '{0}' has no units")]
    EmptyArea(String),

    /// A raster file could not be opened or lacks the expected structure.
    #[error("failed to process {}: {source}", .path.display())]
    FileTask {
        path: PathBuf,
        #[source]
        source: RasterError,
    },

    /// Reduction of an opened raster file failed.
    #[error("failed to reduce {}: {source}", .path.display())]
    FileReduce {
        path: PathBuf,
        #[source]
        source: Box<ProcessorError>,
    },

    /// One or more file tasks failed and the run was aborted.
    #[error("{} of {total} raster files failed; first: {}", .failed.len(), first_failure(.failed))]
    FailedFiles {
        failed: Vec<FailedFile>,
        total: usize,
    },

    /// Mask and data grid disagree on spatial shape.
    #[error("mask shape {mask:?} does not match data shape {data:?}")]
    MaskShape {
        mask: (usize, usize),
        data: (usize, usize),
    },

    /// Tables or series that should line up do not.
    #[error("table layout mismatch: {0}")]
    TableLayout(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    InvalidConfig(String),

    /// Worker pool could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(String),

    /// Report could not be written.
    #[error("report error: {0}")]
    Report(String),
}

impl ProcessorError {
    /// Create a FileTask error.
    pub fn file_task(path: impl Into<PathBuf>, source: RasterError) -> Self {
        Self::FileTask {
            path: path.into(),
            source,
        }
    }

    /// Attach the raster file being processed to a reduction error.
    pub fn file_reduce(path: impl Into<PathBuf>, source: ProcessorError) -> Self {
        Self::FileReduce {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// The raster file this error is about, if any.
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            Self::FileTask { path, .. } | Self::FileReduce { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a TableLayout error.
    pub fn table_layout(msg: impl Into<String>) -> Self {
        Self::TableLayout(msg.into())
    }
}

impl From<std::io::Error> for ProcessorError {
    fn from(err: std::io::Error) -> Self {
        Self::Report(err.to_string())
    }
}

impl From<csv::Error> for ProcessorError {
    fn from(err: csv::Error) -> Self {
        Self::Report(err.to_string())
    }
}

impl From<rayon::ThreadPoolBuildError> for ProcessorError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Self::ThreadPool(err.to_string())
    }
}

/// A raster file whose task failed, with the rendered cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFile {
    pub path: PathBuf,
    pub reason: String,
}

fn first_failure(failed: &[FailedFile]) -> String {
    failed
        .first()
        .map(|f| format!("{} ({})", f.path.display(), f.reason))
        .unwrap_or_default()
}

/// Result type for area processor operations.
pub type Result<T> = std::result::Result<T, ProcessorError>;
