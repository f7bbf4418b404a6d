//! The raster source interface.

use std::path::Path;
use std::sync::Arc;

use crate::error::RasterResult;
use crate::grid::Raster;

/// Opens one raster file and returns its contents.
///
/// Implementations must release any underlying file handle before `open`
/// returns, on success and on error alike; the returned [`Raster`] is fully
/// in memory and owned by the caller.
pub trait RasterSource: Send + Sync {
    fn open(&self, path: &Path) -> RasterResult<Raster>;
}

impl<S: RasterSource + ?Sized> RasterSource for Arc<S> {
    fn open(&self, path: &Path) -> RasterResult<Raster> {
        (**self).open(path)
    }
}

impl<S: RasterSource + ?Sized> RasterSource for Box<S> {
    fn open(&self, path: &Path) -> RasterResult<Raster> {
        (**self).open(path)
    }
}
