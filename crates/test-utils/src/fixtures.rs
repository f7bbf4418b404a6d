//! Common fixtures: boundary shapes and an in-memory raster source.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use climate_common::{Raster, RasterError, RasterResult, RasterSource};
use geometry::{MultiPolygon, Polygon};

/// Approximate Louisiana extent as `(min_lon, min_lat, max_lon, max_lat)`.
pub const LOUISIANA_BBOX: (f64, f64, f64, f64) = (-94.05, 28.9, -88.8, 33.02);

/// Rectangle boundary.
pub fn rectangle(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> MultiPolygon {
    Polygon::rectangle(min_lon, min_lat, max_lon, max_lat).into()
}

/// [`RasterSource`] serving prepared rasters keyed by path.
///
/// Paths registered with [`MemorySource::with_failure`] fail to open, as
/// do paths that were never registered.
#[derive(Debug, Default)]
pub struct MemorySource {
    rasters: HashMap<PathBuf, Raster>,
    failing: HashSet<PathBuf>,
    opens: AtomicUsize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raster(mut self, path: impl Into<PathBuf>, raster: Raster) -> Self {
        self.rasters.insert(path.into(), raster);
        self
    }

    pub fn with_failure(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing.insert(path.into());
        self
    }

    /// Number of `open` calls so far, successful or not.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::Relaxed)
    }
}

impl RasterSource for MemorySource {
    fn open(&self, path: &Path) -> RasterResult<Raster> {
        self.opens.fetch_add(1, Ordering::Relaxed);

        if self.failing.contains(path) {
            return Err(RasterError::open_failed(
                path.display().to_string(),
                "simulated read failure",
            ));
        }

        self.rasters
            .get(path)
            .cloned()
            .ok_or_else(|| RasterError::open_failed(path.display().to_string(), "no such raster"))
    }
}
