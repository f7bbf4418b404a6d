//! In-memory raster representation.
//!
//! A [`Raster`] holds everything read from one gridded file: the coordinate
//! axes and one or more `(time, lat, lon)` variables. Cells without a valid
//! reading carry `f32::NAN`.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use chrono::NaiveDateTime;
use ndarray::Array3;

use crate::bbox::BoundingBox;
use crate::error::{RasterError, RasterResult};

/// The coordinate axes of a raster: ordered latitudes, longitudes and
/// strictly increasing timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateGrid {
    lats: Vec<f64>,
    lons: Vec<f64>,
    times: Vec<NaiveDateTime>,
}

impl CoordinateGrid {
    /// Create a grid, rejecting a time axis that is not strictly increasing.
    pub fn new(lats: Vec<f64>, lons: Vec<f64>, times: Vec<NaiveDateTime>) -> RasterResult<Self> {
        if let Some(idx) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(RasterError::NonMonotonicTime(idx + 1));
        }

        Ok(Self { lats, lons, times })
    }

    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    /// Array shape `(time, lat, lon)` implied by the axes.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.times.len(), self.lats.len(), self.lons.len())
    }

    /// First and last timestamp, or `None` for an empty time axis.
    pub fn time_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((*self.times.first()?, *self.times.last()?))
    }

    /// Spatial extent of the cell coordinates.
    pub fn bbox(&self) -> Option<BoundingBox> {
        let min_x = self.lons.iter().copied().reduce(f64::min)?;
        let max_x = self.lons.iter().copied().reduce(f64::max)?;
        let min_y = self.lats.iter().copied().reduce(f64::min)?;
        let max_y = self.lats.iter().copied().reduce(f64::max)?;
        Some(BoundingBox::new(min_x, min_y, max_x, max_y))
    }

    /// Hash of the latitude and longitude axes.
    ///
    /// Two grids with bit-identical spatial axes share a fingerprint no
    /// matter how their time axes differ, so masks keyed on it can be reused
    /// across files from the same data source.
    pub fn spatial_fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.lats.len().hash(&mut hasher);
        for lat in &self.lats {
            lat.to_bits().hash(&mut hasher);
        }
        self.lons.len().hash(&mut hasher);
        for lon in &self.lons {
            lon.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }
}

/// One raster file's contents, exclusively owned by whoever opened it.
#[derive(Debug, Clone)]
pub struct Raster {
    grid: CoordinateGrid,
    variables: HashMap<String, Array3<f32>>,
}

impl Raster {
    /// Create a raster with no variables yet.
    pub fn new(grid: CoordinateGrid) -> Self {
        Self {
            grid,
            variables: HashMap::new(),
        }
    }

    /// Attach a variable, checking its shape against the coordinate axes.
    pub fn with_variable(mut self, name: impl Into<String>, data: Array3<f32>) -> RasterResult<Self> {
        let name = name.into();
        let (t, y, x) = self.grid.shape();
        if data.dim() != (t, y, x) {
            return Err(RasterError::ShapeMismatch {
                variable: name,
                expected: vec![t, y, x],
                found: data.shape().to_vec(),
            });
        }

        self.variables.insert(name, data);
        Ok(self)
    }

    pub fn grid(&self) -> &CoordinateGrid {
        &self.grid
    }

    /// Look up a variable by name.
    pub fn variable(&self, name: &str) -> RasterResult<&Array3<f32>> {
        self.variables
            .get(name)
            .ok_or_else(|| RasterError::MissingVariable(name.to_string()))
    }

    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    pub fn time_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.grid.time_range()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_grid_rejects_unordered_times() {
        let err = CoordinateGrid::new(vec![30.0], vec![-90.0], vec![day(2), day(1)]).unwrap_err();
        assert!(matches!(err, RasterError::NonMonotonicTime(1)));

        let err = CoordinateGrid::new(vec![30.0], vec![-90.0], vec![day(1), day(1)]).unwrap_err();
        assert!(matches!(err, RasterError::NonMonotonicTime(1)));
    }

    #[test]
    fn test_grid_shape_and_range() {
        let grid = CoordinateGrid::new(vec![30.0, 31.0], vec![-92.0, -91.0, -90.0], vec![day(1), day(2)])
            .unwrap();
        assert_eq!(grid.shape(), (2, 2, 3));
        assert_eq!(grid.time_range(), Some((day(1), day(2))));
        assert_eq!(grid.bbox(), Some(BoundingBox::new(-92.0, 30.0, -90.0, 31.0)));
    }

    #[test]
    fn test_empty_time_axis_has_no_range() {
        let grid = CoordinateGrid::new(vec![30.0], vec![-90.0], vec![]).unwrap();
        assert!(grid.time_range().is_none());
    }

    #[test]
    fn test_fingerprint_ignores_time() {
        let a = CoordinateGrid::new(vec![30.0, 31.0], vec![-91.0], vec![day(1)]).unwrap();
        let b = CoordinateGrid::new(vec![30.0, 31.0], vec![-91.0], vec![day(5), day(6)]).unwrap();
        let c = CoordinateGrid::new(vec![30.0, 31.5], vec![-91.0], vec![day(1)]).unwrap();

        assert_eq!(a.spatial_fingerprint(), b.spatial_fingerprint());
        assert_ne!(a.spatial_fingerprint(), c.spatial_fingerprint());
    }

    #[test]
    fn test_variable_shape_checked() {
        let grid = CoordinateGrid::new(vec![30.0, 31.0], vec![-91.0], vec![day(1)]).unwrap();

        let ok = Raster::new(grid.clone()).with_variable("tmax", Array3::zeros((1, 2, 1)));
        assert!(ok.is_ok());

        let err = Raster::new(grid)
            .with_variable("tmax", Array3::zeros((1, 1, 2)))
            .unwrap_err();
        assert!(matches!(err, RasterError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_missing_variable() {
        let grid = CoordinateGrid::new(vec![30.0], vec![-91.0], vec![day(1)]).unwrap();
        let raster = Raster::new(grid);
        assert!(matches!(
            raster.variable("tmax"),
            Err(RasterError::MissingVariable(name)) if name == "tmax"
        ));
    }
}
