//! Synthetic raster generators.
//!
//! These produce small, predictable grids so reducers and the aggregation
//! pipeline can be checked against hand-computed values.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use climate_common::{CoordinateGrid, Raster};
use ndarray::Array3;

/// Midnight timestamps for `days` consecutive days starting at `start`.
pub fn daily_times(start: NaiveDate, days: usize) -> Vec<NaiveDateTime> {
    (0..days)
        .map(|d| {
            (start + Duration::days(d as i64))
                .and_hms_opt(0, 0, 0)
                .expect("midnight is always valid")
        })
        .collect()
}

/// Evenly spaced coordinate axis: `start, start + step, ...` with `n` values.
pub fn uniform_axis(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Convenience `NaiveDate` constructor for tests.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Grid with the given axes and `days` daily steps from `start`.
pub fn test_grid(lats: Vec<f64>, lons: Vec<f64>, start: NaiveDate, days: usize) -> CoordinateGrid {
    CoordinateGrid::new(lats, lons, daily_times(start, days)).expect("valid test grid")
}

/// Raster whose `variable` value at `(t, lat_idx, lon_idx)` is `f(t, lat_idx, lon_idx)`.
pub fn raster_from_fn<F>(grid: CoordinateGrid, variable: &str, f: F) -> Raster
where
    F: Fn(usize, usize, usize) -> f32,
{
    let data = Array3::from_shape_fn(grid.shape(), |(t, i, j)| f(t, i, j));
    Raster::new(grid)
        .with_variable(variable, data)
        .expect("generated data matches grid shape")
}

/// Raster filled with a single value.
pub fn constant_raster(grid: CoordinateGrid, variable: &str, value: f32) -> Raster {
    raster_from_fn(grid, variable, |_, _, _| value)
}

/// Raster whose value depends only on the day index: `values[t]` everywhere.
pub fn daily_constant_raster(grid: CoordinateGrid, variable: &str, values: &[f32]) -> Raster {
    assert_eq!(
        values.len(),
        grid.times().len(),
        "one value per time step required"
    );
    raster_from_fn(grid, variable, |t, _, _| values[t])
}
