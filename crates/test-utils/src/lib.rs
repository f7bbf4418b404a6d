//! Shared test utilities for the area-climate workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Test data path helpers and skip macros for optional NetCDF samples
//! - Synthetic raster generators
//! - An in-memory [`RasterSource`](climate_common::RasterSource)
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Macro to skip a test if the required file is not found.
///
/// Real nClimGrid files are large and not committed, so tests that need one
/// return early with a skip message when it is absent.
///
/// ```ignore
/// let path = require_test_file!("ncdd-202301-grd-scaled.nc");
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: Test file '{}' not found. Download test data or set TEST_DATA_DIR.",
                    $name
                );
                return;
            }
        }
    }};
}

/// Macro for approximate floating-point equality assertions.
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Approximate equality for a series of optional values. Both sides must
/// have the same length and the same missing positions.
///
/// ```ignore
/// assert_series_approx_eq!(series, [Some(32.0), None], 1e-9);
/// ```
#[macro_export]
macro_rules! assert_series_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: Vec<Option<f64>> = $left.iter().copied().collect();
        let right: Vec<Option<f64>> = $right.iter().copied().collect();
        assert_eq!(left.len(), right.len(), "series lengths differ: {:?} vs {:?}", left, right);
        for (i, (l, r)) in left.iter().zip(right.iter()).enumerate() {
            match (l, r) {
                (Some(l), Some(r)) => $crate::assert_approx_eq!(*l, *r, $epsilon),
                (None, None) => {}
                _ => panic!("assertion failed: series differ at index {}: {:?} vs {:?}", i, l, r),
            }
        }
    }};
}
