//! NetCDF raster source for gridded daily climate data.
//!
//! Reads files laid out like NOAA nClimGrid-Daily: one-dimensional `lat`,
//! `lon` and `time` coordinate variables and data variables dimensioned
//! `(time, lat, lon)`. The whole file is read into a
//! [`climate_common::Raster`] and the file handle is closed before
//! [`NetCdfSource::open`] returns.
//!
//! # Missing data
//!
//! `_FillValue`, `missing_value` and non-finite cells become `f32::NAN`.
//! Packed variables are unpacked with `scale_factor` / `add_offset`.

pub mod error;
pub mod native;

pub use error::{NetCdfError, NetCdfResult};
pub use native::{read_raster, silence_hdf5_errors, NetCdfSource};
