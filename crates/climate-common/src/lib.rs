//! Common types shared across the area-climate workspace.
//!
//! - [`Raster`] / [`CoordinateGrid`]: one gridded file held in memory
//! - [`RasterSource`]: how a raster file on disk becomes a [`Raster`]
//! - [`AreaSet`]: the statically configured regions of interest
//! - CF-convention time decoding for NetCDF time axes

pub mod area;
pub mod bbox;
pub mod error;
pub mod grid;
pub mod source;
pub mod time;

pub use area::{AreaDefinition, AreaSet};
pub use bbox::BoundingBox;
pub use error::{RasterError, RasterResult};
pub use grid::{CoordinateGrid, Raster};
pub use source::RasterSource;
pub use time::{decode_cf_times, CfTimeUnits, TimeUnit};
