//! Native NetCDF reading using the netcdf library.
//!
//! Files are opened by path, read in full and closed before the raster is
//! returned, so no library handle is held while masks are built or areas
//! are reduced.

use std::path::Path;
use std::sync::Once;

use climate_common::{decode_cf_times, CoordinateGrid, Raster, RasterResult, RasterSource};
use ndarray::Array3;
use tracing::debug;

use crate::error::{NetCdfError, NetCdfResult};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when checking for optional
/// attributes that don't exist). This function disables that output by
/// calling H5Eset_auto2 with null handlers. It only needs to be called once
/// per process, but is safe to call multiple times.
///
/// Call this early in `main()` before any HDF5/NetCDF operations occur.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// [`RasterSource`] backed by NetCDF files on local disk.
#[derive(Debug, Clone)]
pub struct NetCdfSource {
    variable: String,
    lat_name: String,
    lon_name: String,
    time_name: String,
}

impl NetCdfSource {
    /// Source reading `variable` with the nClimGrid coordinate names
    /// `lat`, `lon` and `time`.
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            lat_name: "lat".to_string(),
            lon_name: "lon".to_string(),
            time_name: "time".to_string(),
        }
    }

    /// Override the coordinate variable names.
    pub fn with_coordinate_names(
        mut self,
        lat: impl Into<String>,
        lon: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        self.lat_name = lat.into();
        self.lon_name = lon.into();
        self.time_name = time.into();
        self
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }
}

impl RasterSource for NetCdfSource {
    fn open(&self, path: &Path) -> RasterResult<Raster> {
        read_raster(path, self).map_err(|e| e.into_raster_error(path))
    }
}

/// Read the coordinate axes and the configured data variable of one file.
pub fn read_raster(path: &Path, source: &NetCdfSource) -> NetCdfResult<Raster> {
    silence_hdf5_errors();

    let file = netcdf::open(path)?;

    let lats = read_axis(&file, &source.lat_name)?;
    let lons = read_axis(&file, &source.lon_name)?;

    let time_var = file
        .variable(&source.time_name)
        .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", source.time_name)))?;
    let units = get_string_attr(&time_var, "units")
        .ok_or_else(|| NetCdfError::MissingData(format!("{} units attribute", source.time_name)))?;
    let offsets: Vec<f64> = time_var.get_values(..)?;
    let times = decode_cf_times(&units, &offsets)?;

    let data_var = file
        .variable(&source.variable)
        .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", source.variable)))?;

    let dims: Vec<String> = data_var.dimensions().iter().map(|d| d.name()).collect();
    let expected = [&source.time_name, &source.lat_name, &source.lon_name];
    if dims.len() != 3 || dims.iter().zip(expected).any(|(found, want)| found != want) {
        return Err(NetCdfError::InvalidFormat(format!(
            "{} must be dimensioned ({}, {}, {}), found ({})",
            source.variable,
            source.time_name,
            source.lat_name,
            source.lon_name,
            dims.join(", ")
        )));
    }

    let raw: Vec<f32> = data_var.get_values(..)?;

    let scale_factor = get_f32_attr(&data_var, "scale_factor").unwrap_or(1.0);
    let add_offset = get_f32_attr(&data_var, "add_offset").unwrap_or(0.0);
    let fill_value = get_f32_attr(&data_var, "_FillValue");
    let missing_value = get_f32_attr(&data_var, "missing_value");

    let values: Vec<f32> = raw
        .into_iter()
        .map(|val| {
            if !val.is_finite() || Some(val) == fill_value || Some(val) == missing_value {
                f32::NAN
            } else {
                val * scale_factor + add_offset
            }
        })
        .collect();

    drop(data_var);
    drop(time_var);
    drop(file);

    let shape = (times.len(), lats.len(), lons.len());
    let data = Array3::from_shape_vec(shape, values).map_err(|e| {
        NetCdfError::InvalidFormat(format!("{} has unexpected size: {}", source.variable, e))
    })?;

    debug!(
        path = %path.display(),
        variable = %source.variable,
        times = shape.0,
        lats = shape.1,
        lons = shape.2,
        "Read NetCDF raster"
    );

    let grid = CoordinateGrid::new(lats, lons, times)?;
    Ok(Raster::new(grid).with_variable(source.variable.clone(), data)?)
}

// =============================================================================
// Internal helpers
// =============================================================================

fn read_axis(file: &netcdf::File, name: &str) -> NetCdfResult<Vec<f64>> {
    let var = file
        .variable(name)
        .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", name)))?;
    if var.dimensions().len() != 1 {
        return Err(NetCdfError::InvalidFormat(format!(
            "{} must be one-dimensional",
            name
        )));
    }
    Ok(var.get_values(..)?)
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn get_f32_attr(var: &netcdf::Variable, name: &str) -> Option<f32> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f32::try_from(attr_value).ok()
}

fn get_string_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        netcdf::AttributeValue::Strs(mut s) if !s.is_empty() => Some(s.swap_remove(0)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use climate_common::RasterError;

    #[test]
    fn test_default_coordinate_names() {
        let source = NetCdfSource::new("tmax");
        assert_eq!(source.variable(), "tmax");
        assert_eq!(source.lat_name, "lat");
        assert_eq!(source.time_name, "time");

        let source = source.with_coordinate_names("y", "x", "t");
        assert_eq!(source.lon_name, "x");
    }

    #[test]
    fn test_missing_file_is_open_failure() {
        let source = NetCdfSource::new("tmax");
        let err = source
            .open(Path::new("/nonexistent/ncdd-202301-grd-scaled.nc"))
            .unwrap_err();
        assert!(matches!(err, RasterError::OpenFailed { .. }));
    }

    #[test]
    fn test_silence_is_idempotent() {
        silence_hdf5_errors();
        silence_hdf5_errors();
    }
}
