//! Decoding of small NetCDF files written on the fly.

use std::path::Path;

use climate_common::{RasterError, RasterSource};
use netcdf_parser::{read_raster, NetCdfError, NetCdfSource};
use test_utils::{assert_approx_eq, date, temp_test_dir};

const FILL: f32 = -999.0;
const MISSING: f32 = -888.0;

// (time, lat, lon) = (2, 2, 3), packed with scale 0.5 and offset 10
const RAW: [f32; 12] = [
    0.0, 2.0, 4.0, //
    FILL, 6.0, 8.0, //
    10.0, MISSING, 12.0, //
    14.0, 16.0, 18.0,
];

fn write_tmax_file(path: &Path, data_dims: &[&str]) -> Result<(), netcdf::Error> {
    let mut file = netcdf::create(path)?;
    file.add_dimension("time", 2)?;
    file.add_dimension("lat", 2)?;
    file.add_dimension("lon", 3)?;

    {
        let mut time = file.add_variable::<f64>("time", &["time"])?;
        time.put_attribute("units", "days since 2023-01-01")?;
        time.put_values(&[0.0f64, 1.0], ..)?;
    }
    {
        let mut lat = file.add_variable::<f64>("lat", &["lat"])?;
        lat.put_values(&[30.0f64, 31.0], ..)?;
    }
    {
        let mut lon = file.add_variable::<f64>("lon", &["lon"])?;
        lon.put_values(&[-92.0f64, -91.0, -90.0], ..)?;
    }
    {
        let mut tmax = file.add_variable::<f32>("tmax", data_dims)?;
        tmax.set_fill_value(FILL)?;
        tmax.put_attribute("missing_value", MISSING)?;
        tmax.put_attribute("scale_factor", 0.5f32)?;
        tmax.put_attribute("add_offset", 10.0f32)?;
        tmax.put_values(&RAW, ..)?;
    }

    Ok(())
}

#[test]
fn test_unpacks_and_masks_fill_values() {
    let dir = temp_test_dir();
    let path = dir.path().join("ncdd-202301-grd-scaled.nc");
    write_tmax_file(&path, &["time", "lat", "lon"]).unwrap();

    let raster = NetCdfSource::new("tmax").open(&path).unwrap();
    let grid = raster.grid();
    assert_eq!(grid.shape(), (2, 2, 3));
    assert_eq!(grid.lats(), [30.0, 31.0]);
    assert_eq!(grid.lons(), [-92.0, -91.0, -90.0]);

    let (first, last) = grid.time_range().unwrap();
    assert_eq!(first.date(), date(2023, 1, 1));
    assert_eq!(last.date(), date(2023, 1, 2));

    let data = raster.variable("tmax").unwrap();
    assert_approx_eq!(data[[0, 0, 0]], 10.0, 1e-6);
    assert_approx_eq!(data[[0, 0, 2]], 12.0, 1e-6);
    assert_approx_eq!(data[[1, 1, 2]], 19.0, 1e-6);

    // _FillValue and missing_value both become NaN
    assert!(data[[0, 1, 0]].is_nan());
    assert!(data[[1, 0, 1]].is_nan());
    assert_eq!(data.iter().filter(|v| v.is_nan()).count(), 2);
}

#[test]
fn test_wrong_dimension_order() {
    let dir = temp_test_dir();
    let path = dir.path().join("transposed.nc");
    write_tmax_file(&path, &["lat", "lon", "time"]).unwrap();

    let source = NetCdfSource::new("tmax");
    let err = read_raster(&path, &source).unwrap_err();
    assert!(matches!(err, NetCdfError::InvalidFormat(_)), "{err}");

    match source.open(&path).unwrap_err() {
        RasterError::OpenFailed { path: failed, message } => {
            assert!(failed.ends_with("transposed.nc"));
            assert!(message.contains("(time, lat, lon)"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_data_variable() {
    let dir = temp_test_dir();
    let path = dir.path().join("tmax-only.nc");
    write_tmax_file(&path, &["time", "lat", "lon"]).unwrap();

    let err = NetCdfSource::new("tmin").open(&path).unwrap_err();
    assert!(matches!(err, RasterError::MissingVariable(_)), "{err}");
}

#[test]
fn test_unreadable_file() {
    let dir = temp_test_dir();
    let path = dir.path().join("garbage.nc");
    std::fs::write(&path, b"not a netcdf file").unwrap();

    let err = NetCdfSource::new("tmax").open(&path).unwrap_err();
    assert!(matches!(err, RasterError::OpenFailed { .. }), "{err}");
}
