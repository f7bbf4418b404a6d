//! Per-file unit of parallel work.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDateTime;
use climate_common::RasterSource;
use tracing::{debug, info, warn};

use crate::area::ResolvedArea;
use crate::error::{ProcessorError, Result};
use crate::mask::{count_selected, MaskProvider};
use crate::reduce::reduce_mean;
use crate::table::ResultTable;
use crate::units::series_to_fahrenheit;

/// Output of one file task.
#[derive(Debug, Clone)]
pub struct FileResult {
    pub path: PathBuf,
    /// One row per time step in the file, one column per area, in °F.
    pub table: ResultTable,
    /// First and last timestamp in the file; `None` for an empty time axis.
    pub time_range: Option<(NaiveDateTime, NaiveDateTime)>,
}

/// Open one raster file and reduce `variable` to every area.
///
/// The raster is dropped before this returns, on success and on error.
pub fn process_file<S>(
    path: &Path,
    source: &S,
    areas: &[ResolvedArea],
    masks: &dyn MaskProvider,
    variable: &str,
) -> Result<FileResult>
where
    S: RasterSource + ?Sized,
{
    let start = Instant::now();
    info!(file = %path.display(), "Processing raster file");

    let raster = source
        .open(path)
        .map_err(|e| ProcessorError::file_task(path, e))?;
    let data = raster
        .variable(variable)
        .map_err(|e| ProcessorError::file_task(path, e))?;
    let grid = raster.grid();

    let mut series = Vec::with_capacity(areas.len());
    for area in areas {
        let mask = masks.mask_for(grid, area);
        let selected = count_selected(&mask);

        if selected == 0 {
            warn!(
                file = %path.display(),
                area = %area.name,
                "Area mask selects no grid cells; values will be missing"
            );
        } else {
            debug!(file = %path.display(), area = %area.name, cells = selected, "Area mask built");
        }

        let celsius = reduce_mean(data.view(), mask.view())
            .map_err(|e| ProcessorError::file_reduce(path, e))?;
        series.push((area.name.clone(), series_to_fahrenheit(&celsius)));
    }

    let table = ResultTable::from_series(grid.times(), series)
        .map_err(|e| ProcessorError::file_reduce(path, e))?;
    let time_range = grid.time_range();
    drop(raster);

    info!(
        file = %path.display(),
        steps = table.len(),
        elapsed_secs = start.elapsed().as_secs_f64(),
        "Finished raster file"
    );

    Ok(FileResult {
        path: path.to_path_buf(),
        table,
        time_range,
    })
}
