//! Raster input discovery.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use walkdir::WalkDir;

/// nClimGrid-Daily archive names: `ncdd-YYYYMM-grd-scaled.nc` for final
/// data, `-grd-prelim.nc` for preliminary months.
pub fn is_nclimgrid_daily_name(name: &str) -> bool {
    name.starts_with("ncdd-")
        && (name.ends_with("-grd-scaled.nc") || name.ends_with("-grd-prelim.nc"))
}

/// List raster files directly inside `dir`, sorted by path.
///
/// Every `.nc` file is accepted unless `strict` is set, in which case only
/// nClimGrid-Daily names are. Other entries are skipped, not errors.
pub fn discover_inputs(dir: &Path, strict: bool) -> Result<Vec<PathBuf>> {
    anyhow::ensure!(dir.is_dir(), "Input directory {:?} does not exist", dir);

    let mut inputs = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to list {:?}", dir))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        let accepted = if strict {
            is_nclimgrid_daily_name(&name)
        } else {
            name.ends_with(".nc")
        };

        if accepted {
            inputs.push(entry.into_path());
        } else {
            debug!(file = %entry.path().display(), "Skipping non-raster file");
        }
    }

    Ok(inputs)
}
