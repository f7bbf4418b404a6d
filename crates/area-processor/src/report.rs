//! CSV report of a finished run.
//!
//! Layout: a `Date` column (`YYYY-MM-DD`) followed by one column per area.
//! Missing values are empty fields.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::aggregate::AggregateRun;
use crate::error::{ProcessorError, Result};
use crate::table::ResultTable;

/// Date format of the `Date` column and the file name.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `combined_<scope>_daily_max_temps_F_<start>_to_<end>.csv`
pub fn report_filename(scope: &str, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "combined_{}_daily_max_temps_F_{}_to_{}.csv",
        scope,
        start.format(DATE_FORMAT),
        end.format(DATE_FORMAT)
    )
}

/// Write `table` as CSV to any writer.
pub fn write_table<W: Write>(writer: W, table: &ResultTable) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(table.columns().len() + 1);
    header.push("Date");
    header.extend(table.columns().iter().map(String::as_str));
    wtr.write_record(&header)?;

    for row in table.rows() {
        let mut record = Vec::with_capacity(row.values.len() + 1);
        record.push(row.timestamp.format(DATE_FORMAT).to_string());
        record.extend(
            row.values
                .iter()
                .map(|v| v.map(format_value).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Shortest round-trip form, keeping a decimal point on whole degrees
/// (`32.0`, not `32`).
fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Write the published table of `run` into `dir`, returning the file path.
///
/// The file is named after the run's observed date range; a run that saw
/// no time steps has nothing to name it with and is rejected.
pub fn write_report(dir: &Path, scope: &str, run: &AggregateRun) -> Result<PathBuf> {
    let (start, end) = run.date_range().ok_or_else(|| {
        ProcessorError::Report("run observed no time steps; nothing to report".to_string())
    })?;

    std::fs::create_dir_all(dir)?;
    let path = dir.join(report_filename(scope, start, end));
    let file = std::fs::File::create(&path)?;
    write_table(std::io::BufWriter::new(file), &run.table)?;

    info!(
        path = %path.display(),
        rows = run.table.len(),
        columns = run.table.columns().len(),
        "Wrote report"
    );

    Ok(path)
}
