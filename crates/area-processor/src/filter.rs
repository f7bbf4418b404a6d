//! Plausibility filtering of published values.

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::config::ValidRange;
use crate::table::ResultTable;

/// A row dropped by the filter, with the values that caused it.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    pub timestamp: NaiveDateTime,
    /// `(column, value)` for every out-of-range value in the row.
    pub offending: Vec<(String, f64)>,
}

/// Kept table and the rows removed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub kept: ResultTable,
    pub rejected: Vec<RejectedRow>,
}

/// Drop every row holding a value outside `range`.
///
/// Missing values are never out of range. Kept rows stay in their original
/// order. Each offending value is logged with its date and column.
pub fn plausibility_filter(table: ResultTable, range: &ValidRange) -> FilterOutcome {
    let columns = table.columns().to_vec();
    let mut kept = Vec::with_capacity(table.len());
    let mut rejected = Vec::new();

    for row in table.into_rows() {
        let offending: Vec<(String, f64)> = columns
            .iter()
            .zip(&row.values)
            .filter_map(|(column, value)| match value {
                Some(v) if !range.contains(*v) => Some((column.clone(), *v)),
                _ => None,
            })
            .collect();

        if offending.is_empty() {
            kept.push(row);
            continue;
        }

        for (column, value) in &offending {
            warn!(
                date = %row.timestamp.format("%Y-%m-%d"),
                area = %column,
                value = *value,
                min = range.min,
                max = range.max,
                "Removing row: value outside meaningful range"
            );
        }
        rejected.push(RejectedRow {
            timestamp: row.timestamp,
            offending,
        });
    }

    if rejected.is_empty() {
        info!("No rows were filtered out");
    } else {
        info!(rejected = rejected.len(), kept = kept.len(), "Filtered out implausible rows");
    }

    FilterOutcome {
        kept: ResultTable::with_rows(columns, kept),
        rejected,
    }
}
