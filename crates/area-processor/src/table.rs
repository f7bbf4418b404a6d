//! Row-per-timestamp result tables.

use chrono::NaiveDateTime;

use crate::error::{ProcessorError, Result};

/// One timestamp and one optional value per area column.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub timestamp: NaiveDateTime,
    pub values: Vec<Option<f64>>,
}

/// Table with a timestamp per row and one value column per area.
///
/// Every row has exactly one value per column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl ResultTable {
    /// Empty table with the given columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Assemble a table from per-area series sharing one timestamp axis.
    pub fn from_series(timestamps: &[NaiveDateTime], series: Vec<(String, Vec<Option<f64>>)>) -> Result<Self> {
        if let Some((name, values)) = series.iter().find(|(_, v)| v.len() != timestamps.len()) {
            return Err(ProcessorError::table_layout(format!(
                "series '{}' has {} values for {} timestamps",
                name,
                values.len(),
                timestamps.len()
            )));
        }

        let (columns, columns_data): (Vec<String>, Vec<Vec<Option<f64>>>) = series.into_iter().unzip();
        let rows = timestamps
            .iter()
            .enumerate()
            .map(|(t, &timestamp)| Row {
                timestamp,
                values: columns_data.iter().map(|col| col[t]).collect(),
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Rows taken from a table with the same columns.
    pub(crate) fn with_rows(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Append a row, checking its width.
    pub fn push_row(&mut self, row: Row) -> Result<()> {
        if row.values.len() != self.columns.len() {
            return Err(ProcessorError::table_layout(format!(
                "row at {} has {} values for {} columns",
                row.timestamp,
                row.values.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Concatenate tables that share `columns`, in the order given.
    pub fn concat<I>(columns: Vec<String>, tables: I) -> Result<Self>
    where
        I: IntoIterator<Item = ResultTable>,
    {
        let mut combined = Self::new(columns);
        for table in tables {
            if table.columns != combined.columns {
                return Err(ProcessorError::table_layout(format!(
                    "columns {:?} do not match {:?}",
                    table.columns, combined.columns
                )));
            }
            combined.rows.extend(table.rows);
        }
        Ok(combined)
    }

    /// Sort rows by timestamp ascending. Stable, so rows sharing a
    /// timestamp keep their relative order.
    pub fn sort_by_timestamp(&mut self) {
        self.rows.sort_by_key(|row| row.timestamp);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn timestamps(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        self.rows.iter().map(|row| row.timestamp)
    }

    /// Values of one column, or `None` for an unknown column name.
    pub fn column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row.values[idx]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{daily_times, date};

    fn table(start_day: u32, days: usize, base: f64) -> ResultTable {
        let times = daily_times(date(2023, 1, start_day), days);
        let values = (0..days).map(|d| Some(base + d as f64)).collect();
        ResultTable::from_series(&times, vec![("A".to_string(), values)]).unwrap()
    }

    #[test]
    fn test_from_series() {
        let times = daily_times(date(2023, 1, 1), 2);
        let table = ResultTable::from_series(
            &times,
            vec![
                ("A".to_string(), vec![Some(1.0), None]),
                ("B".to_string(), vec![Some(3.0), Some(4.0)]),
            ],
        )
        .unwrap();

        assert_eq!(table.columns(), ["A", "B"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].values, vec![Some(1.0), Some(3.0)]);
        assert_eq!(table.column("A").unwrap(), vec![Some(1.0), None]);
        assert!(table.column("C").is_none());
    }

    #[test]
    fn test_from_series_length_mismatch() {
        let times = daily_times(date(2023, 1, 1), 2);
        let err = ResultTable::from_series(&times, vec![("A".to_string(), vec![Some(1.0)])]);
        assert!(matches!(err, Err(ProcessorError::TableLayout(_))));
    }

    #[test]
    fn test_concat_and_sort() {
        let columns = vec!["A".to_string()];
        let mut combined =
            ResultTable::concat(columns, [table(10, 3, 10.0), table(1, 3, 1.0)]).unwrap();
        assert_eq!(combined.rows()[0].timestamp.date(), date(2023, 1, 10));

        combined.sort_by_timestamp();
        let days: Vec<u32> = combined
            .timestamps()
            .map(|t| chrono::Datelike::day(&t.date()))
            .collect();
        assert_eq!(days, vec![1, 2, 3, 10, 11, 12]);
        assert_eq!(combined.column("A").unwrap()[3], Some(10.0));
    }

    #[test]
    fn test_concat_rejects_other_columns() {
        let err = ResultTable::concat(vec!["B".to_string()], [table(1, 1, 0.0)]);
        assert!(matches!(err, Err(ProcessorError::TableLayout(_))));
    }

    #[test]
    fn test_push_row_checks_width() {
        let mut table = ResultTable::new(vec!["A".to_string(), "B".to_string()]);
        let timestamp = daily_times(date(2023, 1, 1), 1)[0];
        assert!(table
            .push_row(Row {
                timestamp,
                values: vec![Some(1.0)]
            })
            .is_err());
        assert!(table
            .push_row(Row {
                timestamp,
                values: vec![Some(1.0), None]
            })
            .is_ok());
        assert_eq!(table.len(), 1);
    }
}
