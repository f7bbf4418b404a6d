//! Parallel fan-out over raster files and fan-in merge.
//!
//! Each file is processed independently on a bounded rayon pool. Every
//! outcome is collected before anything is merged, so the combined table
//! and the published ordering never depend on completion order.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{NaiveDate, NaiveDateTime};
use climate_common::{AreaSet, RasterSource};
use geometry::GeometryRegistry;
use rayon::prelude::*;
use tracing::{error, info, warn};

use crate::area::{resolve_areas, ResolvedArea};
use crate::cache::CachedMasks;
use crate::config::{FailurePolicy, ProcessorConfig};
use crate::error::{FailedFile, ProcessorError, Result};
use crate::filter::{plausibility_filter, RejectedRow};
use crate::mask::{DirectMasks, MaskProvider};
use crate::table::ResultTable;
use crate::task::{process_file, FileResult};

/// Outcome of an aggregation run.
#[derive(Debug, Clone)]
pub struct AggregateRun {
    /// Published table: combined, date-sorted and filtered.
    pub table: ResultTable,
    /// Rows removed by the plausibility filter.
    pub rejected: Vec<RejectedRow>,
    /// Files that failed under [`FailurePolicy::Skip`].
    pub failed: Vec<FailedFile>,
    /// Earliest timestamp observed in any processed file.
    pub start: Option<NaiveDateTime>,
    /// Latest timestamp observed in any processed file.
    pub end: Option<NaiveDateTime>,
    /// Number of files that were processed successfully.
    pub files_processed: usize,
}

impl AggregateRun {
    /// Observed start and end dates, if any file had time steps.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.start?.date(), self.end?.date()))
    }
}

/// Runs file tasks across a worker pool and merges their tables.
pub struct Aggregator<S> {
    source: S,
    masks: Arc<dyn MaskProvider>,
    config: ProcessorConfig,
}

impl<S: RasterSource> Aggregator<S> {
    /// Create an aggregator. Masks are cached across files when
    /// `config.mask_cache` is set.
    pub fn new(source: S, config: ProcessorConfig) -> Self {
        let masks: Arc<dyn MaskProvider> = if config.mask_cache {
            Arc::new(CachedMasks::new(config.mask_cache_capacity))
        } else {
            Arc::new(DirectMasks)
        };

        Self {
            source,
            masks,
            config,
        }
    }

    /// Replace the mask provider.
    pub fn with_mask_provider(mut self, masks: Arc<dyn MaskProvider>) -> Self {
        self.masks = masks;
        self
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Resolve `areas` against `registry`, then process every file.
    ///
    /// Unknown units fail the run before any file is opened.
    pub fn run<R>(&self, paths: &[PathBuf], registry: &R, areas: &AreaSet) -> Result<AggregateRun>
    where
        R: GeometryRegistry + ?Sized,
    {
        self.config.validate()?;
        let resolved = resolve_areas(registry, areas)?;
        self.run_resolved(paths, &resolved)
    }

    /// Process every file against already resolved areas.
    pub fn run_resolved(&self, paths: &[PathBuf], areas: &[ResolvedArea]) -> Result<AggregateRun> {
        let start = Instant::now();
        let workers = self.config.effective_workers();

        info!(
            files = paths.len(),
            workers = workers,
            areas = areas.len(),
            variable = %self.config.variable,
            "Dispatching raster files"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("area-worker-{}", i))
            .build()?;

        let outcomes: Vec<Result<FileResult>> = pool.install(|| {
            paths
                .par_iter()
                .map(|path| self.process(path, areas))
                .collect()
        });

        let mut results = Vec::with_capacity(outcomes.len());
        let mut failed = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(result) => results.push(result),
                Err(e) => {
                    let path = e.file_path().map(Path::to_path_buf).unwrap_or_default();
                    error!(file = %path.display(), error = %e, "Raster file failed");
                    failed.push(FailedFile {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if !failed.is_empty() {
            match self.config.failure_policy {
                FailurePolicy::Abort => {
                    return Err(ProcessorError::FailedFiles {
                        failed,
                        total: paths.len(),
                    });
                }
                FailurePolicy::Skip => warn!(
                    failed = failed.len(),
                    succeeded = results.len(),
                    "Continuing without failed raster files"
                ),
            }
        }

        let (first, last) = observed_range(&results);
        let files_processed = results.len();

        let columns = areas.iter().map(|a| a.name.clone()).collect();
        let mut combined = ResultTable::concat(columns, results.into_iter().map(|r| r.table))?;
        combined.sort_by_timestamp();

        let outcome = plausibility_filter(combined, &self.config.valid_range);

        info!(
            rows = outcome.kept.len(),
            rejected = outcome.rejected.len(),
            files = files_processed,
            start = ?first.map(|t| t.date()),
            end = ?last.map(|t| t.date()),
            elapsed_secs = start.elapsed().as_secs_f64(),
            "Aggregation complete"
        );

        Ok(AggregateRun {
            table: outcome.kept,
            rejected: outcome.rejected,
            failed,
            start: first,
            end: last,
            files_processed,
        })
    }

    fn process(&self, path: &Path, areas: &[ResolvedArea]) -> Result<FileResult> {
        process_file(
            path,
            &self.source,
            areas,
            self.masks.as_ref(),
            &self.config.variable,
        )
    }
}

/// Overall range from each file's own first/last timestamps.
fn observed_range(results: &[FileResult]) -> (Option<NaiveDateTime>, Option<NaiveDateTime>) {
    results
        .iter()
        .filter_map(|r| r.time_range)
        .fold((None, None), |(lo, hi), (first, last)| {
            (
                Some(lo.map_or(first, |lo: NaiveDateTime| lo.min(first))),
                Some(hi.map_or(last, |hi: NaiveDateTime| hi.max(last))),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{date, daily_constant_raster, rectangle, test_grid, MemorySource};

    fn areas() -> Vec<ResolvedArea> {
        vec![ResolvedArea::new(
            "Louisiana",
            vec![Arc::new(rectangle(-92.0, 30.0, -90.0, 32.0))],
        )]
    }

    fn source() -> MemorySource {
        let month = |start: NaiveDate, values: &[f32]| {
            let grid = test_grid(vec![31.0], vec![-91.0], start, values.len());
            daily_constant_raster(grid, "tmax", values)
        };

        MemorySource::new()
            .with_raster("feb.nc", month(date(2023, 2, 1), &[10.0, 15.0]))
            .with_raster("jan.nc", month(date(2023, 1, 30), &[0.0, 30.0]))
            .with_failure("broken.nc")
    }

    fn config(workers: usize) -> ProcessorConfig {
        ProcessorConfig {
            workers: Some(workers),
            ..Default::default()
        }
    }

    #[test]
    fn test_merges_and_sorts() {
        let aggregator = Aggregator::new(source(), config(2));
        let paths = vec![PathBuf::from("feb.nc"), PathBuf::from("jan.nc")];

        let run = aggregator.run_resolved(&paths, &areas()).unwrap();

        let dates: Vec<NaiveDate> = run.table.timestamps().map(|t| t.date()).collect();
        assert_eq!(
            dates,
            vec![date(2023, 1, 30), date(2023, 1, 31), date(2023, 2, 1), date(2023, 2, 2)]
        );
        assert_eq!(
            run.table.column("Louisiana").unwrap(),
            vec![Some(32.0), Some(86.0), Some(50.0), Some(59.0)]
        );
        assert!(run.rejected.is_empty());
        assert_eq!(run.files_processed, 2);
        assert_eq!(run.date_range(), Some((date(2023, 1, 30), date(2023, 2, 2))));
    }

    #[test]
    fn test_abort_policy_fails_run() {
        let aggregator = Aggregator::new(source(), config(1));
        let paths = vec![PathBuf::from("jan.nc"), PathBuf::from("broken.nc")];

        match aggregator.run_resolved(&paths, &areas()) {
            Err(ProcessorError::FailedFiles { failed, total }) => {
                assert_eq!(total, 2);
                assert_eq!(failed.len(), 1);
                assert_eq!(failed[0].path, PathBuf::from("broken.nc"));
            }
            other => panic!("expected FailedFiles, got {:?}", other.map(|r| r.table)),
        }
    }

    #[test]
    fn test_skip_policy_publishes_successes() {
        let aggregator = Aggregator::new(
            source(),
            ProcessorConfig {
                failure_policy: FailurePolicy::Skip,
                ..config(3)
            },
        );
        let paths = vec![
            PathBuf::from("broken.nc"),
            PathBuf::from("feb.nc"),
            PathBuf::from("jan.nc"),
        ];

        let run = aggregator.run_resolved(&paths, &areas()).unwrap();
        assert_eq!(run.files_processed, 2);
        assert_eq!(run.failed.len(), 1);
        assert_eq!(run.table.len(), 4);
    }

    #[test]
    fn test_no_files() {
        let aggregator = Aggregator::new(MemorySource::new(), config(1));
        let run = aggregator.run_resolved(&[], &areas()).unwrap();
        assert!(run.table.is_empty());
        assert_eq!(run.table.columns(), ["Louisiana"]);
        assert_eq!(run.date_range(), None);
    }

    #[test]
    fn test_reduce_failure_keeps_path() {
        struct FixedMask;

        impl MaskProvider for FixedMask {
            fn mask_for(
                &self,
                _grid: &climate_common::CoordinateGrid,
                _area: &ResolvedArea,
            ) -> Arc<crate::mask::Mask> {
                Arc::new(ndarray::Array2::from_elem((3, 3), true))
            }
        }

        let aggregator = Aggregator::new(
            source(),
            ProcessorConfig {
                failure_policy: FailurePolicy::Skip,
                ..config(1)
            },
        )
        .with_mask_provider(Arc::new(FixedMask));

        let run = aggregator
            .run_resolved(&[PathBuf::from("jan.nc")], &areas())
            .unwrap();

        assert_eq!(run.files_processed, 0);
        assert_eq!(run.failed.len(), 1);
        assert_eq!(run.failed[0].path, PathBuf::from("jan.nc"));
        assert!(run.failed[0].reason.contains("jan.nc"));
    }
}
