//! Area-level aggregation of gridded daily climate rasters.
//!
//! The pipeline for one run:
//!
//! 1. [`resolve_areas`] turns configured areas into boundary sets, failing
//!    early on unknown units.
//! 2. [`Aggregator`] fans one [`process_file`] task per raster out over a
//!    rayon pool. Each task opens its raster, builds or fetches one
//!    [`Mask`] per area, reduces the masked cells to a daily mean and
//!    converts it to °F.
//! 3. Per-file tables are concatenated and sorted by date, then passed
//!    through [`plausibility_filter`].
//! 4. [`write_report`] serializes the published table as CSV.

pub mod aggregate;
pub mod area;
pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod mask;
pub mod reduce;
pub mod report;
pub mod table;
pub mod task;
pub mod units;

pub use aggregate::{AggregateRun, Aggregator};
pub use area::{resolve_areas, ResolvedArea};
pub use cache::{CachedMasks, MaskCacheStats};
pub use config::{FailurePolicy, ProcessorConfig, ValidRange};
pub use error::{FailedFile, ProcessorError, Result};
pub use filter::{plausibility_filter, FilterOutcome, RejectedRow};
pub use mask::{area_mask, build_mask, count_selected, DirectMasks, Mask, MaskProvider};
pub use reduce::reduce_mean;
pub use report::{report_filename, write_report, write_table};
pub use table::{ResultTable, Row};
pub use task::{process_file, FileResult};
pub use units::{series_to_fahrenheit, to_celsius, to_fahrenheit};
