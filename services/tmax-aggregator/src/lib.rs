//! Library side of the `tmax-aggregator` binary: run configuration and
//! input discovery.

pub mod config;
pub mod inputs;

pub use config::{load_run_config, GeometryConfig, RunConfig};
pub use inputs::{discover_inputs, is_nclimgrid_daily_name};
