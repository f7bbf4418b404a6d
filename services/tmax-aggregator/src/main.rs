//! Daily maximum temperature aggregator.
//!
//! Reads a directory of gridded daily NetCDF files, reduces each configured
//! area to a daily mean in °F and writes one date-sorted CSV report.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use area_processor::{resolve_areas, write_report, Aggregator};
use clap::{Parser, ValueEnum};
use geometry::FeatureRegistry;
use netcdf_parser::NetCdfSource;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use tmax_aggregator::{discover_inputs, load_run_config};

#[derive(Parser, Debug)]
#[command(name = "tmax-aggregator")]
#[command(about = "Aggregate gridded daily maximum temperature to area-level daily series")]
struct Args {
    /// Run configuration file path
    #[arg(short, long, env = "TMAX_CONFIG")]
    config: PathBuf,

    /// Override the configured input directory
    #[arg(long, env = "TMAX_INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Override the configured output directory
    #[arg(long, env = "TMAX_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Number of worker threads (default: available cores)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, env = "TMAX_LOG_FORMAT")]
    log_format: LogFormat,

    /// Resolve configuration and list inputs without processing
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_format);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Aggregation run failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => fmt().with_env_filter(filter).with_target(true).json().init(),
        LogFormat::Pretty => fmt().with_env_filter(filter).with_target(false).init(),
    }
}

fn run(args: Args) -> Result<()> {
    info!(config = %args.config.display(), "Starting tmax aggregator");

    let mut config = load_run_config(&args.config)?;
    if let Some(dir) = args.input_dir {
        config.input_dir = dir;
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if let Some(workers) = args.workers {
        config.processor.workers = Some(workers);
    }
    config.validate()?;

    info!(
        scope = %config.scope,
        areas = ?config.areas.names(),
        input_dir = %config.input_dir.display(),
        workers = config.processor.effective_workers(),
        failure_policy = %config.processor.failure_policy,
        "Loaded configuration"
    );

    let inputs = discover_inputs(&config.input_dir, config.strict_filenames)?;
    anyhow::ensure!(
        !inputs.is_empty(),
        "No raster files found in {:?}",
        config.input_dir
    );
    info!(files = inputs.len(), "Discovered raster files");

    let registry =
        FeatureRegistry::from_geojson_file(&config.geometry.path, &config.geometry.id_field)
            .with_context(|| format!("Failed to load boundaries from {:?}", config.geometry.path))?;

    if args.dry_run {
        for area in resolve_areas(&registry, &config.areas)? {
            info!(area = %area.name, units = area.polygons().len(), "Resolved area");
        }
        for path in &inputs {
            info!(file = %path.display(), "Would process");
        }
        return Ok(());
    }

    netcdf_parser::silence_hdf5_errors();

    let source = NetCdfSource::new(config.processor.variable.clone());
    let aggregator = Aggregator::new(source, config.processor.clone());
    let run = aggregator
        .run(&inputs, &registry, &config.areas)
        .context("Aggregation failed")?;

    for failed in &run.failed {
        warn!(file = %failed.path.display(), reason = %failed.reason, "Raster file skipped");
    }

    let report = write_report(&config.output_dir, &config.scope, &run)
        .context("Failed to write report")?;

    info!(
        report = %report.display(),
        rows = run.table.len(),
        rejected = run.rejected.len(),
        files = run.files_processed,
        failed = run.failed.len(),
        "Run complete"
    );

    Ok(())
}
