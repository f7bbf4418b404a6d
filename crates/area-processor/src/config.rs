//! Configuration for the area processor.

use serde::{Deserialize, Serialize};

use crate::error::{ProcessorError, Result};

/// Configuration for an aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Worker pool size. `None` uses the host's available parallelism.
    pub workers: Option<usize>,

    /// Name of the raster variable to aggregate.
    pub variable: String,

    /// Plausible range for published values, in reporting units.
    pub valid_range: ValidRange,

    /// What to do when individual raster files fail.
    pub failure_policy: FailurePolicy,

    /// Reuse masks across files sharing a coordinate grid.
    pub mask_cache: bool,

    /// Maximum number of cached masks.
    pub mask_cache_capacity: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            workers: None,
            variable: "tmax".to_string(),
            valid_range: ValidRange::default(),
            failure_policy: FailurePolicy::Abort,
            mask_cache: true,
            mask_cache_capacity: 64,
        }
    }
}

impl ProcessorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `TMAX_*` environment variables on top of this configuration.
    /// Unparseable values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("TMAX_WORKERS") {
            if let Ok(n) = val.parse() {
                self.workers = Some(n);
            }
        }

        if let Ok(val) = std::env::var("TMAX_VARIABLE") {
            if !val.trim().is_empty() {
                self.variable = val.trim().to_string();
            }
        }

        if let Ok(val) = std::env::var("TMAX_MIN_VALID") {
            if let Ok(min) = val.parse() {
                self.valid_range.min = min;
            }
        }

        if let Ok(val) = std::env::var("TMAX_MAX_VALID") {
            if let Ok(max) = val.parse() {
                self.valid_range.max = max;
            }
        }

        if let Ok(val) = std::env::var("TMAX_FAILURE_POLICY") {
            self.failure_policy = FailurePolicy::from_str(&val);
        }

        if let Ok(val) = std::env::var("TMAX_MASK_CACHE") {
            self.mask_cache = val.to_lowercase() == "true" || val == "1";
        }

        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.workers == Some(0) {
            return Err(ProcessorError::invalid_config("workers must be > 0"));
        }

        if self.variable.is_empty() {
            return Err(ProcessorError::invalid_config("variable must not be empty"));
        }

        if !self.valid_range.min.is_finite() || !self.valid_range.max.is_finite() {
            return Err(ProcessorError::invalid_config(
                "valid_range bounds must be finite",
            ));
        }

        if self.valid_range.min >= self.valid_range.max {
            return Err(ProcessorError::invalid_config(format!(
                "valid_range min ({}) must be below max ({})",
                self.valid_range.min, self.valid_range.max
            )));
        }

        if self.mask_cache && self.mask_cache_capacity == 0 {
            return Err(ProcessorError::invalid_config(
                "mask_cache_capacity must be > 0 when the mask cache is enabled",
            ));
        }

        Ok(())
    }

    /// Worker count to use for this host.
    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

/// Inclusive range of plausible values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ValidRange {
    fn default() -> Self {
        Self {
            min: -100.0,
            max: 150.0,
        }
    }
}

impl ValidRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `true` when `value` lies within `[min, max]`.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Handling of raster files that fail to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Any failed file fails the whole run and nothing is published.
    #[default]
    Abort,
    /// Publish the files that succeeded and report the failures.
    Skip,
}

impl FailurePolicy {
    /// Parse from string (case-insensitive). Unknown values fall back to `Abort`.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "skip" => Self::Skip,
            _ => Self::Abort,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Abort => "abort",
            Self::Skip => "skip",
        }
    }
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
