//! Run configuration for the aggregator.
//!
//! Loaded from a YAML file with environment variable substitution using
//! `${VAR}` and `${VAR:-default}` syntax. `TMAX_*` variables then override
//! the `processor` section.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use area_processor::ProcessorConfig;
use climate_common::AreaSet;
use serde::{Deserialize, Serialize};

/// Everything one aggregation run needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Directory holding the raster files.
    pub input_dir: PathBuf,

    /// Boundary source.
    pub geometry: GeometryConfig,

    /// Scope label used in the report file name, e.g. `Louisiana_state`.
    pub scope: String,

    /// Directory the report is written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Only accept nClimGrid-Daily file names.
    #[serde(default)]
    pub strict_filenames: bool,

    #[serde(default)]
    pub processor: ProcessorConfig,

    /// `{area_name: {unit_id: display_name, ...}}`, in output column order.
    pub areas: AreaSet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryConfig {
    /// GeoJSON FeatureCollection of administrative boundaries.
    pub path: PathBuf,

    /// Feature property holding the unit identifier.
    #[serde(default = "default_id_field")]
    pub id_field: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_id_field() -> String {
    "GEOID".to_string()
}

impl RunConfig {
    /// Parse from YAML text, after environment substitution.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let expanded = expand_env_vars(content)?;
        let mut config: RunConfig =
            serde_yaml::from_str(&expanded).context("Failed to parse run config YAML")?;
        config.processor = config.processor.with_env_overrides();
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.scope.trim().is_empty(), "scope cannot be empty");
        anyhow::ensure!(
            !self.scope.contains(['/', '\\']),
            "scope '{}' must not contain path separators",
            self.scope
        );
        anyhow::ensure!(!self.areas.is_empty(), "at least one area must be configured");
        anyhow::ensure!(
            !self.geometry.id_field.is_empty(),
            "geometry.id_field cannot be empty"
        );

        for area in &self.areas {
            anyhow::ensure!(!area.units.is_empty(), "area '{}' has no units", area.name);
        }

        self.processor
            .validate()
            .context("Invalid processor configuration")?;

        Ok(())
    }
}

/// Load and parse a run configuration file.
pub fn load_run_config<P: AsRef<Path>>(path: P) -> Result<RunConfig> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read run config from {:?}", path.as_ref()))?;

    RunConfig::from_yaml_str(&content)
        .with_context(|| format!("Failed to load run config from {:?}", path.as_ref()))
}

/// Expand environment variables in the format ${VAR} or ${VAR:-default}
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::new();
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut var_expr = String::new();
            let mut brace_count = 1;

            while brace_count > 0 {
                match chars.next() {
                    Some('{') => {
                        brace_count += 1;
                        var_expr.push('{');
                    }
                    Some('}') => {
                        brace_count -= 1;
                        if brace_count > 0 {
                            var_expr.push('}');
                        }
                    }
                    Some(c) => var_expr.push(c),
                    None => anyhow::bail!("Unclosed variable substitution: ${{{}", var_expr),
                }
            }

            result.push_str(&resolve_var_expr(&var_expr)?);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

/// Resolve variable expression (supports VAR and VAR:-default syntax)
fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((var_name, default)) = expr.split_once(":-") {
        match std::env::var(var_name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim())
            .with_context(|| format!("Environment variable {} not set", expr))
    }
}
