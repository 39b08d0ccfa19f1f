//! Tool configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a user file (passed with `--config`) overrides any subset of
//! keys; command-line flags override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [output]
//! archive_name = "athlete_images.zip"
//! sizes = ["avatar_256x256", "avatar_500x345", "hero_1200x1165", "hero_1500x920"]
//! guideline = false         # Draw the positioning guide on every image
//! anchor = "top"            # Vertical crop anchor: "top" or "center"
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! time_budget_secs = 120    # Stop starting new work after this long (omit = no limit)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; override just the values you want:
//!
//! ```toml
//! [output]
//! sizes = ["avatar_256x256"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::catalog::{self, CATALOG, OutputSpec};
use crate::imaging::Anchor;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// What to generate and where to put it.
    pub output: OutputConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl ToolConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.archive_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output.archive_name must not be empty".into(),
            ));
        }
        if self.output.sizes.is_empty() {
            return Err(ConfigError::Validation(
                "output.sizes must not be empty".into(),
            ));
        }
        self.output.specs()?;
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        if self.processing.time_budget_secs == Some(0) {
            return Err(ConfigError::Validation(
                "processing.time_budget_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Output selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// File name of the generated ZIP.
    pub archive_name: String,
    /// Catalog keys (`avatar_256x256`, ...) to generate.
    pub sizes: Vec<String>,
    /// Composite the positioning guide onto every image.
    pub guideline: bool,
    /// Vertical crop anchor.
    pub anchor: Anchor,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            archive_name: "athlete_images.zip".to_string(),
            sizes: CATALOG.iter().map(OutputSpec::key).collect(),
            guideline: false,
            anchor: Anchor::Top,
        }
    }
}

impl OutputConfig {
    /// Resolve `sizes` to catalog rows in canonical order.
    pub fn specs(&self) -> Result<Vec<OutputSpec>, ConfigError> {
        let selected = self
            .sizes
            .iter()
            .map(|key| catalog::lookup(key))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ConfigError::Validation(format!("output.sizes: {e}")))?;
        Ok(catalog::specs_for(&selected))
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
    /// Wall-clock budget for one batch. Work not started in time is
    /// reported as failed.
    pub time_budget_secs: Option<u64>,
}

impl ProcessingConfig {
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_secs.map(Duration::from_secs)
    }
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ToolConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// A named file that does not exist is an error.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ToolConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ToolConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective config: stock defaults, overridden by `path` if given.
pub fn load_config(path: Option<&Path>) -> Result<ToolConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = path.map(load_raw_config).transpose()?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Portrait Kit Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Pass the file with `portrait-kit generate --config config.toml ...`.
# Command-line flags override values set here.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# File name of the generated ZIP archive.
archive_name = "athlete_images.zip"

# Which sizes to generate, by catalog key (see `portrait-kit catalog`).
# Images are always produced in catalog order, whatever order is listed here.
sizes = ["avatar_256x256", "avatar_500x345", "hero_1200x1165", "hero_1500x920"]

# Draw the positioning guide (dashed border, plus a reference line on
# hero images) on top of every generated image.
guideline = false

# Vertical crop anchor when the photo is taller than the target shape.
# "top" keeps the top of the frame (heads stay in shot); "center" trims
# evenly from top and bottom.
anchor = "top"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# Wall-clock budget for one batch, in seconds. Images not started when the
# budget runs out are reported as failed; finished ones are still packaged.
# Omit for no limit.
# time_budget_secs = 120
"##
}
