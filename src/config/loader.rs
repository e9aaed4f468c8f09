//! Configuration file loading with precedence handling.

use crate::feed::FeedTuning;
use crate::sentinel::SentinelTuning;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/pagefeed/config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Items per page.
    #[serde(default)]
    pub page_size: Option<u32>,

    /// Search debounce quiet period, in milliseconds.
    #[serde(default)]
    pub debounce_ms: Option<u64>,

    /// Delay between a page being applied and the sentinel re-arming,
    /// in milliseconds.
    #[serde(default)]
    pub rearm_delay_ms: Option<u64>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Sentinel detection zone section.
    #[serde(default)]
    pub sentinel: Option<SentinelSection>,
}

/// Sentinel section from TOML.
///
/// ```toml
/// [sentinel]
/// root_margin = 100
/// intersection_threshold = 0.5
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SentinelSection {
    /// How far past the container bound the detection zone extends.
    #[serde(default)]
    pub root_margin: Option<i32>,

    /// Minimum visible fraction of the marker, 0.0 to 1.0.
    #[serde(default)]
    pub intersection_threshold: Option<f64>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, and env vars.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Items per page.
    pub page_size: u32,
    /// Search debounce quiet period.
    pub debounce_quiet: Duration,
    /// Sentinel re-arm delay.
    pub rearm_delay: Duration,
    /// Sentinel detection zone.
    pub sentinel: SentinelTuning,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        let tuning = FeedTuning::default();
        Self {
            page_size: tuning.page_size,
            debounce_quiet: tuning.debounce_quiet,
            rearm_delay: tuning.rearm_delay,
            sentinel: tuning.sentinel,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// The engine tunables this configuration selects.
    pub fn feed_tuning(&self) -> FeedTuning {
        FeedTuning {
            page_size: self.page_size,
            debounce_quiet: self.debounce_quiet,
            rearm_delay: self.rearm_delay,
            sentinel: self.sentinel,
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/pagefeed/pagefeed.log` on Unix-like systems,
/// or the appropriate platform path on other systems.
///
/// If the state directory cannot be determined, falls back to the current
/// directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("pagefeed").join("pagefeed.log")
    } else {
        PathBuf::from("pagefeed.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if the file doesn't exist (not an error - use
/// defaults). Returns `Err` if the file exists but cannot be read or
/// parsed.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/pagefeed/config.toml` on Unix, the appropriate path
/// on other platforms. Returns `None` if the home directory cannot be
/// determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pagefeed").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument
/// 2. `PAGEFEED_CONFIG` environment variable
/// 3. Default path `~/.config/pagefeed/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("PAGEFEED_CONFIG") {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use
/// the default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    let sentinel = match config.sentinel {
        Some(section) => SentinelTuning {
            root_margin: section.root_margin.unwrap_or(defaults.sentinel.root_margin),
            intersection_threshold: section
                .intersection_threshold
                .unwrap_or(defaults.sentinel.intersection_threshold),
        },
        None => defaults.sentinel,
    };

    ResolvedConfig {
        page_size: config.page_size.unwrap_or(defaults.page_size),
        debounce_quiet: config
            .debounce_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.debounce_quiet),
        rearm_delay: config
            .rearm_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.rearm_delay),
        sentinel,
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
