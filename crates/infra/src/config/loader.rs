//! Configuration loader
//!
//! Loads the global request configuration from environment variables or
//! files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If that fails, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `COURIER_BASE_URL`: Base URL prefixed to relative request URLs (required)
//! - `COURIER_TIMEOUT_MS`: Per-attempt deadline in milliseconds
//! - `COURIER_RETRY_ATTEMPTS`: Total attempts including the first one
//! - `COURIER_RETRY_BACKOFF`: `linear` or `exponential`
//! - `COURIER_RETRY_INITIAL_DELAY_MS`: Delay before the first retry
//! - `COURIER_RETRY_MAX_DELAY_MS`: Upper bound for any single delay
//! - `COURIER_RETRY_STATUSES`: Comma-separated HTTP statuses to retry
//!
//! A retry policy is only configured when at least one `COURIER_RETRY_*`
//! variable is set; unset fields keep their defaults.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./courier.json` or `./courier.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names in the parent and grandparent directories
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use courier_domain::{BackoffKind, ConfigError, GlobalConfig, RetryPolicy};

const FILE_NAMES: [&str; 4] = ["courier.json", "courier.toml", "config.json", "config.toml"];
const SEARCH_DIRS: [&str; 3] = [".", "..", "../.."];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If that fails, falls
/// back to loading from a config file.
///
/// # Errors
/// Returns a [`ConfigError`] if configuration cannot be loaded from either
/// source, or if the loaded configuration is invalid.
pub fn load() -> Result<GlobalConfig, ConfigError> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns [`ConfigError::NotFound`] if `COURIER_BASE_URL` is missing and
/// [`ConfigError::Invalid`] if any variable has an invalid value.
pub fn load_from_env() -> Result<GlobalConfig, ConfigError> {
    let base_url = env_var("COURIER_BASE_URL")?;
    let timeout_ms = env_parse::<u64>("COURIER_TIMEOUT_MS")?;

    let config = GlobalConfig {
        base_url: Some(base_url),
        timeout_ms,
        retry: retry_from_env()?,
        ..GlobalConfig::default()
    };
    config.validate()?;
    Ok(config)
}

fn retry_from_env() -> Result<Option<RetryPolicy>, ConfigError> {
    let attempts = env_parse::<u32>("COURIER_RETRY_ATTEMPTS")?;
    let backoff = env_parse::<BackoffKind>("COURIER_RETRY_BACKOFF")?;
    let initial_delay_ms = env_parse::<u64>("COURIER_RETRY_INITIAL_DELAY_MS")?;
    let max_delay_ms = env_parse::<u64>("COURIER_RETRY_MAX_DELAY_MS")?;
    let statuses = std::env::var("COURIER_RETRY_STATUSES")
        .ok()
        .map(|raw| parse_statuses(&raw))
        .transpose()?;

    if attempts.is_none()
        && backoff.is_none()
        && initial_delay_ms.is_none()
        && max_delay_ms.is_none()
        && statuses.is_none()
    {
        return Ok(None);
    }

    let mut policy = RetryPolicy::default();
    if let Some(attempts) = attempts {
        policy.attempts = attempts;
    }
    if let Some(backoff) = backoff {
        policy.backoff = backoff;
    }
    if let Some(initial_delay_ms) = initial_delay_ms {
        policy.initial_delay_ms = initial_delay_ms;
    }
    if let Some(max_delay_ms) = max_delay_ms {
        policy.max_delay_ms = max_delay_ms;
    }
    if let Some(statuses) = statuses {
        policy.retry_on = statuses.into_iter().collect();
    }
    Ok(Some(policy))
}

/// Parse a comma-separated status list such as `"429, 503"`.
fn parse_statuses(raw: &str) -> Result<Vec<u16>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|status| !status.is_empty())
        .map(|status| {
            status
                .parse::<u16>()
                .map_err(|e| ConfigError::Invalid(format!("Invalid retry status '{status}': {e}")))
        })
        .collect()
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns a [`ConfigError`] if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The configuration fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<GlobalConfig, ConfigError> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::NotFound(p.display().to_string()));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ConfigError::NotFound("no config file in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)?;
    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<GlobalConfig, ConfigError> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ConfigError::Parse(format!("Invalid JSON format: {e}"))),
        _ => Err(ConfigError::Parse(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, its parent and grandparent, then
/// the same locations relative to the executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| {
            SEARCH_DIRS
                .iter()
                .flat_map(move |dir| FILE_NAMES.iter().map(move |name| root.join(dir).join(name)))
        })
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String, ConfigError> {
    std::env::var(key)
        .map_err(|_| ConfigError::NotFound(format!("Missing required environment variable: {key}")))
}

/// Parse an optional environment variable
fn env_parse<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::Invalid(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}
