//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Loads a `.env` file from the working directory, if present
//! 2. Attempts to load from environment variables
//! 3. If a required variable is missing, falls back to loading from file;
//!    a malformed optional variable is an error, not a fallback
//! 4. Probes multiple paths for config files
//! 5. Supports JSON and TOML formats
//! 6. Validates the result before returning it
//!
//! ## Environment Variables
//! Required:
//! - `WOOSAP_SL_BASE_URL`: Service Layer base URL
//! - `WOOSAP_SL_COMPANY_DB`: SAP company database
//! - `WOOSAP_SL_USERNAME`: Service Layer user
//!
//! Optional:
//! - `WOOSAP_SL_PASSWORD`: Service Layer password (also overrides the file)
//! - `WOOSAP_SL_TIMEOUT_SECS`: Request timeout in seconds (default 30)
//! - `WOOSAP_SL_VERIFY_TLS`: Verify TLS certificates (true/false, default true)
//! - `WOOSAP_RATE_LIMIT_SL_MAX` / `WOOSAP_RATE_LIMIT_SL_WINDOW`: Service
//!   Layer budget
//! - `WOOSAP_RATE_LIMIT_ADMIN_MAX` / `WOOSAP_RATE_LIMIT_ADMIN_WINDOW`: admin
//!   action budget
//! - `WOOSAP_TRUSTED_PROXIES`: Comma-separated proxy addresses
//! - `WOOSAP_DEAD_LETTER_MAX_ATTEMPTS`: Attempts before dead-lettering
//! - `WOOSAP_LOG_LEVEL`: Default log filter (default `info`)
//! - `WOOSAP_LOG_FORMAT`: `text` or `json` (default `text`)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.{json,toml}` or `./woosap.{json,toml}` (current working
//!    directory)
//! 2. `../config.{json,toml}` (parent directory)
//! 3. `../../config.{json,toml}` (grandparent directory)
//! 4. The same names relative to the executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use woosap_domain::{
    Config, DeadLetterConfig, LogFormat, LoggingConfig, RateLimitConfig, RateLimitRule, Result,
    ServiceLayerConfig, WooSapError,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `WooSapError::Config` if:
/// - Configuration cannot be loaded from either source
/// - An environment variable is set but does not parse
/// - File format is invalid
/// - Required fields are missing
/// - The loaded configuration fails validation
pub fn load() -> Result<Config> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
    }

    let config = match try_load_from_env()? {
        Some(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        None => load_from_file(None)?,
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from environment variables if they are present
///
/// Returns `Ok(None)` when a required variable is unset, so the caller can
/// fall back to a file.
///
/// # Errors
/// Returns `WooSapError::Config` if the required variables are set but an
/// optional variable has an invalid value.
pub fn try_load_from_env() -> Result<Option<Config>> {
    if let Some(key) = REQUIRED_ENV_VARS.iter().find(|key| std::env::var(key).is_err()) {
        tracing::debug!(missing = key, "Environment configuration incomplete, trying file");
        return Ok(None);
    }
    load_from_env().map(Some)
}

/// Load configuration from environment variables
///
/// The three Service Layer connection variables are required; everything
/// else falls back to defaults.
///
/// # Errors
/// Returns `WooSapError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let base_url = env_var("WOOSAP_SL_BASE_URL")?;
    let company_db = env_var("WOOSAP_SL_COMPANY_DB")?;
    let username = env_var("WOOSAP_SL_USERNAME")?;

    let defaults = RateLimitConfig::default();
    let rate_limit = RateLimitConfig {
        service_layer: RateLimitRule::new(
            env_parse("WOOSAP_RATE_LIMIT_SL_MAX", defaults.service_layer.max_requests)?,
            env_parse("WOOSAP_RATE_LIMIT_SL_WINDOW", defaults.service_layer.window_seconds)?,
        ),
        admin_actions: RateLimitRule::new(
            env_parse("WOOSAP_RATE_LIMIT_ADMIN_MAX", defaults.admin_actions.max_requests)?,
            env_parse("WOOSAP_RATE_LIMIT_ADMIN_WINDOW", defaults.admin_actions.window_seconds)?,
        ),
        trusted_proxies: std::env::var("WOOSAP_TRUSTED_PROXIES")
            .map(|raw| {
                raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
            })
            .unwrap_or_default(),
    };

    let logging = LoggingConfig {
        level: std::env::var("WOOSAP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        format: env_parse("WOOSAP_LOG_FORMAT", LogFormat::Text)?,
    };

    Ok(Config {
        rate_limit,
        dead_letter: DeadLetterConfig {
            max_attempts: env_parse(
                "WOOSAP_DEAD_LETTER_MAX_ATTEMPTS",
                DeadLetterConfig::default().max_attempts,
            )?,
        },
        service_layer: ServiceLayerConfig {
            base_url,
            company_db,
            username,
            password: std::env::var("WOOSAP_SL_PASSWORD").ok(),
            timeout_seconds: env_parse("WOOSAP_SL_TIMEOUT_SECS", 30)?,
            verify_tls: env_bool("WOOSAP_SL_VERIFY_TLS", true),
        },
        logging,
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
/// `WOOSAP_SL_PASSWORD` overrides a password stored in the file.
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `WooSapError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(WooSapError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            WooSapError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| WooSapError::Config(format!("Failed to read config file: {e}")))?;

    let mut config = parse_config(&contents, &config_path)?;
    if let Ok(password) = std::env::var("WOOSAP_SL_PASSWORD") {
        config.service_layer.password = Some(password);
    }
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `WooSapError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| WooSapError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| WooSapError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(WooSapError::Config(format!("Unsupported config format: {extension}"))),
    }
}

const REQUIRED_ENV_VARS: [&str; 3] =
    ["WOOSAP_SL_BASE_URL", "WOOSAP_SL_COMPANY_DB", "WOOSAP_SL_USERNAME"];

const CONFIG_FILE_NAMES: [&str; 4] = ["config.json", "config.toml", "woosap.json", "woosap.toml"];
const PARENT_FILE_NAMES: [&str; 2] = ["config.json", "config.toml"];

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = CONFIG_FILE_NAMES.iter().map(|n| dir.join(n)).collect();
    for up in ["..", "../.."] {
        candidates.extend(PARENT_FILE_NAMES.iter().map(|n| dir.join(up).join(n)));
    }
    candidates
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory and its two parents, then the
/// executable's directory and its two parents.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `WooSapError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| WooSapError::Config(format!("Missing required environment variable: {key}")))
}

/// Parse an optional environment variable, falling back to `default`
///
/// # Errors
/// Returns `WooSapError::Config` if the variable is set but does not parse.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| WooSapError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
