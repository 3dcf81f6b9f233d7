//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ADMIN_MAX_REQUESTS, DEFAULT_ADMIN_WINDOW_SECS, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_SERVICE_LAYER_MAX_REQUESTS, DEFAULT_SERVICE_LAYER_WINDOW_SECS,
};
use crate::errors::{Result, WooSapError};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub dead_letter: DeadLetterConfig,
    pub service_layer: ServiceLayerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Reject values the limiter and dead-letter accounting cannot honour
    ///
    /// # Errors
    /// Returns `WooSapError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        self.rate_limit.service_layer.validate("rate_limit.service_layer")?;
        self.rate_limit.admin_actions.validate("rate_limit.admin_actions")?;
        for proxy in &self.rate_limit.trusted_proxies {
            proxy.parse::<std::net::IpAddr>().map_err(|_| {
                WooSapError::Config(format!(
                    "rate_limit.trusted_proxies: '{proxy}' is not an IP address"
                ))
            })?;
        }
        if self.dead_letter.max_attempts == 0 {
            return Err(WooSapError::Config(
                "dead_letter.max_attempts: must be greater than 0".to_string(),
            ));
        }
        if self.service_layer.base_url.trim().is_empty() {
            return Err(WooSapError::Config("service_layer.base_url: must be set".to_string()));
        }
        Ok(())
    }
}

/// One rate-limit budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitRule {
    pub max_requests: u32,
    pub window_seconds: u64,
}

impl RateLimitRule {
    pub fn new(max_requests: u32, window_seconds: u64) -> Self {
        Self { max_requests, window_seconds }
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.max_requests == 0 {
            return Err(WooSapError::Config(format!("{name}.max_requests: must be greater than 0")));
        }
        if self.window_seconds == 0 {
            return Err(WooSapError::Config(format!(
                "{name}.window_seconds: must be greater than 0"
            )));
        }
        Ok(())
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Budget for outbound Service Layer calls
    pub service_layer: RateLimitRule,
    /// Budget for operator-triggered admin actions (manual sync, requeue)
    pub admin_actions: RateLimitRule,
    /// Proxies whose `X-Forwarded-For` header is trusted; empty disables it
    #[serde(default)]
    pub trusted_proxies: Vec<String>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            service_layer: RateLimitRule::new(
                DEFAULT_SERVICE_LAYER_MAX_REQUESTS,
                DEFAULT_SERVICE_LAYER_WINDOW_SECS,
            ),
            admin_actions: RateLimitRule::new(DEFAULT_ADMIN_MAX_REQUESTS, DEFAULT_ADMIN_WINDOW_SECS),
            trusted_proxies: Vec::new(),
        }
    }
}

/// Dead-letter accounting configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadLetterConfig {
    pub max_attempts: u32,
}

impl Default for DeadLetterConfig {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_MAX_ATTEMPTS }
    }
}

/// SAP Business One Service Layer connection settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceLayerConfig {
    /// e.g. `https://sap.example.com:50000/b1s/v1`
    pub base_url: String,
    pub company_db: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_true")]
    pub verify_tls: bool,
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

crate::impl_domain_status_conversions!(LogFormat {
    Text => "text",
    Json => "json",
});

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Text }
    }
}
