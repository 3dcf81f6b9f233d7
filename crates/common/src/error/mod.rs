//! Common error types and utilities shared across WooSap crates
//!
//! The error handling system is built on three pieces:
//!
//! 1. **`CommonError`**: the errors the resilience primitives produce
//! 2. **`ErrorClassification`**: a standard interface for classifying errors
//!    by retryability, severity, and criticality
//! 3. **`ErrorSeverity`**: a unified severity level for logging and alerting
//!
//! ## Error Patterns
//!
//! | Pattern | CommonError Variant | When to Use |
//! |---------|-------------------|-------------|
//! | **Rate Limiting** | `RateLimitExceeded` | A guarded action exceeded its window budget |
//! | **Configuration** | `Config` | Non-positive limits, windows too large to schedule |
//! | **Storage** | `Storage` | An external counter store failed a read or write |
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use woosap_common::error::{CommonError, ErrorClassification};
//!
//! let err = CommonError::rate_limit_exceeded("sync_product", 3, Duration::from_secs(60), None);
//! assert!(err.is_retryable());
//! ```

use std::fmt;
use std::time::Duration;

/// Standard result type using CommonError
pub type CommonResult<T> = Result<T, CommonError>;

/// Errors produced by the rate limiter and counter stores
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// Configuration-related errors
    Config { message: String, field: Option<String> },

    /// A guarded action exceeded its fixed-window budget
    RateLimitExceeded {
        action: String,
        limit: u32,
        window: Duration,
        retry_after: Option<Duration>,
    },

    /// Counter store failures
    Storage { message: String, operation: Option<String> },
}

impl fmt::Display for CommonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { message, field } => {
                if let Some(field) = field {
                    write!(f, "Configuration error in field '{}': {}", field, message)
                } else {
                    write!(f, "Configuration error: {}", message)
                }
            }
            Self::RateLimitExceeded { action, limit, window, retry_after } => {
                write!(
                    f,
                    "Rate limit exceeded for '{}': {} requests per {}s",
                    action,
                    limit,
                    window.as_secs()
                )?;
                if let Some(retry) = retry_after {
                    write!(f, " (retry in {}s)", retry.as_secs())?;
                }
                Ok(())
            }
            Self::Storage { message, operation } => {
                if let Some(op) = operation {
                    write!(f, "Storage error during '{}': {}", op, message)
                } else {
                    write!(f, "Storage error: {}", message)
                }
            }
        }
    }
}

impl std::error::Error for CommonError {}

impl ErrorClassification for CommonError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimitExceeded { .. } | Self::Storage { .. })
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::RateLimitExceeded { .. } => ErrorSeverity::Warning,
            Self::Config { .. } | Self::Storage { .. } => ErrorSeverity::Error,
        }
    }

    fn is_critical(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimitExceeded { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

impl CommonError {
    /// Create a simple configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), field: None }
    }

    /// Create a configuration error for a specific field
    pub fn config_field<S: Into<String>, F: Into<String>>(field: F, message: S) -> Self {
        Self::Config { message: message.into(), field: Some(field.into()) }
    }

    /// Create a rate limit error for a guarded action
    pub fn rate_limit_exceeded<A: Into<String>>(
        action: A,
        limit: u32,
        window: Duration,
        retry_after: Option<Duration>,
    ) -> Self {
        Self::RateLimitExceeded { action: action.into(), limit, window, retry_after }
    }

    /// Create a storage error for a specific operation
    pub fn storage_op<S: Into<String>, O: Into<String>>(operation: O, message: S) -> Self {
        Self::Storage { message: message.into(), operation: Some(operation.into()) }
    }
}

/// Error classification trait for consistent error handling across modules
///
/// Implemented by `CommonError` here and by the domain error in
/// `woosap-domain`, so callers can decide whether to retry, log, or push a
/// failed event toward dead-letter accounting without matching on concrete
/// variants.
pub trait ErrorClassification {
    /// Check if this error is retryable
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool;

    /// Get the suggested retry delay if applicable
    fn retry_after(&self) -> Option<Duration>;
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}
