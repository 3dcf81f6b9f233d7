//! Error types used throughout the sync core

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use woosap_common::error::{CommonError, ErrorClassification, ErrorSeverity};

/// Main error type for WooSap
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum WooSapError {
    #[error(
        "Rate limit exceeded for '{action}': {max_requests} requests per {window_seconds}s"
    )]
    RateLimited {
        action: String,
        max_requests: u32,
        window_seconds: u64,
        retry_after_seconds: Option<u64>,
    },

    /// A status value outside the closed enumeration. Indicates an
    /// enumeration was extended without updating classification.
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Service Layer error: {0}")]
    ServiceLayer(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CommonError> for WooSapError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::RateLimitExceeded { action, limit, window, retry_after } => {
                Self::RateLimited {
                    action,
                    max_requests: limit,
                    window_seconds: window.as_secs(),
                    // Rounded up to whole seconds
                    retry_after_seconds: retry_after
                        .map(|d| d.as_secs() + u64::from(d.subsec_nanos() > 0)),
                }
            }
            CommonError::Config { message, field } => match field {
                Some(field) => Self::Config(format!("{field}: {message}")),
                None => Self::Config(message),
            },
            CommonError::Storage { .. } => Self::Storage(err.to_string()),
        }
    }
}

impl ErrorClassification for WooSapError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::ServiceLayer(_) | Self::Storage(_))
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::RateLimited { .. } => ErrorSeverity::Warning,
            Self::NotFound(_) => ErrorSeverity::Info,
            Self::InvalidStatus(_) | Self::Internal(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Programming or data-integrity errors that must never be swallowed
    fn is_critical(&self) -> bool {
        matches!(self, Self::InvalidStatus(_) | Self::Internal(_))
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after_seconds, .. } => {
                retry_after_seconds.map(Duration::from_secs)
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for WooSapError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidInput(format!("JSON: {err}"))
    }
}

/// Result type alias for WooSap operations
pub type Result<T> = std::result::Result<T, WooSapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_display_and_retry_hint() {
        let err = WooSapError::RateLimited {
            action: "sync_product".into(),
            max_requests: 3,
            window_seconds: 60,
            retry_after_seconds: Some(15),
        };
        assert_eq!(
            err.to_string(),
            "Rate limit exceeded for 'sync_product': 3 requests per 60s"
        );
        assert!(err.is_retryable());
        assert_eq!(err.retry_after(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn invalid_status_is_critical() {
        let err = WooSapError::InvalidStatus("shipped".into());
        assert!(err.is_critical());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(!err.is_retryable());
    }

    #[test]
    fn limiter_denial_maps_to_rate_limited() {
        let err: WooSapError = CommonError::rate_limit_exceeded(
            "sync_product",
            3,
            Duration::from_secs(60),
            Some(Duration::from_millis(41_200)),
        )
        .into();
        assert_eq!(
            err,
            WooSapError::RateLimited {
                action: "sync_product".into(),
                max_requests: 3,
                window_seconds: 60,
                retry_after_seconds: Some(42),
            }
        );
    }

    #[test]
    fn limiter_config_error_maps_to_config() {
        let err: WooSapError =
            CommonError::config_field("max_requests", "must be greater than 0").into();
        assert_eq!(err, WooSapError::Config("max_requests: must be greater than 0".into()));
    }

    #[test]
    fn counter_store_failure_maps_to_storage() {
        let err: WooSapError = CommonError::storage_op("get", "connection reset").into();
        assert_eq!(
            err,
            WooSapError::Storage("Storage error during 'get': connection reset".into())
        );
        assert!(err.is_retryable());
    }

    #[test]
    fn serializes_with_type_tag() {
        let err = WooSapError::NotFound("dead letter dl-1".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "NotFound");
        assert_eq!(json["details"], "dead letter dl-1");
    }
}
