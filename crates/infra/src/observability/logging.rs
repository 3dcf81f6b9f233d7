//! Logging initialisation
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a `fmt`
//! layer. `RUST_LOG` takes precedence over the configured level so a single
//! run can be made more verbose without touching configuration.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use woosap_domain::{LogFormat, LoggingConfig, Result, WooSapError};

/// Filter from `RUST_LOG` if set and valid, else from `config.level`
///
/// # Errors
/// `WooSapError::Config` when the configured level is not a valid filter
/// directive.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => filter_from(&config.level),
    }
}

fn filter_from(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives).map_err(|e| {
        WooSapError::Config(format!("Invalid log level '{directives}': {e}"))
    })
}

/// Install the global subscriber
///
/// # Errors
/// `WooSapError::Config` for an invalid level, or when a global subscriber
/// is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Text => registry.with(fmt::layer().with_target(true)).try_init(),
        LogFormat::Json => {
            registry.with(fmt::layer().json().with_target(true).with_current_span(true)).try_init()
        }
    };

    installed.map_err(|e| WooSapError::Config(format!("Failed to initialise logging: {e}")))?;
    tracing::debug!(level = %config.level, format = %config.format, "logging initialised");
    Ok(())
}
