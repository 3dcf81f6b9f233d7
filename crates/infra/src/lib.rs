//! # WooSap Infrastructure
//!
//! Process-level wiring for the sync core.
//!
//! This crate contains:
//! - Configuration loading from the environment, `.env`, JSON and TOML files
//! - Logging initialisation on `tracing-subscriber`
//!
//! ## Architecture
//! - Depends on `woosap-domain` for the configuration types
//! - Contains the "impure" code (environment, files, global subscriber)

pub mod config;
pub mod observability;

// Re-export commonly used items
pub use config::{load, load_from_env, load_from_file, probe_config_paths, try_load_from_env};
pub use observability::init_logging;
