//! # WooSap Domain
//!
//! Business domain types for the WooCommerce ↔ SAP Business One sync core.
//!
//! This crate contains:
//! - Sync status families (product, order, queue event) and their union
//! - Queue events and dead-letter records
//! - Sync log entries and pagination types
//! - Service Layer contract types
//! - Configuration structures
//! - The domain error type and Result alias
//!
//! ## Architecture
//! - Depends only on the foundation tier of `woosap-common`
//! - Pure domain models and data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
