//! # WooSap Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Status classification over the closed status families
//! - Dead-letter accounting for failed queue events
//! - A rate-limited wrapper for the SAP Service Layer client port
//! - Admin queries over sync logs and dead letters
//! - Limiter construction from the rate-limit configuration
//! - Port interfaces (traits) for everything that touches storage or HTTP
//!
//! ## Architecture Principles
//! - Only depends on `woosap-common` and `woosap-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Nothing retries internally; scheduling is the caller's concern

pub mod admin;
pub mod dead_letter;
pub mod rate_limit;
pub mod sap_ports;
pub mod service_layer;
pub mod status;
pub mod sync;

// Re-export specific items to avoid ambiguity
pub use admin::{trim_last_error, AdminService};
pub use dead_letter::ports::{DeadLetterRepository, QueueRepository};
pub use dead_letter::{DeadLetterService, FailureOutcome, RequeueOutcome};
pub use rate_limit::{identity_resolver, limiter_from_config};
pub use sap_ports::ServiceLayerClient;
pub use service_layer::RateLimitedServiceLayer;
pub use status::{is_order_synced, is_retryable, parse_status};
pub use sync::ports::SyncLogRepository;
