//! Application constants
//!
//! Centralized location for domain-level constants.

// Dead-letter accounting
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const REQUEUE_KEY_PREFIX: &str = "dead_letter";

// Admin listings
pub const LAST_ERROR_PREVIEW_CHARS: usize = 100;
pub const LAST_ERROR_TRUNCATE_SUFFIX: &str = "...";
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

// Rate limiting defaults
pub const DEFAULT_SERVICE_LAYER_MAX_REQUESTS: u32 = 60;
pub const DEFAULT_SERVICE_LAYER_WINDOW_SECS: u64 = 60;
pub const DEFAULT_ADMIN_MAX_REQUESTS: u32 = 10;
pub const DEFAULT_ADMIN_WINDOW_SECS: u64 = 60;

// Sync log entity type for Service Layer gate decisions
pub const SERVICE_LAYER_ENTITY: &str = "service_layer";
