//! Observability infrastructure
//!
//! Structured logging through `tracing`. Library crates only emit events;
//! the process installs a subscriber once at startup with [`init_logging`].

pub mod logging;

pub use logging::{build_filter, init_logging};
