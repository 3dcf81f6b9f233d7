//! Modular common utilities shared across WooSap crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: error taxonomy and classification
//! - `runtime`: resilience primitives (clock, counter store, fixed-window
//!   rate limiter, client identity resolution)
//! - `observability`: tracing (pulled in by `runtime`)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod resilience;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use error::{CommonError, CommonResult, ErrorClassification, ErrorSeverity};
#[cfg(feature = "runtime")]
pub use resilience::{
    ClientContext, ClientIdentityResolver, Clock, CounterStore, FixedWindowRateLimiter,
    ForwardedForResolver, InMemoryCounterStore, MockClock, RateLimitDecision, RateLimitKey,
    RateLimitPolicy, RemoteAddrResolver, SystemClock, WindowAdmission, WindowCounter,
};
