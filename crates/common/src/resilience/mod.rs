//! Resilience primitives for guarding outbound sync calls
//!
//! - **Clock**: time abstraction with a `MockClock` for tests
//! - **Counter store**: the external get/set-with-expiry contract the rate
//!   limiter runs on, plus an in-process implementation
//! - **Identity**: pluggable client identity resolution
//! - **Rate limiter**: fixed-window limiter keyed by (action, identity)
//!
//! The limiter is stateless; everything it knows lives in the injected
//! `CounterStore`, so multiple processes sharing a store share one budget.

pub mod clock;
pub mod counter_store;
pub mod identity;
pub mod rate_limiter;

pub use clock::{Clock, MockClock, SystemClock};
pub use counter_store::{CounterStore, InMemoryCounterStore, WindowAdmission, WindowCounter};
pub use identity::{
    ClientContext, ClientIdentityResolver, ForwardedForResolver, RemoteAddrResolver,
    LOOPBACK_IDENTITY,
};
pub use rate_limiter::{
    FixedWindowRateLimiter, RateLimitDecision, RateLimitKey, RateLimitPolicy,
    RATE_LIMIT_KEY_PREFIX,
};
