//! Fixed-window rate limiting over an external counter store
//!
//! The limiter allows at most `max_requests` invocations of a named action
//! per client identity within a window anchored at the first request. It
//! keeps no in-process state: every decision is a single
//! [`CounterStore::try_acquire`] call, so several processes sharing one
//! store enforce one budget.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::counter_store::{CounterStore, WindowAdmission};
use super::identity::{ClientContext, ClientIdentityResolver, RemoteAddrResolver};
use crate::error::{CommonError, CommonResult};

/// Prefix for every counter key written by the limiter
pub const RATE_LIMIT_KEY_PREFIX: &str = "woosap_rl_";

/// Budget for one guarded action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Maximum admitted requests per window
    pub max_requests: u32,
    /// Window length, anchored at the first request
    pub window: Duration,
}

impl RateLimitPolicy {
    /// Create a validated policy
    pub fn new(max_requests: u32, window: Duration) -> CommonResult<Self> {
        let policy = Self { max_requests, window };
        policy.validate()?;
        Ok(policy)
    }

    /// Create a validated policy from a window in whole seconds
    pub fn per_seconds(max_requests: u32, window_seconds: u64) -> CommonResult<Self> {
        Self::new(max_requests, Duration::from_secs(window_seconds))
    }

    /// Validate the policy
    ///
    /// A zero budget is rejected rather than treated as "unlimited", and a
    /// zero window is rejected rather than treated as always expired.
    pub fn validate(&self) -> CommonResult<()> {
        if self.max_requests == 0 {
            return Err(CommonError::config_field("max_requests", "must be greater than 0"));
        }
        if self.window.is_zero() {
            return Err(CommonError::config_field("window_seconds", "must be greater than 0"));
        }
        Ok(())
    }
}

/// Deterministic counter key for an (action, client identity) pair
///
/// The key is a BLAKE3 digest over the action, a NUL separator, and the
/// identity. The separator keeps `("ab", "c")` and `("a", "bc")` apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateLimitKey(String);

impl RateLimitKey {
    /// Derive the key for an action and a resolved client identity
    pub fn derive(action: &str, client_identity: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(action.as_bytes());
        hasher.update(&[0]);
        hasher.update(client_identity.as_bytes());
        Self(format!("{RATE_LIMIT_KEY_PREFIX}{}", hasher.finalize().to_hex()))
    }

    /// The key as stored
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RateLimitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Details of an admitted request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Guarded action name
    pub action: String,
    /// Identity the request was counted against
    pub client_identity: String,
    /// Requests admitted in the current window, this one included
    pub count: u64,
    /// Requests still allowed before the window resets
    pub remaining: u64,
    /// Time until the window resets
    pub resets_in: Duration,
}

/// Fixed-window rate limiter
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
///
/// use woosap_common::resilience::{ClientContext, FixedWindowRateLimiter, InMemoryCounterStore};
///
/// # fn example() -> woosap_common::error::CommonResult<()> {
/// let limiter = FixedWindowRateLimiter::new(Arc::new(InMemoryCounterStore::new()));
/// let client = ClientContext::from_remote_addr("203.0.113.9");
///
/// let decision = limiter.enforce(&client, "sync_product", 3, 60)?;
/// assert_eq!(decision.remaining, 2);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FixedWindowRateLimiter {
    store: Arc<dyn CounterStore>,
    resolver: Arc<dyn ClientIdentityResolver>,
}

impl fmt::Debug for FixedWindowRateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedWindowRateLimiter")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl FixedWindowRateLimiter {
    /// Create a limiter with the default [`RemoteAddrResolver`]
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self::with_resolver(store, Arc::new(RemoteAddrResolver))
    }

    /// Create a limiter with a custom identity resolver
    pub fn with_resolver(
        store: Arc<dyn CounterStore>,
        resolver: Arc<dyn ClientIdentityResolver>,
    ) -> Self {
        Self { store, resolver }
    }

    /// Admit or deny one invocation of `action` for `client`
    ///
    /// Returns `CommonError::Config` for a zero budget, a zero window or a
    /// window the store cannot schedule, and `CommonError::RateLimitExceeded`
    /// once the window budget is spent.
    pub fn enforce(
        &self,
        client: &ClientContext,
        action: &str,
        max_requests: u32,
        window_seconds: u64,
    ) -> CommonResult<RateLimitDecision> {
        let policy = RateLimitPolicy::per_seconds(max_requests, window_seconds)?;
        self.check(client, action, &policy)
    }

    /// Admit or deny one invocation of `action` under a prepared policy
    pub fn check(
        &self,
        client: &ClientContext,
        action: &str,
        policy: &RateLimitPolicy,
    ) -> CommonResult<RateLimitDecision> {
        policy.validate()?;

        let client_identity = self.resolver.resolve(client);
        let key = RateLimitKey::derive(action, &client_identity);
        let limit = u64::from(policy.max_requests);

        match self.store.try_acquire(key.as_str(), limit, policy.window)? {
            WindowAdmission::Admitted { count, resets_in } => {
                debug!(
                    action,
                    client = %client_identity,
                    count,
                    limit,
                    "rate limit admitted request"
                );
                Ok(RateLimitDecision {
                    action: action.to_string(),
                    client_identity,
                    count,
                    remaining: limit.saturating_sub(count),
                    resets_in,
                })
            }
            WindowAdmission::Rejected { count, resets_in } => {
                warn!(
                    action,
                    client = %client_identity,
                    count,
                    limit,
                    resets_in_secs = resets_in.as_secs(),
                    "rate limit exceeded"
                );
                Err(CommonError::rate_limit_exceeded(
                    action,
                    policy.max_requests,
                    policy.window,
                    Some(resets_in),
                ))
            }
        }
    }
}
