//! Limiter wiring from configuration
//!
//! `rate_limit.trusted_proxies` picks the identity resolver: empty keeps the
//! peer-address default, anything else trusts `X-Forwarded-For` from those
//! proxies only.

use std::net::IpAddr;
use std::sync::Arc;

use woosap_common::resilience::{
    ClientIdentityResolver, CounterStore, FixedWindowRateLimiter, ForwardedForResolver,
    RemoteAddrResolver,
};
use woosap_domain::{RateLimitConfig, Result, WooSapError};

/// Identity resolver for the configured trusted proxies
///
/// # Errors
/// Returns `WooSapError::Config` if a proxy entry is not an IP address.
pub fn identity_resolver(config: &RateLimitConfig) -> Result<Arc<dyn ClientIdentityResolver>> {
    if config.trusted_proxies.is_empty() {
        return Ok(Arc::new(RemoteAddrResolver));
    }

    let proxies = config
        .trusted_proxies
        .iter()
        .map(|raw| {
            raw.trim().parse::<IpAddr>().map_err(|_| {
                WooSapError::Config(format!(
                    "rate_limit.trusted_proxies: '{raw}' is not an IP address"
                ))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Arc::new(ForwardedForResolver::new(proxies)))
}

/// Limiter over `store` using the configured identity resolver
///
/// # Errors
/// Returns `WooSapError::Config` if a trusted proxy entry is invalid.
pub fn limiter_from_config(
    config: &RateLimitConfig,
    store: Arc<dyn CounterStore>,
) -> Result<FixedWindowRateLimiter> {
    Ok(FixedWindowRateLimiter::with_resolver(store, identity_resolver(config)?))
}

#[cfg(test)]
mod tests {
    use woosap_common::resilience::{ClientContext, InMemoryCounterStore};

    use super::*;

    fn config_with_proxies(proxies: &[&str]) -> RateLimitConfig {
        RateLimitConfig {
            trusted_proxies: proxies.iter().map(|p| (*p).to_string()).collect(),
            ..RateLimitConfig::default()
        }
    }

    #[test]
    fn empty_proxy_list_uses_peer_address() {
        let resolver = identity_resolver(&config_with_proxies(&[])).unwrap();
        let client = ClientContext::from_remote_addr("10.0.0.2").with_forwarded_for("203.0.113.7");
        assert_eq!(resolver.resolve(&client), "10.0.0.2");
    }

    #[test]
    fn configured_proxy_honours_forwarded_for() {
        let resolver = identity_resolver(&config_with_proxies(&["10.0.0.2"])).unwrap();
        let client = ClientContext::from_remote_addr("10.0.0.2").with_forwarded_for("203.0.113.7");
        assert_eq!(resolver.resolve(&client), "203.0.113.7");
    }

    #[test]
    fn invalid_proxy_is_a_config_error() {
        let err = identity_resolver(&config_with_proxies(&["proxy.internal"])).err();
        assert!(matches!(err, Some(WooSapError::Config(ref m)) if m.contains("proxy.internal")));
    }

    #[test]
    fn clients_behind_trusted_proxy_get_separate_budgets() {
        let limiter = limiter_from_config(
            &config_with_proxies(&["10.0.0.2"]),
            Arc::new(InMemoryCounterStore::new()),
        )
        .unwrap();
        let first = ClientContext::from_remote_addr("10.0.0.2").with_forwarded_for("203.0.113.7");
        let second = ClientContext::from_remote_addr("10.0.0.2").with_forwarded_for("203.0.113.8");

        limiter.enforce(&first, "requeue_dead_letter", 1, 60).unwrap();
        assert!(limiter.enforce(&first, "requeue_dead_letter", 1, 60).is_err());
        assert!(limiter.enforce(&second, "requeue_dead_letter", 1, 60).is_ok());
    }

    #[test]
    fn without_proxies_clients_behind_one_proxy_share_a_budget() {
        let limiter =
            limiter_from_config(&config_with_proxies(&[]), Arc::new(InMemoryCounterStore::new()))
                .unwrap();
        let first = ClientContext::from_remote_addr("10.0.0.2").with_forwarded_for("203.0.113.7");
        let second = ClientContext::from_remote_addr("10.0.0.2").with_forwarded_for("203.0.113.8");

        limiter.enforce(&first, "requeue_dead_letter", 1, 60).unwrap();
        assert!(limiter.enforce(&second, "requeue_dead_letter", 1, 60).is_err());
    }
}
