//! Client identity resolution for rate limiting
//!
//! The limiter keys its counters on a client identity string. How that
//! identity is derived is a trust-boundary decision, so it is pluggable:
//!
//! - [`RemoteAddrResolver`] (default) uses the peer address and falls back
//!   to [`LOOPBACK_IDENTITY`] when the address is missing or not an IP. This
//!   fail-open default is meant for development: proxy headers are ignored,
//!   so behind a reverse proxy every client shares the proxy's bucket, and a
//!   caller that can suppress its address lands in the shared loopback
//!   bucket instead of being rejected.
//! - [`ForwardedForResolver`] honours `X-Forwarded-For` only when the peer
//!   is one of the configured trusted proxies.

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use tracing::debug;

/// Identity used when no valid client address is available
pub const LOOPBACK_IDENTITY: &str = "127.0.0.1";

/// Network facts about the caller of a guarded action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientContext {
    /// Peer address as reported by the transport, possibly with a port
    pub remote_addr: Option<String>,
    /// Raw `X-Forwarded-For` header value, if any
    pub forwarded_for: Option<String>,
}

impl ClientContext {
    /// Context for a caller with a known peer address
    pub fn from_remote_addr(addr: impl Into<String>) -> Self {
        Self { remote_addr: Some(addr.into()), forwarded_for: None }
    }

    /// Context for in-process callers such as scheduled sync jobs
    pub fn local() -> Self {
        Self::default()
    }

    /// Attach an `X-Forwarded-For` header value
    #[must_use]
    pub fn with_forwarded_for(mut self, header: impl Into<String>) -> Self {
        self.forwarded_for = Some(header.into());
        self
    }
}

/// Strategy for turning a [`ClientContext`] into a rate-limit identity
pub trait ClientIdentityResolver: Send + Sync + fmt::Debug {
    /// Resolve a normalized identity; never fails
    fn resolve(&self, client: &ClientContext) -> String;
}

/// Parse an address that may carry a port, normalizing IPv4-mapped IPv6
fn parse_ip(raw: &str) -> Option<IpAddr> {
    let raw = raw.trim();
    raw.parse::<IpAddr>()
        .ok()
        .or_else(|| raw.parse::<SocketAddr>().ok().map(|addr| addr.ip()))
        .map(|ip| ip.to_canonical())
}

/// Peer-address resolver with loopback fallback (development default)
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteAddrResolver;

impl ClientIdentityResolver for RemoteAddrResolver {
    fn resolve(&self, client: &ClientContext) -> String {
        match client.remote_addr.as_deref().and_then(parse_ip) {
            Some(ip) => ip.to_string(),
            None => {
                debug!(
                    remote_addr = ?client.remote_addr,
                    "client address missing or invalid, using loopback identity"
                );
                LOOPBACK_IDENTITY.to_string()
            }
        }
    }
}

/// Resolver that trusts `X-Forwarded-For` from known proxies only
///
/// The header is walked right to left and the first hop that is not itself
/// a trusted proxy is the client. Malformed hops end the walk and the last
/// trusted address seen is used.
#[derive(Debug, Clone, Default)]
pub struct ForwardedForResolver {
    trusted_proxies: Vec<IpAddr>,
}

impl ForwardedForResolver {
    /// Create a resolver trusting the given proxy addresses
    pub fn new(trusted_proxies: impl IntoIterator<Item = IpAddr>) -> Self {
        Self { trusted_proxies: trusted_proxies.into_iter().map(|ip| ip.to_canonical()).collect() }
    }

    fn is_trusted(&self, ip: &IpAddr) -> bool {
        self.trusted_proxies.contains(ip)
    }
}

impl ClientIdentityResolver for ForwardedForResolver {
    fn resolve(&self, client: &ClientContext) -> String {
        let Some(peer) = client.remote_addr.as_deref().and_then(parse_ip) else {
            return RemoteAddrResolver.resolve(client);
        };

        if !self.is_trusted(&peer) {
            return peer.to_string();
        }

        let Some(header) = client.forwarded_for.as_deref() else {
            return peer.to_string();
        };

        let mut candidate = peer;
        for hop in header.rsplit(',') {
            match parse_ip(hop) {
                Some(ip) if self.is_trusted(&ip) => candidate = ip,
                Some(ip) => return ip.to_string(),
                None => break,
            }
        }
        candidate.to_string()
    }
}
