//! Integration tests for the rate-limited Service Layer client

mod support;

use std::sync::Arc;

use serde_json::json;
use support::repositories::{FailingSyncLogRepository, MockSyncLogRepository};
use support::service_layer::MockServiceLayerClient;
use woosap_common::resilience::{
    ClientContext, FixedWindowRateLimiter, InMemoryCounterStore, MockClock,
};
use woosap_core::{RateLimitedServiceLayer, ServiceLayerClient};
use woosap_domain::{LogStatus, RateLimitRule, SyncDirection, WooSapError};

struct Harness {
    guarded: RateLimitedServiceLayer,
    inner: MockServiceLayerClient,
    sync_log: MockSyncLogRepository,
    clock: MockClock,
}

fn harness(max_requests: u32, window_seconds: u64) -> Harness {
    let clock = MockClock::new();
    let limiter =
        FixedWindowRateLimiter::new(Arc::new(InMemoryCounterStore::with_clock(clock.clone())));
    let inner = MockServiceLayerClient::default();
    let sync_log = MockSyncLogRepository::default();
    let guarded = RateLimitedServiceLayer::new(
        Arc::new(inner.clone()),
        limiter,
        RateLimitRule::new(max_requests, window_seconds),
        Arc::new(sync_log.clone()),
    );
    Harness { guarded, inner, sync_log, clock }
}

/// Validates that calls within budget pass through unchanged
#[tokio::test]
async fn test_allowed_calls_pass_through() {
    let h = harness(3, 60);

    let response = h.guarded.post("Items", &json!({"ItemCode": "A-1"})).await.unwrap();

    assert_eq!(response.status, 201);
    assert_eq!(response.body, json!({"ItemCode": "A-1"}));
    assert_eq!(h.inner.calls(), 1);
    assert!(h.sync_log.entries().is_empty());
}

/// Validates that a denied call never reaches the client and is logged as
/// a `service_layer` / `rate_limited` entry
#[tokio::test]
async fn test_denied_call_is_blocked_and_logged() {
    let h = harness(2, 60);

    h.guarded.post("Orders", &json!({})).await.unwrap();
    h.guarded.post("Orders", &json!({})).await.unwrap();
    let err = h.guarded.post("Orders", &json!({})).await.unwrap_err();

    assert!(matches!(
        err,
        WooSapError::RateLimited { ref action, max_requests: 2, window_seconds: 60, .. }
            if action == "service_layer_post"
    ));
    assert_eq!(h.inner.calls(), 2);

    let entries = h.sync_log.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entity_type, "service_layer");
    assert_eq!(entries[0].status, LogStatus::RateLimited);
    assert_eq!(entries[0].direction, SyncDirection::WooToSap);
    assert_eq!(entries[0].request.as_ref().unwrap()["endpoint"], "Orders");
}

/// Validates that each operation has its own budget
#[tokio::test]
async fn test_operations_are_limited_independently() {
    let h = harness(1, 60);

    h.guarded.get("Items('A-1')").await.unwrap();
    h.guarded.patch("Items('A-1')", &json!({"Price": 10})).await.unwrap();
    h.guarded.delete("Items('A-1')").await.unwrap();
    h.guarded.login().await.unwrap();

    assert!(h.guarded.get("Items('A-1')").await.is_err());
    assert_eq!(h.sync_log.entries()[0].direction, SyncDirection::SapToWoo);
    assert_eq!(h.inner.calls(), 4);
}

/// Validates that the window resets under the mock clock
#[tokio::test]
async fn test_budget_returns_after_window() {
    let h = harness(1, 30);

    h.guarded.get("Items").await.unwrap();
    assert!(h.guarded.get("Items").await.is_err());

    h.clock.advance_secs(30);

    assert!(h.guarded.get("Items").await.is_ok());
}

/// Validates that local queries are never limited
#[tokio::test]
async fn test_local_queries_are_not_limited() {
    let h = harness(1, 60);
    h.guarded.login().await.unwrap();
    assert!(h.guarded.login().await.is_err());

    for _ in 0..5 {
        assert_eq!(h.guarded.get_version().await.unwrap().as_deref(), Some("1000190"));
        assert!(h.guarded.is_authenticated());
        assert_eq!(h.guarded.get_last_error(), None);
    }
    h.guarded.logout().await.unwrap();
    assert!(!h.guarded.is_authenticated());
}

/// Validates that test_connection is charged against the login budget
#[tokio::test]
async fn test_connection_uses_login_budget() {
    let h = harness(1, 60);

    let report = h.guarded.test_connection().await.unwrap();
    assert!(report.success);

    assert!(matches!(h.guarded.login().await, Err(WooSapError::RateLimited { .. })));
}

/// Validates that different callers get separate buckets
#[tokio::test]
async fn test_callers_have_separate_buckets() {
    let h = harness(1, 60);
    let store = Arc::new(InMemoryCounterStore::with_clock(h.clock.clone()));
    let first = RateLimitedServiceLayer::new(
        Arc::new(h.inner.clone()),
        FixedWindowRateLimiter::new(store.clone()),
        RateLimitRule::new(1, 60),
        Arc::new(h.sync_log.clone()),
    )
    .with_client(ClientContext::from_remote_addr("203.0.113.1"));
    let second = RateLimitedServiceLayer::new(
        Arc::new(h.inner.clone()),
        FixedWindowRateLimiter::new(store),
        RateLimitRule::new(1, 60),
        Arc::new(h.sync_log.clone()),
    )
    .with_client(ClientContext::from_remote_addr("203.0.113.2"));

    assert!(first.get("Items").await.is_ok());
    assert!(second.get("Items").await.is_ok());
    assert!(first.get("Items").await.is_err());
}

/// Validates that a failing sync log does not mask the denial
#[tokio::test]
async fn test_log_failure_does_not_mask_denial() {
    let limiter = FixedWindowRateLimiter::new(Arc::new(InMemoryCounterStore::new()));
    let guarded = RateLimitedServiceLayer::new(
        Arc::new(MockServiceLayerClient::default()),
        limiter,
        RateLimitRule::new(1, 60),
        Arc::new(FailingSyncLogRepository),
    );

    guarded.get("Items").await.unwrap();
    assert!(matches!(guarded.get("Items").await, Err(WooSapError::RateLimited { .. })));
}

/// Validates that a zero budget is a configuration error, not a pass
#[tokio::test]
async fn test_zero_budget_is_config_error() {
    let h = harness(0, 60);

    assert!(matches!(h.guarded.get("Items").await, Err(WooSapError::Config(_))));
    assert_eq!(h.inner.calls(), 0);
    assert!(h.sync_log.entries().is_empty());
}
