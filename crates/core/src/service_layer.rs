//! Rate-limited Service Layer client
//!
//! Wraps any [`ServiceLayerClient`] and charges every outbound call
//! (`login`, `get`, `post`, `patch`, `delete`, and the login performed by
//! `test_connection`) against one configured budget per operation. Denied
//! calls never reach the inner client; they are reported to the sync log as
//! `service_layer` / `rate_limited` entries and returned as
//! `WooSapError::RateLimited`. Local queries (`get_version`,
//! `get_last_error`, `is_authenticated`) and `logout` pass through.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::warn;
use woosap_common::resilience::{ClientContext, FixedWindowRateLimiter};
use woosap_domain::constants::SERVICE_LAYER_ENTITY;
use woosap_domain::{
    ConnectionTest, LogStatus, RateLimitRule, Result, ServiceLayerOperation, ServiceLayerResponse,
    SyncLogEntry, WooSapError,
};

use crate::sap_ports::ServiceLayerClient;
use crate::sync::ports::SyncLogRepository;

/// Service Layer client guarded by a fixed-window rate limiter
pub struct RateLimitedServiceLayer {
    inner: Arc<dyn ServiceLayerClient>,
    limiter: FixedWindowRateLimiter,
    rule: RateLimitRule,
    client: ClientContext,
    sync_log: Arc<dyn SyncLogRepository>,
}

impl RateLimitedServiceLayer {
    /// Guard `inner` with `rule`, charging calls to the local identity
    pub fn new(
        inner: Arc<dyn ServiceLayerClient>,
        limiter: FixedWindowRateLimiter,
        rule: RateLimitRule,
        sync_log: Arc<dyn SyncLogRepository>,
    ) -> Self {
        Self { inner, limiter, rule, client: ClientContext::local(), sync_log }
    }

    /// Charge calls to the given caller instead of the local identity
    #[must_use]
    pub fn with_client(mut self, client: ClientContext) -> Self {
        self.client = client;
        self
    }

    async fn admit(&self, operation: ServiceLayerOperation, endpoint: Option<&str>) -> Result<()> {
        let denial = match self.limiter.enforce(
            &self.client,
            &operation.action(),
            self.rule.max_requests,
            self.rule.window_seconds,
        ) {
            Ok(_) => return Ok(()),
            Err(err) => WooSapError::from(err),
        };

        if matches!(denial, WooSapError::RateLimited { .. }) {
            self.report_denial(operation, endpoint, &denial).await;
        }
        Err(denial)
    }

    async fn report_denial(
        &self,
        operation: ServiceLayerOperation,
        endpoint: Option<&str>,
        denial: &WooSapError,
    ) {
        let entry = SyncLogEntry::new(
            SERVICE_LAYER_ENTITY,
            operation.direction(),
            LogStatus::RateLimited,
            denial.to_string(),
        )
        .with_request(json!({ "operation": operation.as_str(), "endpoint": endpoint }));

        // The denial is returned regardless; a logging failure must not mask it.
        if let Err(err) = self.sync_log.record(&entry).await {
            warn!(error = %err, operation = %operation, "failed to record rate-limit denial");
        }
    }
}

#[async_trait]
impl ServiceLayerClient for RateLimitedServiceLayer {
    async fn login(&self) -> Result<()> {
        self.admit(ServiceLayerOperation::Login, None).await?;
        self.inner.login().await
    }

    async fn logout(&self) -> Result<()> {
        self.inner.logout().await
    }

    async fn get(&self, endpoint: &str) -> Result<ServiceLayerResponse> {
        self.admit(ServiceLayerOperation::Get, Some(endpoint)).await?;
        self.inner.get(endpoint).await
    }

    async fn post(&self, endpoint: &str, body: &Value) -> Result<ServiceLayerResponse> {
        self.admit(ServiceLayerOperation::Post, Some(endpoint)).await?;
        self.inner.post(endpoint, body).await
    }

    async fn patch(&self, endpoint: &str, body: &Value) -> Result<ServiceLayerResponse> {
        self.admit(ServiceLayerOperation::Patch, Some(endpoint)).await?;
        self.inner.patch(endpoint, body).await
    }

    async fn delete(&self, endpoint: &str) -> Result<ServiceLayerResponse> {
        self.admit(ServiceLayerOperation::Delete, Some(endpoint)).await?;
        self.inner.delete(endpoint).await
    }

    async fn get_version(&self) -> Result<Option<String>> {
        self.inner.get_version().await
    }

    fn get_last_error(&self) -> Option<String> {
        self.inner.get_last_error()
    }

    fn is_authenticated(&self) -> bool {
        self.inner.is_authenticated()
    }

    async fn test_connection(&self) -> Result<ConnectionTest> {
        self.admit(ServiceLayerOperation::Login, None).await?;
        self.inner.test_connection().await
    }
}
