//! Mock Service Layer client
//!
//! Answers every call with a canned success and counts how many calls
//! reached it.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use woosap_core::ServiceLayerClient;
use woosap_domain::{ConnectionTest, Result as DomainResult, ServiceLayerResponse};

/// In-memory mock for `ServiceLayerClient`.
#[derive(Default, Clone)]
pub struct MockServiceLayerClient {
    calls: Arc<AtomicUsize>,
    authenticated: Arc<AtomicBool>,
}

impl MockServiceLayerClient {
    /// Calls that reached the client
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ServiceLayerClient for MockServiceLayerClient {
    async fn login(&self) -> DomainResult<()> {
        self.hit();
        self.authenticated.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn logout(&self) -> DomainResult<()> {
        self.authenticated.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn get(&self, endpoint: &str) -> DomainResult<ServiceLayerResponse> {
        self.hit();
        Ok(ServiceLayerResponse::new(200, json!({ "endpoint": endpoint })))
    }

    async fn post(&self, _endpoint: &str, body: &Value) -> DomainResult<ServiceLayerResponse> {
        self.hit();
        Ok(ServiceLayerResponse::new(201, body.clone()))
    }

    async fn patch(&self, _endpoint: &str, _body: &Value) -> DomainResult<ServiceLayerResponse> {
        self.hit();
        Ok(ServiceLayerResponse::new(204, Value::Null))
    }

    async fn delete(&self, _endpoint: &str) -> DomainResult<ServiceLayerResponse> {
        self.hit();
        Ok(ServiceLayerResponse::new(204, Value::Null))
    }

    async fn get_version(&self) -> DomainResult<Option<String>> {
        Ok(Some("1000190".to_string()))
    }

    fn get_last_error(&self) -> Option<String> {
        None
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    async fn test_connection(&self) -> DomainResult<ConnectionTest> {
        self.login().await?;
        Ok(ConnectionTest {
            success: true,
            message: "Connected".to_string(),
            version: self.get_version().await?,
        })
    }
}
