//! SAP Business One Service Layer port interface

use async_trait::async_trait;
use serde_json::Value;
use woosap_domain::{ConnectionTest, Result, ServiceLayerResponse};

/// Trait for Service Layer client operations
///
/// Endpoints are paths relative to the configured base URL, e.g.
/// `Items('A-1')` or `Orders`.
#[async_trait]
pub trait ServiceLayerClient: Send + Sync {
    /// Open a session
    async fn login(&self) -> Result<()>;

    /// Close the session
    async fn logout(&self) -> Result<()>;

    async fn get(&self, endpoint: &str) -> Result<ServiceLayerResponse>;

    async fn post(&self, endpoint: &str, body: &Value) -> Result<ServiceLayerResponse>;

    async fn patch(&self, endpoint: &str, body: &Value) -> Result<ServiceLayerResponse>;

    async fn delete(&self, endpoint: &str) -> Result<ServiceLayerResponse>;

    /// Service Layer version reported by the server, if known
    async fn get_version(&self) -> Result<Option<String>>;

    /// Message of the most recent failed call
    fn get_last_error(&self) -> Option<String>;

    fn is_authenticated(&self) -> bool;

    /// Log in and report reachability and version
    async fn test_connection(&self) -> Result<ConnectionTest>;
}
