//! SAP Business One Service Layer contract types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::sync_log::SyncDirection;

/// Outbound Service Layer operations subject to rate limiting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceLayerOperation {
    Login,
    Get,
    Post,
    Patch,
    Delete,
}

crate::impl_domain_status_conversions!(ServiceLayerOperation {
    Login => "login",
    Get => "get",
    Post => "post",
    Patch => "patch",
    Delete => "delete",
});

impl ServiceLayerOperation {
    /// Rate-limit action name, e.g. `service_layer_post`
    pub fn action(&self) -> String {
        format!("service_layer_{}", self.as_str())
    }

    /// Reads pull from SAP; everything else pushes to it
    pub const fn direction(&self) -> SyncDirection {
        match self {
            Self::Get => SyncDirection::SapToWoo,
            Self::Login | Self::Post | Self::Patch | Self::Delete => SyncDirection::WooToSap,
        }
    }
}

/// Decoded Service Layer response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceLayerResponse {
    pub status: u16,
    /// JSON body; `Value::Null` for empty (204) responses
    pub body: Value,
}

impl ServiceLayerResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Result of a connectivity check against the Service Layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionTest {
    pub success: bool,
    pub message: String,
    pub version: Option<String>,
}
