//! Sync log entries and paginated listings

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::errors::{Result, WooSapError};

/// Direction of a sync operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncDirection {
    WooToSap,
    SapToWoo,
}

crate::impl_domain_status_conversions!(SyncDirection {
    WooToSap => "woo_to_sap",
    SapToWoo => "sap_to_woo",
});

/// Outcome recorded for one sync operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    Success,
    Error,
    Skipped,
    RateLimited,
}

crate::impl_domain_status_conversions!(LogStatus {
    Success => "success",
    Error => "error",
    Skipped => "skipped",
    RateLimited => "rate_limited",
});

/// One structured sync log row
///
/// `entity_type` is free-form so gate decisions can be logged against
/// `service_layer` alongside shop entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncLogEntry {
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub direction: SyncDirection,
    pub status: LogStatus,
    pub message: String,
    pub request: Option<Value>,
    pub response: Option<Value>,
    pub created_at: i64,
}

impl SyncLogEntry {
    pub fn new(
        entity_type: impl Into<String>,
        direction: SyncDirection,
        status: LogStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id: None,
            direction,
            status,
            message: message.into(),
            request: None,
            response: None,
            created_at: Utc::now().timestamp(),
        }
    }

    #[must_use]
    pub fn with_entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    #[must_use]
    pub fn with_request(mut self, request: Value) -> Self {
        self.request = Some(request);
        self
    }

    #[must_use]
    pub fn with_response(mut self, response: Value) -> Self {
        self.response = Some(response);
        self
    }
}

/// Filter for sync log listings; `None` fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncLogFilter {
    pub entity_type: Option<String>,
    pub status: Option<LogStatus>,
}

impl SyncLogFilter {
    pub fn matches(&self, entry: &SyncLogEntry) -> bool {
        self.entity_type.as_deref().map_or(true, |t| t == entry.entity_type)
            && self.status.map_or(true, |s| s == entry.status)
    }
}

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, per_page: DEFAULT_PAGE_SIZE }
    }
}

impl PageRequest {
    /// Validated page request
    pub fn new(page: u32, per_page: u32) -> Result<Self> {
        if page == 0 {
            return Err(WooSapError::InvalidInput("page must be at least 1".into()));
        }
        if per_page == 0 || per_page > MAX_PAGE_SIZE {
            return Err(WooSapError::InvalidInput(format!(
                "per_page must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(Self { page, per_page })
    }

    /// Number of rows to skip
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * self.per_page as usize
    }

    pub fn limit(&self) -> usize {
        self.per_page as usize
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    /// Slice a full, already ordered result set
    pub fn from_slice(all: &[T], request: PageRequest) -> Self
    where
        T: Clone,
    {
        let items = all.iter().skip(request.offset()).take(request.limit()).cloned().collect();
        Self { items, total: all.len() as u64, page: request.page, per_page: request.per_page }
    }

    pub fn total_pages(&self) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.per_page))
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }
}
