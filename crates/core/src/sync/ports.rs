//! Port interfaces for the sync log

use async_trait::async_trait;
use woosap_domain::{Page, PageRequest, Result, SyncLogEntry, SyncLogFilter};

/// Structured sync log storage
#[async_trait]
pub trait SyncLogRepository: Send + Sync {
    /// Append one entry
    async fn record(&self, entry: &SyncLogEntry) -> Result<()>;

    /// Entries matching `filter`, newest first
    async fn list(&self, filter: &SyncLogFilter, page: PageRequest) -> Result<Page<SyncLogEntry>>;
}
