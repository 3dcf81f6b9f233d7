//! Domain types and models

pub mod queue;
pub mod sap;
pub mod status;
pub mod sync_log;

pub use queue::{DeadLetterRecord, DeadLetterView, EntityType, QueueEvent};
pub use sap::{ConnectionTest, ServiceLayerOperation, ServiceLayerResponse};
pub use status::{OrderSyncStatus, ProductSyncStatus, QueueEventStatus, SyncStatus};
pub use sync_log::{LogStatus, Page, PageRequest, SyncDirection, SyncLogEntry, SyncLogFilter};

/// Outcome of an insert that is idempotent on a natural key
#[derive(Debug, Clone, PartialEq)]
pub enum Stored<T> {
    /// A new row was written
    Created(T),
    /// A row with the same key already existed and is returned unchanged
    Existing(T),
}

impl<T> Stored<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Created(value) | Self::Existing(value) => value,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}
