//! Sync status families
//!
//! Each entity family has its own closed enumeration. [`SyncStatus`] is the
//! union of all of them; every family converts into it without loss, which
//! lets classification run over a single exhaustive match.

use serde::{Deserialize, Serialize};

/// Status of a product (and generic entity) sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSyncStatus {
    Pending,
    Synced,
    Error,
    /// No SAP item is mapped to the WooCommerce product
    Unmapped,
}

crate::impl_domain_status_conversions!(ProductSyncStatus {
    Pending => "pending",
    Synced => "synced",
    Error => "error",
    Unmapped => "unmapped",
});

/// Status of an order along the sales document chain
///
/// `SoCreated` and `DpCreated` mark the sales order and down payment
/// documents created in SAP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSyncStatus {
    SoCreated,
    DpCreated,
    Delivered,
    Invoiced,
    Canceled,
    Failed,
}

crate::impl_domain_status_conversions!(OrderSyncStatus {
    SoCreated => "so_created",
    DpCreated => "dp_created",
    Delivered => "delivered",
    Invoiced => "invoiced",
    Canceled => "canceled",
    Failed => "failed",
});

/// Status of an event on the sync queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueEventStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    /// Moved to the dead-letter store; never picked up again
    Dead,
}

crate::impl_domain_status_conversions!(QueueEventStatus {
    Pending => "pending",
    Processing => "processing",
    Completed => "completed",
    Failed => "failed",
    Dead => "dead",
});

impl QueueEventStatus {
    /// Whether a worker may still pick the event up
    pub const fn is_active(&self) -> bool {
        match self {
            Self::Pending | Self::Processing | Self::Failed => true,
            Self::Completed | Self::Dead => false,
        }
    }
}

/// Union of every status family
///
/// Values shared by several families (`pending`, `failed`) appear once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Pending,
    Synced,
    Error,
    Unmapped,
    SoCreated,
    DpCreated,
    Delivered,
    Invoiced,
    Canceled,
    Failed,
    Processing,
    Completed,
    Dead,
}

crate::impl_domain_status_conversions!(SyncStatus {
    Pending => "pending",
    Synced => "synced",
    Error => "error",
    Unmapped => "unmapped",
    SoCreated => "so_created",
    DpCreated => "dp_created",
    Delivered => "delivered",
    Invoiced => "invoiced",
    Canceled => "canceled",
    Failed => "failed",
    Processing => "processing",
    Completed => "completed",
    Dead => "dead",
});

impl From<ProductSyncStatus> for SyncStatus {
    fn from(status: ProductSyncStatus) -> Self {
        match status {
            ProductSyncStatus::Pending => Self::Pending,
            ProductSyncStatus::Synced => Self::Synced,
            ProductSyncStatus::Error => Self::Error,
            ProductSyncStatus::Unmapped => Self::Unmapped,
        }
    }
}

impl From<OrderSyncStatus> for SyncStatus {
    fn from(status: OrderSyncStatus) -> Self {
        match status {
            OrderSyncStatus::SoCreated => Self::SoCreated,
            OrderSyncStatus::DpCreated => Self::DpCreated,
            OrderSyncStatus::Delivered => Self::Delivered,
            OrderSyncStatus::Invoiced => Self::Invoiced,
            OrderSyncStatus::Canceled => Self::Canceled,
            OrderSyncStatus::Failed => Self::Failed,
        }
    }
}

impl From<QueueEventStatus> for SyncStatus {
    fn from(status: QueueEventStatus) -> Self {
        match status {
            QueueEventStatus::Pending => Self::Pending,
            QueueEventStatus::Processing => Self::Processing,
            QueueEventStatus::Completed => Self::Completed,
            QueueEventStatus::Failed => Self::Failed,
            QueueEventStatus::Dead => Self::Dead,
        }
    }
}
