//! Status classification
//!
//! Both classifiers are total over [`SyncStatus`] and list every variant, so
//! adding a status to any family fails to compile until it is classified
//! here. Strings read from storage or from WooCommerce/SAP go through
//! [`parse_status`] first; an unknown value is an `InvalidStatus` error,
//! never a silent `false`.

use woosap_domain::{Result, SyncStatus};

/// Whether the entity has reached SAP (or was deliberately settled there)
pub fn is_order_synced(status: impl Into<SyncStatus>) -> bool {
    match status.into() {
        SyncStatus::Synced
        | SyncStatus::SoCreated
        | SyncStatus::DpCreated
        | SyncStatus::Delivered
        | SyncStatus::Invoiced
        | SyncStatus::Canceled => true,
        SyncStatus::Pending
        | SyncStatus::Error
        | SyncStatus::Unmapped
        | SyncStatus::Failed
        | SyncStatus::Processing
        | SyncStatus::Completed
        | SyncStatus::Dead => false,
    }
}

/// Whether a sync in this status should be attempted again
pub fn is_retryable(status: impl Into<SyncStatus>) -> bool {
    match status.into() {
        SyncStatus::Pending | SyncStatus::Error | SyncStatus::Failed => true,
        SyncStatus::Synced
        | SyncStatus::Unmapped
        | SyncStatus::SoCreated
        | SyncStatus::DpCreated
        | SyncStatus::Delivered
        | SyncStatus::Invoiced
        | SyncStatus::Canceled
        | SyncStatus::Processing
        | SyncStatus::Completed
        | SyncStatus::Dead => false,
    }
}

/// Parse a stored status string of any family
///
/// # Errors
/// `WooSapError::InvalidStatus` for values outside every family.
pub fn parse_status(raw: &str) -> Result<SyncStatus> {
    raw.parse()
}

/// [`is_order_synced`] over a raw status string
pub fn is_order_synced_str(raw: &str) -> Result<bool> {
    parse_status(raw).map(is_order_synced)
}

/// [`is_retryable`] over a raw status string
pub fn is_retryable_str(raw: &str) -> Result<bool> {
    parse_status(raw).map(is_retryable)
}

#[cfg(test)]
mod tests {
    use woosap_domain::{OrderSyncStatus, ProductSyncStatus, QueueEventStatus, WooSapError};

    use super::*;

    const ALL: [SyncStatus; 13] = [
        SyncStatus::Pending,
        SyncStatus::Synced,
        SyncStatus::Error,
        SyncStatus::Unmapped,
        SyncStatus::SoCreated,
        SyncStatus::DpCreated,
        SyncStatus::Delivered,
        SyncStatus::Invoiced,
        SyncStatus::Canceled,
        SyncStatus::Failed,
        SyncStatus::Processing,
        SyncStatus::Completed,
        SyncStatus::Dead,
    ];

    #[test]
    fn order_synced_table() {
        let synced: Vec<_> = ALL.into_iter().filter(|s| is_order_synced(*s)).collect();
        assert_eq!(
            synced,
            vec![
                SyncStatus::Synced,
                SyncStatus::SoCreated,
                SyncStatus::DpCreated,
                SyncStatus::Delivered,
                SyncStatus::Invoiced,
                SyncStatus::Canceled,
            ]
        );
    }

    #[test]
    fn retryable_table() {
        let retryable: Vec<_> = ALL.into_iter().filter(|s| is_retryable(*s)).collect();
        assert_eq!(retryable, vec![SyncStatus::Pending, SyncStatus::Error, SyncStatus::Failed]);
    }

    #[test]
    fn family_values_classify_through_the_union() {
        assert!(is_order_synced(OrderSyncStatus::Invoiced));
        assert!(!is_order_synced(OrderSyncStatus::Failed));
        assert!(is_retryable(OrderSyncStatus::Failed));
        assert!(is_retryable(ProductSyncStatus::Error));
        assert!(!is_retryable(ProductSyncStatus::Unmapped));
        assert!(!is_retryable(QueueEventStatus::Dead));
    }

    #[test]
    fn string_inputs_fail_loudly() {
        assert_eq!(is_order_synced_str("so_created"), Ok(true));
        assert_eq!(is_retryable_str("ERROR"), Ok(true));
        assert!(matches!(is_retryable_str("shipped"), Err(WooSapError::InvalidStatus(_))));
        assert!(matches!(is_order_synced_str(""), Err(WooSapError::InvalidStatus(_))));
    }
}
