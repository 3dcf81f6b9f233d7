//! Port interfaces for dead-letter and queue storage

use async_trait::async_trait;
use woosap_domain::{DeadLetterRecord, Page, PageRequest, QueueEvent, Result, Stored};

/// Storage for dead-letter records
#[async_trait]
pub trait DeadLetterRepository: Send + Sync {
    /// Insert unless a record for the same `event_id` exists
    ///
    /// Must be atomic per event id: concurrent calls for one event store
    /// one record.
    async fn insert_if_absent(&self, record: &DeadLetterRecord)
        -> Result<Stored<DeadLetterRecord>>;

    /// Get a record by id; `WooSapError::NotFound` if missing
    async fn get(&self, id: &str) -> Result<DeadLetterRecord>;

    /// Set `resolved = true` and `resolved_at`, returning the stored record
    async fn mark_resolved(&self, id: &str, resolved_at: i64) -> Result<DeadLetterRecord>;

    /// Compare-and-swap `requeue_generation` from `expected` to `expected + 1`
    ///
    /// Returns `false` when the stored generation no longer equals
    /// `expected`.
    async fn advance_requeue_generation(&self, id: &str, expected: u32) -> Result<bool>;

    /// Unresolved records, newest first
    async fn list_unresolved(&self, page: PageRequest) -> Result<Page<DeadLetterRecord>>;
}

/// Storage for sync queue events
#[async_trait]
pub trait QueueRepository: Send + Sync {
    /// Enqueue unless an event with the same idempotency key exists
    ///
    /// Events without a key are always created. Must be atomic per key.
    async fn enqueue_idempotent(&self, event: &QueueEvent) -> Result<Stored<QueueEvent>>;

    /// Find an event by idempotency key
    async fn find_by_idempotency_key(&self, key: &str) -> Result<Option<QueueEvent>>;

    /// Persist status, attempts and error history of an existing event
    async fn update(&self, event: &QueueEvent) -> Result<()>;
}
