//! Sync queue events and dead-letter records

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::status::QueueEventStatus;
use crate::constants::REQUEUE_KEY_PREFIX;
use crate::errors::{Result, WooSapError};

/// Kind of shop entity an event concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Product,
    Order,
    Customer,
    Stock,
}

crate::impl_domain_status_conversions!(EntityType {
    Product => "product",
    Order => "order",
    Customer => "customer",
    Stock => "stock",
});

/// Event waiting on (or processed from) the sync queue
///
/// `attempts` always equals `error_history.len()`; only
/// [`QueueEvent::record_failure`] changes either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEvent {
    pub id: String, // UUIDv7
    /// Event name, e.g. `product.updated`
    pub event_type: String,
    pub entity_type: EntityType,
    pub entity_id: Option<String>,
    pub payload: Value,
    pub status: QueueEventStatus,
    pub error_history: Vec<String>,
    pub attempts: u32,
    pub idempotency_key: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl QueueEvent {
    /// New `pending` event with no attempts
    pub fn new(
        event_type: impl Into<String>,
        entity_type: EntityType,
        entity_id: Option<String>,
        payload: Value,
    ) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: Uuid::now_v7().to_string(),
            event_type: event_type.into(),
            entity_type,
            entity_id,
            payload,
            status: QueueEventStatus::Pending,
            error_history: Vec::new(),
            attempts: 0,
            idempotency_key: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// Append a failure, bump the attempt count and mark the event failed.
    ///
    /// Returns the new attempt count. A `dead` event is terminal and fails
    /// with `InvalidInput`, leaving the event untouched.
    pub fn record_failure(&mut self, error_message: impl Into<String>) -> Result<u32> {
        if self.status == QueueEventStatus::Dead {
            return Err(WooSapError::InvalidInput(format!(
                "event {} is dead and cannot record further failures",
                self.id
            )));
        }
        self.error_history.push(error_message.into());
        self.attempts = u32::try_from(self.error_history.len()).unwrap_or(u32::MAX);
        self.status = QueueEventStatus::Failed;
        self.updated_at = Utc::now().timestamp();
        Ok(self.attempts)
    }

    /// Whether the event has used up its attempts
    pub fn is_exhausted(&self, max_attempts: u32) -> bool {
        self.attempts >= max_attempts
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error_history.last().map(String::as_str)
    }
}

/// Permanently failed queue event kept for operator review
///
/// `total_attempts == error_history.len()` and is at least 1. `resolved`
/// only changes through an explicit operator action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadLetterRecord {
    pub id: String, // UUIDv7
    pub event_id: String,
    pub event_type: String,
    pub entity_type: EntityType,
    pub entity_id: Option<String>,
    pub payload: Value,
    pub error_history: Vec<String>,
    pub total_attempts: u32,
    pub resolved: bool,
    /// Bumped each time a requeued copy finishes, so the next requeue gets
    /// a fresh idempotency key
    pub requeue_generation: u32,
    pub created_at: i64,
    pub resolved_at: Option<i64>,
}

impl DeadLetterRecord {
    /// Snapshot a failed event into an unresolved record
    ///
    /// Fails with `InvalidInput` if the event never failed.
    pub fn from_event(event: &QueueEvent) -> Result<Self> {
        if event.error_history.is_empty() {
            return Err(WooSapError::InvalidInput(format!(
                "event {} has no recorded failures",
                event.id
            )));
        }

        Ok(Self {
            id: Uuid::now_v7().to_string(),
            event_id: event.id.clone(),
            event_type: event.event_type.clone(),
            entity_type: event.entity_type,
            entity_id: event.entity_id.clone(),
            payload: event.payload.clone(),
            error_history: event.error_history.clone(),
            total_attempts: u32::try_from(event.error_history.len()).unwrap_or(u32::MAX),
            resolved: false,
            requeue_generation: 0,
            created_at: Utc::now().timestamp(),
            resolved_at: None,
        })
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error_history.last().map(String::as_str)
    }

    /// Error history in its stored JSON form
    pub fn error_history_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.error_history)?)
    }

    /// Idempotency key for requeueing the current generation
    pub fn requeue_key(&self) -> String {
        format!("{REQUEUE_KEY_PREFIX}:{}:{}", self.id, self.requeue_generation)
    }

    /// Fresh `pending` event carrying the original payload
    pub fn to_requeued_event(&self) -> QueueEvent {
        QueueEvent::new(
            self.event_type.clone(),
            self.entity_type,
            self.entity_id.clone(),
            self.payload.clone(),
        )
        .with_idempotency_key(self.requeue_key())
    }
}

/// Unresolved dead-letter row as shown to operators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadLetterView {
    pub id: String,
    pub created_at: i64,
    pub event_type: String,
    pub total_attempts: u32,
    /// Last error, trimmed for display
    pub last_error: Option<String>,
    pub resolved: bool,
}
