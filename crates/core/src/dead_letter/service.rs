//! Dead-letter service - failure accounting and operator actions

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use woosap_domain::{
    DeadLetterConfig, DeadLetterRecord, Page, PageRequest, QueueEvent, QueueEventStatus, Result,
    Stored, WooSapError,
};

use super::ports::{DeadLetterRepository, QueueRepository};

/// What happened to an event after a failure was recorded
#[derive(Debug, Clone, PartialEq)]
pub enum FailureOutcome {
    /// Attempts remain; the caller decides when to retry
    Retry { attempts: u32 },
    /// Attempts are used up and the event now lives in the dead-letter store
    DeadLettered(DeadLetterRecord),
}

/// Result of requeueing a dead-letter record
#[derive(Debug, Clone, PartialEq)]
pub enum RequeueOutcome {
    /// A fresh `pending` event was created
    Enqueued(QueueEvent),
    /// A copy for the current generation is already queued
    AlreadyQueued(QueueEvent),
}

impl RequeueOutcome {
    pub fn event(&self) -> &QueueEvent {
        match self {
            Self::Enqueued(event) | Self::AlreadyQueued(event) => event,
        }
    }
}

/// Dead-letter service
///
/// Records failures on queue events, moves exhausted events to the
/// dead-letter store, and carries out the operator actions (resolve,
/// requeue). Exhaustion is a state transition, not an error.
pub struct DeadLetterService {
    dead_letters: Arc<dyn DeadLetterRepository>,
    queue: Arc<dyn QueueRepository>,
    max_attempts: u32,
}

impl DeadLetterService {
    /// Create a new dead-letter service
    ///
    /// # Errors
    /// `WooSapError::Config` when `max_attempts` is zero.
    pub fn new(
        dead_letters: Arc<dyn DeadLetterRepository>,
        queue: Arc<dyn QueueRepository>,
        config: DeadLetterConfig,
    ) -> Result<Self> {
        if config.max_attempts == 0 {
            return Err(WooSapError::Config(
                "dead_letter.max_attempts: must be greater than 0".to_string(),
            ));
        }
        Ok(Self { dead_letters, queue, max_attempts: config.max_attempts })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Append `error_message` to the event history and persist it
    ///
    /// Returns the new attempt count.
    pub async fn record_failure(&self, event: &mut QueueEvent, error_message: &str) -> Result<u32> {
        let attempts = event.record_failure(error_message)?;
        self.queue.update(event).await?;
        debug!(event_id = %event.id, attempts, error = error_message, "recorded queue event failure");
        Ok(attempts)
    }

    /// Whether the event has used up the configured attempts
    pub fn is_exhausted(&self, event: &QueueEvent) -> bool {
        event.is_exhausted(self.max_attempts)
    }

    /// Move a failed event to the dead-letter store and mark it `dead`
    ///
    /// Idempotent by event id: a second call returns the existing record.
    pub async fn move_to_dead_letter(&self, event: &mut QueueEvent) -> Result<DeadLetterRecord> {
        let candidate = DeadLetterRecord::from_event(event)?;
        let stored = self.dead_letters.insert_if_absent(&candidate).await?;

        if event.status != QueueEventStatus::Dead {
            event.status = QueueEventStatus::Dead;
            event.updated_at = Utc::now().timestamp();
            self.queue.update(event).await?;
        }

        match stored {
            Stored::Created(record) => {
                info!(
                    dead_letter_id = %record.id,
                    event_id = %record.event_id,
                    event_type = %record.event_type,
                    total_attempts = record.total_attempts,
                    "moved queue event to dead letter"
                );
                Ok(record)
            }
            Stored::Existing(record) => {
                debug!(
                    dead_letter_id = %record.id,
                    event_id = %record.event_id,
                    "queue event already dead-lettered"
                );
                Ok(record)
            }
        }
    }

    /// Record a failure and dead-letter the event once it is exhausted
    pub async fn handle_failure(
        &self,
        event: &mut QueueEvent,
        error_message: &str,
    ) -> Result<FailureOutcome> {
        let attempts = self.record_failure(event, error_message).await?;
        if !self.is_exhausted(event) {
            return Ok(FailureOutcome::Retry { attempts });
        }
        let record = self.move_to_dead_letter(event).await?;
        Ok(FailureOutcome::DeadLettered(record))
    }

    /// Mark a record resolved; the event is not re-run
    ///
    /// Resolving an already resolved record returns it unchanged.
    pub async fn resolve(&self, dead_letter_id: &str) -> Result<DeadLetterRecord> {
        let record = self.dead_letters.get(dead_letter_id).await?;
        if record.resolved {
            return Ok(record);
        }
        let record = self.dead_letters.mark_resolved(dead_letter_id, Utc::now().timestamp()).await?;
        info!(dead_letter_id, event_id = %record.event_id, "dead letter resolved");
        Ok(record)
    }

    /// Put the record's payload back on the queue as a fresh `pending` event
    ///
    /// The event carries the idempotency key for the record's current
    /// requeue generation, so concurrent requeues of one record yield one
    /// active event. Once the previous copy has completed or died, the
    /// generation advances and a new copy may be queued. `resolved` is left
    /// to the operator.
    pub async fn requeue(&self, dead_letter_id: &str) -> Result<RequeueOutcome> {
        let mut record = self.dead_letters.get(dead_letter_id).await?;

        if let Some(existing) = self.queue.find_by_idempotency_key(&record.requeue_key()).await? {
            if existing.status.is_active() {
                debug!(
                    dead_letter_id,
                    event_id = %existing.id,
                    "dead letter already requeued"
                );
                return Ok(RequeueOutcome::AlreadyQueued(existing));
            }

            // A lost race means another caller advanced it; re-read either way.
            let advanced = self
                .dead_letters
                .advance_requeue_generation(dead_letter_id, record.requeue_generation)
                .await?;
            if !advanced {
                debug!(dead_letter_id, "requeue generation advanced concurrently");
            }
            record = self.dead_letters.get(dead_letter_id).await?;
        }

        match self.queue.enqueue_idempotent(&record.to_requeued_event()).await? {
            Stored::Created(event) => {
                info!(
                    dead_letter_id,
                    event_id = %event.id,
                    generation = record.requeue_generation,
                    "dead letter requeued"
                );
                Ok(RequeueOutcome::Enqueued(event))
            }
            Stored::Existing(event) => {
                if !event.status.is_active() {
                    warn!(
                        dead_letter_id,
                        event_id = %event.id,
                        status = %event.status,
                        "requeue key already used by a finished event"
                    );
                }
                Ok(RequeueOutcome::AlreadyQueued(event))
            }
        }
    }

    /// Unresolved records for operator review, newest first
    pub async fn list_unresolved(&self, page: PageRequest) -> Result<Page<DeadLetterRecord>> {
        self.dead_letters.list_unresolved(page).await
    }
}
