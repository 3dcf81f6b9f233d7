//! Mock repository implementations for testing
//!
//! Provides in-memory mocks for all core repository ports, enabling
//! deterministic tests without database dependencies. Each mock holds its
//! rows behind one mutex, so the idempotent inserts are atomic.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use woosap_core::{DeadLetterRepository, QueueRepository, SyncLogRepository};
use woosap_domain::{
    DeadLetterRecord, Page, PageRequest, QueueEvent, Result as DomainResult, Stored,
    SyncLogEntry, SyncLogFilter, WooSapError,
};

/// In-memory mock for `DeadLetterRepository`.
#[derive(Default, Clone)]
pub struct MockDeadLetterRepository {
    records: Arc<Mutex<Vec<DeadLetterRecord>>>,
}

impl MockDeadLetterRepository {
    pub fn all(&self) -> Vec<DeadLetterRecord> {
        self.records.lock().expect("records mutex poisoned").clone()
    }
}

#[async_trait]
impl DeadLetterRepository for MockDeadLetterRepository {
    async fn insert_if_absent(
        &self,
        record: &DeadLetterRecord,
    ) -> DomainResult<Stored<DeadLetterRecord>> {
        let mut records = self.records.lock().expect("records mutex poisoned");
        if let Some(existing) = records.iter().find(|r| r.event_id == record.event_id) {
            return Ok(Stored::Existing(existing.clone()));
        }
        records.push(record.clone());
        Ok(Stored::Created(record.clone()))
    }

    async fn get(&self, id: &str) -> DomainResult<DeadLetterRecord> {
        self.records
            .lock()
            .expect("records mutex poisoned")
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| WooSapError::NotFound(format!("dead letter {id}")))
    }

    async fn mark_resolved(&self, id: &str, resolved_at: i64) -> DomainResult<DeadLetterRecord> {
        let mut records = self.records.lock().expect("records mutex poisoned");
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| WooSapError::NotFound(format!("dead letter {id}")))?;
        if !record.resolved {
            record.resolved = true;
            record.resolved_at = Some(resolved_at);
        }
        Ok(record.clone())
    }

    async fn advance_requeue_generation(&self, id: &str, expected: u32) -> DomainResult<bool> {
        let mut records = self.records.lock().expect("records mutex poisoned");
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| WooSapError::NotFound(format!("dead letter {id}")))?;
        if record.requeue_generation != expected {
            return Ok(false);
        }
        record.requeue_generation += 1;
        Ok(true)
    }

    async fn list_unresolved(&self, page: PageRequest) -> DomainResult<Page<DeadLetterRecord>> {
        let records = self.records.lock().expect("records mutex poisoned");
        let unresolved: Vec<_> = records.iter().rev().filter(|r| !r.resolved).cloned().collect();
        Ok(Page::from_slice(&unresolved, page))
    }
}

/// In-memory mock for `QueueRepository`.
#[derive(Default, Clone)]
pub struct MockQueueRepository {
    events: Arc<Mutex<Vec<QueueEvent>>>,
}

impl MockQueueRepository {
    pub fn all(&self) -> Vec<QueueEvent> {
        self.events.lock().expect("events mutex poisoned").clone()
    }

    pub fn get(&self, id: &str) -> Option<QueueEvent> {
        self.all().into_iter().find(|e| e.id == id)
    }

    /// Overwrite an event as a worker would after processing it
    pub fn set(&self, event: QueueEvent) {
        let mut events = self.events.lock().expect("events mutex poisoned");
        match events.iter_mut().find(|e| e.id == event.id) {
            Some(slot) => *slot = event,
            None => events.push(event),
        }
    }
}

#[async_trait]
impl QueueRepository for MockQueueRepository {
    async fn enqueue_idempotent(&self, event: &QueueEvent) -> DomainResult<Stored<QueueEvent>> {
        let mut events = self.events.lock().expect("events mutex poisoned");
        if let Some(key) = event.idempotency_key.as_deref() {
            if let Some(existing) =
                events.iter().find(|e| e.idempotency_key.as_deref() == Some(key))
            {
                return Ok(Stored::Existing(existing.clone()));
            }
        }
        events.push(event.clone());
        Ok(Stored::Created(event.clone()))
    }

    async fn find_by_idempotency_key(&self, key: &str) -> DomainResult<Option<QueueEvent>> {
        Ok(self
            .events
            .lock()
            .expect("events mutex poisoned")
            .iter()
            .find(|e| e.idempotency_key.as_deref() == Some(key))
            .cloned())
    }

    async fn update(&self, event: &QueueEvent) -> DomainResult<()> {
        self.set(event.clone());
        Ok(())
    }
}

/// In-memory mock for `SyncLogRepository`.
#[derive(Default, Clone)]
pub struct MockSyncLogRepository {
    entries: Arc<Mutex<Vec<SyncLogEntry>>>,
}

impl MockSyncLogRepository {
    pub fn entries(&self) -> Vec<SyncLogEntry> {
        self.entries.lock().expect("entries mutex poisoned").clone()
    }
}

#[async_trait]
impl SyncLogRepository for MockSyncLogRepository {
    async fn record(&self, entry: &SyncLogEntry) -> DomainResult<()> {
        self.entries.lock().expect("entries mutex poisoned").push(entry.clone());
        Ok(())
    }

    async fn list(
        &self,
        filter: &SyncLogFilter,
        page: PageRequest,
    ) -> DomainResult<Page<SyncLogEntry>> {
        let entries = self.entries.lock().expect("entries mutex poisoned");
        let matching: Vec<_> = entries.iter().rev().filter(|e| filter.matches(e)).cloned().collect();
        Ok(Page::from_slice(&matching, page))
    }
}

/// Sync log that rejects every write
#[derive(Default, Clone)]
pub struct FailingSyncLogRepository;

#[async_trait]
impl SyncLogRepository for FailingSyncLogRepository {
    async fn record(&self, _entry: &SyncLogEntry) -> DomainResult<()> {
        Err(WooSapError::Storage("sync log unavailable".into()))
    }

    async fn list(
        &self,
        _filter: &SyncLogFilter,
        _page: PageRequest,
    ) -> DomainResult<Page<SyncLogEntry>> {
        Err(WooSapError::Storage("sync log unavailable".into()))
    }
}
