//! Admin queries over sync logs and dead letters
//!
//! Read paths are unlimited. Operator actions (requeue, resolve) are
//! charged against the admin rate-limit budget per caller.

use std::sync::Arc;

use woosap_common::resilience::{ClientContext, FixedWindowRateLimiter};
use woosap_domain::constants::{LAST_ERROR_PREVIEW_CHARS, LAST_ERROR_TRUNCATE_SUFFIX};
use woosap_domain::{
    DeadLetterRecord, DeadLetterView, Page, PageRequest, RateLimitRule, Result, SyncLogEntry,
    SyncLogFilter,
};

use crate::dead_letter::{DeadLetterService, RequeueOutcome};
use crate::sync::ports::SyncLogRepository;

const REQUEUE_ACTION: &str = "requeue_dead_letter";
const RESOLVE_ACTION: &str = "resolve_dead_letter";

/// Trim an error message for list display
///
/// Messages longer than the preview length are cut on a character boundary
/// and suffixed with `...`.
pub fn trim_last_error(message: &str) -> String {
    match message.char_indices().nth(LAST_ERROR_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}{LAST_ERROR_TRUNCATE_SUFFIX}", &message[..cut]),
        None => message.to_string(),
    }
}

/// Operator-facing row for a dead-letter record
pub fn dead_letter_view(record: &DeadLetterRecord) -> DeadLetterView {
    DeadLetterView {
        id: record.id.clone(),
        created_at: record.created_at,
        event_type: record.event_type.clone(),
        total_attempts: record.total_attempts,
        last_error: record.last_error().map(trim_last_error),
        resolved: record.resolved,
    }
}

/// Admin service
pub struct AdminService {
    sync_log: Arc<dyn SyncLogRepository>,
    dead_letters: Arc<DeadLetterService>,
    limiter: FixedWindowRateLimiter,
    rule: RateLimitRule,
}

impl AdminService {
    pub fn new(
        sync_log: Arc<dyn SyncLogRepository>,
        dead_letters: Arc<DeadLetterService>,
        limiter: FixedWindowRateLimiter,
        rule: RateLimitRule,
    ) -> Self {
        Self { sync_log, dead_letters, limiter, rule }
    }

    /// Sync log entries filtered by entity type and/or status
    pub async fn list_logs(
        &self,
        filter: &SyncLogFilter,
        page: PageRequest,
    ) -> Result<Page<SyncLogEntry>> {
        self.sync_log.list(filter, page).await
    }

    /// Unresolved dead letters with trimmed last errors
    pub async fn list_dead_letters(&self, page: PageRequest) -> Result<Page<DeadLetterView>> {
        let records = self.dead_letters.list_unresolved(page).await?;
        Ok(records.map(|record| dead_letter_view(&record)))
    }

    /// Requeue a dead letter on behalf of `client`
    pub async fn requeue_dead_letter(
        &self,
        client: &ClientContext,
        dead_letter_id: &str,
    ) -> Result<RequeueOutcome> {
        self.charge(client, REQUEUE_ACTION)?;
        self.dead_letters.requeue(dead_letter_id).await
    }

    /// Resolve a dead letter on behalf of `client`
    pub async fn resolve_dead_letter(
        &self,
        client: &ClientContext,
        dead_letter_id: &str,
    ) -> Result<DeadLetterRecord> {
        self.charge(client, RESOLVE_ACTION)?;
        self.dead_letters.resolve(dead_letter_id).await
    }

    fn charge(&self, client: &ClientContext, action: &str) -> Result<()> {
        self.limiter.enforce(client, action, self.rule.max_requests, self.rule.window_seconds)?;
        Ok(())
    }
}
