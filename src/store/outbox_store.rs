use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::model::{Outbox, OutboxStatus};

#[async_trait]
pub trait OutboxStore: Send + Sync {
    /// Insert unless an entry with the same `dedup_key` already exists.
    /// Returns `true` if a row was inserted, `false` if it was a no-op.
    async fn insert_if_absent(&self, entry: Outbox) -> Result<bool>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Outbox>>;

    /// Which of these dedup keys already have an outbox row, regardless
    /// of status. Used by the repair job to find gaps in a single query.
    async fn exists_by_dedup_keys(&self, dedup_keys: &[String]) -> Result<Vec<String>>;

    /// Up to `limit` `PENDING` entries, oldest first, for the worker to
    /// claim. Claiming is the caller's job via `try_claim`.
    async fn list_pending(&self, limit: usize) -> Result<Vec<Outbox>>;

    /// Compare-and-swap a `PENDING` entry to `IN_PROGRESS`, stamping a
    /// lease expiry. Returns `false` if the entry wasn't `PENDING`
    /// anymore (already claimed by another worker).
    async fn try_claim(&self, id: Uuid, lease_until: DateTime<Utc>) -> Result<bool>;

    /// `IN_PROGRESS` entries whose lease has passed, for a worker cycle to
    /// re-arm back to `PENDING` before it claims new work.
    async fn list_expired_leases(&self, now: DateTime<Utc>) -> Result<Vec<Outbox>>;

    /// Re-arms a single `IN_PROGRESS` entry back to `PENDING`, clearing its
    /// lease, so the next cycle's `list_pending`/`try_claim` can pick it
    /// back up.
    async fn requeue(&self, id: Uuid) -> Result<()>;

    async fn mark_sent(&self, id: Uuid, sent_at: DateTime<Utc>) -> Result<()>;
    async fn mark_failed(&self, id: Uuid, status: OutboxStatus, error: String) -> Result<()>;
}
