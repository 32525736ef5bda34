use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::DashSet;
use uuid::Uuid;

use crate::error::Result;
use crate::model::{Outbox, OutboxStatus};
use crate::store::OutboxStore;

#[derive(Default)]
pub struct InMemoryOutboxStore {
    entries: DashMap<Uuid, Outbox>,
    dedup_keys: DashSet<String>,
}

impl InMemoryOutboxStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OutboxStore for InMemoryOutboxStore {
    async fn insert_if_absent(&self, entry: Outbox) -> Result<bool> {
        if !self.dedup_keys.insert(entry.dedup_key.clone()) {
            return Ok(false);
        }
        self.entries.insert(entry.id, entry);
        Ok(true)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Outbox>> {
        Ok(self.entries.get(&id).map(|e| e.clone()))
    }

    async fn exists_by_dedup_keys(&self, dedup_keys: &[String]) -> Result<Vec<String>> {
        Ok(dedup_keys
            .iter()
            .filter(|k| self.dedup_keys.contains(k.as_str()))
            .cloned()
            .collect())
    }

    async fn list_pending(&self, limit: usize) -> Result<Vec<Outbox>> {
        let mut pending: Vec<Outbox> = self
            .entries
            .iter()
            .filter(|e| e.status == OutboxStatus::Pending)
            .map(|e| e.clone())
            .collect();
        pending.sort_by_key(|e| e.created_at);
        pending.truncate(limit);
        Ok(pending)
    }

    async fn try_claim(&self, id: Uuid, lease_until: DateTime<Utc>) -> Result<bool> {
        let Some(mut entry) = self.entries.get_mut(&id) else {
            return Ok(false);
        };
        if entry.status != OutboxStatus::Pending {
            return Ok(false);
        }
        entry.status = OutboxStatus::InProgress;
        entry.in_progress_until = Some(lease_until);
        Ok(true)
    }

    async fn list_expired_leases(&self, now: DateTime<Utc>) -> Result<Vec<Outbox>> {
        Ok(self
            .entries
            .iter()
            .filter(|e| {
                e.status == OutboxStatus::InProgress
                    && e.in_progress_until.map(|until| until <= now).unwrap_or(true)
            })
            .map(|e| e.clone())
            .collect())
    }

    async fn requeue(&self, id: Uuid) -> Result<()> {
        if let Some(mut entry) = self.entries.get_mut(&id) {
            entry.status = OutboxStatus::Pending;
            entry.in_progress_until = None;
        }
        Ok(())
    }

    async fn mark_sent(&self, id: Uuid, sent_at: DateTime<Utc>) -> Result<()> {
        if let Some(mut entry) = self.entries.get_mut(&id) {
            entry.status = OutboxStatus::Sent;
            entry.sent_at = Some(sent_at);
            entry.in_progress_until = None;
        }
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, status: OutboxStatus, error: String) -> Result<()> {
        if let Some(mut entry) = self.entries.get_mut(&id) {
            entry.status = status;
            entry.retries += 1;
            entry.last_error = Some(error);
            entry.in_progress_until = None;
        }
        Ok(())
    }
}
