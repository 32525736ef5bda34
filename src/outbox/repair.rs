use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::model::Message;
use crate::store::{DistributedLock, MessageStore, OutboxStore};

const REPAIR_LOCK_KEY: &str = "outbox_repair";

/// Reconciles the message log against the outbox: for every message
/// inside the reconciliation window, makes sure a `message_sent` outbox
/// entry exists, inserting one if the original write path's outbox insert
/// never landed (e.g. a crash between the message write and the outbox
/// write, since they aren't committed in the same transaction in the
/// in-memory/SQLite stores used here).
///
/// Ported from `OutboxRepairJob` 1:1: keyset cursor over `(created_at,
/// id)`, batched dedup-key existence checks, a sleep between batches to
/// avoid hammering the store, and a cursor advance that halts once a page
/// comes back smaller than the page size.
pub struct OutboxRepairJob<M, O, L> {
    messages: Arc<M>,
    outbox: Arc<O>,
    lock: Arc<L>,
    window_minutes: i64,
    batch_size: usize,
    inter_batch_delay: Duration,
    lock_ttl: Duration,
}

impl<M, O, L> OutboxRepairJob<M, O, L>
where
    M: MessageStore + 'static,
    O: OutboxStore + 'static,
    L: DistributedLock + 'static,
{
    pub fn new(
        messages: Arc<M>,
        outbox: Arc<O>,
        lock: Arc<L>,
        window_minutes: i64,
        batch_size: usize,
        inter_batch_delay: Duration,
        lock_ttl: Duration,
    ) -> Self {
        Self {
            messages,
            outbox,
            lock,
            window_minutes,
            batch_size,
            inter_batch_delay,
            lock_ttl,
        }
    }

    /// Spawns `run_forever` as a background task.
    pub fn spawn(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                if let Err(err) = self.run_once().await {
                    error!(error = %err, "outbox repair run failed");
                }
                tokio::time::sleep(interval).await;
            }
        })
    }

    pub async fn run_once(&self) -> crate::error::Result<()> {
        let Some(guard) = self.lock.try_acquire(REPAIR_LOCK_KEY, self.lock_ttl).await? else {
            return Ok(());
        };

        let since = Utc::now() - chrono::Duration::minutes(self.window_minutes);
        let mut cursor: Option<(DateTime<Utc>, Uuid)> = None;
        let mut repaired = 0usize;

        loop {
            let batch = self
                .messages
                .get_since_all_rooms(since, self.batch_size, cursor)
                .await?;
            if batch.is_empty() {
                break;
            }

            repaired += self.repair_batch(&batch).await?;

            let last = batch.last().expect("batch checked non-empty above");
            cursor = Some((last.created_at, last.id));

            if batch.len() < self.batch_size {
                break;
            }
            tokio::time::sleep(self.inter_batch_delay).await;
        }

        if repaired > 0 {
            info!(repaired, "outbox repair inserted missing entries");
        }

        guard.release().await?;
        Ok(())
    }

    async fn repair_batch(&self, batch: &[Message]) -> crate::error::Result<usize> {
        let dedup_keys: Vec<String> = batch
            .iter()
            .map(|m| format!("message_sent:{}", m.id))
            .collect();
        let existing = self.outbox.exists_by_dedup_keys(&dedup_keys).await?;
        let existing: std::collections::HashSet<&str> = existing.iter().map(|s| s.as_str()).collect();

        let mut repaired = 0;
        for message in batch {
            let dedup_key = format!("message_sent:{}", message.id);
            if existing.contains(dedup_key.as_str()) {
                continue;
            }
            let payload = serde_json::json!({
                "message_id": message.id,
                "room_id": message.room_id,
                "sender_id": message.sender_id,
            });
            let entry = crate::model::Outbox::new("analytics:message_sent", dedup_key.clone(), payload, 5);
            if self.outbox.insert_if_absent(entry).await? {
                warn!(dedup_key, "repair job inserted missing outbox entry");
                repaired += 1;
            }
        }
        Ok(repaired)
    }
}
