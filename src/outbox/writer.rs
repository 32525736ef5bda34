use std::sync::Arc;

use crate::error::Result;
use crate::model::Outbox;
use crate::store::OutboxStore;

/// Builds and inserts outbox entries. Generalizes
/// `create_outbox_analytics_event`/`create_outbox_notification_event`:
/// both were thin wrappers around "build an `Outbox` row, insert it if its
/// dedup key isn't already taken" — this is that wrapper for any event
/// family, since the row shape (event_type/dedup_key/payload/max_retries)
/// doesn't actually differ between an analytics event and a notification
/// delivery event.
pub struct OutboxWriter<O: OutboxStore> {
    store: Arc<O>,
    default_max_retries: u32,
}

impl<O: OutboxStore> Clone for OutboxWriter<O> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            default_max_retries: self.default_max_retries,
        }
    }
}

impl<O: OutboxStore> OutboxWriter<O> {
    pub fn new(store: Arc<O>, default_max_retries: u32) -> Self {
        Self {
            store,
            default_max_retries,
        }
    }

    /// Returns `true` if a new row was written, `false` if `dedup_key` was
    /// already present (the caller's event is a duplicate of one already
    /// queued or delivered).
    pub async fn write(
        &self,
        event_type: impl Into<String>,
        dedup_key: impl Into<String>,
        payload: serde_json::Value,
    ) -> Result<bool> {
        let entry = Outbox::new(event_type, dedup_key, payload, self.default_max_retries);
        self.store.insert_if_absent(entry).await
    }
}
