mod common;

use std::sync::Arc;
use std::time::Duration;

use roomwire::mem::{InMemoryDistributedLock, InMemoryMessageStore, InMemoryOutboxStore};
use roomwire::model::{Message, Outbox};
use roomwire::outbox::OutboxRepairJob;
use roomwire::store::{MessageStore, OutboxStore};

/// The whole point of `dedup_key`: a second insert under the same key is
/// a no-op, not a duplicate row.
#[tokio::test]
async fn insert_if_absent_is_keyed_on_dedup_key() {
    let store = InMemoryOutboxStore::new();

    let first = Outbox::new("analytics:message_sent", "message_sent:1", serde_json::json!({}), 5);
    let second = Outbox::new("analytics:message_sent", "message_sent:1", serde_json::json!({"x": 1}), 5);

    assert!(store.insert_if_absent(first.clone()).await.unwrap());
    assert!(!store.insert_if_absent(second).await.unwrap());

    let existing = store.exists_by_dedup_keys(&["message_sent:1".to_string()]).await.unwrap();
    assert_eq!(existing, vec!["message_sent:1".to_string()]);
}

/// The outbox worker drains a `PENDING` entry written by a service call
/// into the analytics sink and marks it `SENT`.
#[tokio::test]
async fn outbox_worker_drains_pending_entries_to_analytics_sink() {
    let engine = common::engine();
    let owner = common::register(&engine, "owner").await;
    let room = common::create_public_room(&engine, owner.id, "general").await;

    engine.messages.send_message(room.id, owner.id, "hi").await.unwrap();

    engine.outbox_worker.run_cycle().await.unwrap();

    let events = engine.analytics.events();
    assert!(events
        .iter()
        .any(|e| e.event_type == roomwire::model::AnalyticsEventType::MessageSent));
}

/// A worker cycle first re-arms any `IN_PROGRESS` entry whose lease has
/// expired, so a crash between claim and completion does not strand the
/// entry in `IN_PROGRESS` forever.
#[tokio::test]
async fn expired_lease_is_reclaimed_before_new_claims() {
    let store = InMemoryOutboxStore::new();
    let entry = Outbox::new("analytics:message_sent", "message_sent:stranded", serde_json::json!({}), 5);
    store.insert_if_absent(entry.clone()).await.unwrap();

    let past = chrono::Utc::now() - chrono::Duration::seconds(1);
    assert!(store.try_claim(entry.id, past).await.unwrap());

    let expired = store.list_expired_leases(chrono::Utc::now()).await.unwrap();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].id, entry.id);

    store.requeue(entry.id).await.unwrap();
    let pending = store.list_pending(10).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, entry.id);
}

/// The repair job reconciles the message log against the outbox: any
/// message inside the reconciliation window missing its `message_sent`
/// outbox entry gets one inserted.
#[tokio::test]
async fn repair_job_reinserts_missing_outbox_entries() {
    let messages = Arc::new(InMemoryMessageStore::new());
    let outbox = Arc::new(InMemoryOutboxStore::new());
    let lock = Arc::new(InMemoryDistributedLock::new());

    let room_id = uuid::Uuid::new_v4();
    let sender_id = uuid::Uuid::new_v4();

    let mut with_entry = Vec::new();
    let mut without_entry = Vec::new();
    for i in 0..10 {
        let message = Message::new(room_id, sender_id, format!("message {i}"));
        messages.insert(message.clone()).await.unwrap();
        if i % 2 == 0 {
            let dedup_key = format!("message_sent:{}", message.id);
            outbox
                .insert_if_absent(Outbox::new("analytics:message_sent", dedup_key, serde_json::json!({}), 5))
                .await
                .unwrap();
            with_entry.push(message.id);
        } else {
            without_entry.push(message.id);
        }
    }

    let job = OutboxRepairJob::new(
        messages,
        outbox.clone(),
        lock,
        60,
        100,
        Duration::from_millis(1),
        Duration::from_secs(30),
    );
    job.run_once().await.unwrap();

    let dedup_keys: Vec<String> = without_entry.iter().map(|id| format!("message_sent:{id}")).collect();
    let existing = outbox.exists_by_dedup_keys(&dedup_keys).await.unwrap();
    assert_eq!(existing.len(), without_entry.len(), "repair should have filled every gap");

    // the entries that already existed were left alone, not duplicated.
    let dedup_keys: Vec<String> = with_entry.iter().map(|id| format!("message_sent:{id}")).collect();
    let existing = outbox.exists_by_dedup_keys(&dedup_keys).await.unwrap();
    assert_eq!(existing.len(), with_entry.len());
}
