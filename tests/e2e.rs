mod common;

use roomwire::error::ErrorKind;
use roomwire::model::{AnalyticsEventType, BroadcastEventType};
use roomwire::store::{PubSubBus, PubSubSubscription};

/// Sending a message broadcasts it to every open connection in the room
/// and lands exactly one `message_sent` analytics row once the outbox
/// worker drains it.
#[tokio::test]
async fn send_message_broadcasts_and_records_one_analytics_row() {
    let engine = common::engine();
    let alice = common::register(&engine, "alice").await;
    let bob = common::register(&engine, "bob").await;
    let room = common::create_public_room(&engine, alice.id, "general").await;
    engine.rooms.request_join(room.id, bob.id).await.unwrap();

    let mut alice_sub = engine.bus.subscribe(room.id).await.unwrap();
    let mut bob_sub = engine.bus.subscribe(room.id).await.unwrap();

    let message = engine.messages.send_message(room.id, alice.id, "hello, room").await.unwrap();

    let event_a = alice_sub.recv().await.unwrap();
    let event_b = bob_sub.recv().await.unwrap();
    assert_eq!(event_a.event_type, BroadcastEventType::MessageCreated);
    assert_eq!(event_b.event_type, BroadcastEventType::MessageCreated);
    assert_eq!(event_a.data["id"], serde_json::json!(message.id));

    engine.outbox_worker.run_cycle().await.unwrap();

    let analytics_rows: Vec<_> = engine
        .analytics
        .events()
        .into_iter()
        .filter(|e| e.event_type == AnalyticsEventType::MessageSent)
        .collect();
    assert_eq!(analytics_rows.len(), 1);
}

/// Registering twice with the same username fails with a conflict, the
/// literal scenario named for the session/identity plane.
#[tokio::test]
async fn duplicate_registration_scenario() {
    let engine = common::engine();
    common::register(&engine, "taken").await;
    let err = engine.users.register_user("taken", "whatever").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

/// The full private-room join-request lifecycle: request, pending listing,
/// owner notification, accept, membership granted.
#[tokio::test]
async fn private_room_join_request_lifecycle_scenario() {
    let engine = common::engine();
    let owner = common::register(&engine, "owner").await;
    let applicant = common::register(&engine, "applicant").await;
    let room = common::create_private_room(&engine, owner.id, "invite-only").await;

    engine.rooms.request_join(room.id, applicant.id).await.unwrap();
    assert_eq!(engine.notifications.count_unread(owner.id).await.unwrap(), 1);

    let pending = engine.rooms.list_join_requests(room.id, owner.id).await.unwrap();
    assert_eq!(pending.len(), 1);

    engine.rooms.handle_join_request(pending[0].id, owner.id, true).await.unwrap();

    let applicant_notifications = engine.notifications.list_user_notifications(applicant.id, true).await.unwrap();
    assert_eq!(applicant_notifications.len(), 1);

    let rooms = engine.rooms.list_rooms_for_user(applicant.id).await.unwrap();
    assert!(rooms.iter().any(|r| r.id == room.id));
}

/// A websocket connection that tears down (transport failure, clean close,
/// or an explicit disconnect call) always clears the user's presence in
/// that room, even when it was their only session.
#[tokio::test]
async fn websocket_teardown_clears_presence_scenario() {
    let engine = common::engine();
    let user = common::register(&engine, "alice").await;
    let room = common::create_public_room(&engine, user.id, "general").await;

    let session = engine.websockets.connect(user.id, room.id).await.unwrap();
    assert!(engine.websockets.is_user_online(user.id).await.unwrap());

    engine.websockets.disconnect(session.id).await.unwrap();
    assert!(!engine.websockets.is_user_online(user.id).await.unwrap());
    assert!(engine.websockets.list_users_in_room(room.id).await.unwrap().is_empty());
}

/// A session already past `expires_at` is treated as gone even though the
/// row is still physically present in the store, and `touch` on a live
/// session within the refresh threshold pushes `expires_at` back out to
/// the full TTL.
#[tokio::test]
async fn session_ttl_boundary_and_sliding_refresh() {
    use roomwire::mem::InMemoryUserSessionStore;
    use roomwire::model::UserSession;
    use roomwire::store::UserSessionStore;

    let store = InMemoryUserSessionStore::new(chrono::Duration::seconds(3600), chrono::Duration::seconds(600));
    let user_id = uuid::Uuid::new_v4();

    let mut expired = UserSession::new(user_id, chrono::Duration::seconds(3600));
    expired.expires_at = chrono::Utc::now() - chrono::Duration::seconds(1);
    store.insert(expired.clone()).await.unwrap();
    assert!(expired.is_expired());

    let mut near_expiry = UserSession::new(user_id, chrono::Duration::seconds(3600));
    near_expiry.expires_at = chrono::Utc::now() + chrono::Duration::seconds(100);
    store.insert(near_expiry.clone()).await.unwrap();

    let touched = store.touch(near_expiry.id).await.unwrap().unwrap();
    assert!(touched.expires_at > chrono::Utc::now() + chrono::Duration::seconds(3000));
}
