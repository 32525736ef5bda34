mod common;

use roomwire::error::ErrorKind;
use roomwire::store::{PubSubBus, PubSubSubscription};

/// The first connection into a room flips presence on; the last one out
/// flips it back off. A second concurrent tab/device in between does not
/// re-trigger either transition.
#[tokio::test]
async fn presence_joins_and_leaves_on_first_in_last_out() {
    let engine = common::engine();
    let user = common::register(&engine, "alice").await;
    let room = common::create_public_room(&engine, user.id, "general").await;

    let mut room_sub = engine.bus.subscribe(room.id).await.unwrap();

    let session_a = engine.websockets.connect(user.id, room.id).await.unwrap();
    let joined_event = room_sub.recv().await.unwrap();
    assert_eq!(joined_event.event_type, roomwire::model::BroadcastEventType::PresenceJoined);

    // a second tab for the same user in the same room: no second
    // presence-joined broadcast.
    let session_b = engine.websockets.connect(user.id, room.id).await.unwrap();
    assert!(engine.websockets.is_user_online(user.id).await.unwrap());

    engine.websockets.disconnect(session_a.id).await.unwrap();
    assert!(engine.websockets.is_user_online(user.id).await.unwrap());

    engine.websockets.disconnect(session_b.id).await.unwrap();
    assert!(!engine.websockets.is_user_online(user.id).await.unwrap());

    let left_event = room_sub.recv().await.unwrap();
    assert_eq!(left_event.event_type, roomwire::model::BroadcastEventType::PresenceLeft);
}

#[tokio::test]
async fn connect_rejects_unknown_user() {
    let engine = common::engine();
    let owner = common::register(&engine, "owner").await;
    let room = common::create_public_room(&engine, owner.id, "general").await;

    let err = engine
        .websockets
        .connect(uuid::Uuid::new_v4(), room.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

/// A client cannot claim somebody else's username in a typing indicator.
#[tokio::test]
async fn typing_indicator_rejects_impersonation() {
    let engine = common::engine();
    let alice = common::register(&engine, "alice").await;
    let bob = common::register(&engine, "bob").await;
    let room = common::create_public_room(&engine, alice.id, "general").await;
    engine.rooms.request_join(room.id, bob.id).await.unwrap();

    let err = engine
        .websockets
        .typing_indicator(room.id, bob.id, "alice", true)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Permission);

    engine
        .websockets
        .typing_indicator(room.id, bob.id, "bob", true)
        .await
        .unwrap();
}

/// Disconnecting a session twice (e.g. a redundant teardown call after
/// the transport already dropped) is a harmless no-op.
#[tokio::test]
async fn disconnect_is_idempotent() {
    let engine = common::engine();
    let user = common::register(&engine, "alice").await;
    let room = common::create_public_room(&engine, user.id, "general").await;

    let session = engine.websockets.connect(user.id, room.id).await.unwrap();
    engine.websockets.disconnect(session.id).await.unwrap();
    engine.websockets.disconnect(session.id).await.unwrap();
}

/// A moderation-driven forced disconnect tears down every session a user
/// holds in the room and clears their presence.
#[tokio::test]
async fn disconnect_user_from_room_clears_every_session() {
    let engine = common::engine();
    let user = common::register(&engine, "alice").await;
    let room = common::create_public_room(&engine, user.id, "general").await;

    engine.websockets.connect(user.id, room.id).await.unwrap();
    engine.websockets.connect(user.id, room.id).await.unwrap();
    assert!(engine.websockets.is_user_online(user.id).await.unwrap());

    engine.websockets.disconnect_user_from_room(room.id, user.id).await.unwrap();
    assert!(!engine.websockets.is_user_online(user.id).await.unwrap());
}
