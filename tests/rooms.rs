mod common;

use roomwire::error::ErrorKind;
use roomwire::model::{AnalyticsEventType, RoomVisibility};

#[tokio::test]
async fn create_room_rejects_duplicate_name() {
    let engine = common::engine();
    let owner = common::register(&engine, "owner").await;
    common::create_public_room(&engine, owner.id, "general").await;

    let err = engine
        .rooms
        .create_room("general", None, RoomVisibility::Public, owner.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn update_room_rejects_no_op_change() {
    let engine = common::engine();
    let owner = common::register(&engine, "owner").await;
    let room = common::create_public_room(&engine, owner.id, "general").await;

    let err = engine
        .rooms
        .update_room(room.id, owner.id, None, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn update_room_rejects_non_owner() {
    let engine = common::engine();
    let owner = common::register(&engine, "owner").await;
    let stranger = common::register(&engine, "stranger").await;
    let room = common::create_public_room(&engine, owner.id, "general").await;

    let err = engine
        .rooms
        .update_room(room.id, stranger.id, Some("new description".into()), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Permission);
}

/// Joining a public room adds the membership immediately, with no
/// notification/join-request machinery involved.
#[tokio::test]
async fn request_join_public_room_joins_immediately() {
    let engine = common::engine();
    let owner = common::register(&engine, "owner").await;
    let joiner = common::register(&engine, "joiner").await;
    let room = common::create_public_room(&engine, owner.id, "general").await;

    engine.rooms.request_join(room.id, joiner.id).await.unwrap();

    let rooms = engine.rooms.list_rooms_for_user(joiner.id).await.unwrap();
    assert!(rooms.iter().any(|r| r.id == room.id));
}

/// Joining a private room files a pending join request and notifies the
/// owner instead of joining outright.
#[tokio::test]
async fn request_join_private_room_files_join_request() {
    let engine = common::engine();
    let owner = common::register(&engine, "owner").await;
    let joiner = common::register(&engine, "joiner").await;
    let room = common::create_private_room(&engine, owner.id, "secret-club").await;

    engine.rooms.request_join(room.id, joiner.id).await.unwrap();

    let rooms = engine.rooms.list_rooms_for_user(joiner.id).await.unwrap();
    assert!(!rooms.iter().any(|r| r.id == room.id));

    let pending = engine.rooms.list_join_requests(room.id, owner.id).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].user_id, joiner.id);

    let unread = engine.notifications.count_unread(owner.id).await.unwrap();
    assert_eq!(unread, 1);
}

/// A second `request_join` against the same pending request is rejected,
/// not silently duplicated.
#[tokio::test]
async fn request_join_private_room_twice_is_a_conflict() {
    let engine = common::engine();
    let owner = common::register(&engine, "owner").await;
    let joiner = common::register(&engine, "joiner").await;
    let room = common::create_private_room(&engine, owner.id, "secret-club").await;

    engine.rooms.request_join(room.id, joiner.id).await.unwrap();
    let err = engine.rooms.request_join(room.id, joiner.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

/// Accepting a join request adds the membership and clears the pending
/// request; rejecting does neither.
#[tokio::test]
async fn handle_join_request_accept_and_reject() {
    let engine = common::engine();
    let owner = common::register(&engine, "owner").await;
    let accepted = common::register(&engine, "accepted-user").await;
    let rejected = common::register(&engine, "rejected-user").await;
    let room = common::create_private_room(&engine, owner.id, "secret-club").await;

    engine.rooms.request_join(room.id, accepted.id).await.unwrap();
    engine.rooms.request_join(room.id, rejected.id).await.unwrap();

    let pending = engine.rooms.list_join_requests(room.id, owner.id).await.unwrap();
    let accept_req = pending.iter().find(|r| r.user_id == accepted.id).unwrap();
    let reject_req = pending.iter().find(|r| r.user_id == rejected.id).unwrap();

    engine.rooms.handle_join_request(accept_req.id, owner.id, true).await.unwrap();
    engine.rooms.handle_join_request(reject_req.id, owner.id, false).await.unwrap();

    let rooms = engine.rooms.list_rooms_for_user(accepted.id).await.unwrap();
    assert!(rooms.iter().any(|r| r.id == room.id));
    let rooms = engine.rooms.list_rooms_for_user(rejected.id).await.unwrap();
    assert!(!rooms.iter().any(|r| r.id == room.id));

    // Handling an already-resolved request again is rejected rather than
    // silently re-applied.
    let err = engine
        .rooms
        .handle_join_request(accept_req.id, owner.id, true)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

/// The creator leaving deletes the room outright; anyone else leaving
/// just drops their own membership.
#[tokio::test]
async fn remove_participant_creator_deletes_room() {
    let engine = common::engine();
    let owner = common::register(&engine, "owner").await;
    let member = common::register(&engine, "member").await;
    let room = common::create_public_room(&engine, owner.id, "general").await;
    engine.rooms.request_join(room.id, member.id).await.unwrap();

    engine.rooms.remove_participant(room.id, member.id).await.unwrap();
    assert!(engine.rooms.get_room(room.id).await.is_ok());

    engine.rooms.remove_participant(room.id, owner.id).await.unwrap();
    let err = engine.rooms.get_room(room.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

/// Every room mutation (create, update, delete, a non-creator leaving)
/// lands an analytics outbox entry the worker can drain — not just the
/// domain store write.
#[tokio::test]
async fn room_mutations_land_analytics_outbox_entries() {
    let engine = common::engine();
    let owner = common::register(&engine, "owner").await;
    let member = common::register(&engine, "member").await;
    let room = common::create_public_room(&engine, owner.id, "general").await;
    engine.rooms.request_join(room.id, member.id).await.unwrap();

    engine
        .rooms
        .update_room(room.id, owner.id, Some("a cozy room".into()), None)
        .await
        .unwrap();
    engine.rooms.remove_participant(room.id, member.id).await.unwrap();
    engine.rooms.delete_room(room.id, owner.id).await.unwrap();

    engine.outbox_worker.run_cycle().await.unwrap();
    let events = engine.analytics.events();

    for expected in [
        AnalyticsEventType::RoomCreated,
        AnalyticsEventType::RoomUpdated,
        AnalyticsEventType::UserLeftRoom,
        AnalyticsEventType::RoomDeleted,
    ] {
        assert!(
            events.iter().any(|e| e.event_type == expected),
            "expected a {expected:?} analytics event"
        );
    }
}
