mod common;

use roomwire::error::ErrorKind;

#[tokio::test]
async fn mark_as_read_is_idempotent() {
    let engine = common::engine();
    let owner = common::register(&engine, "owner").await;
    let joiner = common::register(&engine, "joiner").await;
    let room = common::create_private_room(&engine, owner.id, "secret-club").await;
    engine.rooms.request_join(room.id, joiner.id).await.unwrap();

    let notifications = engine.notifications.list_user_notifications(owner.id, false).await.unwrap();
    assert_eq!(notifications.len(), 1);
    let notification_id = notifications[0].id;

    assert_eq!(engine.notifications.count_unread(owner.id).await.unwrap(), 1);
    engine.notifications.mark_as_read(notification_id, owner.id).await.unwrap();
    assert_eq!(engine.notifications.count_unread(owner.id).await.unwrap(), 0);

    // Marking it read again is a no-op, not an error, and does not
    // re-emit the analytics outbox write (the dedup key would collide if
    // it tried).
    engine.notifications.mark_as_read(notification_id, owner.id).await.unwrap();
}

#[tokio::test]
async fn mark_as_read_rejects_non_owner() {
    let engine = common::engine();
    let owner = common::register(&engine, "owner").await;
    let joiner = common::register(&engine, "joiner").await;
    let stranger = common::register(&engine, "stranger").await;
    let room = common::create_private_room(&engine, owner.id, "secret-club").await;
    engine.rooms.request_join(room.id, joiner.id).await.unwrap();

    let notifications = engine.notifications.list_user_notifications(owner.id, false).await.unwrap();
    let err = engine
        .notifications
        .mark_as_read(notifications[0].id, stranger.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Permission);
}

#[tokio::test]
async fn mark_all_as_read_counts_only_unread() {
    let engine = common::engine();
    let owner = common::register(&engine, "owner").await;
    let room = common::create_private_room(&engine, owner.id, "secret-club").await;

    for i in 0..3 {
        let joiner = common::register(&engine, &format!("joiner-{i}")).await;
        engine.rooms.request_join(room.id, joiner.id).await.unwrap();
    }

    let first_count = engine.notifications.mark_all_as_read(owner.id).await.unwrap();
    assert_eq!(first_count, 3);

    // nothing left unread, so a second call marks zero.
    let second_count = engine.notifications.mark_all_as_read(owner.id).await.unwrap();
    assert_eq!(second_count, 0);
}
