mod common;

use roomwire::error::ErrorKind;

#[tokio::test]
async fn send_message_requires_membership() {
    let engine = common::engine();
    let owner = common::register(&engine, "owner").await;
    let stranger = common::register(&engine, "stranger").await;
    let room = common::create_public_room(&engine, owner.id, "general").await;

    let err = engine
        .messages
        .send_message(room.id, stranger.id, "hi")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Permission);
}

#[tokio::test]
async fn send_edit_delete_round_trip() {
    let engine = common::engine();
    let owner = common::register(&engine, "owner").await;
    let room = common::create_public_room(&engine, owner.id, "general").await;

    let message = engine.messages.send_message(room.id, owner.id, "hello").await.unwrap();
    assert_eq!(message.content, "hello");

    let edited = engine.messages.edit_message(message.id, owner.id, "hello, world").await.unwrap();
    assert_eq!(edited.content, "hello, world");
    assert!(edited.edited_at.is_some());

    engine.messages.delete_message(message.id, owner.id).await.unwrap();
    let err = engine.messages.edit_message(message.id, owner.id, "too late").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    // deleting an already-deleted message is idempotent, not an error.
    engine.messages.delete_message(message.id, owner.id).await.unwrap();
}

#[tokio::test]
async fn edit_message_rejects_non_author() {
    let engine = common::engine();
    let owner = common::register(&engine, "owner").await;
    let member = common::register(&engine, "member").await;
    let room = common::create_public_room(&engine, owner.id, "general").await;
    engine.rooms.request_join(room.id, member.id).await.unwrap();

    let message = engine.messages.send_message(room.id, owner.id, "hello").await.unwrap();
    let err = engine.messages.edit_message(message.id, member.id, "hijacked").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Permission);
}

/// `get_recent_messages`'s limit is clamped to `[1, 200]` regardless of
/// what the caller passes, and `before` excludes the cursor itself.
#[tokio::test]
async fn get_recent_messages_clamps_limit_and_paginates() {
    let engine = common::engine();
    let owner = common::register(&engine, "owner").await;
    let room = common::create_public_room(&engine, owner.id, "general").await;

    let mut sent = Vec::new();
    for i in 0..5 {
        sent.push(
            engine
                .messages
                .send_message(room.id, owner.id, &format!("message {i}"))
                .await
                .unwrap(),
        );
    }

    // asking for 0 is clamped up to 1.
    let page = engine.messages.get_recent_messages(room.id, owner.id, 0, None).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, sent[4].id);

    // asking for more than 200 is clamped down to 200, but there are only 5.
    let page = engine
        .messages
        .get_recent_messages(room.id, owner.id, 10_000, None)
        .await
        .unwrap();
    assert_eq!(page.len(), 5);
    assert_eq!(page[0].id, sent[4].id, "most recent first");

    // paginate backward from the third message, exclusive.
    let before = sent[2].created_at;
    let older_page = engine
        .messages
        .get_recent_messages(room.id, owner.id, 10, Some(before))
        .await
        .unwrap();
    assert_eq!(older_page.len(), 2);
    assert!(older_page.iter().all(|m| m.created_at < before));
}

#[tokio::test]
async fn resolve_senders_batches_usernames() {
    let engine = common::engine();
    let alice = common::register(&engine, "alice").await;
    let bob = common::register(&engine, "bob").await;
    let room = common::create_public_room(&engine, alice.id, "general").await;
    engine.rooms.request_join(room.id, bob.id).await.unwrap();

    let m1 = engine.messages.send_message(room.id, alice.id, "hi").await.unwrap();
    let m2 = engine.messages.send_message(room.id, bob.id, "hey").await.unwrap();

    let names = engine.messages.resolve_senders(&[m1.clone(), m2.clone()]).await.unwrap();
    assert_eq!(names.get(&alice.id).unwrap(), "alice");
    assert_eq!(names.get(&bob.id).unwrap(), "bob");
}

/// Deleted messages never surface through either read path.
#[tokio::test]
async fn deleted_messages_excluded_from_recent_and_since() {
    let engine = common::engine();
    let owner = common::register(&engine, "owner").await;
    let room = common::create_public_room(&engine, owner.id, "general").await;

    let start = chrono::Utc::now() - chrono::Duration::seconds(1);
    let message = engine.messages.send_message(room.id, owner.id, "temporary").await.unwrap();
    engine.messages.delete_message(message.id, owner.id).await.unwrap();

    let recent = engine.messages.get_recent_messages(room.id, owner.id, 50, None).await.unwrap();
    assert!(recent.is_empty());

    let since = engine.messages.get_messages_since(room.id, start).await.unwrap();
    assert!(since.is_empty());
}
