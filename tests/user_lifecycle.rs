mod common;

use roomwire::error::ErrorKind;

/// register -> login -> resolve_session, the cookie-session happy path.
#[tokio::test]
async fn register_login_resolve_session() {
    let engine = common::engine();

    let user = common::register(&engine, "alice").await;
    assert_eq!(user.username, "alice");
    assert!(user.last_login.is_none());

    let (logged_in, session) = engine
        .users
        .login_user("alice", "correct horse battery staple")
        .await
        .unwrap();
    assert_eq!(logged_in.id, user.id);
    assert!(logged_in.last_login.is_some());

    let resolved = engine
        .users
        .resolve_session(&session.id.to_string())
        .await
        .unwrap();
    assert_eq!(resolved.id, user.id);
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let engine = common::engine();
    common::register(&engine, "bob").await;

    let err = engine
        .users
        .register_user("bob", "another password")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn login_with_wrong_password_is_auth_error() {
    let engine = common::engine();
    common::register(&engine, "carol").await;

    let err = engine
        .users
        .login_user("carol", "not the right password")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
}

#[tokio::test]
async fn resolve_session_rejects_garbage_cookie() {
    let engine = common::engine();
    let err = engine.users.resolve_session("not-a-uuid").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
}

#[tokio::test]
async fn resolve_session_rejects_unknown_session() {
    let engine = common::engine();
    let err = engine
        .users
        .resolve_session(&uuid::Uuid::new_v4().to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

/// logout tears down the cookie session and every open websocket session
/// it owns, so a subsequent `resolve_session` on the same cookie fails.
#[tokio::test]
async fn logout_tears_down_cookie_and_ws_sessions() {
    let engine = common::engine();
    let user = common::register(&engine, "dave").await;
    let room = common::create_public_room(&engine, user.id, "general").await;

    let (_, session) = engine
        .users
        .login_user("dave", "correct horse battery staple")
        .await
        .unwrap();

    let ws = engine.websockets.connect(user.id, room.id).await.unwrap();
    assert!(engine.websockets.is_user_online(user.id).await.unwrap());

    engine.users.logout_user(session.id).await.unwrap();

    assert!(engine.users.resolve_session(&session.id.to_string()).await.is_err());
    // the websocket session this cookie owned is gone too.
    assert!(engine.websockets.update_ping(ws.id).await.is_err());
}

/// Deleting a user cascades to notifications, sessions, and websocket
/// sessions, following the same cascade order as the original service.
#[tokio::test]
async fn delete_user_cascades() {
    let engine = common::engine();
    let user = common::register(&engine, "erin").await;
    let room = common::create_public_room(&engine, user.id, "lounge").await;
    let ws = engine.websockets.connect(user.id, room.id).await.unwrap();

    engine.users.delete_user(user.id).await.unwrap();

    assert!(engine.websockets.update_ping(ws.id).await.is_err());
    let err = engine.users.delete_user(user.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
