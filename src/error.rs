//! Crate-wide error type and the coarse `kind()` taxonomy an edge layer
//! would map to HTTP status codes (spec section 7).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChatError>;

/// The coarse families named in spec section 7. An edge layer pattern-matches
/// on this instead of on display strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Auth,
    Permission,
    Transient,
}

#[derive(Debug, Error)]
pub enum ChatError {
    // --- Not-found family ---
    #[error("user not found")]
    UserNotFound,
    #[error("room not found")]
    RoomNotFound,
    #[error("message not found")]
    MessageNotFound,
    #[error("notification not found")]
    NotificationNotFound,
    #[error("join request not found")]
    JoinRequestNotFound,
    #[error("user session not found")]
    UserSessionNotFound,
    #[error("websocket session not found")]
    WsSessionNotFound,

    // --- Conflict family ---
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("room already exists")]
    RoomAlreadyExists,
    #[error("join request already exists")]
    JoinRequestAlreadyExists,
    #[error("no changes detected")]
    NoChangesDetected,

    // --- Auth family ---
    #[error("invalid credentials")]
    UserInvalidCredentials,
    #[error("no session cookie presented")]
    NoSessionCookie,
    #[error("invalid session")]
    InvalidSession,

    // --- Permission family ---
    #[error("not permitted to modify this message")]
    MessagePermission,
    #[error("not permitted to perform this room action")]
    RoomPermission,
    #[error("not permitted to access this notification")]
    NotificationPermission,
    #[error("not permitted to manage this websocket session")]
    WsSessionPermission,

    // --- Transient / transport family ---
    #[error("store error: {0}")]
    Store(Box<dyn std::error::Error + Send + Sync>),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("distributed lock unavailable")]
    LockUnavailable,
}

impl ChatError {
    pub fn kind(&self) -> ErrorKind {
        use ChatError::*;
        match self {
            UserNotFound
            | RoomNotFound
            | MessageNotFound
            | NotificationNotFound
            | JoinRequestNotFound
            | UserSessionNotFound
            | WsSessionNotFound => ErrorKind::NotFound,

            UserAlreadyExists | RoomAlreadyExists | JoinRequestAlreadyExists
            | NoChangesDetected => ErrorKind::Conflict,

            UserInvalidCredentials | NoSessionCookie | InvalidSession => ErrorKind::Auth,

            MessagePermission | RoomPermission | NotificationPermission
            | WsSessionPermission => ErrorKind::Permission,

            Store(_) | Transport(_) | LockUnavailable => ErrorKind::Transient,
        }
    }

    pub fn store<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        ChatError::Store(Box::new(err))
    }
}
