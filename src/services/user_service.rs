use std::sync::Arc;

use chrono::Duration as ChronoDuration;
use tracing::info;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::{ChatError, Result};
use crate::model::{AnalyticsEventType, User, UserSession};
use crate::outbox::OutboxWriter;
use crate::store::{
    NotificationStore, OutboxStore, PasswordHasher, UserSessionStore, UserStore, WsSessionStore,
};

/// User registration, login/logout, and account deletion. Grounded on
/// `original_source/app/domain/services/user.py` (the fuller of the two
/// versions of this service in the source tree — the thinner
/// `user_service.py` drops the outbox/transaction plumbing entirely).
pub struct UserService<U, S, W, N, O> {
    users: Arc<U>,
    user_sessions: Arc<S>,
    ws_sessions: Arc<W>,
    notifications: Arc<N>,
    password_hasher: Arc<dyn PasswordHasher>,
    outbox: OutboxWriter<O>,
    config: EngineConfig,
}

impl<U, S, W, N, O> UserService<U, S, W, N, O>
where
    U: UserStore,
    S: UserSessionStore,
    W: WsSessionStore,
    N: NotificationStore,
    O: OutboxStore,
{
    pub fn new(
        users: Arc<U>,
        user_sessions: Arc<S>,
        ws_sessions: Arc<W>,
        notifications: Arc<N>,
        password_hasher: Arc<dyn PasswordHasher>,
        outbox: OutboxWriter<O>,
        config: EngineConfig,
    ) -> Self {
        Self {
            users,
            user_sessions,
            ws_sessions,
            notifications,
            password_hasher,
            outbox,
            config,
        }
    }

    pub async fn register_user(&self, username: &str, password: &str) -> Result<User> {
        if self.users.get_by_username(username).await?.is_some() {
            return Err(ChatError::UserAlreadyExists);
        }
        let hash = self.password_hasher.hash(password)?;
        let user = User::new(username, hash);
        self.users.insert(user.clone()).await?;

        self.outbox
            .write(
                "analytics:user_registered",
                format!("user_register:{}", user.id),
                serde_json::json!({ "user_id": user.id, "username": user.username }),
            )
            .await?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    pub async fn login_user(&self, username: &str, password: &str) -> Result<(User, UserSession)> {
        let mut user = self
            .users
            .get_by_username(username)
            .await?
            .ok_or(ChatError::UserInvalidCredentials)?;
        if !self.password_hasher.verify(password, &user.password_hash)? {
            return Err(ChatError::UserInvalidCredentials);
        }

        let now = chrono::Utc::now();
        user.last_login = Some(now);
        user.last_active = Some(now);
        self.users.update(user.clone()).await?;

        let session = UserSession::new(
            user.id,
            ChronoDuration::seconds(self.config.user_session_ttl_secs as i64),
        );
        self.user_sessions.insert(session.clone()).await?;

        self.outbox
            .write(
                format!("analytics:{}", AnalyticsEventType::UserLoggedIn.as_str()),
                format!(
                    "user_login:{}:{}",
                    user.id,
                    session.connected_at.timestamp_nanos_opt().unwrap_or_default()
                ),
                serde_json::json!({ "user_id": user.id, "session_id": session.id }),
            )
            .await?;

        Ok((user, session))
    }

    pub async fn logout_user(&self, session_id: Uuid) -> Result<()> {
        let session = self
            .user_sessions
            .get(session_id)
            .await?
            .ok_or(ChatError::UserSessionNotFound)?;
        self.user_sessions.delete(session_id).await?;
        self.ws_sessions.delete_all_for_user(session.user_id).await?;
        if let Some(mut user) = self.users.get_by_id(session.user_id).await? {
            user.last_active = Some(chrono::Utc::now());
            self.users.update(user).await?;
        }

        self.outbox
            .write(
                "analytics:user_logout",
                format!("user_logout:{}", session_id),
                serde_json::json!({ "user_id": session.user_id, "session_id": session_id }),
            )
            .await?;
        Ok(())
    }

    /// Decodes a cookie value as a session id, loads and sliding-TTL
    /// refreshes the session, and resolves the owning user. `InvalidSession`
    /// for a cookie that isn't a UUID, `UserSessionNotFound` for one that
    /// doesn't resolve to a live session, `UserNotFound` if the user behind
    /// an otherwise-live session has since been deleted.
    pub async fn resolve_session(&self, cookie: &str) -> Result<User> {
        let session_id = Uuid::parse_str(cookie).map_err(|_| ChatError::InvalidSession)?;
        let session = self
            .user_sessions
            .get(session_id)
            .await?
            .ok_or(ChatError::UserSessionNotFound)?;
        if session.is_expired() {
            return Err(ChatError::UserSessionNotFound);
        }
        self.user_sessions.touch(session_id).await?;
        self.users
            .get_by_id(session.user_id)
            .await?
            .ok_or(ChatError::UserNotFound)
    }

    /// Deletes a user and everything that references them. Cascade order
    /// (notifications, then the user row, then sessions, then websocket
    /// sessions) follows `user.py`'s `delete_user` exactly.
    pub async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(ChatError::UserNotFound)?;

        self.notifications.delete_all_for_user(user_id).await?;
        self.users.delete(user_id).await?;
        self.user_sessions.delete_all_for_user(user_id).await?;
        self.ws_sessions.delete_all_for_user(user_id).await?;

        self.outbox
            .write(
                "analytics:user_deleted",
                format!("user_deleted:{}", user_id),
                serde_json::json!({ "user_id": user_id }),
            )
            .await?;
        Ok(())
    }
}
