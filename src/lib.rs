pub mod config;
pub mod error;
pub mod mem;
pub mod model;
pub mod notification_sender;
pub mod outbox;
pub mod security;
pub mod services;
pub mod sqlite;
pub mod store;
pub mod ws;

use std::sync::Arc;

use config::EngineConfig;
use mem::{
    InMemoryAnalyticsSink, InMemoryDistributedLock, InMemoryJoinRequestStore,
    InMemoryMembershipStore, InMemoryMessageStore, InMemoryNotificationStore, InMemoryOutboxStore,
    InMemoryPresenceStore, InMemoryPubSubBus, InMemoryRoomStore, InMemoryUserSessionStore,
    InMemoryUserStore, InMemoryWsSessionStore, NoopTransactionRunner,
};
use notification_sender::PubSubNotificationSender;
use outbox::{OutboxRepairJob, OutboxWorker, OutboxWriter};
use security::Argon2PasswordHasher;
use services::{MessageService, NotificationService, RoomService, UserService, WebSocketService};
use store::PasswordHasher;

/// The in-memory-backed flavor of every service, wired together. A real
/// deployment builds the same services against its own store adapters
/// (SQLite via `crate::sqlite`, or Mongo/Cassandra/Redis-backed ones it
/// supplies itself) instead of using this assembly — this one exists so
/// the crate is runnable and testable standalone, the way the teacher's
/// `local-agent-chat` ships as one self-contained binary rather than a bag
/// of client wrappers.
pub type InMemoryUserService = UserService<
    InMemoryUserStore,
    InMemoryUserSessionStore,
    InMemoryWsSessionStore,
    InMemoryNotificationStore,
    InMemoryOutboxStore,
>;

pub type InMemoryRoomService = RoomService<
    InMemoryRoomStore<InMemoryMembershipStore>,
    InMemoryMembershipStore,
    InMemoryJoinRequestStore,
    InMemoryNotificationStore,
    InMemoryOutboxStore,
    NoopTransactionRunner,
    InMemoryUserStore,
>;

pub type InMemoryMessageService = MessageService<
    InMemoryMessageStore,
    InMemoryMembershipStore,
    InMemoryPubSubBus,
    InMemoryOutboxStore,
    InMemoryUserStore,
>;

pub type InMemoryNotificationService = NotificationService<InMemoryNotificationStore, InMemoryOutboxStore>;

pub type InMemoryWebSocketService = WebSocketService<
    InMemoryPresenceStore,
    InMemoryWsSessionStore,
    InMemoryPubSubBus,
    InMemoryOutboxStore,
    InMemoryUserStore,
>;

pub type InMemoryOutboxWorker = OutboxWorker<
    InMemoryOutboxStore,
    InMemoryDistributedLock,
    InMemoryAnalyticsSink,
    PubSubNotificationSender<InMemoryPubSubBus>,
>;

pub type InMemoryOutboxRepairJob =
    OutboxRepairJob<InMemoryMessageStore, InMemoryOutboxStore, InMemoryDistributedLock>;

/// Composition root for the all-in-memory stack: every service plus the
/// two background jobs, ready to drive from tests or a small single-process
/// deployment. Mirrors the shape of the teacher's `build_rocket`, minus the
/// HTTP layer it assembled alongside the managed state.
pub struct Engine {
    pub config: EngineConfig,
    pub users: Arc<InMemoryUserService>,
    pub rooms: Arc<InMemoryRoomService>,
    pub messages: Arc<InMemoryMessageService>,
    pub notifications: Arc<InMemoryNotificationService>,
    pub websockets: Arc<InMemoryWebSocketService>,
    pub bus: Arc<InMemoryPubSubBus>,
    pub analytics: Arc<InMemoryAnalyticsSink>,
    pub outbox_worker: Arc<InMemoryOutboxWorker>,
    pub outbox_repair: Arc<InMemoryOutboxRepairJob>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let users = Arc::new(InMemoryUserStore::new());
        let user_sessions = Arc::new(InMemoryUserSessionStore::new(
            chrono::Duration::seconds(config.user_session_ttl_secs as i64),
            chrono::Duration::seconds(config.user_session_refresh_threshold_secs as i64),
        ));
        let ws_sessions = Arc::new(InMemoryWsSessionStore::new());
        let memberships = Arc::new(InMemoryMembershipStore::new());
        let rooms = Arc::new(InMemoryRoomStore::new(memberships.clone()));
        let join_requests = Arc::new(InMemoryJoinRequestStore::new());
        let notifications = Arc::new(InMemoryNotificationStore::new());
        let messages = Arc::new(InMemoryMessageStore::new());
        let outbox = Arc::new(InMemoryOutboxStore::new());
        let presence = Arc::new(InMemoryPresenceStore::new());
        let bus = Arc::new(InMemoryPubSubBus::new());
        let analytics = Arc::new(InMemoryAnalyticsSink::new());
        let lock = Arc::new(InMemoryDistributedLock::new());
        let tx = Arc::new(NoopTransactionRunner::new());
        let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new());
        let notification_sender = Arc::new(PubSubNotificationSender::new(bus.clone()));

        let outbox_writer = OutboxWriter::new(outbox.clone(), config.outbox_max_retries);

        let users_svc = Arc::new(UserService::new(
            users.clone(),
            user_sessions.clone(),
            ws_sessions.clone(),
            notifications.clone(),
            password_hasher,
            outbox_writer.clone(),
            config.clone(),
        ));

        let rooms_svc = Arc::new(RoomService::new(
            rooms.clone(),
            memberships.clone(),
            join_requests.clone(),
            notifications.clone(),
            outbox_writer.clone(),
            tx,
            users.clone(),
        ));

        let messages_svc = Arc::new(MessageService::new(
            messages.clone(),
            memberships.clone(),
            bus.clone(),
            outbox_writer.clone(),
            users.clone(),
        ));

        let notifications_svc = Arc::new(NotificationService::new(notifications.clone(), outbox_writer.clone()));

        let websockets_svc = Arc::new(WebSocketService::new(
            presence.clone(),
            ws_sessions.clone(),
            bus.clone(),
            outbox_writer,
            users.clone(),
            config.clone(),
        ));

        let outbox_worker = Arc::new(OutboxWorker::new(
            outbox.clone(),
            lock.clone(),
            analytics.clone(),
            notification_sender,
            config.clone(),
        ));

        let outbox_repair = Arc::new(OutboxRepairJob::new(
            messages.clone(),
            outbox.clone(),
            lock,
            config.outbox_repair_window_minutes,
            config.outbox_repair_batch_size,
            std::time::Duration::from_millis(config.outbox_repair_inter_batch_delay_ms),
            std::time::Duration::from_secs(config.outbox_repair_lock_timeout_secs),
        ));

        Self {
            config,
            users: users_svc,
            rooms: rooms_svc,
            messages: messages_svc,
            notifications: notifications_svc,
            websockets: websockets_svc,
            bus,
            analytics,
            outbox_worker,
            outbox_repair,
        }
    }

    /// Spawns both background jobs. Returns their join handles so a caller
    /// can hold or abort them; dropping the handles leaves the tasks
    /// running detached.
    pub fn spawn_background_jobs(&self) -> (tokio::task::JoinHandle<()>, tokio::task::JoinHandle<()>) {
        let worker = self.outbox_worker.clone().spawn();
        let repair = self
            .outbox_repair
            .clone()
            .spawn(std::time::Duration::from_secs(self.config.outbox_repair_interval_secs));
        (worker, repair)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
