use rusqlite::Connection;
use std::sync::Mutex;

/// Shared SQLite connection plus idempotent schema migration, in the shape
/// of the teacher's `Db`. One `Db` backs every document-shaped SQLite
/// store (`users`, `rooms`, `memberships`, `join_requests`,
/// `notifications`, `outbox`).
pub struct Db {
    pub conn: Mutex<Connection>,
}

impl Db {
    pub fn open(path: &str) -> Self {
        let conn = Connection::open(path).expect("failed to open database");
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .expect("failed to set pragmas");
        let db = Db {
            conn: Mutex::new(conn),
        };
        db.migrate();
        db
    }

    pub fn open_in_memory() -> Self {
        let conn = Connection::open_in_memory().expect("failed to open in-memory database");
        let db = Db {
            conn: Mutex::new(conn),
        };
        db.migrate();
        db
    }

    fn migrate(&self) {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS rooms (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                description TEXT,
                visibility TEXT NOT NULL,
                creator_id TEXT NOT NULL REFERENCES users(id),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS memberships (
                room_id TEXT NOT NULL REFERENCES rooms(id) ON DELETE CASCADE,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                joined_at TEXT NOT NULL,
                PRIMARY KEY (room_id, user_id)
            );
            CREATE INDEX IF NOT EXISTS idx_memberships_user ON memberships(user_id);

            CREATE TABLE IF NOT EXISTS join_requests (
                id TEXT PRIMARY KEY,
                room_id TEXT NOT NULL REFERENCES rooms(id) ON DELETE CASCADE,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_join_requests_room ON join_requests(room_id, status);

            CREATE TABLE IF NOT EXISTS notifications (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                notification_type TEXT NOT NULL,
                payload TEXT NOT NULL,
                read INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_id, read);

            CREATE TABLE IF NOT EXISTS outbox (
                id TEXT PRIMARY KEY,
                event_type TEXT NOT NULL,
                dedup_key TEXT NOT NULL UNIQUE,
                payload TEXT NOT NULL,
                status TEXT NOT NULL,
                retries INTEGER NOT NULL DEFAULT 0,
                max_retries INTEGER NOT NULL DEFAULT 5,
                last_error TEXT,
                sent_at TEXT,
                in_progress_until TEXT,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_outbox_status ON outbox(status, created_at);",
        )
        .expect("failed to run migrations");

        // Added after the initial outbox table: the worker lease column
        // backing the stuck-IN_PROGRESS fix. Ignored when it already exists.
        conn.execute_batch("ALTER TABLE outbox ADD COLUMN in_progress_until TEXT;")
            .ok();
        // Added after the initial users table. Ignored when already present.
        conn.execute_batch("ALTER TABLE users ADD COLUMN last_active TEXT;")
            .ok();
        conn.execute_batch("ALTER TABLE users ADD COLUMN last_login TEXT;")
            .ok();
    }
}
