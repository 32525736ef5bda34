use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::{ChatError, Result};
use crate::store::TransactionRunner;

use super::Db;

/// Wraps a unit of work in a real SQLite transaction. Since every
/// SQLite-backed store in this crate takes its own lock per call rather
/// than threading a shared connection through, this runner's job is
/// narrower than a textbook transaction: it brackets the closure with
/// `BEGIN IMMEDIATE`/`COMMIT` on the shared connection so concurrent
/// writers serialize, and rolls back on error.
pub struct SqliteTransactionRunner {
    db: Arc<Db>,
}

impl SqliteTransactionRunner {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }
}

impl TransactionRunner for SqliteTransactionRunner {
    fn run<'a, F, T>(&'a self, f: F) -> Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>
    where
        F: FnOnce() -> Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>> + Send + 'a,
        T: Send + 'a,
    {
        Box::pin(async move {
            {
                let conn = self.db.conn.lock().unwrap();
                conn.execute_batch("BEGIN IMMEDIATE;").map_err(ChatError::store)?;
            }

            match f().await {
                Ok(value) => {
                    let conn = self.db.conn.lock().unwrap();
                    conn.execute_batch("COMMIT;").map_err(ChatError::store)?;
                    Ok(value)
                }
                Err(err) => {
                    let conn = self.db.conn.lock().unwrap();
                    conn.execute_batch("ROLLBACK;").ok();
                    Err(err)
                }
            }
        })
    }
}
