use std::future::Future;
use std::pin::Pin;

use crate::error::Result;

/// Runs a unit of work as a single atomic transaction against whatever
/// backing store is in play. Services depend on this rather than on any
/// specific store's connection type, so the in-memory stores can run
/// "transactions" as a no-op while the SQLite stores wrap a real
/// `BEGIN`/`COMMIT`.
///
/// Written as a plain boxed-future method rather than through
/// `#[async_trait]`: the generic closure/future parameters this needs
/// don't fit that macro's expansion cleanly, and a hand-written boxed
/// future is exactly what the macro would produce for a single method
/// anyway.
pub trait TransactionRunner: Send + Sync {
    fn run<'a, F, T>(&'a self, f: F) -> Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>
    where
        F: FnOnce() -> Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>> + Send + 'a,
        T: Send + 'a;
}
