use std::future::Future;
use std::pin::Pin;

use crate::error::Result;
use crate::store::TransactionRunner;

/// A transaction runner for the in-memory stores, which have no notion of
/// a rollback: it just runs the closure. Exists so services can depend on
/// `TransactionRunner` uniformly regardless of backing store.
#[derive(Default)]
pub struct NoopTransactionRunner;

impl NoopTransactionRunner {
    pub fn new() -> Self {
        Self
    }
}

impl TransactionRunner for NoopTransactionRunner {
    fn run<'a, F, T>(&'a self, f: F) -> Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>
    where
        F: FnOnce() -> Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>> + Send + 'a,
        T: Send + 'a,
    {
        f()
    }
}
