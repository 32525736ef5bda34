use async_trait::async_trait;

use crate::error::Result;
use crate::model::AnalyticsEvent;

/// Where an outbox entry's analytics payload ultimately lands. An edge
/// deployment would point this at a warehouse or event bus; the in-memory
/// implementation here just records events for assertions in tests.
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn record(&self, event: AnalyticsEvent) -> Result<()>;
}
