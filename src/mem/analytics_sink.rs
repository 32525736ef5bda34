use async_trait::async_trait;
use std::sync::Mutex;

use crate::error::Result;
use crate::model::AnalyticsEvent;
use crate::store::AnalyticsSink;

/// Records every analytics event in order. Useful for test assertions and
/// as a local stand-in for whatever warehouse sink a deployment plugs in.
#[derive(Default)]
pub struct InMemoryAnalyticsSink {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl InMemoryAnalyticsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl AnalyticsSink for InMemoryAnalyticsSink {
    async fn record(&self, event: AnalyticsEvent) -> Result<()> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
        Ok(())
    }
}
