//! Bundled docket sinks.
//!
//! The real docket collaborator lives outside this repository; these
//! sinks cover local development (log the event) and testing (record the
//! event). Embedders wire their own transport by implementing
//! [`DocketSink`].

use std::sync::{Arc, Mutex};

use appcat_core::docket::{DocketError, DocketSink};
use appcat_core::models::docket::DocketEvent;
use tracing::info;

/// Writes every event through `tracing` and reports success.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDocketSink;

impl DocketSink for LogDocketSink {
    async fn post(&self, event: DocketEvent) -> Result<(), DocketError> {
        info!(
            application = %event.application,
            source = %event.source,
            name = %event.name,
            status = ?event.status,
            details = %event.details,
            "docket event"
        );
        Ok(())
    }
}

/// Records every event in memory; useful in tests and embedders that
/// batch-forward events themselves. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocketSink {
    events: Arc<Mutex<Vec<DocketEvent>>>,
}

impl MemoryDocketSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events posted so far.
    pub fn events(&self) -> Vec<DocketEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl DocketSink for MemoryDocketSink {
    async fn post(&self, event: DocketEvent) -> Result<(), DocketError> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
        Ok(())
    }
}
