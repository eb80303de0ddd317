//! Alert sink implementations.

use async_trait::async_trait;

use jobhub_core::traits::alert::AlertSink;

/// Alert sink that writes alerts to the log. Used by the dev daemon.
#[derive(Debug, Default)]
pub struct LogAlertSink;

impl LogAlertSink {
    /// Create a new log-backed alert sink.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AlertSink for LogAlertSink {
    async fn request_permission(&self) -> bool {
        true
    }

    async fn notify(&self, title: &str, body: &str) {
        tracing::info!("Alert [{title}]: {body}");
    }
}

/// Alert sink that swallows everything. Used when the user denied alert
/// permission, and in tests.
#[derive(Debug, Default)]
pub struct NoopAlertSink;

impl NoopAlertSink {
    /// Create a new no-op alert sink.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AlertSink for NoopAlertSink {
    async fn request_permission(&self) -> bool {
        false
    }

    async fn notify(&self, _title: &str, _body: &str) {}
}
