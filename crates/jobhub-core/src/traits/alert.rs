//! Alert sink trait for best-effort user-facing alerts.

use async_trait::async_trait;

/// Trait for desktop-style alert delivery (the browser Notification API in
/// the web client, a log line in the dev daemon).
///
/// Alerts are fire-and-forget: failures are swallowed by the
/// implementation and never affect feed correctness.
#[async_trait]
pub trait AlertSink: Send + Sync + std::fmt::Debug + 'static {
    /// Ask the user for permission to show alerts.
    ///
    /// Returns `true` when alerts may be shown.
    async fn request_permission(&self) -> bool;

    /// Show an alert. Best-effort; must not fail.
    async fn notify(&self, title: &str, body: &str);
}
