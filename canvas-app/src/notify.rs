//! Where user-facing notices go.

use canvas_core::{Notice, Severity};
use tokio::sync::mpsc::UnboundedSender;

/// Receives notices raised by failed editor operations.
pub trait NotificationSink {
    /// Deliver one notice.
    fn notify(&self, notice: Notice);
}

/// Logs notices through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Destructive => tracing::warn!("{notice}"),
            Severity::Info => tracing::info!("{notice}"),
        }
    }
}

impl NotificationSink for UnboundedSender<Notice> {
    fn notify(&self, notice: Notice) {
        if let Err(e) = self.send(notice) {
            tracing::debug!("Notice dropped, receiver gone: {}", e.0);
        }
    }
}
