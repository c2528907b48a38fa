//! Transient user-facing notifications (toasts).

use tracing::warn;

/// Shown when no response arrived at all.
pub const NETWORK_FAILURE_MESSAGE: &str = "Network connection failed";

/// Shown when the server answered with a non-200 HTTP status.
pub const REQUEST_FAILURE_MESSAGE: &str = "Network request failed";

pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Routes notifications into the log. Used when no UI is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        warn!(message = message, "User notification");
    }
}
