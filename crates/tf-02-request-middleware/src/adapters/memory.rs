//! In-process adapters for the outbound ports.

use crate::ports::{CsrfTokenSource, Notification, NotificationLevel, Notifier, TokenProvider};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Host page without a csrf meta tag; tokens are generated per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCsrfMeta;

impl CsrfTokenSource for NoCsrfMeta {
    fn meta_token(&self) -> Option<String> {
        None
    }
}

/// Fixed token, as if read from `<meta name="csrf-token">`.
#[derive(Debug, Clone)]
pub struct StaticCsrfToken(pub String);

impl CsrfTokenSource for StaticCsrfToken {
    fn meta_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// No signed-in session.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuthToken;

impl TokenProvider for NoAuthToken {
    fn bearer_token(&self) -> Option<String> {
        None
    }
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        match n.level {
            NotificationLevel::Error => error!(title = %n.title, "{}", n.message),
            NotificationLevel::Warning => warn!(title = %n.title, "{}", n.message),
            NotificationLevel::Success | NotificationLevel::Info => {
                info!(title = %n.title, "{}", n.message)
            }
        }
    }
}

/// Keeps every notification for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().clone()
    }

    #[must_use]
    pub fn count(&self, level: NotificationLevel) -> usize {
        self.seen.lock().iter().filter(|n| n.level == level).count()
    }

    pub fn clear(&self) {
        self.seen.lock().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().push(notification);
    }
}
