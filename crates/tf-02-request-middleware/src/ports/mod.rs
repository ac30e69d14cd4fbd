//! Ports of the middleware chain.

pub mod outbound;

pub use outbound::{CsrfTokenSource, Notification, NotificationLevel, Notifier, TokenProvider};
