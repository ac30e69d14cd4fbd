//! # Error Types
//!
//! Failure shapes shared by the middleware chain and the effect pipeline.
//!
//! ## Taxonomy
//!
//! | Kind | Status | Handling |
//! |------|--------|----------|
//! | Transport | 0 | retried, notified |
//! | Client | 4xx | tailored message, caller decides on notification |
//! | Server | 5xx | retried, notified |
//! | Decode | n/a | body or stored session could not be parsed |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad class of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// No connectivity (status 0).
    Transport,
    /// Caller-correctable (4xx).
    Client,
    /// Operational (5xx).
    Server,
    /// Malformed payload.
    Decode,
}

impl ErrorKind {
    /// Classify a raw HTTP status. Status 0 means no response at all; an
    /// envelope-level failure on a 2xx counts as a client error.
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            0 => ErrorKind::Transport,
            500..=599 => ErrorKind::Server,
            _ => ErrorKind::Client,
        }
    }
}

/// A classified request failure.
///
/// `Display` yields the user-facing message, which is what ends up on a
/// slice's `error` field.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// User-facing message.
    pub message: String,
    /// HTTP status, 0 when no response was received.
    pub status: u16,
    /// Reason phrase or transport error text.
    pub status_text: String,
    /// Request path or URL.
    pub url: String,
    /// When the failure was classified.
    pub timestamp: DateTime<Utc>,
}

impl ApiError {
    pub fn new(
        message: impl Into<String>,
        status: u16,
        status_text: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            status,
            status_text: status_text.into(),
            url: url.into(),
            timestamp: Utc::now(),
        }
    }

    /// Response body could not be decoded.
    pub fn decode(url: impl Into<String>, details: impl Into<String>) -> Self {
        Self::new(
            "Unexpected response from server",
            0,
            format!("decode: {}", details.into()),
            url,
        )
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        if self.status == 0 && self.status_text.starts_with("decode:") {
            return ErrorKind::Decode;
        }
        ErrorKind::from_status(self.status)
    }

    /// Whether this failure warrants a global notification.
    #[must_use]
    pub fn is_notifiable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport | ErrorKind::Server)
    }

    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.kind() == ErrorKind::Client
    }
}
