//! Session persistence errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Backend refused the operation.
    #[error("session storage unavailable: {0}")]
    Storage(String),

    #[error("session file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session value could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}
