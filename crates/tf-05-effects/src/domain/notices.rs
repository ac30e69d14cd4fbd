//! User-facing outcomes of effects: failure text and which failures a flow
//! surfaces itself.
//!
//! The middleware chain already notifies for transport and server failures.
//! Client errors (4xx) stay silent unless the flow opts in here.

use shared_types::ApiError;

pub const SUCCESS_TITLE: &str = "Success";
pub const ERROR_TITLE: &str = "Error";

pub const SIGNED_IN: &str = "Signed in successfully";
pub const REGISTERED: &str = "Registration completed successfully";
pub const INSTRUCTIONS_SENT: &str = "Instructions sent to email";
pub const PASSWORD_CHANGED: &str = "Password changed successfully";
pub const NO_REFRESH_TOKEN: &str = "No refresh token available";

/// Which failures a flow raises a notification for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOn {
    Never,
    ClientErrors,
    AnyFailure,
}

impl NotifyOn {
    pub fn should_notify(self, error: &ApiError) -> bool {
        match self {
            NotifyOn::Never => false,
            NotifyOn::ClientErrors => error.is_client_error() && error.status >= 400,
            NotifyOn::AnyFailure => true,
        }
    }
}

/// Text carried by a `...Failure` command.
pub fn failure_message(error: &ApiError, fallback: &str) -> String {
    let message = error.message.trim();
    if message.is_empty() {
        fallback.to_string()
    } else {
        message.to_string()
    }
}
