//! User-facing messages for failed requests.

/// Message shown for a 401 on the login endpoint.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Fallback for statuses without a dedicated message.
pub const UNKNOWN_ERROR: &str = "An unknown error occurred. Please try again later.";

/// Title of the global notification raised for transport and server errors.
pub const SERVER_ERROR_TITLE: &str = "Server error";

const STATUS_MESSAGES: &[(u16, &str)] = &[
    (0, "Server is unreachable. Check your internet connection."),
    (400, "Invalid request. Check the entered data."),
    (401, "Authorization required. Please sign in."),
    (403, "Access denied. You do not have sufficient permissions."),
    (404, "The requested resource was not found."),
    (408, "The server took too long to respond."),
    (409, "Data conflict. The record may already exist."),
    (413, "File is too large. Reduce the file size."),
    (415, "Unsupported file type."),
    (429, "Too many requests. Please try again later."),
    (500, "Internal server error. Please try again later."),
    (502, "Bad gateway. The server is temporarily unavailable."),
    (503, "Service temporarily unavailable. Please try again later."),
    (504, "Gateway timeout."),
];

/// Message for `status` on a request to `url`.
#[must_use]
pub fn user_message(status: u16, url: &str, login_endpoint: &str) -> &'static str {
    if status == 401 && url.contains(login_endpoint) {
        return INVALID_CREDENTIALS;
    }
    STATUS_MESSAGES
        .iter()
        .find(|(code, _)| *code == status)
        .map_or(UNKNOWN_ERROR, |(_, message)| message)
}

/// Whether a failure with `status` raises a global notification. Client
/// errors are left to the calling effect.
#[must_use]
pub fn is_notifiable_status(status: u16) -> bool {
    status == 0 || (500..600).contains(&status)
}
