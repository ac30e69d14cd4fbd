//! Anti-forgery token handling.

use http::Method;
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Header carrying the token.
pub const CSRF_HEADER: &str = "X-CSRF-TOKEN";

/// Length of generated tokens.
pub const GENERATED_TOKEN_LEN: usize = 32;

/// Shortest token accepted as valid.
pub const MIN_TOKEN_LEN: usize = 20;

/// Methods that change server state and therefore carry a token.
#[must_use]
pub fn is_state_changing(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Fresh random alphanumeric token.
#[must_use]
pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[must_use]
pub fn is_valid_token(token: &str) -> bool {
    token.len() >= MIN_TOKEN_LEN
}
