//! Auth slice.

use crate::commands::AuthCommand;
use shared_types::User;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    /// Last success message (forgot / reset password).
    pub message: Option<String>,
    pub is_authenticated: bool,
}

impl AuthState {
    /// Signed-in state as restored from storage.
    pub fn signed_in(user: User, token: String, refresh_token: Option<String>) -> Self {
        Self {
            user: Some(user),
            token: Some(token),
            refresh_token,
            is_authenticated: true,
            ..Self::default()
        }
    }

    fn pending(self) -> Self {
        Self {
            loading: true,
            error: None,
            message: None,
            ..self
        }
    }

    fn failed(self, error: &str) -> Self {
        Self {
            loading: false,
            error: Some(error.to_string()),
            ..self
        }
    }
}

pub fn reduce(state: AuthState, command: &AuthCommand) -> AuthState {
    match command {
        AuthCommand::Login(_) | AuthCommand::Register(_) | AuthCommand::RefreshToken => {
            state.pending()
        }
        AuthCommand::LoginSuccess(response) | AuthCommand::RegisterSuccess(response) => {
            AuthState {
                user: Some(response.user.clone()),
                token: Some(response.token.clone()),
                refresh_token: response.refresh_token.clone(),
                loading: false,
                error: None,
                message: None,
                is_authenticated: true,
            }
        }
        AuthCommand::LoginFailure(error)
        | AuthCommand::RegisterFailure(error)
        | AuthCommand::RefreshTokenFailure(error) => AuthState {
            is_authenticated: false,
            ..state.failed(error)
        },

        AuthCommand::Logout => AuthState {
            loading: true,
            ..state
        },
        AuthCommand::LogoutSuccess => AuthState::default(),

        AuthCommand::RefreshTokenSuccess(pair) => AuthState {
            token: Some(pair.token.clone()),
            refresh_token: pair.refresh_token.clone().or(state.refresh_token.clone()),
            loading: false,
            error: None,
            ..state
        },

        AuthCommand::ForgotPassword { .. } | AuthCommand::ResetPassword(_) => state.pending(),
        AuthCommand::ForgotPasswordSuccess { message }
        | AuthCommand::ResetPasswordSuccess { message } => AuthState {
            loading: false,
            error: None,
            message: Some(message.clone()),
            ..state
        },
        AuthCommand::ForgotPasswordFailure(error) | AuthCommand::ResetPasswordFailure(error) => {
            state.failed(error)
        }

        AuthCommand::ClearError => AuthState {
            error: None,
            ..state
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{AuthResponse, LoginRequest, TokenPair};

    fn response() -> AuthResponse {
        AuthResponse {
            user: User::new("ada@example.com", "Ada"),
            token: "tok-1".to_string(),
            refresh_token: Some("ref-1".to_string()),
        }
    }

    fn login() -> AuthCommand {
        AuthCommand::Login(LoginRequest {
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
        })
    }

    #[test]
    fn test_login_lifecycle() {
        let state = reduce(AuthState::default(), &login());
        assert!(state.loading);

        let state = reduce(state, &AuthCommand::LoginSuccess(response()));
        assert!(!state.loading);
        assert!(state.is_authenticated);
        assert_eq!(state.token.as_deref(), Some("tok-1"));
    }

    #[test]
    fn test_login_failure_clears_authentication() {
        let signed_in = reduce(AuthState::default(), &AuthCommand::LoginSuccess(response()));
        let state = reduce(signed_in, &AuthCommand::LoginFailure("Invalid email or password".into()));
        assert!(!state.is_authenticated);
        assert_eq!(state.error.as_deref(), Some("Invalid email or password"));
    }

    #[test]
    fn test_logout_success_resets() {
        let signed_in = reduce(AuthState::default(), &AuthCommand::LoginSuccess(response()));
        let state = reduce(signed_in, &AuthCommand::Logout);
        assert!(state.loading);
        assert_eq!(reduce(state, &AuthCommand::LogoutSuccess), AuthState::default());
    }

    #[test]
    fn test_refresh_keeps_user() {
        let signed_in = reduce(AuthState::default(), &AuthCommand::LoginSuccess(response()));
        let state = reduce(
            signed_in,
            &AuthCommand::RefreshTokenSuccess(TokenPair {
                token: "tok-2".to_string(),
                refresh_token: None,
            }),
        );
        assert_eq!(state.token.as_deref(), Some("tok-2"));
        assert_eq!(state.refresh_token.as_deref(), Some("ref-1"));
        assert!(state.user.is_some());
        assert!(state.is_authenticated);
    }

    #[test]
    fn test_forgot_password_message() {
        let state = reduce(
            AuthState::default(),
            &AuthCommand::ForgotPassword {
                email: "ada@example.com".to_string(),
            },
        );
        let state = reduce(
            state,
            &AuthCommand::ForgotPasswordSuccess {
                message: "Instructions sent to email".to_string(),
            },
        );
        assert_eq!(state.message.as_deref(), Some("Instructions sent to email"));
        assert!(!state.is_authenticated);
    }

    #[test]
    fn test_clear_error() {
        let state = reduce(AuthState::default(), &AuthCommand::LoginFailure("x".into()));
        assert!(reduce(state, &AuthCommand::ClearError).error.is_none());
    }
}
