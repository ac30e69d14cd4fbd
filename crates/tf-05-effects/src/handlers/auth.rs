//! Authentication effects.
//!
//! | Command | Call | Session | Notifies |
//! |---------|------|---------|----------|
//! | Login / Register | `/auth/login`, `/auth/register` | persist on success | success; 4xx failures |
//! | Logout | none | cleared | no |
//! | RefreshToken | `/auth/refresh` | tokens persisted | 4xx failures |
//! | ForgotPassword | `/auth/forgot-password` | no | success; 4xx failures |
//! | ResetPassword | `/auth/reset-password` | no | success; any failure |
//!
//! Storage failures are logged and never turn a successful call into a
//! failed one.

use super::{run_handler, EffectContext, EffectHandler};
use crate::domain::{
    failure_message, NotifyOn, ERROR_TITLE, INSTRUCTIONS_SENT, NO_REFRESH_TOKEN, PASSWORD_CHANGED,
    REGISTERED, SIGNED_IN, SUCCESS_TITLE,
};
use crate::ports::AuthApi;
use async_trait::async_trait;
use shared_bus::{CommandFilter, Subscription};
use shared_types::{ApiError, Domain, ForgotPasswordRequest, RefreshTokenRequest};
use std::sync::Arc;
use tf_02_request_middleware::Notification;
use tf_03_state::{AuthCommand, Command, SessionManager};
use tracing::{info, warn};

pub struct AuthEffects {
    ctx: EffectContext,
    api: Arc<dyn AuthApi>,
    session: Arc<SessionManager>,
}

impl AuthEffects {
    pub fn new(ctx: EffectContext, api: Arc<dyn AuthApi>, session: Arc<SessionManager>) -> Self {
        Self { ctx, api, session }
    }

    pub async fn run(self: Arc<Self>, subscription: Subscription<Command>) {
        run_handler(self, subscription).await;
    }

    /// Raise the flow's notifications for `result`.
    fn announce<T>(&self, result: &Result<T, ApiError>, success: Option<&str>, failures: NotifyOn, fallback: &str) {
        match result {
            Ok(_) => {
                if let Some(message) = success {
                    self.ctx.notify(Notification::success(SUCCESS_TITLE, message));
                }
            }
            Err(error) if failures.should_notify(error) => {
                self.ctx
                    .notify(Notification::error(ERROR_TITLE, failure_message(error, fallback)));
            }
            Err(_) => {}
        }
    }

    /// Refresh token from the store, falling back to storage.
    fn current_refresh_token(&self) -> Option<String> {
        let from_state = self
            .ctx
            .store()
            .select(|state| state.auth.refresh_token.clone());
        if from_state.is_some() {
            return from_state;
        }
        match self.session.refresh_token() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "could not read stored refresh token");
                None
            }
        }
    }

    async fn refresh(&self, command: &Command) {
        let family = self.ctx.begin(command);
        let result = match self.current_refresh_token() {
            Some(refresh_token) => self.api.refresh(&RefreshTokenRequest { refresh_token }).await,
            None => Err(ApiError::new(NO_REFRESH_TOKEN, 401, "Unauthorized", "/auth/refresh")),
        };
        if let Ok(pair) = &result {
            if let Err(e) = self.session.persist_tokens(pair) {
                warn!(error = %e, "could not persist refreshed tokens");
            }
        }
        self.announce(&result, None, NotifyOn::ClientErrors, "Token refresh failed");
        self.ctx.settle(
            family,
            result,
            "Token refresh failed",
            AuthCommand::RefreshTokenSuccess,
            AuthCommand::RefreshTokenFailure,
        );
    }
}

#[async_trait]
impl EffectHandler for AuthEffects {
    fn name(&self) -> &'static str {
        "auth"
    }

    fn filter(&self) -> CommandFilter {
        CommandFilter {
            topics: vec![Domain::Auth],
            names: vec![
                "login",
                "register",
                "logout",
                "refresh-token",
                "forgot-password",
                "reset-password",
            ],
        }
    }

    async fn handle(&self, command: Command) {
        let Command::Auth(auth_command) = &command else {
            return;
        };
        match auth_command {
            AuthCommand::Login(request) => {
                let family = self.ctx.begin(&command);
                let result = self.api.login(request).await;
                if let Ok(response) = &result {
                    if let Err(e) = self.session.persist(response) {
                        warn!(error = %e, "could not persist session");
                    }
                    info!(user_id = %response.user.id, "signed in");
                }
                self.announce(&result, Some(SIGNED_IN), NotifyOn::ClientErrors, "Login failed");
                self.ctx.settle(
                    family,
                    result,
                    "Login failed",
                    AuthCommand::LoginSuccess,
                    AuthCommand::LoginFailure,
                );
            }
            AuthCommand::Register(request) => {
                let family = self.ctx.begin(&command);
                let result = self.api.register(request).await;
                if let Ok(response) = &result {
                    if let Err(e) = self.session.persist(response) {
                        warn!(error = %e, "could not persist session");
                    }
                }
                self.announce(&result, Some(REGISTERED), NotifyOn::ClientErrors, "Registration failed");
                self.ctx.settle(
                    family,
                    result,
                    "Registration failed",
                    AuthCommand::RegisterSuccess,
                    AuthCommand::RegisterFailure,
                );
            }
            AuthCommand::Logout => {
                let family = self.ctx.begin(&command);
                if let Err(e) = self.session.clear() {
                    warn!(error = %e, "could not clear stored session");
                }
                info!("signed out");
                self.ctx.settle(
                    family,
                    Ok::<(), ApiError>(()),
                    "Logout failed",
                    |()| AuthCommand::LogoutSuccess,
                    |_| AuthCommand::LogoutSuccess,
                );
            }
            AuthCommand::RefreshToken => self.refresh(&command).await,
            AuthCommand::ForgotPassword { email } => {
                let family = self.ctx.begin(&command);
                let request = ForgotPasswordRequest { email: email.clone() };
                let result = self.api.forgot_password(&request).await;
                self.announce(
                    &result,
                    Some(INSTRUCTIONS_SENT),
                    NotifyOn::ClientErrors,
                    "Could not send instructions",
                );
                self.ctx.settle(
                    family,
                    result,
                    "Could not send instructions",
                    |()| AuthCommand::ForgotPasswordSuccess {
                        message: INSTRUCTIONS_SENT.to_string(),
                    },
                    AuthCommand::ForgotPasswordFailure,
                );
            }
            AuthCommand::ResetPassword(request) => {
                let family = self.ctx.begin(&command);
                let result = self.api.reset_password(request).await;
                self.announce(
                    &result,
                    Some(PASSWORD_CHANGED),
                    NotifyOn::AnyFailure,
                    "Password reset failed",
                );
                self.ctx.settle(
                    family,
                    result,
                    "Password reset failed",
                    |()| AuthCommand::ResetPasswordSuccess {
                        message: PASSWORD_CHANGED.to_string(),
                    },
                    AuthCommand::ResetPasswordFailure,
                );
            }
            _ => {}
        }
    }
}
