use shared_types::{AuthResponse, LoginRequest, RegisterRequest, ResetPasswordRequest, TokenPair};

#[derive(Debug, Clone, PartialEq)]
pub enum AuthCommand {
    Login(LoginRequest),
    LoginSuccess(AuthResponse),
    LoginFailure(String),

    Register(RegisterRequest),
    RegisterSuccess(AuthResponse),
    RegisterFailure(String),

    Logout,
    LogoutSuccess,

    RefreshToken,
    RefreshTokenSuccess(TokenPair),
    RefreshTokenFailure(String),

    ForgotPassword { email: String },
    ForgotPasswordSuccess { message: String },
    ForgotPasswordFailure(String),

    ResetPassword(ResetPasswordRequest),
    ResetPasswordSuccess { message: String },
    ResetPasswordFailure(String),

    ClearError,
}

impl AuthCommand {
    pub fn name(&self) -> &'static str {
        match self {
            AuthCommand::Login(_) => "login",
            AuthCommand::LoginSuccess(_) => "login-success",
            AuthCommand::LoginFailure(_) => "login-failure",
            AuthCommand::Register(_) => "register",
            AuthCommand::RegisterSuccess(_) => "register-success",
            AuthCommand::RegisterFailure(_) => "register-failure",
            AuthCommand::Logout => "logout",
            AuthCommand::LogoutSuccess => "logout-success",
            AuthCommand::RefreshToken => "refresh-token",
            AuthCommand::RefreshTokenSuccess(_) => "refresh-token-success",
            AuthCommand::RefreshTokenFailure(_) => "refresh-token-failure",
            AuthCommand::ForgotPassword { .. } => "forgot-password",
            AuthCommand::ForgotPasswordSuccess { .. } => "forgot-password-success",
            AuthCommand::ForgotPasswordFailure(_) => "forgot-password-failure",
            AuthCommand::ResetPassword(_) => "reset-password",
            AuthCommand::ResetPasswordSuccess { .. } => "reset-password-success",
            AuthCommand::ResetPasswordFailure(_) => "reset-password-failure",
            AuthCommand::ClearError => "clear-error",
        }
    }
}
