//! # Session Bootstrap
//!
//! Restores the auth slice from [`SessionStorage`] on startup and keeps
//! storage in step with sign-in, token refresh and sign-out.
//!
//! | Stored values | Outcome |
//! |---------------|---------|
//! | user + token, user parses, token not expired | signed in |
//! | user + token, user does not parse | signed out, storage cleared |
//! | user + token, JWT `exp` in the past | signed out, storage cleared |
//! | only one of user / token | signed out, storage left as is |
//! | storage read fails | signed out |
//!
//! A token whose payload carries no readable `exp` is treated as opaque
//! and kept.

use crate::domain::errors::SessionError;
use crate::domain::AuthState;
use crate::ports::outbound::{SessionStorage, StorageKey};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use shared_types::{AuthResponse, TokenPair, User};
use std::sync::Arc;

/// What bootstrap found in storage.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionSnapshot {
    SignedIn {
        user: User,
        token: String,
        refresh_token: Option<String>,
    },
    SignedOut,
}

impl SessionSnapshot {
    pub fn is_signed_in(&self) -> bool {
        matches!(self, SessionSnapshot::SignedIn { .. })
    }

    /// Auth slice matching this snapshot.
    pub fn into_auth_state(self) -> AuthState {
        match self {
            SessionSnapshot::SignedIn {
                user,
                token,
                refresh_token,
            } => AuthState::signed_in(user, token, refresh_token),
            SessionSnapshot::SignedOut => AuthState::default(),
        }
    }
}

/// Reads `exp` (seconds since epoch) from a JWT payload.
///
/// Returns `None` for anything that is not a three-part token with a JSON
/// payload holding a numeric `exp`.
pub fn jwt_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut parts = token.split('.');
    let (_, payload, _) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let exp = claims.get("exp")?;
    let seconds = exp.as_i64().or_else(|| exp.as_f64().map(|f| f as i64))?;
    DateTime::from_timestamp(seconds, 0)
}

/// Expired only when an `exp` claim is present and not in the future.
pub fn is_token_expired(token: &str, now: DateTime<Utc>) -> bool {
    jwt_expiry(token).is_some_and(|exp| exp <= now)
}

/// Owns the persisted session.
#[derive(Clone)]
pub struct SessionManager {
    storage: Arc<dyn SessionStorage>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager").finish_non_exhaustive()
    }
}

impl SessionManager {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// Restore the session as of `now`. Never fails; problems sign out.
    pub fn bootstrap(&self, now: DateTime<Utc>) -> SessionSnapshot {
        match self.try_bootstrap(now) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "session storage unreadable, starting signed out");
                SessionSnapshot::SignedOut
            }
        }
    }

    fn try_bootstrap(&self, now: DateTime<Utc>) -> Result<SessionSnapshot, SessionError> {
        let user = self.storage.get(StorageKey::User)?;
        let token = self.storage.get(StorageKey::Token)?;
        let (Some(user), Some(token)) = (user, token) else {
            tracing::debug!("no complete stored session");
            return Ok(SessionSnapshot::SignedOut);
        };

        let user: User = match serde_json::from_str(&user) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "stored user is corrupt, clearing session");
                self.clear()?;
                return Ok(SessionSnapshot::SignedOut);
            }
        };

        if is_token_expired(&token, now) {
            tracing::info!(user_id = %user.id, "stored token expired, clearing session");
            self.clear()?;
            return Ok(SessionSnapshot::SignedOut);
        }

        let refresh_token = self.storage.get(StorageKey::RefreshToken)?;
        tracing::info!(user_id = %user.id, "session restored");
        Ok(SessionSnapshot::SignedIn {
            user,
            token,
            refresh_token,
        })
    }

    /// Persist a fresh sign-in.
    pub fn persist(&self, response: &AuthResponse) -> Result<(), SessionError> {
        let user = serde_json::to_string(&response.user)?;
        self.storage.set(StorageKey::User, &user)?;
        self.persist_tokens(&TokenPair {
            token: response.token.clone(),
            refresh_token: response.refresh_token.clone(),
        })
    }

    /// Persist refreshed tokens. An absent refresh token keeps the stored one.
    pub fn persist_tokens(&self, pair: &TokenPair) -> Result<(), SessionError> {
        self.storage.set(StorageKey::Token, &pair.token)?;
        if let Some(refresh) = &pair.refresh_token {
            self.storage.set(StorageKey::RefreshToken, refresh)?;
        }
        Ok(())
    }

    /// Remove every session key.
    pub fn clear(&self) -> Result<(), SessionError> {
        for key in StorageKey::ALL {
            self.storage.remove(key)?;
        }
        Ok(())
    }

    pub fn token(&self) -> Result<Option<String>, SessionError> {
        self.storage.get(StorageKey::Token)
    }

    pub fn refresh_token(&self) -> Result<Option<String>, SessionError> {
        self.storage.get(StorageKey::RefreshToken)
    }
}
