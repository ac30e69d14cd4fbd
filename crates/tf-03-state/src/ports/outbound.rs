//! # Outbound Ports
//!
//! Persistence the host provides for the signed-in session.
//!
//! Production: `FileSessionStorage` (adapters/file.rs)
//! Testing: `MemorySessionStorage` (adapters/memory.rs)

use crate::domain::errors::SessionError;

/// Keys the session is persisted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// JSON-encoded user record.
    User,
    /// Access token.
    Token,
    /// Refresh token, when the server issued one.
    RefreshToken,
}

impl StorageKey {
    pub const ALL: [StorageKey; 3] = [StorageKey::User, StorageKey::Token, StorageKey::RefreshToken];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::User => "user",
            StorageKey::Token => "token",
            StorageKey::RefreshToken => "refreshToken",
        }
    }
}

/// Durable string storage for the session.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: StorageKey) -> Result<Option<String>, SessionError>;

    fn set(&self, key: StorageKey, value: &str) -> Result<(), SessionError>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: StorageKey) -> Result<(), SessionError>;
}
