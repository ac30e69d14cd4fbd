//! Middleware configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("api base url must be an http(s) url, got {0:?}")]
    InvalidBaseUrl(String),

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("max retry delay ({max_ms}ms) is below the base delay ({base_ms}ms)")]
    DelayBounds { base_ms: u64, max_ms: u64 },
}

/// Retry policy settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles each time.
    pub base_delay_ms: u64,
    /// Upper bound for any single delay.
    pub max_delay_ms: u64,
    /// Path fragments that are never retried.
    pub non_retryable_endpoints: Vec<String>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1_000,
            max_delay_ms: 10_000,
            non_retryable_endpoints: vec!["/auth/logout".to_string(), "/profile/avatar".to_string()],
        }
    }
}

/// Whole-chain settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiddlewareConfig {
    /// Prefix for every endpoint, e.g. `http://localhost:3000/api`.
    pub base_url: String,
    /// Per-attempt transport timeout.
    pub request_timeout_secs: u64,
    /// Endpoint whose 401 means bad credentials rather than expired session.
    pub login_endpoint: String,
    pub retry: RetryConfig,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            request_timeout_secs: 30,
            login_endpoint: "/auth/login".to_string(),
            retry: RetryConfig::default(),
        }
    }
}

impl MiddlewareConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.retry.max_delay_ms < self.retry.base_delay_ms {
            return Err(ConfigError::DelayBounds {
                base_ms: self.retry.base_delay_ms,
                max_ms: self.retry.max_delay_ms,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
