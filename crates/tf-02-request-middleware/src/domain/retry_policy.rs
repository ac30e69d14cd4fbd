//! Retry decision for a failed attempt.
//!
//! ```text
//!   Attempt(n) ──failure──┬── retryable, n < cap ──→ wait delay(n) ──→ Attempt(n+1)
//!                         └── otherwise ───────────→ GiveUp
//! ```
//!
//! `delay(n) = min(base * 2^n, max)`; with defaults 1000ms, 2000ms, 4000ms.
//!
//! | Status | Retried |
//! |--------|---------|
//! | 0 (no connection) | yes |
//! | 408, 429 | yes |
//! | other 4xx | never |
//! | 5xx | yes |

use crate::domain::config::RetryConfig;
use std::time::Duration;

/// What to do after attempt `n` failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry(Duration),
    GiveUp,
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Decide for a failure on retry index `attempt` (0 for the first
    /// failure). `url` is matched against the non-retryable list.
    #[must_use]
    pub fn decide(&self, attempt: u32, status: u16, url: &str) -> RetryDecision {
        if !is_retryable_status(status) {
            return RetryDecision::GiveUp;
        }
        if attempt >= self.config.max_retries {
            return RetryDecision::GiveUp;
        }
        if self
            .config
            .non_retryable_endpoints
            .iter()
            .any(|endpoint| url.contains(endpoint.as_str()))
        {
            return RetryDecision::GiveUp;
        }
        RetryDecision::Retry(self.delay(attempt))
    }

    /// Backoff before retry `attempt`.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u64.checked_pow(attempt).unwrap_or(u64::MAX);
        let ms = self
            .config
            .base_delay_ms
            .saturating_mul(factor)
            .min(self.config.max_delay_ms);
        Duration::from_millis(ms)
    }

    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.config.max_retries
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

/// Client errors are final except timeout and rate limiting.
#[must_use]
pub fn is_retryable_status(status: u16) -> bool {
    !(400..500).contains(&status) || status == 408 || status == 429
}
