//! Effect pipeline configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("refetch debounce must be greater than zero")]
    ZeroDebounce,

    #[error("prefetch delay must be greater than zero")]
    ZeroPrefetchDelay,

    #[error("unknown stale response policy {0:?}")]
    UnknownPolicy(String),
}

/// What happens to a response whose request has been superseded by a newer
/// one of the same family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleResponsePolicy {
    /// Every response is applied in arrival order; the last one wins.
    #[default]
    ApplyAll,
    /// Responses of superseded requests are dropped without a follow-up.
    DiscardSuperseded,
}

impl std::str::FromStr for StaleResponsePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "apply_all" => Ok(Self::ApplyAll),
            "discard_superseded" => Ok(Self::DiscardSuperseded),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Quiet period after the last filter, sort or search change before the
    /// project list is reloaded.
    pub refetch_debounce_ms: u64,
    /// Delay between a first-page load and the prefetch of page two.
    pub prefetch_delay_ms: u64,
    pub stale_response_policy: StaleResponsePolicy,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            refetch_debounce_ms: 300,
            prefetch_delay_ms: 1_000,
            stale_response_policy: StaleResponsePolicy::ApplyAll,
        }
    }
}

impl EffectsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refetch_debounce_ms == 0 {
            return Err(ConfigError::ZeroDebounce);
        }
        if self.prefetch_delay_ms == 0 {
            return Err(ConfigError::ZeroPrefetchDelay);
        }
        Ok(())
    }

    #[must_use]
    pub fn refetch_debounce(&self) -> Duration {
        Duration::from_millis(self.refetch_debounce_ms)
    }

    #[must_use]
    pub fn prefetch_delay(&self) -> Duration {
        Duration::from_millis(self.prefetch_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EffectsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.refetch_debounce(), Duration::from_millis(300));
        assert_eq!(config.prefetch_delay(), Duration::from_secs(1));
        assert_eq!(config.stale_response_policy, StaleResponsePolicy::ApplyAll);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: EffectsConfig =
            serde_json::from_str(r#"{"stale_response_policy": "discard_superseded"}"#).unwrap();
        assert_eq!(config.stale_response_policy, StaleResponsePolicy::DiscardSuperseded);
        assert_eq!(config.refetch_debounce_ms, 300);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            "Discard-Superseded".parse::<StaleResponsePolicy>().unwrap(),
            StaleResponsePolicy::DiscardSuperseded
        );
        assert!("latest".parse::<StaleResponsePolicy>().is_err());
    }

    #[test]
    fn test_rejects_zero_debounce() {
        let config = EffectsConfig {
            refetch_debounce_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroDebounce));
    }
}
