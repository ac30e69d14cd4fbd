//! # Client Configuration
//!
//! One flat settings struct for the whole client, split into the per-crate
//! configs at wiring time.
//!
//! ## Sources (later wins)
//!
//! 1. Built-in defaults
//! 2. JSON file named by `TASKFLOW_CONFIG`
//! 3. `TASKFLOW_*` environment variables
//!
//! Unparseable environment values are logged and ignored.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tf_02_request_middleware::{MiddlewareConfig, RetryConfig};
use tf_05_effects::{EffectsConfig, StaleResponsePolicy};
use thiserror::Error;
use tracing::warn;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Middleware(#[from] tf_02_request_middleware::ConfigError),

    #[error(transparent)]
    Effects(#[from] tf_05_effects::ConfigError),

    #[error("page size must be greater than zero")]
    ZeroPageSize,

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Complete client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub retry: RetryConfig,
    pub refetch_debounce_ms: u64,
    pub prefetch_delay_ms: u64,
    /// Page size of the paginated project list.
    pub page_size: u32,
    pub stale_response_policy: StaleResponsePolicy,
    /// Session file; the session lives in memory only when unset.
    pub session_file: Option<PathBuf>,
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub log_level: String,
    pub log_json: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let middleware = MiddlewareConfig::default();
        let effects = EffectsConfig::default();
        Self {
            api_base_url: middleware.base_url,
            request_timeout_secs: middleware.request_timeout_secs,
            retry: middleware.retry,
            refetch_debounce_ms: effects.refetch_debounce_ms,
            prefetch_delay_ms: effects.prefetch_delay_ms,
            page_size: tf_03_state::DEFAULT_PAGE_SIZE,
            stale_response_policy: effects.stale_response_policy,
            session_file: None,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl ClientConfig {
    /// Defaults, then the `TASKFLOW_CONFIG` file, then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("TASKFLOW_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `TASKFLOW_*` overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("TASKFLOW_API_URL") {
            self.api_base_url = url;
        }
        override_parsed(&lookup, "TASKFLOW_REQUEST_TIMEOUT_SECS", &mut self.request_timeout_secs);
        override_parsed(&lookup, "TASKFLOW_MAX_RETRIES", &mut self.retry.max_retries);
        override_parsed(&lookup, "TASKFLOW_RETRY_BASE_DELAY_MS", &mut self.retry.base_delay_ms);
        override_parsed(&lookup, "TASKFLOW_RETRY_MAX_DELAY_MS", &mut self.retry.max_delay_ms);
        override_parsed(&lookup, "TASKFLOW_REFETCH_DEBOUNCE_MS", &mut self.refetch_debounce_ms);
        override_parsed(&lookup, "TASKFLOW_PREFETCH_DELAY_MS", &mut self.prefetch_delay_ms);
        override_parsed(&lookup, "TASKFLOW_PAGE_SIZE", &mut self.page_size);
        override_parsed(&lookup, "TASKFLOW_STALE_POLICY", &mut self.stale_response_policy);
        override_parsed(&lookup, "TASKFLOW_LOG_JSON", &mut self.log_json);
        if let Some(path) = lookup("TASKFLOW_SESSION_FILE") {
            self.session_file = (!path.trim().is_empty()).then(|| PathBuf::from(path));
        }
        if let Some(level) = lookup("TASKFLOW_LOG_LEVEL") {
            self.log_level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.middleware().validate()?;
        self.effects().validate()?;
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(())
    }

    /// Settings of the request middleware chain.
    pub fn middleware(&self) -> MiddlewareConfig {
        MiddlewareConfig {
            base_url: self.api_base_url.clone(),
            request_timeout_secs: self.request_timeout_secs,
            retry: self.retry.clone(),
            ..MiddlewareConfig::default()
        }
    }

    /// Settings of the effect handlers.
    pub fn effects(&self) -> EffectsConfig {
        EffectsConfig {
            refetch_debounce_ms: self.refetch_debounce_ms,
            prefetch_delay_ms: self.prefetch_delay_ms,
            stale_response_policy: self.stale_response_policy,
        }
    }
}

fn override_parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    target: &mut T,
) {
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *target = value,
        Err(_) => warn!(key, value = %raw, "ignoring unparseable environment override"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api_base_url, "http://localhost:3000/api");
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.page_size, 12);
        assert_eq!(config.effects(), EffectsConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ClientConfig::default();
        config.apply_env(env(&[
            ("TASKFLOW_API_URL", "https://api.example.com"),
            ("TASKFLOW_STALE_POLICY", "discard-superseded"),
            ("TASKFLOW_PAGE_SIZE", "24"),
            ("TASKFLOW_SESSION_FILE", "/tmp/session.json"),
            ("TASKFLOW_LOG_JSON", "true"),
        ]));

        assert_eq!(config.middleware().base_url, "https://api.example.com");
        assert_eq!(config.stale_response_policy, StaleResponsePolicy::DiscardSuperseded);
        assert_eq!(config.page_size, 24);
        assert_eq!(config.session_file, Some(PathBuf::from("/tmp/session.json")));
        assert!(config.log_json);
    }

    #[test]
    fn test_bad_env_value_ignored() {
        let mut config = ClientConfig::default();
        config.apply_env(env(&[("TASKFLOW_MAX_RETRIES", "lots"), ("TASKFLOW_STALE_POLICY", "maybe")]));
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.stale_response_policy, StaleResponsePolicy::ApplyAll);
    }

    #[test]
    fn test_validation_errors() {
        let config = ClientConfig {
            api_base_url: "localhost".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Middleware(_))));

        let config = ClientConfig {
            refetch_debounce_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Effects(_))));

        let config = ClientConfig {
            page_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroPageSize)));
    }

    #[test]
    fn test_file_with_partial_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.json");
        std::fs::write(&path, r#"{"page_size": 6, "retry": {"max_retries": 1}}"#).unwrap();

        let config = ClientConfig::from_file(&path).unwrap();
        assert_eq!(config.page_size, 6);
        assert_eq!(config.retry.max_retries, 1);
        assert_eq!(config.retry.base_delay_ms, 1_000);
        assert_eq!(config.log_level, "info");
    }
}
