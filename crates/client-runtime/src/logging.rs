//! Tracing setup.
//!
//! `RUST_LOG` wins over the configured level. JSON output is meant for
//! containers; the default is the compact human format.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter {directive:?}: {reason}")]
    Filter { directive: String, reason: String },

    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Filter from `RUST_LOG`, falling back to `level`.
pub fn env_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| LoggingError::Filter {
            directive: level.to_string(),
            reason: e.to_string(),
        })
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(level: &str, json: bool) -> Result<(), LoggingError> {
    let filter = env_filter(level)?;
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        registry
            .with(json_layer)
            .try_init()
            .map_err(|e| LoggingError::Install(e.to_string()))
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true);
        registry
            .with(fmt_layer)
            .try_init()
            .map_err(|e| LoggingError::Install(e.to_string()))
    }
}
