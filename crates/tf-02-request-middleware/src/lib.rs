//! # TF-02 Request Middleware
//!
//! Every outgoing network call passes through an ordered chain of tower
//! layers before it reaches the HTTP transport.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          ApiClient                           │
//! │   get / post / put / patch / delete, envelope unwrapping     │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │ ApiRequest
//! ┌──────────────────────────────┴───────────────────────────────┐
//! │                      Middleware Stack                        │
//! │  AuthToken → SecurityHeaders → Sanitize → Csrf               │
//! │            → Classify → Retry                                │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//!                       ReqwestTransport
//! ```
//!
//! Request-path stages mutate the outgoing request only. Response-path
//! stages see `HttpFailure` values: `Retry` absorbs the retryable ones,
//! `Classify` turns whatever is left into a user-facing `ApiError` and emits
//! a notification for connection failures and 5xx statuses.
//!
//! ## Retry
//!
//! | Status | Retried |
//! |--------|---------|
//! | 0 (no response) | yes |
//! | 408, 429 | yes |
//! | other 4xx | no |
//! | 5xx | yes |
//!
//! At most `max_retries` extra attempts, delayed `base * 2^n` and capped at
//! `max_delay_ms`. Endpoints listed in `non_retryable_endpoints` are never
//! retried.

#![warn(clippy::all)]
#![deny(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod client;
pub mod domain;
pub mod middleware;
pub mod ports;

pub use adapters::{
    NoAuthToken, NoCsrfMeta, RecordingNotifier, ReqwestTransport, StaticCsrfToken,
    TracingNotifier,
};
pub use client::ApiClient;
pub use domain::config::{ConfigError, MiddlewareConfig, RetryConfig};
pub use domain::failure::{ApiRequest, ApiResponse, HttpFailure};
pub use domain::messages::user_message;
pub use domain::retry_policy::{is_retryable_status, RetryDecision, RetryPolicy};
pub use domain::sanitize::{sanitize_input, sanitize_value};
pub use middleware::{ApiService, ChainPorts, MiddlewareStack};
pub use ports::{CsrfTokenSource, Notification, NotificationLevel, Notifier, TokenProvider};
