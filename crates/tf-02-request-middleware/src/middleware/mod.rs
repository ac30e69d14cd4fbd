//! Middleware chain around every network call.
//!
//! Request path, outermost first:
//!
//! ```text
//! AuthToken → SecurityHeaders → Sanitize → Csrf → Classify → Retry → Transport
//! ```
//!
//! | Stage | Direction | Effect |
//! |-------|-----------|--------|
//! | AuthToken | request | `Authorization: Bearer` when signed in |
//! | SecurityHeaders | request | five fixed hardening headers |
//! | Sanitize | request | strips markup and script patterns from JSON strings |
//! | Csrf | request | `X-CSRF-TOKEN` on POST/PUT/PATCH/DELETE |
//! | Classify | response | `HttpFailure` → `ApiError`, notifies on 0/5xx |
//! | Retry | response | exponential backoff for retryable failures |

pub mod auth;
pub mod classify;
pub mod csrf;
pub mod retry;
pub mod sanitize;
pub mod security_headers;

pub use auth::AuthTokenLayer;
pub use classify::{classify_failure, ClassifyLayer};
pub use csrf::CsrfLayer;
pub use retry::RetryLayer;
pub use sanitize::SanitizeLayer;
pub use security_headers::{SecurityHeadersLayer, SECURITY_HEADERS};

use crate::domain::config::MiddlewareConfig;
use crate::domain::failure::{ApiRequest, ApiResponse, HttpFailure};
use crate::domain::retry_policy::RetryPolicy;
use crate::ports::{CsrfTokenSource, Notifier, TokenProvider};
use shared_types::ApiError;
use std::sync::Arc;
use tower::util::BoxCloneService;
use tower::{Service, ServiceBuilder};

/// Fully assembled chain.
pub type ApiService = BoxCloneService<ApiRequest, ApiResponse, ApiError>;

/// Host collaborators the chain needs.
#[derive(Clone)]
pub struct ChainPorts {
    pub notifier: Arc<dyn Notifier>,
    pub csrf_source: Arc<dyn CsrfTokenSource>,
    pub token_provider: Arc<dyn TokenProvider>,
}

/// Middleware stack builder.
pub struct MiddlewareStack {
    pub auth: AuthTokenLayer,
    pub security_headers: SecurityHeadersLayer,
    pub sanitize: SanitizeLayer,
    pub csrf: CsrfLayer,
    pub classify: ClassifyLayer,
    pub retry: RetryLayer,
}

impl MiddlewareStack {
    /// Create the stack from config and host ports.
    pub fn from_config(config: &MiddlewareConfig, ports: ChainPorts) -> Self {
        Self {
            auth: AuthTokenLayer::new(ports.token_provider),
            security_headers: SecurityHeadersLayer,
            sanitize: SanitizeLayer,
            csrf: CsrfLayer::new(ports.csrf_source),
            classify: ClassifyLayer::new(config.login_endpoint.as_str(), ports.notifier),
            retry: RetryLayer::new(RetryPolicy::new(config.retry.clone())),
        }
    }

    /// Wrap `transport` in every stage.
    pub fn service<T>(self, transport: T) -> ApiService
    where
        T: Service<ApiRequest, Response = ApiResponse, Error = HttpFailure>
            + Clone
            + Send
            + 'static,
        T::Future: Send + 'static,
    {
        let svc = ServiceBuilder::new()
            .layer(self.auth)
            .layer(self.security_headers)
            .layer(self.sanitize)
            .layer(self.csrf)
            .layer(self.classify)
            .layer(self.retry)
            .service(transport);
        BoxCloneService::new(svc)
    }
}
