//! Stage 1: standard security headers on every request.

use crate::domain::failure::ApiRequest;
use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Headers set on every outgoing request, overwriting any existing value.
pub const SECURITY_HEADERS: [(&str, &str); 5] = [
    ("x-requested-with", "XMLHttpRequest"),
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("x-xss-protection", "1; mode=block"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
];

pub fn apply_security_headers(headers: &mut HeaderMap) {
    for (name, value) in SECURITY_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityHeadersLayer;

impl<S> Layer<S> for SecurityHeadersLayer {
    type Service = SecurityHeadersService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SecurityHeadersService { inner }
    }
}

#[derive(Debug, Clone)]
pub struct SecurityHeadersService<S> {
    inner: S,
}

impl<S> Service<ApiRequest> for SecurityHeadersService<S>
where
    S: Service<ApiRequest>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: ApiRequest) -> Self::Future {
        apply_security_headers(req.headers_mut());
        self.inner.call(req)
    }
}
