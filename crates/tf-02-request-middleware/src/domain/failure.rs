//! Request/response types flowing through the chain and the raw failure
//! shape seen before classification.

use bytes::Bytes;
use http::{Request, Response};
use serde_json::Value;
use thiserror::Error;

/// Outgoing request. The body is JSON so the sanitizer can walk it.
pub type ApiRequest = Request<Option<Value>>;

/// Raw response from the transport.
pub type ApiResponse = Response<Bytes>;

/// An unclassified failure: a non-2xx status, or status 0 when no response
/// arrived at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("HTTP {status} {status_text} ({url})")]
pub struct HttpFailure {
    pub status: u16,
    pub status_text: String,
    pub url: String,
}

impl HttpFailure {
    pub fn new(status: u16, status_text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            url: url.into(),
        }
    }

    /// No response received.
    pub fn connection(details: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(0, details, url)
    }
}

/// Rebuild a request for another attempt. `http::Request` is not `Clone`.
pub fn clone_request(req: &ApiRequest) -> ApiRequest {
    let mut builder = Request::builder()
        .method(req.method().clone())
        .uri(req.uri().clone())
        .version(req.version());
    if let Some(headers) = builder.headers_mut() {
        headers.extend(req.headers().iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    match builder.body(req.body().clone()) {
        Ok(cloned) => cloned,
        // Parts were taken from a valid request; keep the body at least.
        Err(_) => Request::new(req.body().clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_clone_request_keeps_parts() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("http://localhost:3000/api/tasks")
            .header("x-trace", "1")
            .body(Some(serde_json::json!({"title": "a"})))
            .unwrap();
        let copy = clone_request(&req);
        assert_eq!(copy.method(), Method::POST);
        assert_eq!(copy.uri(), req.uri());
        assert_eq!(copy.headers()["x-trace"], "1");
        assert_eq!(copy.body(), req.body());
    }

    #[test]
    fn test_failure_display() {
        let f = HttpFailure::new(503, "Service Unavailable", "/tasks");
        assert_eq!(f.to_string(), "HTTP 503 Service Unavailable (/tasks)");
    }
}
