//! HTTP transport backed by `reqwest`.
//!
//! Innermost service of the chain. Any non-2xx status becomes an
//! `HttpFailure` carrying that status; a request that never got a response
//! becomes status 0.

use crate::domain::failure::{ApiRequest, ApiResponse, HttpFailure};
use http::Response;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tower::Service;
use tracing::debug;

#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport with a per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Service<ApiRequest> for ReqwestTransport {
    type Response = ApiResponse;
    type Error = HttpFailure;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ApiRequest) -> Self::Future {
        let client = self.client.clone();

        Box::pin(async move {
            let url = req.uri().to_string();
            let (parts, body) = req.into_parts();

            let mut builder = client
                .request(parts.method, url.as_str())
                .headers(parts.headers);
            if let Some(json) = body {
                builder = builder.json(&json);
            }

            let response = builder.send().await.map_err(|e| {
                let details = if e.is_timeout() {
                    "timeout".to_string()
                } else {
                    e.to_string()
                };
                HttpFailure::connection(details, url.clone())
            })?;

            let status = response.status();
            debug!(url = %url, status = status.as_u16(), "Response received");

            if !status.is_success() {
                return Err(HttpFailure::new(
                    status.as_u16(),
                    status.canonical_reason().unwrap_or(""),
                    url,
                ));
            }

            let headers = response.headers().clone();
            let bytes = response
                .bytes()
                .await
                .map_err(|e| HttpFailure::connection(e.to_string(), url.clone()))?;

            let mut out = Response::new(bytes);
            *out.status_mut() = status;
            *out.headers_mut() = headers;
            Ok(out)
        })
    }
}
