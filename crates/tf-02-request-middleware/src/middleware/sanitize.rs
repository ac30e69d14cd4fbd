//! Stage 2: recursive sanitization of the JSON body.

use crate::domain::failure::ApiRequest;
use crate::domain::sanitize::sanitize_value;
use std::task::{Context, Poll};
use tower::{Layer, Service};

#[derive(Debug, Clone, Copy, Default)]
pub struct SanitizeLayer;

impl<S> Layer<S> for SanitizeLayer {
    type Service = SanitizeService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SanitizeService { inner }
    }
}

#[derive(Debug, Clone)]
pub struct SanitizeService<S> {
    inner: S,
}

impl<S> Service<ApiRequest> for SanitizeService<S>
where
    S: Service<ApiRequest>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: ApiRequest) -> Self::Future {
        let req = req.map(|body| body.map(sanitize_value));
        self.inner.call(req)
    }
}
