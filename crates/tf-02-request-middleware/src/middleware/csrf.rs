//! Stage 3: anti-forgery token on state-changing requests.

use crate::domain::csrf::{generate_token, is_state_changing, CSRF_HEADER};
use crate::domain::failure::ApiRequest;
use crate::ports::CsrfTokenSource;
use http::header::{HeaderName, HeaderValue};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::warn;

#[derive(Clone)]
pub struct CsrfLayer {
    source: Arc<dyn CsrfTokenSource>,
}

impl CsrfLayer {
    pub fn new(source: Arc<dyn CsrfTokenSource>) -> Self {
        Self { source }
    }
}

impl<S> Layer<S> for CsrfLayer {
    type Service = CsrfService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CsrfService {
            inner,
            source: Arc::clone(&self.source),
        }
    }
}

#[derive(Clone)]
pub struct CsrfService<S> {
    inner: S,
    source: Arc<dyn CsrfTokenSource>,
}

impl<S> Service<ApiRequest> for CsrfService<S>
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
        if is_state_changing(req.method()) {
            let token = self.source.meta_token().unwrap_or_else(generate_token);
            match HeaderValue::from_str(&token) {
                Ok(value) => {
                    req.headers_mut()
                        .insert(HeaderName::from_static("x-csrf-token"), value);
                }
                Err(_) => warn!(header = CSRF_HEADER, "CSRF token is not a valid header value"),
            }
        }
        self.inner.call(req)
    }
}
