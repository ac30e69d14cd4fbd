//! Bearer token from the current session.

use crate::domain::failure::ApiRequest;
use crate::ports::TokenProvider;
use http::header::{HeaderValue, AUTHORIZATION};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::warn;

#[derive(Clone)]
pub struct AuthTokenLayer {
    provider: Arc<dyn TokenProvider>,
}

impl AuthTokenLayer {
    pub fn new(provider: Arc<dyn TokenProvider>) -> Self {
        Self { provider }
    }
}

impl<S> Layer<S> for AuthTokenLayer {
    type Service = AuthTokenService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthTokenService {
            inner,
            provider: Arc::clone(&self.provider),
        }
    }
}

#[derive(Clone)]
pub struct AuthTokenService<S> {
    inner: S,
    provider: Arc<dyn TokenProvider>,
}

impl<S> Service<ApiRequest> for AuthTokenService<S>
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
        if !req.headers().contains_key(AUTHORIZATION) {
            if let Some(token) = self.provider.bearer_token() {
                match HeaderValue::from_str(&format!("Bearer {token}")) {
                    Ok(value) => {
                        req.headers_mut().insert(AUTHORIZATION, value);
                    }
                    Err(_) => warn!("Session token is not a valid header value"),
                }
            }
        }
        self.inner.call(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::NoAuthToken;
    use http::{HeaderMap, Request};
    use std::convert::Infallible;
    use tower::{service_fn, ServiceExt};

    struct Fixed;

    impl TokenProvider for Fixed {
        fn bearer_token(&self) -> Option<String> {
            Some("abc.def.ghi".to_string())
        }
    }

    async fn headers_with(provider: Arc<dyn TokenProvider>) -> HeaderMap {
        let svc = AuthTokenLayer::new(provider).layer(service_fn(|req: ApiRequest| async move {
            Ok::<_, Infallible>(req.headers().clone())
        }));
        svc.oneshot(Request::get("/tasks").body(None).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_bearer_attached() {
        let headers = headers_with(Arc::new(Fixed)).await;
        assert_eq!(headers[AUTHORIZATION], "Bearer abc.def.ghi");
    }

    #[tokio::test]
    async fn test_anonymous_request() {
        let headers = headers_with(Arc::new(NoAuthToken)).await;
        assert!(headers.get(AUTHORIZATION).is_none());
    }
}
