//! Response path: transparent retry with exponential backoff.
//!
//! Failures that the policy marks retryable are retried inside this stage
//! and never reach the caller unless every retry is exhausted.

use crate::domain::failure::{clone_request, ApiRequest, ApiResponse, HttpFailure};
use crate::domain::retry_policy::{RetryDecision, RetryPolicy};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service, ServiceExt};
use tracing::{debug, warn};

#[derive(Clone)]
pub struct RetryLayer {
    policy: Arc<RetryPolicy>,
}

impl RetryLayer {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }
}

impl<S> Layer<S> for RetryLayer {
    type Service = RetryService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RetryService {
            inner,
            policy: Arc::clone(&self.policy),
        }
    }
}

#[derive(Clone)]
pub struct RetryService<S> {
    inner: S,
    policy: Arc<RetryPolicy>,
}

impl<S> Service<ApiRequest> for RetryService<S>
where
    S: Service<ApiRequest, Response = ApiResponse, Error = HttpFailure> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = ApiResponse;
    type Error = HttpFailure;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: ApiRequest) -> Self::Future {
        let mut inner = self.inner.clone();
        let policy = Arc::clone(&self.policy);

        Box::pin(async move {
            let url = req.uri().to_string();
            let mut attempt: u32 = 0;
            loop {
                let result = inner.ready().await?.call(clone_request(&req)).await;
                let failure = match result {
                    Ok(response) => {
                        if attempt > 0 {
                            debug!(url = %url, retries = attempt, "Request succeeded after retry");
                        }
                        return Ok(response);
                    }
                    Err(failure) => failure,
                };

                match policy.decide(attempt, failure.status, &url) {
                    RetryDecision::Retry(delay) => {
                        warn!(
                            url = %url,
                            status = failure.status,
                            attempt = attempt + 1,
                            delay_ms = delay.as_millis() as u64,
                            "Retrying request"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    RetryDecision::GiveUp => return Err(failure),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Request, Response};
    use parking_lot::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;
    use tower::service_fn;

    /// Transport that fails with `statuses` in turn, then succeeds.
    fn scripted(
        statuses: Vec<u16>,
        calls: Arc<Mutex<Vec<Instant>>>,
    ) -> impl Service<ApiRequest, Response = ApiResponse, Error = HttpFailure, Future = impl Send>
           + Clone
           + Send
           + 'static {
        let statuses = Arc::new(statuses);
        service_fn(move |req: ApiRequest| {
            let statuses = Arc::clone(&statuses);
            let calls = Arc::clone(&calls);
            async move {
                let n = {
                    let mut calls = calls.lock();
                    calls.push(Instant::now());
                    calls.len() - 1
                };
                match statuses.get(n) {
                    Some(status) => Err(HttpFailure::new(*status, "scripted", req.uri().to_string())),
                    None => Ok(Response::new(bytes::Bytes::from_static(b"{}"))),
                }
            }
        })
    }

    fn gaps(calls: &[Instant]) -> Vec<Duration> {
        calls.windows(2).map(|w| w[1] - w[0]).collect()
    }

    fn request(path: &str) -> ApiRequest {
        Request::get(path).body(None).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_error_retried_three_times() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let svc = RetryLayer::new(RetryPolicy::default())
            .layer(scripted(vec![500; 10], Arc::clone(&calls)));

        let err = svc.oneshot(request("/projects")).await.unwrap_err();
        assert_eq!(err.status, 500);

        let calls = calls.lock();
        assert_eq!(calls.len(), 4);
        assert_eq!(
            gaps(&calls),
            vec![
                Duration::from_millis(1000),
                Duration::from_millis(2000),
                Duration::from_millis(4000),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_never_retried() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let svc = RetryLayer::new(RetryPolicy::default())
            .layer(scripted(vec![404], Arc::clone(&calls)));

        let err = svc.oneshot(request("/projects/1")).await.unwrap_err();
        assert_eq!(err.status, 404);
        assert_eq!(calls.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_retried_then_succeeds() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let svc = RetryLayer::new(RetryPolicy::default())
            .layer(scripted(vec![429, 503], Arc::clone(&calls)));

        let response = svc.oneshot(request("/tasks")).await;
        assert!(response.is_ok());
        assert_eq!(calls.lock().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_not_retried() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let svc = RetryLayer::new(RetryPolicy::default())
            .layer(scripted(vec![503], Arc::clone(&calls)));

        let err = svc.oneshot(request("/auth/logout")).await.unwrap_err();
        assert_eq!(err.status, 503);
        assert_eq!(calls.lock().len(), 1);
    }
}
