//! Response path: turn a raw failure into a user-facing `ApiError`.
//!
//! Sits outside the retry stage, so it only sees failures that survived
//! every retry. Transport and server failures raise a global notification;
//! client failures are returned silently for the calling effect to handle.

use crate::domain::failure::{ApiRequest, ApiResponse, HttpFailure};
use crate::domain::messages::{is_notifiable_status, user_message, SERVER_ERROR_TITLE};
use crate::ports::{Notification, Notifier};
use shared_types::ApiError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::warn;

/// Build the classified error for `failure`.
#[must_use]
pub fn classify_failure(failure: &HttpFailure, login_endpoint: &str) -> ApiError {
    ApiError::new(
        user_message(failure.status, &failure.url, login_endpoint),
        failure.status,
        failure.status_text.clone(),
        failure.url.clone(),
    )
}

fn log_security_status(failure: &HttpFailure) {
    match failure.status {
        401 => warn!(url = %failure.url, "Unauthorized, authentication required"),
        403 => warn!(url = %failure.url, "Access forbidden, possible CSRF rejection or missing permission"),
        413 => warn!(url = %failure.url, "Request entity too large"),
        429 => warn!(url = %failure.url, "Too many requests, rate limiting in effect"),
        _ => {}
    }
}

#[derive(Clone)]
pub struct ClassifyLayer {
    login_endpoint: Arc<str>,
    notifier: Arc<dyn Notifier>,
}

impl ClassifyLayer {
    pub fn new(login_endpoint: impl Into<Arc<str>>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            login_endpoint: login_endpoint.into(),
            notifier,
        }
    }
}

impl<S> Layer<S> for ClassifyLayer {
    type Service = ClassifyService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ClassifyService {
            inner,
            login_endpoint: Arc::clone(&self.login_endpoint),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

#[derive(Clone)]
pub struct ClassifyService<S> {
    inner: S,
    login_endpoint: Arc<str>,
    notifier: Arc<dyn Notifier>,
}

impl<S> Service<ApiRequest> for ClassifyService<S>
where
    S: Service<ApiRequest, Response = ApiResponse, Error = HttpFailure> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = ApiResponse;
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        let login_endpoint = Arc::clone(&self.login_endpoint);
        self.inner
            .poll_ready(cx)
            .map_err(|failure| classify_failure(&failure, &login_endpoint))
    }

    fn call(&mut self, req: ApiRequest) -> Self::Future {
        let mut inner = self.inner.clone();
        let login_endpoint = Arc::clone(&self.login_endpoint);
        let notifier = Arc::clone(&self.notifier);

        Box::pin(async move {
            match inner.call(req).await {
                Ok(response) => Ok(response),
                Err(failure) => {
                    log_security_status(&failure);
                    let api_error = classify_failure(&failure, &login_endpoint);
                    warn!(
                        status = api_error.status,
                        url = %api_error.url,
                        status_text = %api_error.status_text,
                        "API error: {}",
                        api_error.message
                    );
                    if is_notifiable_status(failure.status) {
                        notifier.notify(Notification::error(SERVER_ERROR_TITLE, &api_error.message));
                    }
                    Err(api_error)
                }
            }
        })
    }
}
