//! Typed REST client over the middleware chain.
//!
//! Builds requests against the configured base url, runs them through the
//! chain and unwraps the `{ data, success, message?, errors? }` envelope.

use crate::domain::failure::ApiRequest;
use crate::middleware::ApiService;
use bytes::Bytes;
use http::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use http::{Method, Request, Uri};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{ApiEnvelope, ApiError, PaginatedResponse};
use tower::{Service, ServiceExt};
use tracing::debug;

pub struct ApiClient {
    base_url: String,
    // BoxCloneService is Send but not Sync; each call works on a clone.
    service: Mutex<ApiService>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, service: ApiService) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service: Mutex::new(service),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<T, ApiError> {
        let bytes = self.send(Method::GET, endpoint, params, None).await?;
        unwrap_envelope(endpoint, &bytes)
    }

    pub async fn get_paginated<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<PaginatedResponse<T>, ApiError> {
        let bytes = self.send(Method::GET, endpoint, params, None).await?;
        let page: PaginatedResponse<T> = decode(endpoint, &bytes)?;
        if !page.success {
            return Err(envelope_failure(
                endpoint,
                page.message.unwrap_or_else(|| "Request failed".to_string()),
            ));
        }
        Ok(page)
    }

    /// Raw text body, for exports.
    pub async fn get_text(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<String, ApiError> {
        let bytes = self.send(Method::GET, endpoint, params, None).await?;
        String::from_utf8(bytes.to_vec()).map_err(|e| ApiError::decode(endpoint, e.to_string()))
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.with_body(Method::POST, endpoint, body).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.with_body(Method::PUT, endpoint, body).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.with_body(Method::PATCH, endpoint, body).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let bytes = self.send(Method::DELETE, endpoint, &[], None).await?;
        unwrap_envelope(endpoint, &bytes)
    }

    async fn with_body<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let json = serde_json::to_value(body)
            .map_err(|e| ApiError::new("Invalid request payload", 400, e.to_string(), endpoint))?;
        let bytes = self.send(method, endpoint, &[], Some(json)).await?;
        unwrap_envelope(endpoint, &bytes)
    }

    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(String, String)],
        body: Option<serde_json::Value>,
    ) -> Result<Bytes, ApiError> {
        let req = self.build_request(method, endpoint, params, body)?;
        debug!(method = %req.method(), uri = %req.uri(), "Sending request");

        let mut service = self.service.lock().clone();
        let response = service.ready().await?.call(req).await?;
        Ok(response.into_body())
    }

    fn build_request(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(String, String)],
        body: Option<serde_json::Value>,
    ) -> Result<ApiRequest, ApiError> {
        let invalid = |details: String| ApiError::new("Invalid request URL", 400, details, endpoint);

        let mut url = reqwest::Url::parse(&format!("{}{}", self.base_url, endpoint))
            .map_err(|e| invalid(e.to_string()))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        let uri: Uri = url.as_str().parse().map_err(|e: http::uri::InvalidUri| invalid(e.to_string()))?;

        Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .body(body)
            .map_err(|e| invalid(e.to_string()))
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, bytes: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|e| ApiError::decode(endpoint, e.to_string()))
}

fn unwrap_envelope<T: DeserializeOwned>(endpoint: &str, bytes: &[u8]) -> Result<T, ApiError> {
    let envelope: ApiEnvelope<T> = decode(endpoint, bytes)?;
    envelope
        .into_data()
        .map_err(|message| envelope_failure(endpoint, message))
}

fn envelope_failure(endpoint: &str, message: String) -> ApiError {
    ApiError::new(message, 200, "success: false", endpoint)
}
