//! # API Response Envelope
//!
//! Every REST response is wrapped as `{ data, success, message?, errors? }`.
//! Paginated responses additionally carry
//! `pagination: { page, limit, total, totalPages }`.

use serde::{Deserialize, Serialize};

/// Standard response wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl<T> ApiEnvelope<T> {
    /// Successful envelope around `data`.
    pub fn ok(data: T) -> Self {
        Self {
            data,
            success: true,
            message: None,
            errors: Vec::new(),
        }
    }

    /// Unwrap the payload, or return the server-provided message when the
    /// envelope reports `success: false`.
    pub fn into_data(self) -> Result<T, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self
                .message
                .or_else(|| self.errors.first().cloned())
                .unwrap_or_else(|| "Request failed".to_string()))
        }
    }
}

/// Pagination block of a paginated response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u32,
    pub total_pages: u32,
}

impl PaginationMeta {
    /// Whether pages remain after this one.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Paginated list response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: u32, limit: u32, total: u32) -> Self {
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            data,
            success: true,
            message: None,
            pagination: PaginationMeta {
                page,
                limit,
                total,
                total_pages,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_failure_message() {
        let env: ApiEnvelope<Option<u32>> = serde_json::from_str(
            r#"{"data": null, "success": false, "message": "Project not found"}"#,
        )
        .unwrap();
        assert_eq!(env.into_data(), Err("Project not found".to_string()));
    }

    #[test]
    fn test_envelope_failure_falls_back_to_errors() {
        let env: ApiEnvelope<Option<u32>> = serde_json::from_str(
            r#"{"data": null, "success": false, "errors": ["name is required"]}"#,
        )
        .unwrap();
        assert_eq!(env.into_data(), Err("name is required".to_string()));
    }

    #[test]
    fn test_paginated_wire_shape() {
        let resp: PaginatedResponse<u32> = serde_json::from_str(
            r#"{"data": [1, 2], "success": true,
                "pagination": {"page": 1, "limit": 2, "total": 5, "totalPages": 3}}"#,
        )
        .unwrap();
        assert_eq!(resp.data, vec![1, 2]);
        assert!(resp.pagination.has_more());
    }

    #[test]
    fn test_paginated_total_pages() {
        let resp = PaginatedResponse::new(vec![1u32], 3, 12, 25);
        assert_eq!(resp.pagination.total_pages, 3);
        assert!(!resp.pagination.has_more());
    }
}
