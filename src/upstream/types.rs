//! Upstream response and error types.

use axum::http::header::HeaderValue;
use axum::http::{HeaderMap, StatusCode};
use bytes::Bytes;
use thiserror::Error;

use crate::http::response::{ApiResponse, Payload};

/// Errors that can occur while calling the upstream content API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Base URL and route path did not form a valid URL.
    #[error("invalid upstream URL '{url}': {reason}")]
    Url { url: String, reason: String },

    /// Connection or transfer failure.
    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// No complete response within the deadline.
    #[error("upstream timeout after {0} seconds")]
    Timeout(u64),

    /// Upstream answered with a server error.
    #[error("upstream returned {0}")]
    Status(StatusCode),
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// A fully read upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl UpstreamResponse {
    /// Wrap in the standard envelope, keeping status and body. JSON is assumed when the
    /// upstream did not say.
    pub fn into_envelope(self) -> ApiResponse {
        let content_type = self
            .content_type
            .unwrap_or_else(|| HeaderValue::from_static("application/json"));
        ApiResponse::build(
            Payload::Raw {
                body: self.body,
                content_type: Some(content_type),
            },
            HeaderMap::new(),
            self.status,
        )
    }
}
