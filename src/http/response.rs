//! Response envelope.
//!
//! # Responsibilities
//! - Serialize handler payloads (JSON unless the body is already raw bytes)
//! - Merge CORS headers with handler-specified headers
//! - Carry status, headers and a fully buffered body
//!
//! # Design Decisions
//! - Bodies are `Bytes`, so cloning a response for the cache never consumes the caller's copy
//! - CORS headers are applied last; a handler cannot drop or override them
//! - Error payloads share one shape: `{"error": <message>, ...context}`

use axum::body::Body;
use axum::http::header::{
    HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde_json::{Map, Value};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_HEADERS: &str = "*";
pub const ALLOW_METHODS: &str = "GET, HEAD, POST, OPTIONS";

const JSON: &str = "application/json";

/// The CORS triple present on every response.
pub fn cors_headers() -> [(HeaderName, HeaderValue); 3] {
    [
        (ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static(ALLOW_ORIGIN)),
        (ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS)),
        (ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS)),
    ]
}

/// What a handler wants to send.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Serialized as `application/json`.
    Json(Value),
    /// Sent as-is; content type only set when given.
    Raw {
        body: Bytes,
        content_type: Option<HeaderValue>,
    },
    /// No body.
    Empty,
}

/// A complete, buffered HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl ApiResponse {
    /// Wrap `payload` with the standard headers and `status`.
    pub fn build(payload: Payload, extra_headers: HeaderMap, status: StatusCode) -> Self {
        let mut headers = HeaderMap::new();
        let body = match payload {
            Payload::Json(value) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
                Bytes::from(value.to_string())
            }
            Payload::Raw { body, content_type } => {
                if let Some(content_type) = content_type {
                    headers.insert(CONTENT_TYPE, content_type);
                }
                body
            }
            Payload::Empty => Bytes::new(),
        };

        headers.extend(extra_headers);
        for (name, value) in cors_headers() {
            headers.insert(name, value);
        }

        Self {
            status,
            headers,
            body,
        }
    }

    /// `200 OK` JSON response.
    pub fn json(value: Value) -> Self {
        Self::build(Payload::Json(value), HeaderMap::new(), StatusCode::OK)
    }

    /// Raw body with an explicit content type.
    pub fn raw(body: impl Into<Bytes>, content_type: &'static str, status: StatusCode) -> Self {
        Self::build(
            Payload::Raw {
                body: body.into(),
                content_type: Some(HeaderValue::from_static(content_type)),
            },
            HeaderMap::new(),
            status,
        )
    }

    /// Bodiless response, e.g. `204 No Content`.
    pub fn empty(status: StatusCode) -> Self {
        Self::build(Payload::Empty, HeaderMap::new(), status)
    }

    /// `{"error": message}`.
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self::error_with_context(status, message, Map::new())
    }

    /// `{"error": message, ...context}`. A context key named `error` is ignored.
    pub fn error_with_context(
        status: StatusCode,
        message: impl Into<String>,
        context: Map<String, Value>,
    ) -> Self {
        let mut body = context;
        body.insert("error".to_string(), Value::String(message.into()));
        Self::build(Payload::Json(Value::Object(body)), HeaderMap::new(), status)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Parse the body as JSON.
    pub fn body_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assert_cors(response: &ApiResponse) {
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-headers"], "*");
        assert_eq!(
            headers["access-control-allow-methods"],
            "GET, HEAD, POST, OPTIONS"
        );
    }

    #[test]
    fn test_json_payload() {
        let response = ApiResponse::json(json!({"id": "abc"}));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(response.body_json().unwrap(), json!({"id": "abc"}));
        assert_cors(&response);
    }

    #[test]
    fn test_extra_headers_merge_but_cors_wins() {
        let mut extra = HeaderMap::new();
        extra.insert("cache-control", HeaderValue::from_static("public, max-age=60"));
        extra.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("https://x.test"));

        let response = ApiResponse::build(Payload::Json(json!([])), extra, StatusCode::CREATED);
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["cache-control"], "public, max-age=60");
        assert_cors(&response);
    }

    #[test]
    fn test_raw_and_empty_payloads() {
        let html = ApiResponse::raw("<h1>hi</h1>", "text/html", StatusCode::OK);
        assert_eq!(html.headers()[CONTENT_TYPE], "text/html");
        assert_eq!(html.body().as_ref(), b"<h1>hi</h1>");
        assert_cors(&html);

        let empty = ApiResponse::empty(StatusCode::NO_CONTENT);
        assert!(empty.body().is_empty());
        assert!(empty.headers().get(CONTENT_TYPE).is_none());
        assert_cors(&empty);
    }

    #[test]
    fn test_error_shape() {
        let mut context = Map::new();
        context.insert("routes".into(), json!(["/"]));
        context.insert("error".into(), json!("overridden"));

        let response =
            ApiResponse::error_with_context(StatusCode::NOT_FOUND, "Route not found!", context);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.body_json().unwrap(),
            json!({"error": "Route not found!", "routes": ["/"]})
        );
    }

    #[tokio::test]
    async fn test_into_response_keeps_parts() {
        let response = ApiResponse::error(StatusCode::BAD_GATEWAY, "boom").into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.as_ref(), br#"{"error":"boom"}"#);
    }
}
