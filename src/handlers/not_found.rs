//! Fallback for paths no other route claims.

use axum::http::StatusCode;
use futures_util::future::{self, BoxFuture};
use serde_json::{Map, Value};

use crate::handlers::{Handler, HandlerRequest, HandlerResult};
use crate::http::response::ApiResponse;

pub const NOT_FOUND_MESSAGE: &str = "Route not found!";

/// `404 {"error": "Route not found!", "routes": [...]}`.
pub fn not_found(routes: &[String]) -> ApiResponse {
    let mut context = Map::new();
    context.insert(
        "routes".to_string(),
        Value::Array(routes.iter().cloned().map(Value::String).collect()),
    );
    ApiResponse::error_with_context(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE, context)
}

/// Catch-all handler listing the known route templates.
#[derive(Debug, Clone)]
pub struct NotFoundHandler {
    routes: Vec<String>,
}

impl NotFoundHandler {
    pub fn new(routes: Vec<String>) -> Self {
        Self { routes }
    }
}

impl Handler for NotFoundHandler {
    fn call(&self, _request: HandlerRequest) -> BoxFuture<'_, HandlerResult> {
        Box::pin(future::ready(Ok(not_found(&self.routes))))
    }
}
