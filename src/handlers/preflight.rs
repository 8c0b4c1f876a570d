//! CORS preflight (`OPTIONS *`).

use axum::http::StatusCode;
use futures_util::future::{self, BoxFuture};

use crate::handlers::{Handler, HandlerRequest, HandlerResult};
use crate::http::response::ApiResponse;

/// Answers every preflight with an empty 204 carrying the CORS headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreflightHandler;

impl Handler for PreflightHandler {
    fn call(&self, _request: HandlerRequest) -> BoxFuture<'_, HandlerResult> {
        Box::pin(future::ready(Ok(ApiResponse::empty(StatusCode::NO_CONTENT))))
    }
}
