//! Route handlers and the default route table.
//!
//! # Data Flow
//! ```text
//! Dispatcher
//!     → HandlerRequest { head, search_params, params, auth_token }
//!     → Handler::call
//!     → ApiResponse (or HandlerError)
//! ```
//!
//! # Design Decisions
//! - Handlers return fully buffered responses so the dispatcher can cache a copy
//! - Closures `Fn(HandlerRequest) -> impl Future` are handlers too
//! - The route table is built once at startup; `OPTIONS *` precedes the `GET *` catch-all

pub mod content;
pub mod home;
pub mod not_found;
pub mod preflight;

use axum::http::{HeaderMap, Method, Uri};
use futures_util::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

use crate::http::request::SearchParams;
use crate::http::response::ApiResponse;
use crate::routing::{Params, PatternError, Router};
use crate::upstream::{UpstreamClient, UpstreamError};

pub use content::ContentHandler;
pub use home::HomeHandler;
pub use not_found::NotFoundHandler;
pub use preflight::PreflightHandler;

/// Everything a handler gets to see about one request.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub search_params: SearchParams,
    pub params: Params,
    /// Upstream credential: the static token, else the caller's bearer token.
    pub auth_token: Option<String>,
}

/// Errors a handler can raise instead of producing a response.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

pub type HandlerResult = Result<ApiResponse, HandlerError>;

/// Turns a parsed request into a response.
pub trait Handler: Send + Sync {
    fn call(&self, request: HandlerRequest) -> BoxFuture<'_, HandlerResult>;
}

impl<F, Fut> Handler for F
where
    F: Fn(HandlerRequest) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, request: HandlerRequest) -> BoxFuture<'_, HandlerResult> {
        Box::pin(self(request))
    }
}

/// Handler shared between the route table and background tasks.
pub type SharedHandler = Arc<dyn Handler>;

/// Content routes: (public template, upstream path template).
pub const CONTENT_ROUTES: [(&str, &str); 4] = [
    ("/v1/page/:pageId", "/page/:pageId"),
    ("/v1/table/:pageId", "/table/:pageId"),
    ("/v1/user/:userId", "/user/:userId"),
    ("/v1/search", "/search"),
];

/// Build the façade's route table.
///
/// Order matters: first match wins, so the preflight route must come before the
/// catch-all, and the catch-all last.
pub fn default_routes(upstream: Arc<UpstreamClient>) -> Result<Router<SharedHandler>, PatternError> {
    let mut router: Router<SharedHandler> = Router::new();

    router.get("/", Arc::new(HomeHandler))?;
    router.options("*", Arc::new(PreflightHandler))?;
    for (template, upstream_path) in CONTENT_ROUTES {
        router.get(template, Arc::new(ContentHandler::new(upstream.clone(), upstream_path)?))?;
    }

    let known = router.templates();
    router.get("*", Arc::new(NotFoundHandler::new(known)))?;

    Ok(router)
}
