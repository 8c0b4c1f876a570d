//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the façade's route table, upstream client and cache from config
//! - Wire up middleware (timeout, request ID, tracing, CORS fallback)
//! - Hand every request to the dispatcher
//! - Map dispatch failures to a 502 envelope
//! - Serve until the shutdown channel fires

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    set_header::SetResponseHeaderLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::cache::{CacheStore, MemoryCacheStore};
use crate::config::FacadeConfig;
use crate::dispatch::Dispatcher;
use crate::handlers::default_routes;
use crate::http::request::{request_id, request_id_layers};
use crate::http::response::{cors_headers, ApiResponse};
use crate::observability::metrics;
use crate::routing::PatternError;
use crate::upstream::{UpstreamClient, UpstreamError};

pub const UPSTREAM_FAILURE_MESSAGE: &str = "Upstream request failed";

/// Failures while assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("upstream client: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("route table: {0}")]
    Routes(#[from] PatternError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

/// HTTP server for the content façade.
pub struct HttpServer {
    router: Router,
    config: FacadeConfig,
}

impl HttpServer {
    /// Create a server with the default route table and, if enabled, an in-memory cache.
    pub fn new(config: FacadeConfig) -> Result<Self, ServerError> {
        let upstream = Arc::new(UpstreamClient::new(&config.upstream)?);
        let routes = default_routes(upstream)?;

        let cache: Option<Arc<dyn CacheStore>> = if config.cache.enabled {
            Some(Arc::new(MemoryCacheStore::new(config.cache.max_entries)))
        } else {
            None
        };

        let dispatcher = Dispatcher::new(routes, cache, config.upstream.token.clone());
        Ok(Self::with_dispatcher(config, Arc::new(dispatcher)))
    }

    /// Create a server around a prebuilt dispatcher.
    pub fn with_dispatcher(config: FacadeConfig, dispatcher: Arc<Dispatcher>) -> Self {
        let router = Self::build_router(&config, AppState { dispatcher });
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The CORS layers sit outside the timeout so middleware-generated responses
    /// (e.g. `408`) carry the same headers as dispatcher responses.
    #[allow(deprecated)]
    fn build_router(config: &FacadeConfig, state: AppState) -> Router {
        let (set_request_id, propagate_request_id) = request_id_layers();
        let [allow_origin, allow_headers, allow_methods] = cors_headers();

        Router::new().fallback(dispatch_handler).with_state(state).layer(
            ServiceBuilder::new()
                .layer(set_request_id)
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id)
                .layer(SetResponseHeaderLayer::if_not_present(allow_origin.0, allow_origin.1))
                .layer(SetResponseHeaderLayer::if_not_present(allow_headers.0, allow_headers.1))
                .layer(SetResponseHeaderLayer::if_not_present(allow_methods.0, allow_methods.1))
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
        )
    }

    /// Run the server on `listener` until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            cache_enabled = self.config.cache.enabled,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Single entry point: every method and path goes through the dispatcher.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let request_id = request_id(request.headers()).to_string();

    match state.dispatcher.dispatch(request).await {
        Ok(dispatched) => {
            let status = dispatched.response.status();
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = status.as_u16(),
                cache = dispatched.cache.as_str(),
                "Request completed"
            );
            metrics::record_request(&method, status.as_u16(), dispatched.cache.as_str(), start);
            dispatched.response.into_response()
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                path = %path,
                error = %e,
                "Request failed"
            );
            metrics::record_request(&method, StatusCode::BAD_GATEWAY.as_u16(), "error", start);

            let mut context = Map::new();
            context.insert("detail".to_string(), Value::String(e.to_string()));
            ApiResponse::error_with_context(StatusCode::BAD_GATEWAY, UPSTREAM_FAILURE_MESSAGE, context)
                .into_response()
        }
    }
}
