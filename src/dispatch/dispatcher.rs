//! Request dispatch with stale-while-revalidate caching.
//!
//! # Responsibilities
//! - Derive the cache key and consult the cache store
//! - Resolve the route and build the handler request
//! - Serve hits immediately and refresh them in a detached task
//! - Compute misses synchronously and store a copy of the result
//!
//! # Design Decisions
//! - Cache faults never fail a request; they degrade to a miss / skipped write
//! - Only 2xx responses are stored
//! - Background refresh failures are logged and dropped; the stale entry stays
//! - No retries anywhere: one handler call per request (plus one per refresh)

use axum::http::Request;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::cache::{derive_cache_key, CacheKey, CacheStore};
use crate::handlers::not_found::not_found;
use crate::handlers::{HandlerError, HandlerRequest, HandlerResult, SharedHandler};
use crate::http::request::{request_id, resolve_token, SearchParams};
use crate::http::response::ApiResponse;
use crate::observability::metrics;
use crate::routing::Router;

/// A request that could not be answered.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

/// How the cache took part in a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Served from the cache; a refresh was scheduled.
    Hit,
    /// Computed by the handler; stored if successful.
    Miss,
    /// The request was not eligible for caching.
    Bypass,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "hit",
            CacheStatus::Miss => "miss",
            CacheStatus::Bypass => "bypass",
        }
    }
}

/// Outcome of a dispatched request.
#[derive(Debug)]
pub struct Dispatched {
    pub response: ApiResponse,
    pub cache: CacheStatus,
    /// The detached refresh task, present on cache hits. Dropping it does not cancel it.
    pub revalidation: Option<JoinHandle<()>>,
}

/// Routes requests to handlers through the response cache.
pub struct Dispatcher {
    router: Router<SharedHandler>,
    known_routes: Vec<String>,
    cache: Option<Arc<dyn CacheStore>>,
    static_token: Option<String>,
}

impl Dispatcher {
    /// Create a dispatcher. `cache: None` disables caching; `static_token` overrides
    /// any caller-supplied bearer token.
    pub fn new(
        router: Router<SharedHandler>,
        cache: Option<Arc<dyn CacheStore>>,
        static_token: Option<String>,
    ) -> Self {
        let known_routes = router.templates();
        Self {
            router,
            known_routes,
            cache,
            static_token,
        }
    }

    /// Answer one request. Only the request head is used.
    pub async fn dispatch<B>(&self, request: Request<B>) -> Result<Dispatched, DispatchError> {
        let (parts, _) = request.into_parts();
        let request_id = request_id(&parts.headers).to_string();

        let key = self
            .cache
            .as_ref()
            .and_then(|_| derive_cache_key(&parts.method, &parts.uri, &parts.headers));
        let cached = match &key {
            Some(key) => self.lookup(key).await,
            None => None,
        };

        let Some(matched) = self.router.match_route(&parts.method, parts.uri.path()) else {
            tracing::debug!(
                request_id = %request_id,
                method = %parts.method,
                path = %parts.uri.path(),
                "No route matched"
            );
            return Ok(Dispatched {
                response: not_found(&self.known_routes),
                cache: CacheStatus::Bypass,
                revalidation: None,
            });
        };

        let handler = Arc::clone(matched.handler);
        let handler_request = HandlerRequest {
            auth_token: resolve_token(self.static_token.as_deref(), &parts.headers),
            search_params: SearchParams::parse(parts.uri.query()),
            params: matched.params,
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
        };
        let target = key.zip(self.cache.clone());

        match cached {
            Some(response) => {
                tracing::debug!(request_id = %request_id, "Cache hit, scheduling revalidation");
                let revalidation = tokio::spawn(revalidate(handler, handler_request, target, request_id));
                Ok(Dispatched {
                    response,
                    cache: CacheStatus::Hit,
                    revalidation: Some(revalidation),
                })
            }
            None => {
                let cache = if target.is_some() {
                    CacheStatus::Miss
                } else {
                    CacheStatus::Bypass
                };
                let response = compute(handler, handler_request, target, &request_id).await?;
                Ok(Dispatched {
                    response,
                    cache,
                    revalidation: None,
                })
            }
        }
    }

    async fn lookup(&self, key: &CacheKey) -> Option<ApiResponse> {
        let cache = self.cache.as_ref()?;
        match cache.lookup(key).await {
            Ok(Some(response)) => {
                metrics::record_cache_event("hit");
                Some(response)
            }
            Ok(None) => {
                metrics::record_cache_event("miss");
                None
            }
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "Cache lookup failed, treating as miss");
                metrics::record_cache_event("lookup_error");
                None
            }
        }
    }
}

/// Run the handler and store a copy of a successful response.
async fn compute(
    handler: SharedHandler,
    request: HandlerRequest,
    target: Option<(CacheKey, Arc<dyn CacheStore>)>,
    request_id: &str,
) -> HandlerResult {
    let response = handler.call(request).await?;

    if let Some((key, cache)) = target {
        if response.status().is_success() {
            match cache.put(key.clone(), response.clone()).await {
                Ok(()) => metrics::record_cache_event("stored"),
                Err(e) => {
                    tracing::warn!(request_id = %request_id, key = %key, error = %e, "Cache write failed");
                    metrics::record_cache_event("store_error");
                }
            }
        }
    }

    Ok(response)
}

/// Detached refresh of a cache entry. Errors end here.
async fn revalidate(
    handler: SharedHandler,
    request: HandlerRequest,
    target: Option<(CacheKey, Arc<dyn CacheStore>)>,
    request_id: String,
) {
    match compute(handler, request, target, &request_id).await {
        Ok(response) => {
            tracing::debug!(request_id = %request_id, status = %response.status(), "Revalidated cache entry");
            metrics::record_revalidation("refreshed");
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Revalidation failed, keeping stale entry");
            metrics::record_revalidation("failed");
        }
    }
}
