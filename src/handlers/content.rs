//! Content routes (page, table, user, search) backed by the upstream API.

use futures_util::future::BoxFuture;
use std::sync::Arc;

use crate::handlers::{Handler, HandlerRequest, HandlerResult};
use crate::routing::{PatternError, RoutePattern};
use crate::upstream::UpstreamClient;

/// Forwards a request to one upstream resource.
///
/// The upstream path is a template in route syntax, rendered with the inbound
/// route params (`/page/:pageId` + `{pageId: "abc"}` → `/page/abc`).
#[derive(Debug, Clone)]
pub struct ContentHandler {
    upstream: Arc<UpstreamClient>,
    resource: RoutePattern,
}

impl ContentHandler {
    pub fn new(upstream: Arc<UpstreamClient>, resource: &str) -> Result<Self, PatternError> {
        Ok(Self {
            upstream,
            resource: RoutePattern::parse(resource)?,
        })
    }

}

impl Handler for ContentHandler {
    fn call(&self, request: HandlerRequest) -> BoxFuture<'_, HandlerResult> {
        Box::pin(async move {
            let path = self.resource.render(&request.params);
            let response = self
                .upstream
                .fetch(&path, request.uri.query(), request.auth_token.as_deref())
                .await?;
            Ok(response.into_envelope())
        })
    }
}
