//! Upstream content API client with timeout and error handling.
//!
//! # Responsibilities
//! - Resolve route paths against the configured base URL
//! - Forward the query string verbatim, plus the bearer credential
//! - Buffer the response body so it can be cached and returned
//! - Classify transport failures, timeouts and 5xx as errors

use axum::http::header::CONTENT_TYPE;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

use crate::config::UpstreamConfig;
use crate::routing::is_dot_segment;
use crate::upstream::types::{UpstreamError, UpstreamResponse, UpstreamResult};

/// HTTP client bound to one upstream base URL.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_duration: Duration,
}

impl UpstreamClient {
    /// Build a client from configuration.
    pub fn new(config: &UpstreamConfig) -> UpstreamResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| UpstreamError::Url {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("content-edge/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            timeout_duration: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Join `path` onto the base URL, keeping the base's own path prefix.
    ///
    /// `path` is expected in wire form (already percent-encoded). Dot segments are
    /// refused, so the result always stays below the base path.
    pub fn resolve(&self, path: &str, query: Option<&str>) -> UpstreamResult<Url> {
        if path.split('/').any(is_dot_segment) {
            return Err(UpstreamError::Url {
                url: path.to_string(),
                reason: "dot segments are not allowed".to_string(),
            });
        }

        let raw = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = Url::parse(&raw).map_err(|e| UpstreamError::Url {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        url.set_query(query.filter(|q| !q.is_empty()));
        Ok(url)
    }

    /// GET `path` from the upstream.
    pub async fn fetch(
        &self,
        path: &str,
        query: Option<&str>,
        token: Option<&str>,
    ) -> UpstreamResult<UpstreamResponse> {
        let url = self.resolve(path, query)?;
        let mut request = self.http.get(url.clone());
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let exchange = async move {
            let response = request.send().await?;
            let status = response.status();
            let content_type = response.headers().get(CONTENT_TYPE).cloned();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(UpstreamResponse {
                status,
                content_type,
                body,
            })
        };

        let response = match timeout(self.timeout_duration, exchange).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(url = %url, "Upstream timeout");
                return Err(UpstreamError::Timeout(self.timeout_duration.as_secs()));
            }
        };

        tracing::debug!(url = %url, status = %response.status, "Upstream responded");

        if response.status.is_server_error() {
            return Err(UpstreamError::Status(response.status));
        }
        Ok(response)
    }
}
