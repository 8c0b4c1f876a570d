//! Cache key derivation.
//!
//! A key is produced only for request shapes whose response is safe to share
//! between callers. Everything else yields `None` and is never stored.

use axum::http::header::{AUTHORIZATION, CACHE_CONTROL, PRAGMA};
use axum::http::{HeaderMap, Method, Uri};
use std::fmt;

use crate::http::request::SearchParams;

/// Canonical identity of a cacheable request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the key for a request, or `None` if it must not be cached.
///
/// Only `GET` requests qualify. Client cache bypass (`Pragma: no-cache`,
/// `Cache-Control: no-cache | no-store`) and per-caller credentials
/// (`Authorization`) disqualify a request. Query pairs are sorted, so their
/// order does not split the cache.
pub fn derive_cache_key(method: &Method, uri: &Uri, headers: &HeaderMap) -> Option<CacheKey> {
    if *method != Method::GET {
        return None;
    }
    if headers.contains_key(AUTHORIZATION) || bypasses_cache(headers) {
        return None;
    }

    let query = SearchParams::parse(uri.query()).canonical();
    let key = if query.is_empty() {
        format!("{} {}", method, uri.path())
    } else {
        format!("{} {}?{}", method, uri.path(), query)
    };
    Some(CacheKey(key))
}

fn bypasses_cache(headers: &HeaderMap) -> bool {
    let pragma_no_cache = headers
        .get_all(PRAGMA)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.trim().eq_ignore_ascii_case("no-cache"));

    pragma_no_cache
        || headers
            .get_all(CACHE_CONTROL)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .map(|directive| directive.split('=').next().unwrap_or_default().trim())
            .any(|name| name.eq_ignore_ascii_case("no-cache") || name.eq_ignore_ascii_case("no-store"))
}
