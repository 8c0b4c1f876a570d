//! Response cache store.

use dashmap::DashMap;
use futures_util::future::BoxFuture;
use std::sync::Arc;
use thiserror::Error;

use crate::cache::key::CacheKey;
use crate::http::response::ApiResponse;
use crate::observability::metrics;

/// Failures of the cache store. Callers treat all of them as a miss / no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The store could not be reached.
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    /// The store refused a new key.
    #[error("cache full ({0} entries)")]
    Full(usize),
}

/// Key-value store for response snapshots.
///
/// Writes replace any existing entry for the key. Expiry and eviction belong to
/// the implementation.
pub trait CacheStore: Send + Sync {
    /// Fetch the stored response for `key`.
    fn lookup<'a>(&'a self, key: &'a CacheKey)
        -> BoxFuture<'a, Result<Option<ApiResponse>, CacheError>>;

    /// Store `response` under `key`.
    fn put(&self, key: CacheKey, response: ApiResponse) -> BoxFuture<'_, Result<(), CacheError>>;
}

/// In-process store backed by a concurrent map.
#[derive(Clone, Default)]
pub struct MemoryCacheStore {
    inner: Arc<DashMap<CacheKey, ApiResponse>>,
    max_entries: Option<usize>,
}

impl MemoryCacheStore {
    /// Create an empty store. `max_entries` bounds the number of distinct keys.
    pub fn new(max_entries: Option<usize>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            max_entries,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Synchronous read, mostly for inspection.
    pub fn get(&self, key: &CacheKey) -> Option<ApiResponse> {
        self.inner.get(key).map(|r| r.value().clone())
    }

    fn insert(&self, key: CacheKey, response: ApiResponse) -> Result<(), CacheError> {
        if let Some(max) = self.max_entries {
            if self.inner.len() >= max && !self.inner.contains_key(&key) {
                return Err(CacheError::Full(max));
            }
        }
        self.inner.insert(key, response);
        metrics::record_cache_size(self.inner.len());
        Ok(())
    }
}

impl CacheStore for MemoryCacheStore {
    fn lookup<'a>(
        &'a self,
        key: &'a CacheKey,
    ) -> BoxFuture<'a, Result<Option<ApiResponse>, CacheError>> {
        Box::pin(async move { Ok(self.get(key)) })
    }

    fn put(&self, key: CacheKey, response: ApiResponse) -> BoxFuture<'_, Result<(), CacheError>> {
        Box::pin(async move { self.insert(key, response) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::key::derive_cache_key;
    use axum::http::{HeaderMap, Method};
    use serde_json::json;

    fn key(path: &str) -> CacheKey {
        derive_cache_key(&Method::GET, &path.parse().unwrap(), &HeaderMap::new()).unwrap()
    }

    #[tokio::test]
    async fn test_round_trip_is_lossless() {
        let store = MemoryCacheStore::new(None);
        let k = key("/v1/page/abc");
        let response = ApiResponse::json(json!({"title": "Hello"}));

        assert_eq!(store.lookup(&k).await, Ok(None));
        store.put(k.clone(), response.clone()).await.unwrap();

        let cached = store.lookup(&k).await.unwrap().unwrap();
        assert_eq!(cached, response);
        assert_eq!(cached.status(), response.status());
        assert_eq!(cached.headers(), response.headers());
        assert_eq!(cached.body(), response.body());
    }

    #[tokio::test]
    async fn test_put_overwrites_single_entry() {
        let store = MemoryCacheStore::new(None);
        let k = key("/v1/user/u1");

        store.put(k.clone(), ApiResponse::json(json!(1))).await.unwrap();
        store.put(k.clone(), ApiResponse::json(json!(2))).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&k).unwrap().body_json().unwrap(), json!(2));
    }

    #[tokio::test]
    async fn test_capacity_rejects_new_keys_only() {
        let store = MemoryCacheStore::new(Some(1));
        let first = key("/a");

        store.put(first.clone(), ApiResponse::json(json!("a"))).await.unwrap();
        assert_eq!(
            store.put(key("/b"), ApiResponse::json(json!("b"))).await,
            Err(CacheError::Full(1))
        );
        // Overwriting an existing key is always allowed.
        store.put(first.clone(), ApiResponse::json(json!("a2"))).await.unwrap();
        assert_eq!(store.len(), 1);
    }
}
