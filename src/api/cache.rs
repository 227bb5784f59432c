// src/api/cache.rs
//! Response cache for CMS collection endpoints.
//!
//! Caches raw response text keyed by request, with TTL-based expiry. On a
//! cache hit the cached text is re-parsed through the same parsers used for
//! live responses; the domain model is never serialized here.

use super::client::ApiResponse;
use super::{CmsRequest, CmsTransport, RequestKind};
use crate::cache::clock::{elapsed_between, Clock, SystemClock};
use crate::cache::store::KeyValueStore;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

#[derive(serde::Serialize, serde::Deserialize)]
struct CachedResponse {
    data: String,
    url: String,
    cached_at: DateTime<Utc>,
}

/// A [`CmsTransport`] that reuses successful collection responses
/// (lists, search, taxonomies) for `ttl`. Entity requests always pass
/// through.
///
/// Cache operations are best-effort: store failures are logged and the
/// request goes to the network as if nothing was cached.
pub struct CachedTransport {
    inner: Arc<dyn CmsTransport>,
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl CachedTransport {
    pub fn new(inner: Arc<dyn CmsTransport>, store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self {
            inner,
            store,
            ttl,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn store_key(request: &CmsRequest) -> String {
        format!("response_{}", request.cache_key())
    }

    async fn lookup(&self, key: &str) -> Option<ApiResponse<String>> {
        let content = match self.store.get(key).await {
            Ok(content) => content?,
            Err(e) => {
                log::warn!("Response cache read failed: {}", e);
                return None;
            }
        };
        let entry: CachedResponse = serde_json::from_str(&content).ok()?;
        if elapsed_between(entry.cached_at, self.clock.now()) >= self.ttl {
            if let Err(e) = self.store.remove(key).await {
                log::warn!("Failed to drop expired response {}: {}", key, e);
            }
            return None;
        }
        Some(ApiResponse::ok(entry.url, entry.data))
    }

    async fn remember(&self, key: &str, response: &ApiResponse<String>) {
        let entry = CachedResponse {
            data: response.data.clone(),
            url: response.url.clone(),
            cached_at: self.clock.now(),
        };
        if let Ok(json) = serde_json::to_string(&entry) {
            if let Err(e) = self.store.set(key, &json).await {
                log::warn!("Response cache write failed: {}", e);
            }
        }
    }
}

#[async_trait::async_trait]
impl CmsTransport for CachedTransport {
    async fn execute(&self, request: &CmsRequest) -> Result<ApiResponse<String>, AppError> {
        if request.kind != RequestKind::Collection {
            return self.inner.execute(request).await;
        }

        let key = Self::store_key(request);
        if let Some(cached) = self.lookup(&key).await {
            log::debug!("Cache hit: {}", key);
            return Ok(cached);
        }

        log::debug!("Cache miss: {}", key);
        let response = self.inner.execute(request).await?;
        if response.status.is_success() {
            self.remember(&key, &response).await;
        }
        Ok(response)
    }
}
