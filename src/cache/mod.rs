// src/cache/mod.rs
//! Local article cache: one entry per article id, trusted for a TTL.
//!
//! A fresh entry is served without touching the network. A stale or
//! missing one is refetched; when the refetch fails and a stale entry
//! exists, the stale entry is served instead of the error. Entries are
//! replaced whole, last write wins, and nothing is ever evicted.
//!
//! With a [`KeyValueStore`] attached, every write is mirrored to the store
//! and memory misses fall back to it, so entries survive a restart. Store
//! failures are logged and otherwise ignored.

pub mod clock;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{FileStore, KeyValueStore, MemoryStore};

use crate::error::AppError;
use crate::model::{Article, ArticleSummary};
use crate::types::ArticleId;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// What a fetch produces: the article and the rows shown beneath it.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedArticle {
    pub article: Article,
    pub related_articles: Vec<ArticleSummary>,
}

/// A cached article with its related rows and the time it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub article: Article,
    pub related_articles: Vec<ArticleSummary>,
    pub cached_at: DateTime<Utc>,
}

/// How a lookup was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Served from the cache within its TTL.
    Fresh,
    /// Fetched just now.
    Refreshed,
    /// Past its TTL, served because the refetch failed.
    Stale,
    /// Past its TTL, served while a background refetch runs.
    Revalidating,
}

#[derive(Debug)]
pub struct CacheLookup {
    pub entry: Arc<CacheEntry>,
    pub freshness: Freshness,
    /// The background refresh started for a `Revalidating` answer.
    /// Awaiting it is optional; dropping it detaches the task.
    pub refresh: Option<JoinHandle<()>>,
}

struct CacheInner {
    entries: RwLock<HashMap<ArticleId, Arc<CacheEntry>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    store: Option<Arc<dyn KeyValueStore>>,
}

/// Cheap to clone; clones share entries.
#[derive(Clone)]
pub struct ArticleCache {
    inner: Arc<CacheInner>,
}

impl ArticleCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_parts(ttl, Arc::new(SystemClock), None)
    }

    pub fn with_parts(
        ttl: Duration,
        clock: Arc<dyn Clock>,
        store: Option<Arc<dyn KeyValueStore>>,
    ) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                entries: RwLock::new(HashMap::new()),
                ttl,
                clock,
                store,
            }),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    /// Entries held in memory.
    pub fn len(&self) -> usize {
        self.inner.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.read().is_empty()
    }

    fn store_key(id: ArticleId) -> String {
        format!("article_{}", id)
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        clock::elapsed_between(entry.cached_at, self.inner.clock.now()) < self.inner.ttl
    }

    /// The entry for `id`, fresh or not.
    pub async fn get(&self, id: ArticleId) -> Option<Arc<CacheEntry>> {
        let cached = self.inner.entries.read().get(&id).cloned();
        if cached.is_some() {
            return cached;
        }

        let store = self.inner.store.as_ref()?;
        let key = Self::store_key(id);
        let content = match store.get(&key).await {
            Ok(content) => content?,
            Err(e) => {
                log::warn!("Article store read failed: {}", e);
                return None;
            }
        };
        match serde_json::from_str::<CacheEntry>(&content) {
            Ok(entry) => {
                log::debug!("Loaded article {} from the store", id);
                let entry = Arc::new(entry);
                // A concurrent put may have landed meanwhile; it is newer.
                let mut entries = self.inner.entries.write();
                Some(entries.entry(id).or_insert(entry).clone())
            }
            Err(e) => {
                log::warn!("Discarding unreadable stored entry {}: {}", key, e);
                None
            }
        }
    }

    /// Stores `entry` for `id`, replacing any previous one.
    pub async fn put(&self, id: ArticleId, entry: CacheEntry) -> Arc<CacheEntry> {
        let entry = Arc::new(entry);
        self.inner.entries.write().insert(id, entry.clone());

        if let Some(store) = &self.inner.store {
            let key = Self::store_key(id);
            match serde_json::to_string(entry.as_ref()) {
                Ok(json) => {
                    if let Err(e) = store.set(&key, &json).await {
                        log::warn!("Article store write failed: {}", e);
                    }
                }
                Err(e) => log::warn!("Could not serialize cache entry {}: {}", key, e),
            }
        }
        entry
    }

    async fn store_fetched(&self, id: ArticleId, fetched: FetchedArticle) -> Arc<CacheEntry> {
        let entry = CacheEntry {
            article: fetched.article,
            related_articles: fetched.related_articles,
            cached_at: self.inner.clock.now(),
        };
        self.put(id, entry).await
    }

    /// Serves a fresh entry, or refetches.
    ///
    /// A failed refetch falls back to the stale entry when there is one;
    /// without one the failure is returned.
    pub async fn get_or_refresh<F, Fut>(
        &self,
        id: ArticleId,
        fetcher: F,
    ) -> Result<CacheLookup, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<FetchedArticle, AppError>>,
    {
        let existing = self.get(id).await;
        if let Some(entry) = &existing {
            if self.is_fresh(entry) {
                log::debug!("Cache hit: article {}", id);
                return Ok(CacheLookup {
                    entry: entry.clone(),
                    freshness: Freshness::Fresh,
                    refresh: None,
                });
            }
        }

        log::debug!("Cache miss: article {}", id);
        match fetcher().await {
            Ok(fetched) => Ok(CacheLookup {
                entry: self.store_fetched(id, fetched).await,
                freshness: Freshness::Refreshed,
                refresh: None,
            }),
            Err(e) => match existing {
                Some(entry) => {
                    log::warn!("Refresh of article {} failed, serving stale entry: {}", id, e);
                    Ok(CacheLookup {
                        entry,
                        freshness: Freshness::Stale,
                        refresh: None,
                    })
                }
                None => Err(e),
            },
        }
    }

    /// Like [`get_or_refresh`](Self::get_or_refresh), except a stale entry
    /// is returned at once and refreshed on a background task. Background
    /// failures are only logged. Must be called within a tokio runtime.
    pub async fn get_or_revalidate<F, Fut>(
        &self,
        id: ArticleId,
        fetcher: F,
    ) -> Result<CacheLookup, AppError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<FetchedArticle, AppError>> + Send + 'static,
    {
        match self.get(id).await {
            Some(entry) if self.is_fresh(&entry) => Ok(CacheLookup {
                entry,
                freshness: Freshness::Fresh,
                refresh: None,
            }),
            Some(entry) => {
                log::debug!("Revalidating article {} in the background", id);
                let cache = self.clone();
                let refresh = tokio::spawn(async move {
                    match fetcher().await {
                        Ok(fetched) => {
                            cache.store_fetched(id, fetched).await;
                        }
                        Err(e) => log::warn!("Background refresh of article {} failed: {}", id, e),
                    }
                });
                Ok(CacheLookup {
                    entry,
                    freshness: Freshness::Revalidating,
                    refresh: Some(refresh),
                })
            }
            None => self.get_or_refresh(id, fetcher).await,
        }
    }
}

impl std::fmt::Debug for ArticleCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticleCache")
            .field("entries", &self.len())
            .field("ttl", &self.inner.ttl)
            .field("persistent", &self.inner.store.is_some())
            .finish()
    }
}
