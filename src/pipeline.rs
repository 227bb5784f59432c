// src/pipeline.rs
//! The "show article N" path: cache first, then fetch, normalize, flatten,
//! clean, attach related articles, and remember the result.

use crate::api::{CachedTransport, CmsHttpClient, CmsTransport, ContentClient};
use crate::cache::{ArticleCache, CacheLookup, FetchedArticle, FileStore, KeyValueStore};
use crate::config::ClientConfig;
use crate::error::AppError;
use crate::types::ArticleId;
use std::sync::Arc;

/// Produces an article together with its related rows.
#[async_trait::async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch(&self, id: ArticleId) -> Result<FetchedArticle, AppError>;
}

/// Fetches through the content client. A failure to load related articles
/// never fails the article itself; it only leaves the related rows empty.
#[derive(Clone)]
pub struct ClientArticleSource {
    client: ContentClient,
    related_limit: u32,
}

impl ClientArticleSource {
    pub fn new(client: ContentClient, related_limit: u32) -> Self {
        Self {
            client,
            related_limit,
        }
    }
}

#[async_trait::async_trait]
impl ArticleSource for ClientArticleSource {
    async fn fetch(&self, id: ArticleId) -> Result<FetchedArticle, AppError> {
        let article = self.client.try_get_article(id).await?;
        let related_articles = self
            .client
            .list_related(id, &article.summary.category_ids(), self.related_limit)
            .await;
        log::debug!(
            "Fetched article {} with {} related articles",
            id,
            related_articles.len()
        );
        Ok(FetchedArticle {
            article,
            related_articles,
        })
    }
}

/// Opens articles through the local cache.
#[derive(Clone)]
pub struct ArticleReader {
    client: ContentClient,
    source: Arc<dyn ArticleSource>,
    cache: ArticleCache,
}

impl ArticleReader {
    pub fn new(client: ContentClient, related_limit: u32, cache: ArticleCache) -> Self {
        let source = Arc::new(ClientArticleSource::new(client.clone(), related_limit));
        Self {
            client,
            source,
            cache,
        }
    }

    /// A reader whose articles come from `source` instead of the client.
    pub fn with_source(
        client: ContentClient,
        source: Arc<dyn ArticleSource>,
        cache: ArticleCache,
    ) -> Self {
        Self {
            client,
            source,
            cache,
        }
    }

    /// Wires up the HTTP transport, the caches and the sanitizer.
    ///
    /// With caching enabled, collection responses and opened articles
    /// share one on-disk store; otherwise articles are cached in memory
    /// only, for the life of the process.
    pub async fn from_config(config: &ClientConfig) -> Result<Self, AppError> {
        let http: Arc<dyn CmsTransport> = Arc::new(CmsHttpClient::new(
            config.site_url.clone(),
            config.request_timeout,
        )?);

        let (transport, cache) = if config.use_cache {
            let store: Arc<dyn KeyValueStore> =
                Arc::new(FileStore::open(&config.cache_dir).await?);
            log::debug!("Caching under {}", config.cache_dir.display());
            let transport: Arc<dyn CmsTransport> = Arc::new(CachedTransport::new(
                http,
                store.clone(),
                config.response_ttl,
            ));
            let cache = ArticleCache::with_parts(
                config.article_ttl,
                Arc::new(crate::cache::SystemClock),
                Some(store),
            );
            (transport, cache)
        } else {
            (http, ArticleCache::new(config.article_ttl))
        };

        let client = ContentClient::new(transport).with_sanitizer(config.sanitizer()?);
        Ok(Self::new(client, config.related_limit, cache))
    }

    pub fn client(&self) -> &ContentClient {
        &self.client
    }

    pub fn cache(&self) -> &ArticleCache {
        &self.cache
    }

    /// Fetches without consulting or updating the cache.
    pub async fn fetch_fresh(&self, id: ArticleId) -> Result<FetchedArticle, AppError> {
        self.source.fetch(id).await
    }

    /// Opens an article: fresh cache entries are served as they are,
    /// anything else is refetched, with the stale entry as the fallback.
    pub async fn open(&self, id: ArticleId) -> Result<CacheLookup, AppError> {
        let source = self.source.clone();
        self.cache
            .get_or_refresh(id, move || async move { source.fetch(id).await })
            .await
    }

    /// Opens an article, serving stale entries at once while they are
    /// refreshed in the background.
    pub async fn open_revalidating(&self, id: ArticleId) -> Result<CacheLookup, AppError> {
        let source = self.source.clone();
        self.cache
            .get_or_revalidate(id, move || async move { source.fetch(id).await })
            .await
    }
}
