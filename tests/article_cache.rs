//! Freshness, stale fallback and persistence of the article cache.

use chrono::{TimeZone, Utc};
use cms_reader::api::responses::RawPost;
use cms_reader::{
    to_article, AppError, ArticleCache, ArticleId, Clock, CmsErrorCode, FetchedArticle,
    Freshness, KeyValueStore, ManualClock, MemoryStore,
};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const TTL: Duration = Duration::from_secs(3600);
const ID: ArticleId = ArticleId::new(42);

fn fetched(title: &str) -> FetchedArticle {
    let raw: RawPost = serde_json::from_value(serde_json::json!({
        "id": 42,
        "title": {"rendered": title},
        "content": {"rendered": "<p>Hi</p>"}
    }))
    .unwrap();
    FetchedArticle {
        article: to_article(raw),
        related_articles: Vec::new(),
    }
}

fn outage() -> AppError {
    AppError::CmsService {
        code: CmsErrorCode::HttpStatus(503),
        message: "HTTP 503".to_string(),
        status: StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn cache_with_clock() -> (ArticleCache, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    ));
    let cache = ArticleCache::with_parts(TTL, clock.clone(), None);
    (cache, clock)
}

#[tokio::test]
async fn test_second_lookup_within_ttl_does_not_fetch() {
    let (cache, clock) = cache_with_clock();
    let calls = AtomicUsize::new(0);
    let counter = &calls;
    let fetch = move || async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(fetched("Erster"))
    };

    let first = cache.get_or_refresh(ID, fetch).await.unwrap();
    clock.advance(TTL - Duration::from_secs(1));
    let second = cache.get_or_refresh(ID, fetch).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(first.freshness, Freshness::Refreshed);
    assert_eq!(second.freshness, Freshness::Fresh);
    assert!(Arc::ptr_eq(&first.entry, &second.entry));
    assert!(second.refresh.is_none());
}

#[tokio::test]
async fn test_entry_is_stale_once_ttl_has_elapsed() {
    let (cache, clock) = cache_with_clock();
    cache
        .get_or_refresh(ID, || async { Ok(fetched("Alt")) })
        .await
        .unwrap();

    clock.advance(TTL);
    let lookup = cache
        .get_or_refresh(ID, || async { Ok(fetched("Neu")) })
        .await
        .unwrap();

    assert_eq!(lookup.freshness, Freshness::Refreshed);
    assert_eq!(lookup.entry.article.title(), "Neu");
    assert_eq!(lookup.entry.cached_at, clock.now());
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_failed_refresh_serves_the_stale_entry() {
    let (cache, clock) = cache_with_clock();
    let original = cache
        .get_or_refresh(ID, || async { Ok(fetched("Alt")) })
        .await
        .unwrap();

    clock.advance(TTL * 2);
    let lookup = cache
        .get_or_refresh(ID, || async { Err(outage()) })
        .await
        .unwrap();

    assert_eq!(lookup.freshness, Freshness::Stale);
    assert!(Arc::ptr_eq(&lookup.entry, &original.entry));
    assert_eq!(lookup.entry.article.title(), "Alt");
}

#[tokio::test]
async fn test_failed_fetch_without_entry_is_an_error() {
    let (cache, _clock) = cache_with_clock();

    let result = cache.get_or_refresh(ID, || async { Err(outage()) }).await;

    assert!(matches!(result, Err(AppError::CmsService { .. })));
    assert!(cache.is_empty());
    assert!(cache.get(ID).await.is_none());
}

#[tokio::test]
async fn test_put_replaces_the_previous_entry() {
    let (cache, _clock) = cache_with_clock();
    let first = cache
        .get_or_refresh(ID, || async { Ok(fetched("Eins")) })
        .await
        .unwrap();

    let mut replacement = (*first.entry).clone();
    replacement.article.summary.title = "Zwei".to_string();
    cache.put(ID, replacement).await;

    let current = cache.get(ID).await.unwrap();
    assert_eq!(current.article.title(), "Zwei");
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_entry_stamped_in_the_future_is_refetched() {
    let (cache, clock) = cache_with_clock();
    let first = cache
        .get_or_refresh(ID, || async { Ok(fetched("Vorher")) })
        .await
        .unwrap();

    let mut skewed = (*first.entry).clone();
    skewed.cached_at = clock.now() + chrono::Duration::hours(6);
    cache.put(ID, skewed).await;

    let lookup = cache
        .get_or_refresh(ID, || async { Ok(fetched("Nachher")) })
        .await
        .unwrap();
    assert_eq!(lookup.freshness, Freshness::Refreshed);
    assert_eq!(lookup.entry.article.title(), "Nachher");
}

#[tokio::test]
async fn test_revalidation_serves_stale_and_refreshes_in_background() {
    let (cache, clock) = cache_with_clock();
    cache
        .get_or_refresh(ID, || async { Ok(fetched("Alt")) })
        .await
        .unwrap();
    clock.advance(TTL + Duration::from_secs(5));

    let lookup = cache
        .get_or_revalidate(ID, || async { Ok(fetched("Neu")) })
        .await
        .unwrap();
    assert_eq!(lookup.freshness, Freshness::Revalidating);
    assert_eq!(lookup.entry.article.title(), "Alt");

    lookup.refresh.expect("refresh task").await.unwrap();

    let next = cache
        .get_or_refresh(ID, || async { Err(outage()) })
        .await
        .unwrap();
    assert_eq!(next.freshness, Freshness::Fresh);
    assert_eq!(next.entry.article.title(), "Neu");
}

#[tokio::test]
async fn test_revalidation_of_a_missing_entry_fetches_inline() {
    let (cache, _clock) = cache_with_clock();

    let lookup = cache
        .get_or_revalidate(ID, || async { Ok(fetched("Neu")) })
        .await
        .unwrap();

    assert_eq!(lookup.freshness, Freshness::Refreshed);
    assert!(lookup.refresh.is_none());
}

#[tokio::test]
async fn test_failed_background_refresh_keeps_the_stale_entry() {
    let (cache, clock) = cache_with_clock();
    cache
        .get_or_refresh(ID, || async { Ok(fetched("Alt")) })
        .await
        .unwrap();
    clock.advance(TTL);

    let lookup = cache
        .get_or_revalidate(ID, || async { Err(outage()) })
        .await
        .unwrap();
    lookup.refresh.expect("refresh task").await.unwrap();

    assert_eq!(cache.get(ID).await.unwrap().article.title(), "Alt");
}

#[tokio::test]
async fn test_entries_survive_in_the_store() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    ));

    let shared: Arc<dyn KeyValueStore> = store.clone();

    let writer = ArticleCache::with_parts(TTL, clock.clone(), Some(shared.clone()));
    writer
        .get_or_refresh(ID, || async { Ok(fetched("Gespeichert")) })
        .await
        .unwrap();
    assert!(store.get("article_42").await.unwrap().is_some());

    let reader = ArticleCache::with_parts(TTL, clock.clone(), Some(shared));
    let calls = AtomicUsize::new(0);
    let counter = &calls;
    let lookup = reader
        .get_or_refresh(ID, move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(outage())
        })
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(lookup.freshness, Freshness::Fresh);
    assert_eq!(lookup.entry.article.title(), "Gespeichert");
    assert_eq!(lookup.entry.article.body_markup, "<p>Hi</p>");
}

#[tokio::test]
async fn test_unreadable_stored_entry_is_a_miss() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    store.set("article_42", "{ not a cache entry").await.unwrap();
    let cache = ArticleCache::with_parts(TTL, Arc::new(ManualClock::default()), Some(store));

    assert!(cache.get(ID).await.is_none());
}
