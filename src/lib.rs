// src/lib.rs
//! cms-reader library: reads articles from a WordPress-style content API.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ErrorKind`, `CmsErrorCode`, `ValidationError`
//! - **Configuration**: `CommandLineInput`, `ClientConfig`
//! - **Domain model**: `Article`, `ArticleSummary`, `Term`, `AuthorRef`, `Media`, `SiteInfo`, `PageNode`
//! - **Domain types**: `ArticleId`, `TermId`, `AuthorId`, `MediaId`
//! - **API client**: `ContentClient`, the `CmsTransport` seam and its implementations
//! - **Normalization**: `to_summary`, `to_article` and friends
//! - **Formatting**: `flatten`, `Sanitizer`, `compose_article_body`
//! - **Caching**: `ArticleCache`, stores and clocks
//! - **Pipeline**: `ArticleReader`

pub mod api;
pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod formatting;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, CmsErrorCode, ErrorKind};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{ClientConfig, Command, CommandLineInput};

// --- Domain Model ---
pub use crate::model::{
    Article, ArticleSummary, AuthorRef, CategoryRef, DiscussionStatus, Media, MediaSize, Meta,
    PageNode, PageTree, SiteInfo, TableRow, TagRef, Term, Widget,
};

// --- Domain Types ---
pub use crate::types::{ArticleId, AuthorId, Id, MediaId, TermId};

// --- API Client ---
pub use crate::api::{
    client::ApiResponse, CachedTransport, CmsHttpClient, CmsRequest, CmsTransport,
    ContentClient, ListQuery, Order, OrderBy, RequestKind,
};

// --- Normalization ---
pub use crate::normalize::{
    decode_entities, to_article, to_author, to_media, to_site_info, to_summary, to_term,
};

// --- Formatting ---
pub use crate::formatting::{compose_article_body, flatten, PhraseRule, Sanitizer};

// --- Caching ---
pub use crate::cache::{
    ArticleCache, CacheEntry, CacheLookup, Clock, FetchedArticle, FileStore, Freshness,
    KeyValueStore, ManualClock, MemoryStore, SystemClock,
};

// --- Pipeline ---
pub use crate::pipeline::{ArticleReader, ArticleSource, ClientArticleSource};
