// src/api/content.rs
//! The content operations a reader needs: lists, search, detail views,
//! taxonomies, media and site metadata.
//!
//! Each operation exists twice. `try_*` returns the typed failure, for
//! callers that must tell "nothing there" from "could not ask" (the
//! article cache serves stale entries only on the latter). The plain
//! variant degrades every failure to an empty list or `None` and logs it,
//! which is what a screen wants.

use super::parser::{parse_api_response, parse_table_rows};
use super::query::{ListQuery, Order, OrderBy};
use super::responses::{RawAuthor, RawMedia, RawPost, RawSiteInfo, RawTerm};
use super::{CmsRequest, CmsTransport};
use crate::constants::{CONTENT_API_PATH, SITE_INFO_PATH, TABLE_API_PATH, TAXONOMY_PAGE_SIZE};
use crate::error::AppError;
use crate::formatting::{compose_article_body, Sanitizer};
use crate::model::{Article, ArticleSummary, AuthorRef, Media, SiteInfo, TableRow, Term};
use crate::normalize;
use crate::types::{ArticleId, MediaId, TermId};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Largest page the CMS serves.
const MAX_PER_PAGE: u32 = 100;

/// Typed access to the CMS content API.
#[derive(Clone)]
pub struct ContentClient {
    transport: Arc<dyn CmsTransport>,
    sanitizer: Arc<Sanitizer>,
}

impl ContentClient {
    pub fn new(transport: Arc<dyn CmsTransport>) -> Self {
        Self {
            transport,
            sanitizer: Arc::new(Sanitizer::default()),
        }
    }

    /// Replaces the sanitizer applied to article bodies.
    pub fn with_sanitizer(mut self, sanitizer: Sanitizer) -> Self {
        self.sanitizer = Arc::new(sanitizer);
        self
    }

    pub fn sanitizer(&self) -> &Sanitizer {
        &self.sanitizer
    }

    async fn fetch<T: DeserializeOwned>(&self, request: CmsRequest) -> Result<T, AppError> {
        let response = self.transport.execute(&request).await?;
        parse_api_response(response)
    }

    fn content_path(resource: impl std::fmt::Display) -> String {
        format!("{}/{}", CONTENT_API_PATH, resource)
    }

    // --- Articles ---

    /// One page of articles, newest first; with a search term, ordered by
    /// relevance instead. `page` is 1-indexed.
    pub async fn try_list_articles(
        &self,
        page: u32,
        per_page: u32,
        category: Option<TermId>,
        search: Option<&str>,
    ) -> Result<Vec<ArticleSummary>, AppError> {
        let mut query = ListQuery::new()
            .search(search.unwrap_or_default())
            .categories(category)
            .page(page.max(1), per_page.clamp(1, MAX_PER_PAGE))
            .embed();
        query = if query.is_search() {
            query.order_by(OrderBy::Relevance)
        } else {
            query.order_by(OrderBy::Date).order(Order::Desc)
        };

        let raw: Vec<RawPost> = self
            .fetch(CmsRequest::collection(Self::content_path("posts"), query.to_pairs()))
            .await?;
        Ok(raw.into_iter().map(normalize::to_summary).collect())
    }

    pub async fn list_articles(
        &self,
        page: u32,
        per_page: u32,
        category: Option<TermId>,
        search: Option<&str>,
    ) -> Vec<ArticleSummary> {
        degrade(
            "list articles",
            self.try_list_articles(page, per_page, category, search).await,
        )
        .unwrap_or_default()
    }

    /// The detail view of an article, with its body flattened and cleaned.
    pub async fn try_get_article(&self, id: ArticleId) -> Result<Article, AppError> {
        let request = CmsRequest::entity(Self::content_path(format!("posts/{}", id)))
            .with_query(ListQuery::new().embed().to_pairs());
        let raw: RawPost = self.fetch(request).await?;

        let mut article = normalize::to_article(raw);
        article.body_markup = compose_article_body(&article, &self.sanitizer);
        Ok(article)
    }

    pub async fn get_article(&self, id: ArticleId) -> Option<Article> {
        degrade("get article", self.try_get_article(id).await)
    }

    /// Newest articles sharing any of `categories`, never `article` itself.
    /// Without categories there is nothing to relate by and no request is
    /// made.
    pub async fn try_list_related(
        &self,
        article: ArticleId,
        categories: &[TermId],
        limit: u32,
    ) -> Result<Vec<ArticleSummary>, AppError> {
        if categories.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let query = ListQuery::new()
            .categories(categories.iter().copied())
            .exclude(article)
            .per_page(limit.min(MAX_PER_PAGE))
            .embed()
            .order_by(OrderBy::Date)
            .order(Order::Desc);
        let raw: Vec<RawPost> = self
            .fetch(CmsRequest::collection(Self::content_path("posts"), query.to_pairs()))
            .await?;
        Ok(raw
            .into_iter()
            .map(normalize::to_summary)
            .filter(|summary| summary.id != article)
            .collect())
    }

    pub async fn list_related(
        &self,
        article: ArticleId,
        categories: &[TermId],
        limit: u32,
    ) -> Vec<ArticleSummary> {
        degrade(
            "list related articles",
            self.try_list_related(article, categories, limit).await,
        )
        .unwrap_or_default()
    }

    // --- Taxonomies and people ---

    fn taxonomy_query(order_by: OrderBy) -> Vec<(String, String)> {
        ListQuery::new()
            .per_page(TAXONOMY_PAGE_SIZE)
            .order_by(order_by)
            .order(Order::Desc)
            .to_pairs()
    }

    /// Categories, most used first.
    pub async fn try_list_categories(&self) -> Result<Vec<Term>, AppError> {
        let raw: Vec<RawTerm> = self
            .fetch(CmsRequest::collection(
                Self::content_path("categories"),
                Self::taxonomy_query(OrderBy::Count),
            ))
            .await?;
        Ok(raw.into_iter().map(normalize::to_term).collect())
    }

    pub async fn list_categories(&self) -> Vec<Term> {
        degrade("list categories", self.try_list_categories().await).unwrap_or_default()
    }

    pub async fn try_get_category(&self, id: TermId) -> Result<Term, AppError> {
        let raw: RawTerm = self
            .fetch(CmsRequest::entity(Self::content_path(format!(
                "categories/{}",
                id
            ))))
            .await?;
        Ok(normalize::to_term(raw))
    }

    pub async fn get_category(&self, id: TermId) -> Option<Term> {
        degrade("get category", self.try_get_category(id).await)
    }

    /// Tags, most used first.
    pub async fn try_list_tags(&self) -> Result<Vec<Term>, AppError> {
        let raw: Vec<RawTerm> = self
            .fetch(CmsRequest::collection(
                Self::content_path("tags"),
                Self::taxonomy_query(OrderBy::Count),
            ))
            .await?;
        Ok(raw.into_iter().map(normalize::to_term).collect())
    }

    pub async fn list_tags(&self) -> Vec<Term> {
        degrade("list tags", self.try_list_tags().await).unwrap_or_default()
    }

    /// Authors, most recently registered first.
    pub async fn try_list_authors(&self) -> Result<Vec<AuthorRef>, AppError> {
        let raw: Vec<RawAuthor> = self
            .fetch(CmsRequest::collection(
                Self::content_path("users"),
                Self::taxonomy_query(OrderBy::Registered),
            ))
            .await?;
        Ok(raw.into_iter().map(normalize::to_author).collect())
    }

    pub async fn list_authors(&self) -> Vec<AuthorRef> {
        degrade("list authors", self.try_list_authors().await).unwrap_or_default()
    }

    // --- Media and site ---

    pub async fn try_get_media(&self, id: MediaId) -> Result<Media, AppError> {
        let raw: RawMedia = self
            .fetch(CmsRequest::entity(Self::content_path(format!("media/{}", id))))
            .await?;
        Ok(normalize::to_media(raw))
    }

    pub async fn get_media(&self, id: MediaId) -> Option<Media> {
        degrade("get media", self.try_get_media(id).await)
    }

    pub async fn try_get_site_info(&self) -> Result<SiteInfo, AppError> {
        let raw: RawSiteInfo = self.fetch(CmsRequest::entity(SITE_INFO_PATH)).await?;
        Ok(normalize::to_site_info(raw))
    }

    pub async fn get_site_info(&self) -> Option<SiteInfo> {
        degrade("get site info", self.try_get_site_info().await)
    }

    /// Rows of the first table embedded in an article, keyed by header.
    pub async fn try_get_table_data(&self, id: ArticleId) -> Result<Vec<TableRow>, AppError> {
        let request = CmsRequest::entity(format!("{}/{}", TABLE_API_PATH, id));
        let response = self.transport.execute(&request).await?;
        let rows = parse_table_rows(response)?;
        if rows.is_empty() {
            return Err(AppError::NotFound {
                resource: "table",
                id: id.to_string(),
            });
        }
        Ok(rows)
    }

    pub async fn get_table_data(&self, id: ArticleId) -> Option<Vec<TableRow>> {
        degrade("get table data", self.try_get_table_data(id).await)
    }
}

/// Logs a failure and drops it. Missing entities are routine and only
/// logged at debug level.
fn degrade<T>(operation: &str, result: Result<T, AppError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) if e.is_not_found() => {
            log::debug!("{}: {}", operation, e);
            None
        }
        Err(e) => {
            log::warn!("{} failed: {}", operation, e);
            None
        }
    }
}
