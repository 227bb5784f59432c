// src/api/mod.rs
//! CMS API interaction: the ability to retrieve content from a site.
//!
//! The layering keeps I/O, parsing and business logic apart. A
//! [`CmsTransport`] only moves text; [`parser`] turns text into raw
//! records; [`ContentClient`] decides which request to make and hands the
//! records to the normalizer.

pub mod cache;
pub mod client;
pub mod content;
pub mod parser;
pub mod query;
pub mod responses;

use crate::error::AppError;
use client::ApiResponse;

/// Whether a request addresses a collection or a single entity.
///
/// Only collection responses are eligible for the raw response cache;
/// entity reads go through the article cache instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Collection,
    Entity,
}

/// One GET against the CMS, relative to the site root.
#[derive(Debug, Clone, PartialEq)]
pub struct CmsRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub kind: RequestKind,
}

impl CmsRequest {
    pub fn collection(path: impl Into<String>, query: Vec<(String, String)>) -> Self {
        Self {
            path: path.into(),
            query,
            kind: RequestKind::Collection,
        }
    }

    pub fn entity(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
            kind: RequestKind::Entity,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Stable identity of the request: path plus query in emitted order.
    pub fn cache_key(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}

/// The ability to execute a GET against the CMS.
///
/// Business logic depends on this trait, never on HTTP details. A
/// non-success status is not an error at this level; it comes back in
/// [`ApiResponse::status`] so the parser can decode the error body.
#[async_trait::async_trait]
pub trait CmsTransport: Send + Sync {
    async fn execute(&self, request: &CmsRequest) -> Result<ApiResponse<String>, AppError>;
}

// Re-export the public interface
pub use cache::CachedTransport;
pub use client::CmsHttpClient;
pub use content::ContentClient;
pub use query::{ListQuery, Order, OrderBy};
