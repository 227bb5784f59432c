// src/model/article.rs
use super::{AuthorRef, CategoryRef, Meta, PageTree, TagRef};
use crate::types::{ArticleId, TermId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether comments or pingbacks are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DiscussionStatus {
    Open,
    Closed,
    /// The CMS did not say.
    #[default]
    Unspecified,
    Other(String),
}

impl From<String> for DiscussionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "open" => Self::Open,
            "closed" => Self::Closed,
            "" => Self::Unspecified,
            _ => Self::Other(value),
        }
    }
}

impl From<DiscussionStatus> for String {
    fn from(value: DiscussionStatus) -> Self {
        match value {
            DiscussionStatus::Open => "open".to_string(),
            DiscussionStatus::Closed => "closed".to_string(),
            DiscussionStatus::Unspecified => String::new(),
            DiscussionStatus::Other(other) => other,
        }
    }
}

/// An article as it appears in lists, search results and related rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: ArticleId,
    pub title: String,
    /// Entity-decoded excerpt; still contains markup.
    pub excerpt: String,
    pub published_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub permalink: String,
    pub slug: String,
    pub featured_image_url: Option<String>,
    pub featured_image_alt: String,
    pub categories: Vec<CategoryRef>,
    pub tags: Vec<TagRef>,
    pub author: AuthorRef,
    pub comment_status: DiscussionStatus,
    pub ping_status: DiscussionStatus,
    pub format: String,
    pub meta: Meta,
    pub links: Meta,
}

impl ArticleSummary {
    pub fn category_ids(&self) -> Vec<TermId> {
        self.categories.iter().map(|c| c.id).collect()
    }
}

/// The detail view of an article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(flatten)]
    pub summary: ArticleSummary,
    /// Markup to render: the flattened page-builder body when one could be
    /// extracted, otherwise the CMS's server-rendered body.
    pub body_markup: String,
    /// The CMS's server-rendered body, verbatim.
    pub rendered_body: String,
    pub page_builder_payload: Option<PageTree>,
    pub page_builder_template_id: Option<String>,
    pub page_builder_edit_mode: bool,
}

impl Article {
    pub fn id(&self) -> ArticleId {
        self.summary.id
    }

    pub fn title(&self) -> &str {
        &self.summary.title
    }

    pub fn has_page_builder_body(&self) -> bool {
        self.page_builder_payload
            .as_ref()
            .is_some_and(|tree| !tree.is_empty())
    }
}
