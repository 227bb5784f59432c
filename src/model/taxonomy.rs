// src/model/taxonomy.rs
use super::Meta;
use crate::constants::UNKNOWN_AUTHOR_NAME;
use crate::types::{AuthorId, TermId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A taxonomy term: a category or a tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub id: TermId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub count: u64,
    pub link: String,
    /// `category` or `post_tag`
    pub taxonomy: String,
    pub meta: Meta,
}

pub type CategoryRef = Term;
pub type TagRef = Term;

/// The author of an article, or an entry of the author listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: AuthorId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub link: String,
    /// Avatar URLs keyed by pixel size (`"24"`, `"48"`, `"96"`).
    pub avatar_urls: IndexMap<String, String>,
    pub meta: Meta,
}

impl AuthorRef {
    /// The sentinel shown when the CMS did not embed an author.
    pub fn unknown() -> Self {
        Self {
            id: AuthorId::new(0),
            name: UNKNOWN_AUTHOR_NAME.to_string(),
            slug: String::new(),
            description: String::new(),
            link: String::new(),
            avatar_urls: IndexMap::new(),
            meta: Meta::new(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.id.get() == 0
    }
}

impl Default for AuthorRef {
    fn default() -> Self {
        Self::unknown()
    }
}
