// src/model/mod.rs
//! The stable entity model the rest of the client works with.
//!
//! Everything here is produced by the normalizer and carries a concrete
//! value for every field, so nothing downstream has to handle absence.

mod article;
mod media;
mod page_tree;
mod taxonomy;

pub use article::{Article, ArticleSummary, DiscussionStatus};
pub use media::{Media, MediaSize, SiteInfo};
pub use page_tree::{PageNode, PageTree, Widget};
pub use taxonomy::{AuthorRef, CategoryRef, TagRef, Term};

use indexmap::IndexMap;

/// Free-form metadata the CMS attaches to records (`meta`, `_links`).
pub type Meta = IndexMap<String, serde_json::Value>;

/// One row of the table-data endpoint, keyed by column header.
pub type TableRow = IndexMap<String, String>;
