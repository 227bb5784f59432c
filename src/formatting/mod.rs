// src/formatting/mod.rs
//! Turns article records into the markup a reader displays.

pub mod page_tree;
pub mod sanitizer;

pub use page_tree::{flatten, page_tree_from_value, parse_page_tree, render_tree};
pub use sanitizer::{PhraseRule, Sanitizer};

use crate::model::Article;

/// Chooses the body of an article.
///
/// The flattened page-builder document wins when it is still non-blank
/// after cleaning. Otherwise the CMS's server-rendered body is used
/// verbatim.
pub fn compose_article_body(article: &Article, sanitizer: &Sanitizer) -> String {
    article
        .page_builder_payload
        .as_deref()
        .map(render_tree)
        .and_then(page_tree::non_blank)
        .map(|flattened| sanitizer.clean(&flattened))
        .filter(|cleaned| !cleaned.trim().is_empty())
        .unwrap_or_else(|| article.rendered_body.clone())
}
