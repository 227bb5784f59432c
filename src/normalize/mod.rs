// src/normalize/mod.rs
//! Raw CMS records → the stable entity model.
//!
//! Every default is resolved here, once. Downstream code never sees an
//! absent title, a missing author or a `null` count. These functions are
//! pure and never fail: a record missing everything still normalizes, to
//! a value made of defaults.

mod entities;

pub use entities::{decode_entities, resolve_timestamp};

use crate::api::responses::{
    RawAuthor, RawEmbedded, RawMedia, RawPost, RawSiteInfo, RawTerm, RenderedText,
};
use crate::constants::{
    DEFAULT_POST_FORMAT, PAGE_BUILDER_DATA_KEY, PAGE_BUILDER_EDIT_MODE_KEY,
    PAGE_BUILDER_TEMPLATE_KEY,
};
use crate::error::AppError;
use crate::formatting::page_tree::{self, page_tree_from_value};
use crate::model::{
    Article, ArticleSummary, AuthorRef, DiscussionStatus, Media, MediaSize, Meta, PageTree,
    SiteInfo, Term,
};
use crate::types::{ArticleId, AuthorId, MediaId, TermId};
use entities::{meta_flag, scalar_number, scalar_text};
use serde_json::Value;

/// Normalizes a post into its list form.
pub fn to_summary(raw: RawPost) -> ArticleSummary {
    summary_parts(raw).0
}

/// Normalizes a post into its detail form.
///
/// `body_markup` is the flattened page-builder document when one renders
/// to something, otherwise the server-rendered body. No cleaning happens
/// here; see [`compose_article_body`](crate::formatting::compose_article_body).
pub fn to_article(raw: RawPost) -> Article {
    let (summary, content) = summary_parts(raw);
    let rendered_body = content.unwrap_or_default();

    let page_builder_payload = summary
        .meta
        .get(PAGE_BUILDER_DATA_KEY)
        .and_then(|payload| match read_page_tree(payload) {
            Ok(tree) => tree,
            Err(e) => {
                log::warn!(
                    "Article {} has an unreadable page-builder payload: {}",
                    summary.id,
                    e
                );
                None
            }
        });
    let page_builder_template_id = summary
        .meta
        .get(PAGE_BUILDER_TEMPLATE_KEY)
        .and_then(scalar_text);
    let page_builder_edit_mode = summary
        .meta
        .get(PAGE_BUILDER_EDIT_MODE_KEY)
        .is_some_and(meta_flag);

    let body_markup = page_builder_payload
        .as_deref()
        .map(page_tree::render_tree)
        .and_then(page_tree::non_blank)
        .unwrap_or_else(|| rendered_body.clone());

    Article {
        summary,
        body_markup,
        rendered_body,
        page_builder_payload,
        page_builder_template_id,
        page_builder_edit_mode,
    }
}

/// `Ok(None)` when the payload is present in name only (`null`, `""`).
fn read_page_tree(payload: &Value) -> Result<Option<PageTree>, AppError> {
    match payload {
        Value::Null => Ok(None),
        Value::String(text) if text.trim().is_empty() => Ok(None),
        other => page_tree_from_value(other).map(Some),
    }
}

/// The summary plus the server-rendered body, which only the detail form
/// keeps.
fn summary_parts(raw: RawPost) -> (ArticleSummary, Option<String>) {
    let RawPost {
        id,
        date,
        date_gmt,
        modified,
        modified_gmt,
        link,
        slug,
        title,
        excerpt,
        content,
        comment_status,
        ping_status,
        format,
        meta,
        links,
        embedded,
    } = raw;

    let embedded = embedded.unwrap_or_default();
    let (featured_image_url, featured_image_alt) = featured_image(&embedded);
    let (categories, tags) = embedded_terms(&embedded);
    let author = embedded
        .author
        .and_then(|authors| authors.into_iter().next())
        .map(to_author)
        .unwrap_or_else(AuthorRef::unknown);

    let summary = ArticleSummary {
        id: ArticleId::new(id.unwrap_or_default()),
        title: decoded_text(title),
        excerpt: decoded_text(excerpt),
        published_at: resolve_timestamp(date_gmt.as_deref(), date.as_deref()),
        modified_at: resolve_timestamp(modified_gmt.as_deref(), modified.as_deref()),
        permalink: link.unwrap_or_default(),
        slug: slug.unwrap_or_default(),
        featured_image_url,
        featured_image_alt,
        categories,
        tags,
        author,
        comment_status: discussion_status(comment_status),
        ping_status: discussion_status(ping_status),
        format: format
            .filter(|format| !format.is_empty())
            .unwrap_or_else(|| DEFAULT_POST_FORMAT.to_string()),
        meta: into_meta(meta),
        links: into_meta(links),
    };

    (summary, content.and_then(RenderedText::into_text))
}

fn featured_image(embedded: &RawEmbedded) -> (Option<String>, String) {
    let Some(media) = embedded
        .featured_media
        .as_ref()
        .and_then(|media| media.first())
    else {
        return (None, String::new());
    };
    (
        media.source_url.clone().filter(|url| !url.is_empty()),
        media.alt_text.clone().unwrap_or_default(),
    )
}

/// Term groups come in taxonomy order: categories, then tags.
fn embedded_terms(embedded: &RawEmbedded) -> (Vec<Term>, Vec<Term>) {
    let group = |index: usize| -> Vec<Term> {
        embedded
            .terms
            .as_ref()
            .and_then(|groups| groups.get(index))
            .map(|terms| terms.iter().cloned().map(to_term).collect())
            .unwrap_or_default()
    };
    (group(0), group(1))
}

/// Normalizes a category or tag.
pub fn to_term(raw: RawTerm) -> Term {
    Term {
        id: TermId::new(raw.id.unwrap_or_default()),
        name: decoded(raw.name),
        slug: raw.slug.unwrap_or_default(),
        description: decoded(raw.description),
        count: raw.count.unwrap_or_default(),
        link: raw.link.unwrap_or_default(),
        taxonomy: raw.taxonomy.unwrap_or_default(),
        meta: into_meta(raw.meta),
    }
}

/// Normalizes a user. A record without an id (the CMS embeds an error
/// object for authors the viewer may not see) becomes the sentinel.
pub fn to_author(raw: RawAuthor) -> AuthorRef {
    let Some(id) = raw.id else {
        return AuthorRef::unknown();
    };
    let unknown = AuthorRef::unknown();
    AuthorRef {
        id: AuthorId::new(id),
        name: raw
            .name
            .filter(|name| !name.trim().is_empty())
            .map(|name| decode_entities(&name))
            .unwrap_or(unknown.name),
        slug: raw.slug.unwrap_or_default(),
        description: decoded(raw.description),
        link: raw.link.unwrap_or_default(),
        avatar_urls: raw.avatar_urls.unwrap_or_default(),
        meta: into_meta(raw.meta),
    }
}

/// Normalizes a media library item.
pub fn to_media(raw: RawMedia) -> Media {
    let details = raw.media_details.unwrap_or_default();
    let sizes = details
        .sizes
        .unwrap_or_default()
        .into_iter()
        .map(|(name, size)| {
            (
                name,
                MediaSize {
                    url: size.source_url.unwrap_or_default(),
                    width: size.width.unwrap_or_default(),
                    height: size.height.unwrap_or_default(),
                    mime_type: size.mime_type.unwrap_or_default(),
                },
            )
        })
        .collect();

    Media {
        id: MediaId::new(raw.id.unwrap_or_default()),
        url: raw.source_url.unwrap_or_default(),
        alt: raw.alt_text.unwrap_or_default(),
        caption: raw
            .caption
            .and_then(RenderedText::into_text)
            .unwrap_or_default(),
        description: raw
            .description
            .and_then(RenderedText::into_text)
            .unwrap_or_default(),
        title: decoded_text(raw.title),
        sizes,
        width: details.width.unwrap_or_default(),
        height: details.height.unwrap_or_default(),
    }
}

/// Normalizes the discovery document.
pub fn to_site_info(raw: RawSiteInfo) -> SiteInfo {
    SiteInfo {
        name: decoded(raw.name),
        description: decoded(raw.description),
        url: raw.url.unwrap_or_default(),
        home: raw.home.unwrap_or_default(),
        gmt_offset: raw
            .gmt_offset
            .as_ref()
            .and_then(scalar_number)
            .unwrap_or_default(),
        timezone_string: raw.timezone_string.unwrap_or_default(),
        namespaces: raw.namespaces.unwrap_or_default(),
    }
}

fn decoded(text: Option<String>) -> String {
    text.map(|text| decode_entities(&text)).unwrap_or_default()
}

fn decoded_text(text: Option<RenderedText>) -> String {
    decoded(text.and_then(RenderedText::into_text))
}

fn discussion_status(status: Option<String>) -> DiscussionStatus {
    status.map(DiscussionStatus::from).unwrap_or_default()
}

/// Objects become ordered maps; PHP's `[]` for an empty map and every
/// other shape become an empty map.
fn into_meta(value: Option<Value>) -> Meta {
    match value {
        Some(Value::Object(map)) => map.into_iter().collect(),
        _ => Meta::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn raw_post(value: Value) -> RawPost {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_record_normalizes_to_defaults() {
        let summary = to_summary(RawPost::default());
        assert_eq!(summary.id, ArticleId::new(0));
        assert_eq!(summary.title, "");
        assert_eq!(summary.featured_image_url, None);
        assert!(summary.categories.is_empty());
        assert!(summary.author.is_unknown());
        assert_eq!(summary.format, "standard");
        assert_eq!(summary.comment_status, DiscussionStatus::Unspecified);
        assert_eq!(summary.published_at, chrono::DateTime::<chrono::Utc>::UNIX_EPOCH);
        assert!(summary.meta.is_empty());
    }

    #[test]
    fn test_embedded_relations_resolve() {
        let summary = to_summary(raw_post(json!({
            "id": 5,
            "title": {"rendered": "Tom &amp; Jerry"},
            "comment_status": "open",
            "_embedded": {
                "author": [{"id": 3, "name": "Ada", "avatar_urls": {"24": "a.png"}}],
                "wp:featuredmedia": [{"source_url": "https://example.org/f.jpg", "alt_text": "F"}],
                "wp:term": [
                    [{"id": 1, "name": "News &amp; Views", "count": 4}],
                    [{"id": 9, "name": "rust"}]
                ]
            }
        })));

        assert_eq!(summary.title, "Tom & Jerry");
        assert_eq!(summary.author.name, "Ada");
        assert_eq!(summary.author.avatar_urls["24"], "a.png");
        assert_eq!(
            summary.featured_image_url.as_deref(),
            Some("https://example.org/f.jpg")
        );
        assert_eq!(summary.featured_image_alt, "F");
        assert_eq!(summary.categories[0].name, "News & Views");
        assert_eq!(summary.category_ids(), vec![TermId::new(1)]);
        assert_eq!(summary.tags[0].id, TermId::new(9));
        assert_eq!(summary.comment_status, DiscussionStatus::Open);
    }

    #[test]
    fn test_error_object_author_becomes_sentinel() {
        let summary = to_summary(raw_post(json!({
            "_embedded": {"author": [{"code": "rest_user_invalid_id", "message": "Invalid user ID."}]}
        })));
        assert!(summary.author.is_unknown());
    }

    #[test]
    fn test_article_prefers_page_builder_body() {
        let payload = json!([{"elType": "widget", "widgetType": "heading", "settings": {"title": "Hi", "header_size": "h3"}}]);
        let article = to_article(raw_post(json!({
            "id": 8,
            "content": {"rendered": "<p>server</p>"},
            "meta": {
                "_elementor_data": payload.to_string(),
                "_elementor_template_id": 77,
                "_elementor_edit_mode": "builder"
            }
        })));
        assert_eq!(article.body_markup, "<h3>Hi</h3>");
        assert_eq!(article.rendered_body, "<p>server</p>");
        assert!(article.has_page_builder_body());
        assert_eq!(article.page_builder_template_id.as_deref(), Some("77"));
        assert!(article.page_builder_edit_mode);
    }

    #[test]
    fn test_unreadable_payload_falls_back_to_server_body() {
        let article = to_article(raw_post(json!({
            "content": {"rendered": "<p>server</p>"},
            "meta": {"_elementor_data": "{broken"}
        })));
        assert_eq!(article.page_builder_payload, None);
        assert_eq!(article.body_markup, "<p>server</p>");
    }

    #[test]
    fn test_site_info_offset_from_string() {
        let info = to_site_info(RawSiteInfo {
            name: Some("Mukaan &#8211; Blog".to_string()),
            gmt_offset: Some(json!("2")),
            ..RawSiteInfo::default()
        });
        assert_eq!(info.name, "Mukaan – Blog");
        assert_eq!(info.gmt_offset, 2.0);
    }

    #[test]
    fn test_media_sizes() {
        let raw: RawMedia = serde_json::from_value(json!({
            "id": 4,
            "source_url": "https://example.org/full.jpg",
            "title": {"rendered": "Sun &amp; Sea"},
            "media_details": {"width": 800, "height": 600, "sizes": {
                "thumbnail": {"source_url": "https://example.org/t.jpg", "width": 150, "height": 150, "mime_type": "image/jpeg"}
            }}
        }))
        .unwrap();
        let media = to_media(raw);
        assert_eq!(media.title, "Sun & Sea");
        assert_eq!(media.width, 800);
        assert_eq!(media.sizes["thumbnail"].width, 150);
    }
}
