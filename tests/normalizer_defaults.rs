//! Normalization of recorded CMS responses into the entity model.

mod common;

use chrono::{TimeZone, Utc};
use cms_reader::api::responses::{RawPost, RawSiteInfo, RawTerm};
use cms_reader::{
    to_article, to_site_info, to_summary, to_term, ArticleId, AuthorId, DiscussionStatus, TermId,
};
use pretty_assertions::assert_eq;

fn post_42() -> RawPost {
    serde_json::from_str(common::POST_42).expect("fixture parses")
}

#[test]
fn test_full_post_resolves_every_field() {
    let article = to_article(post_42());
    let summary = &article.summary;

    assert_eq!(summary.id, ArticleId::new(42));
    assert_eq!(summary.title, "Hallo & Welt");
    assert_eq!(summary.excerpt, "<p>Ein kurzer Gruß …</p>\n");
    assert_eq!(
        summary.published_at,
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    );
    assert_eq!(
        summary.modified_at,
        Utc.with_ymd_and_hms(2024, 3, 2, 11, 30, 0).unwrap()
    );
    assert_eq!(summary.permalink, "https://mukaan.de/hallo-welt/");
    assert_eq!(summary.slug, "hallo-welt");
    assert_eq!(
        summary.featured_image_url.as_deref(),
        Some("https://mukaan.de/wp-content/uploads/2024/03/welt.jpg")
    );
    assert_eq!(summary.featured_image_alt, "Eine Weltkugel");
    assert_eq!(summary.comment_status, DiscussionStatus::Open);
    assert_eq!(summary.ping_status, DiscussionStatus::Closed);
    assert_eq!(summary.format, "standard");
    assert!(summary.meta.is_empty());
    assert!(summary.links.contains_key("self"));

    assert_eq!(article.rendered_body, "<p>Hi</p>");
    assert_eq!(article.body_markup, "<p>Hi</p>");
    assert_eq!(article.page_builder_payload, None);
    assert!(!article.page_builder_edit_mode);
}

#[test]
fn test_embedded_author_and_terms() {
    let summary = to_article(post_42()).summary;

    assert_eq!(summary.author.id, AuthorId::new(2));
    assert_eq!(summary.author.name, "Mira Köhler");
    assert_eq!(summary.author.avatar_urls.len(), 3);

    let categories: Vec<&str> = summary.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(categories, vec!["Kultur", "Leben & Alltag"]);
    assert_eq!(summary.category_ids(), vec![TermId::new(3), TermId::new(8)]);

    let tags: Vec<&str> = summary.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(tags, vec!["Berlin"]);
}

#[test]
fn test_sparse_list_entry_falls_back_to_defaults() {
    let posts: Vec<RawPost> = serde_json::from_str(common::POSTS_LIST).unwrap();
    let summaries: Vec<_> = posts.into_iter().map(to_summary).collect();
    let sparse = &summaries[1];

    assert_eq!(sparse.id, ArticleId::new(41));
    assert_eq!(sparse.title, "Ohne \u{201e}Alles\u{201c}");
    assert_eq!(sparse.excerpt, "");
    // Only the local timestamp is present; it is read as UTC.
    assert_eq!(
        sparse.published_at,
        Utc.with_ymd_and_hms(2024, 2, 28, 8, 15, 0).unwrap()
    );
    assert_eq!(sparse.modified_at, chrono::DateTime::<Utc>::UNIX_EPOCH);
    assert!(sparse.author.is_unknown());
    assert_eq!(sparse.author.name, "Unknown author");
    assert_eq!(sparse.featured_image_url, None);
    assert!(sparse.categories.is_empty());
    assert!(sparse.tags.is_empty());
    assert_eq!(sparse.format, "standard");
    assert_eq!(sparse.comment_status, DiscussionStatus::Unspecified);
}

#[test]
fn test_mistyped_fields_do_not_reject_the_record() {
    let raw: RawPost = serde_json::from_str(
        r#"{
            "id": 7,
            "title": 12,
            "excerpt": {"rendered": false},
            "_embedded": {"author": {"unexpected": "shape"}},
            "meta": "nope"
        }"#,
    )
    .unwrap();
    let summary = to_summary(raw);

    assert_eq!(summary.id, ArticleId::new(7));
    assert_eq!(summary.title, "");
    assert_eq!(summary.excerpt, "");
    assert!(summary.author.is_unknown());
    assert!(summary.meta.is_empty());
}

#[test]
fn test_terms_decode_names_and_default_counts() {
    let terms: Vec<RawTerm> = serde_json::from_str(common::CATEGORIES).unwrap();
    let terms: Vec<_> = terms.into_iter().map(to_term).collect();

    assert_eq!(terms[0].name, "Leben & Alltag");
    assert_eq!(terms[0].count, 31);
    assert_eq!(terms[1].description, "Kunst, Musik & Bühne");
    assert_eq!(terms[2].name, "Allgemein");
    assert_eq!(terms[2].count, 0);
    assert_eq!(terms[2].slug, "");
}

#[test]
fn test_site_info_reads_string_offset() {
    let raw: RawSiteInfo = serde_json::from_str(common::SITE_INFO).unwrap();
    let site = to_site_info(raw);

    assert_eq!(site.name, "Mukaan");
    assert_eq!(site.description, "Geschichten & Menschen");
    assert_eq!(site.gmt_offset, 1.0);
    assert_eq!(site.timezone_string, "Europe/Berlin");
    assert!(site.namespaces.iter().any(|ns| ns == "mukaan-app/v1"));
}
