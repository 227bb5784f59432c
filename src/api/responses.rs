// src/api/responses.rs
//! Raw CMS records, exactly as loose as the wire format.
//!
//! Every field is optional and every nested object tolerates a different
//! shape than expected (WordPress serializes empty PHP arrays as `[]`
//! where an object would normally appear). Resolving defaults is the
//! normalizer's job; these types only make absence explicit.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes a field leniently: any shape mismatch becomes `None`
/// instead of failing the whole record.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// A `{ "rendered": "..." }` wrapper, or a bare string in some contexts.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RenderedText {
    Rendered {
        #[serde(default)]
        rendered: Option<String>,
    },
    Plain(String),
}

impl RenderedText {
    pub fn into_text(self) -> Option<String> {
        match self {
            RenderedText::Rendered { rendered } => rendered,
            RenderedText::Plain(text) => Some(text),
        }
    }
}

/// A post record from `/posts` or `/posts/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPost {
    pub id: Option<u64>,
    pub date: Option<String>,
    pub date_gmt: Option<String>,
    pub modified: Option<String>,
    pub modified_gmt: Option<String>,
    pub link: Option<String>,
    pub slug: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub title: Option<RenderedText>,
    #[serde(deserialize_with = "lenient")]
    pub excerpt: Option<RenderedText>,
    #[serde(deserialize_with = "lenient")]
    pub content: Option<RenderedText>,
    pub comment_status: Option<String>,
    pub ping_status: Option<String>,
    pub format: Option<String>,
    pub meta: Option<Value>,
    #[serde(rename = "_links")]
    pub links: Option<Value>,
    #[serde(rename = "_embedded", deserialize_with = "lenient")]
    pub embedded: Option<RawEmbedded>,
}

/// The `_embedded` side-channel produced by `?_embed`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawEmbedded {
    #[serde(deserialize_with = "lenient")]
    pub author: Option<Vec<RawAuthor>>,
    #[serde(rename = "wp:featuredmedia", deserialize_with = "lenient")]
    pub featured_media: Option<Vec<RawMedia>>,
    /// Term groups in taxonomy order: categories first, then tags.
    #[serde(rename = "wp:term", deserialize_with = "lenient")]
    pub terms: Option<Vec<Vec<RawTerm>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTerm {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub count: Option<u64>,
    pub link: Option<String>,
    pub taxonomy: Option<String>,
    pub meta: Option<Value>,
}

/// A user record. Embedded authors the viewer may not see arrive as
/// error objects, which deserialize here with every field empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAuthor {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub avatar_urls: Option<IndexMap<String, String>>,
    pub meta: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawMedia {
    pub id: Option<u64>,
    pub source_url: Option<String>,
    pub alt_text: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub caption: Option<RenderedText>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<RenderedText>,
    #[serde(deserialize_with = "lenient")]
    pub title: Option<RenderedText>,
    #[serde(deserialize_with = "lenient")]
    pub media_details: Option<RawMediaDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawMediaDetails {
    pub width: Option<u32>,
    pub height: Option<u32>,
    #[serde(deserialize_with = "lenient")]
    pub sizes: Option<IndexMap<String, RawMediaSize>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawMediaSize {
    pub source_url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub mime_type: Option<String>,
}

/// The discovery document served at the API root.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSiteInfo {
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub home: Option<String>,
    /// A number, or a numeric string on some hosts.
    pub gmt_offset: Option<Value>,
    pub timezone_string: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub namespaces: Option<Vec<String>>,
}

/// The CMS's error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCmsError {
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "lenient")]
    pub data: Option<RawCmsErrorData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCmsErrorData {
    pub status: Option<u16>,
}
