// src/model/media.rs
use crate::types::MediaId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A media library item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub id: MediaId,
    pub url: String,
    pub alt: String,
    pub caption: String,
    pub description: String,
    pub title: String,
    /// Generated renditions keyed by size name (`thumbnail`, `medium`, ...).
    pub sizes: IndexMap<String, MediaSize>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaSize {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub mime_type: String,
}

/// What the site's discovery document says about itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteInfo {
    pub name: String,
    pub description: String,
    pub url: String,
    pub home: String,
    /// Offset of the site's local time from UTC, in hours.
    pub gmt_offset: f64,
    pub timezone_string: String,
    pub namespaces: Vec<String>,
}
