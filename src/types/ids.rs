// src/types/ids.rs
use super::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// Strong typing for CMS ids with phantom types.
///
/// The CMS assigns plain integers to every entity; the marker keeps an
/// article id from being passed where a category id is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: u64,
    _phantom: PhantomData<T>,
}

/// Marker types for different ID kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArticleMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AuthorMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaMarker;

pub type ArticleId = Id<ArticleMarker>;
/// Categories and tags share the term id space on the CMS side.
pub type TermId = Id<TermMarker>;
pub type AuthorId = Id<AuthorMarker>;
pub type MediaId = Id<MediaMarker>;

impl<T> Id<T> {
    pub const fn new(value: u64) -> Self {
        Self {
            value,
            _phantom: PhantomData,
        }
    }

    pub fn get(&self) -> u64 {
        self.value
    }

    /// Parses a bare number or a permalink carrying the id.
    ///
    /// Accepted link shapes are `/?p=123` and a path segment made only of
    /// digits (`/2024/123/`).
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationError::EmptyField("id"));
        }

        if let Ok(value) = input.parse::<u64>() {
            return Ok(Self::new(value));
        }

        if input.starts_with("http://") || input.starts_with("https://") {
            if let Some(value) = extract_id_from_link(input) {
                return Ok(Self::new(value));
            }
        }

        Err(ValidationError::InvalidId(format!(
            "Could not parse content id from: {}",
            input
        )))
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> FromStr for Id<T> {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<T> From<u64> for Id<T> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u64::deserialize(deserializer)?;
        Ok(Self::new(value))
    }
}

fn extract_id_from_link(link: &str) -> Option<u64> {
    static QUERY_ID: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"[?&]p=(\d+)").expect("Failed to compile query id regex - this is a bug")
    });
    static PATH_ID: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"/(\d+)(?:/|$)").expect("Failed to compile path id regex - this is a bug")
    });

    QUERY_ID
        .captures(link)
        .or_else(|| PATH_ID.captures(link))
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
