// src/error.rs
//! Application error types with structured error handling.
//!
//! Every failure in the content pipeline falls into one of four kinds:
//! the remote side failed, its answer could not be parsed, the thing asked
//! for does not exist, or something local (configuration, disk) broke.
//! The public client surface degrades these into empty results; the
//! variants here exist so the cache and the binary can tell them apart.

use std::fmt;
use thiserror::Error;

/// CMS REST error codes as a typed vocabulary.
///
/// WordPress answers failures with `{"code": "...", "message": "...",
/// "data": {"status": 404}}`. The codes this client reacts to get their
/// own variant; everything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmsErrorCode {
    /// The post (or attachment) id does not exist or is not published
    InvalidPostId,
    /// The category or tag id does not exist
    InvalidTerm,
    /// The user id does not exist
    InvalidUserId,
    /// The route is not registered (plugin missing, typo in the path)
    NoRoute,
    /// The site refused the request
    Forbidden,
    /// A query parameter failed the CMS's validation
    InvalidParam,
    /// Table endpoint: the content carries no page-builder payload
    NoPageBuilderData,
    /// Table endpoint: no table or raw-HTML widget in the payload
    NoTableWidget,
    /// Table endpoint: the widget holds no `<table>` markup
    NoHtmlTable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl CmsErrorCode {
    /// Parse a CMS error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rest_post_invalid_id" => Self::InvalidPostId,
            "rest_term_invalid" => Self::InvalidTerm,
            "rest_user_invalid_id" => Self::InvalidUserId,
            "rest_no_route" => Self::NoRoute,
            "rest_forbidden" | "rest_cannot_read" => Self::Forbidden,
            "rest_invalid_param" => Self::InvalidParam,
            "no_elementor_data" => Self::NoPageBuilderData,
            "no_table_widget" => Self::NoTableWidget,
            "no_html_table" => Self::NoHtmlTable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    /// Whether this error means the resource simply doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::InvalidPostId
                | Self::InvalidTerm
                | Self::InvalidUserId
                | Self::NoPageBuilderData
                | Self::NoTableWidget
                | Self::NoHtmlTable
                | Self::HttpStatus(404)
        )
    }
}

impl fmt::Display for CmsErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPostId => write!(f, "rest_post_invalid_id"),
            Self::InvalidTerm => write!(f, "rest_term_invalid"),
            Self::InvalidUserId => write!(f, "rest_user_invalid_id"),
            Self::NoRoute => write!(f, "rest_no_route"),
            Self::Forbidden => write!(f, "rest_forbidden"),
            Self::InvalidParam => write!(f, "rest_invalid_param"),
            Self::NoPageBuilderData => write!(f, "no_elementor_data"),
            Self::NoTableWidget => write!(f, "no_table_widget"),
            Self::NoHtmlTable => write!(f, "no_html_table"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// The four failure kinds callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Non-success HTTP status or transport error
    RemoteFailure,
    /// Malformed JSON or malformed page-builder payload
    ParseFailure,
    /// A valid answer saying the entity does not exist
    NotFound,
    /// Configuration, filesystem or internal failures
    Local,
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("CMS returned an error ({code}, HTTP {status}): {message}")]
    CmsService {
        code: CmsErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    #[error("Page-builder payload could not be read: {0}")]
    InvalidPageTree(String),

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Local store failure for key '{key}': {message}")]
    Storage { key: String, message: String },

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),
}

impl AppError {
    /// Classifies the error into the failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NetworkFailure(_) => ErrorKind::RemoteFailure,
            AppError::CmsService { code, .. } if code.is_not_found() => ErrorKind::NotFound,
            AppError::CmsService { .. } => ErrorKind::RemoteFailure,
            AppError::MalformedResponse { .. } | AppError::InvalidPageTree(_) => {
                ErrorKind::ParseFailure
            }
            AppError::NotFound { .. } => ErrorKind::NotFound,
            AppError::MissingConfiguration(_)
            | AppError::Io(_)
            | AppError::Storage { .. }
            | AppError::Validation(_) => ErrorKind::Local,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub(crate) fn malformed(url: impl Into<String>, err: impl fmt::Display) -> Self {
        AppError::MalformedResponse {
            url: url.into(),
            message: err.to_string(),
        }
    }
}
