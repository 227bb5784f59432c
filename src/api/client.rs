// src/api/client.rs
//! Pure HTTP client wrapper for the CMS REST API.
//!
//! This module provides a thin wrapper around reqwest. It resolves request
//! paths against the site URL and returns the body text with its status;
//! parsing and business logic live elsewhere.

use super::{CmsRequest, CmsTransport};
use crate::error::AppError;
use crate::types::ValidationError;
use reqwest::{header, Client, Response};
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// A thin wrapper around reqwest Client for CMS requests.
#[derive(Clone)]
pub struct CmsHttpClient {
    client: Client,
    site_url: Url,
}

impl CmsHttpClient {
    /// Creates a new HTTP client for the site at `site_url`.
    pub fn new(site_url: Url, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers())
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            site_url: with_trailing_slash(site_url),
        })
    }

    fn create_headers() -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers
    }

    pub fn site_url(&self) -> &Url {
        &self.site_url
    }

    /// Resolves a request against the site root, appending its query.
    pub fn url_for(&self, request: &CmsRequest) -> Result<Url, AppError> {
        let mut url = self
            .site_url
            .join(request.path.trim_start_matches('/'))
            .map_err(|e| ValidationError::InvalidUrl {
                url: request.path.clone(),
                reason: e.to_string(),
            })?;
        if !request.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }

    /// Makes a GET request to the specified URL.
    pub async fn get(&self, url: Url) -> Result<Response, AppError> {
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        log::debug!("{} from {}", response.status(), response.url());
        Ok(response)
    }
}

#[async_trait::async_trait]
impl CmsTransport for CmsHttpClient {
    async fn execute(&self, request: &CmsRequest) -> Result<ApiResponse<String>, AppError> {
        let url = self.url_for(request)?;
        let response = self.get(url).await?;
        extract_response_text(response).await
    }
}

/// `Url::join` drops the last path segment unless it ends with a slash,
/// which would lose a site installed under a sub-path.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

impl ApiResponse<String> {
    /// A successful response, as replayed from a cache or a test double.
    pub fn ok(url: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            status: reqwest::StatusCode::OK,
            url: url.into(),
        }
    }
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
