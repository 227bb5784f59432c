// tests/common/mod.rs
//! Shared test doubles: an in-memory CMS and fixture loading.

#![allow(dead_code)]

use cms_reader::{ApiResponse, AppError, CmsRequest, CmsTransport};
use parking_lot::Mutex;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::Arc;

pub const POST_42: &str = include_str!("../fixtures/api_responses/post_42.json");
pub const POSTS_LIST: &str = include_str!("../fixtures/api_responses/posts_list.json");
pub const CATEGORIES: &str = include_str!("../fixtures/api_responses/categories.json");
pub const SITE_INFO: &str = include_str!("../fixtures/api_responses/site_info.json");
pub const RELATED: &str = include_str!("../fixtures/api_responses/related_posts.json");

/// A CMS that answers from a route table keyed by request path.
///
/// Unrouted paths answer like the real site does: 404 with
/// `rest_no_route`.
#[derive(Default)]
pub struct FakeCms {
    routes: Mutex<HashMap<String, (StatusCode, String)>>,
    requests: Mutex<Vec<CmsRequest>>,
}

impl FakeCms {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, path: &str, status: u16, body: &str) {
        let status = StatusCode::from_u16(status).expect("valid status");
        self.routes
            .lock()
            .insert(path.to_string(), (status, body.to_string()));
    }

    pub fn ok(&self, path: &str, body: &str) {
        self.respond(path, 200, body);
    }

    /// Makes `path` fail the way an overloaded origin does.
    pub fn fail(&self, path: &str) {
        self.respond(path, 503, "<html>Service Unavailable</html>");
    }

    pub fn requests(&self) -> Vec<CmsRequest> {
        self.requests.lock().clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|request| request.path == path)
            .count()
    }

    /// Query pairs of the most recent request to `path`.
    pub fn last_query(&self, path: &str) -> Vec<(String, String)> {
        self.requests
            .lock()
            .iter()
            .rev()
            .find(|request| request.path == path)
            .map(|request| request.query.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl CmsTransport for FakeCms {
    async fn execute(&self, request: &CmsRequest) -> Result<ApiResponse<String>, AppError> {
        self.requests.lock().push(request.clone());
        let (status, data) = self.routes.lock().get(&request.path).cloned().unwrap_or((
            StatusCode::NOT_FOUND,
            r#"{"code":"rest_no_route","message":"No route was found matching the URL and request method.","data":{"status":404}}"#
                .to_string(),
        ));
        Ok(ApiResponse {
            data,
            status,
            url: format!("https://cms.test/{}", request.cache_key()),
        })
    }
}

pub fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub const POSTS_PATH: &str = "wp-json/wp/v2/posts";

pub fn post_path(id: u64) -> String {
    format!("{}/{}", POSTS_PATH, id)
}
