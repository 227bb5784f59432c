// src/api/parser.rs
//! Turns response text into raw records or typed errors.
//!
//! Successful bodies are deserialized into the loose raw types of
//! [`responses`](super::responses). Error bodies are decoded into a
//! [`CmsErrorCode`] when they follow the CMS envelope, and fall back to the
//! HTTP status otherwise.

use super::client::ApiResponse;
use super::responses::RawCmsError;
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, CmsErrorCode};
use crate::model::TableRow;
use reqwest::StatusCode;
use serde_json::Value;

/// Parse any CMS response into `T`, or into the error it reports.
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    if result.status.is_success() {
        parse_body(&result.data, &result.url)
    } else {
        Err(parse_error_body(&result.data, result.status, &result.url))
    }
}

fn parse_body<T>(body: &str, url: &str) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        AppError::malformed(url, format!("{} (body: {})", e, preview(body)))
    })
}

fn parse_error_body(body: &str, status: StatusCode, url: &str) -> AppError {
    if let Ok(error) = serde_json::from_str::<RawCmsError>(body) {
        return AppError::CmsService {
            code: CmsErrorCode::from_api_response(&error.code),
            message: error.message,
            status: error
                .data
                .and_then(|data| data.status)
                .and_then(|code| StatusCode::from_u16(code).ok())
                .unwrap_or(status),
        };
    }

    AppError::CmsService {
        code: CmsErrorCode::from_http_status(status.as_u16()),
        message: format!("HTTP {} from {}", status, url),
        status,
    }
}

/// Parse the table endpoint's rows: an array of header-keyed objects.
///
/// Cells that are not strings are rendered as their JSON text; entries that
/// are not objects are skipped.
pub fn parse_table_rows(result: ApiResponse<String>) -> Result<Vec<TableRow>, AppError> {
    let url = result.url.clone();
    let rows: Vec<Value> = parse_api_response(result)?;
    let parsed = rows
        .into_iter()
        .filter_map(|row| match row {
            Value::Object(cells) => Some(
                cells
                    .into_iter()
                    .map(|(header, cell)| (header, cell_text(cell)))
                    .collect::<TableRow>(),
            ),
            other => {
                log::warn!("Skipping non-object table row from {}: {}", url, other);
                None
            }
        })
        .collect();
    Ok(parsed)
}

fn cell_text(cell: Value) -> String {
    match cell {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let cut: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", cut)
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::responses::RawPost;
    use crate::error::ErrorKind;

    fn response(status: u16, body: &str) -> ApiResponse<String> {
        ApiResponse {
            data: body.to_string(),
            status: StatusCode::from_u16(status).unwrap(),
            url: "https://example.org/wp-json/wp/v2/posts/9".to_string(),
        }
    }

    #[test]
    fn test_error_envelope_becomes_typed_code() {
        let body = r#"{"code":"rest_post_invalid_id","message":"Invalid post ID.","data":{"status":404}}"#;
        let err = parse_api_response::<RawPost>(response(404, body)).unwrap_err();
        match &err {
            AppError::CmsService { code, status, .. } => {
                assert_eq!(code, &CmsErrorCode::InvalidPostId);
                assert_eq!(*status, StatusCode::NOT_FOUND);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_unparseable_error_body_falls_back_to_status() {
        let err = parse_api_response::<RawPost>(response(502, "<html>Bad Gateway</html>"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteFailure);
        assert!(err.to_string().contains("http_502"));
    }

    #[test]
    fn test_malformed_success_body_is_parse_failure() {
        let err = parse_api_response::<RawPost>(response(200, "{not json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
    }

    #[test]
    fn test_table_rows_keep_header_order() {
        let body = r#"[{"Name":"A","Preis":3},{"Name":"B","Preis":null},"junk"]"#;
        let rows = parse_table_rows(response(200, body)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["Name", "Preis"]);
        assert_eq!(rows[0]["Preis"], "3");
        assert_eq!(rows[1]["Preis"], "");
    }
}
