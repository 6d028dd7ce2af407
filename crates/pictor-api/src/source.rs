//! Source resolution: obtain raw image bytes for a request.
//!
//! Three mutually exclusive sources, tried in strict priority order with
//! the first non-empty one winning: local `file` path, remote `url`, then
//! the request body as JSON carrying a base64 payload. Read-only; nothing
//! is cached or written.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;
use pictor_core::AppError;
use serde::Deserialize;

use crate::params::{non_empty, TransformQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct InlinePayload {
    base64: String,
}

pub async fn resolve(
    state: &AppState,
    query: &TransformQuery,
    body: &Bytes,
) -> Result<Bytes, AppError> {
    if let Some(file) = non_empty(query.file.as_deref()) {
        tracing::debug!(file = %file, "reading source from local path");
        return tokio::fs::read(file)
            .await
            .map(Bytes::from)
            .map_err(|e| AppError::SourceUnavailable(format!("{}: {}", file, e)));
    }

    if let Some(url) = non_empty(query.url.as_deref()) {
        tracing::debug!(url = %url, "fetching source over http");
        let response = state
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::SourceUnavailable(format!("{}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(AppError::SourceUnavailable(format!(
                "{} returned status {}",
                url,
                response.status()
            )));
        }
        return response
            .bytes()
            .await
            .map_err(|e| AppError::SourceUnavailable(format!("{}: {}", url, e)));
    }

    let payload: InlinePayload = serde_json::from_slice(body)
        .map_err(|e| AppError::InvalidPayload(format!("request body: {}", e)))?;
    let data = BASE64
        .decode(payload.base64.as_bytes())
        .map_err(|e| AppError::InvalidPayload(format!("base64 field: {}", e)))?;
    Ok(Bytes::from(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pictor_core::Config;

    fn test_state() -> AppState {
        AppState::new(Config::for_tests(None)).expect("state")
    }

    #[tokio::test]
    async fn test_missing_file_is_source_unavailable() {
        let query = TransformQuery {
            file: Some("/definitely/not/here.jpg".to_string()),
            ..Default::default()
        };
        let err = resolve(&test_state(), &query, &Bytes::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_file_takes_priority_over_body() {
        // A present (but unreadable) file param must win over the body.
        let query = TransformQuery {
            file: Some("/definitely/not/here.jpg".to_string()),
            ..Default::default()
        };
        let body = Bytes::from(r#"{"base64": "aGVsbG8="}"#);
        let err = resolve(&test_state(), &query, &body).await.unwrap_err();
        assert!(matches!(err, AppError::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_empty_body_is_invalid_payload() {
        let err = resolve(&test_state(), &TransformQuery::default(), &Bytes::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidPayload(_)));
    }

    #[tokio::test]
    async fn test_bad_base64_is_invalid_payload() {
        let body = Bytes::from(r#"{"base64": "%%%not-base64%%%"}"#);
        let err = resolve(&test_state(), &TransformQuery::default(), &body)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidPayload(_)));
    }

    #[tokio::test]
    async fn test_valid_base64_body_decodes() {
        let body = Bytes::from(r#"{"base64": "aGVsbG8="}"#);
        let bytes = resolve(&test_state(), &TransformQuery::default(), &body)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"hello");
    }
}
