//! Response shaping for successful transforms.
//!
//! Successful image responses are long-cacheable; the `output=base64`
//! transport wraps the encoded bytes in a minimal JSON envelope instead
//! of returning them raw.

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::Response;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use pictor_core::AppError;
use pictor_processing::EncodedImage;
use serde::Serialize;

pub const CACHE_CONTROL_SUCCESS: &str = "public, max-age=31536000, s-maxage=600";

/// How the encoded result travels back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Binary,
    Base64Json,
}

impl Transport {
    /// Anything other than an explicit `output=base64` means raw bytes.
    pub fn from_query(output: Option<&str>) -> Self {
        if output == Some("base64") {
            Transport::Base64Json
        } else {
            Transport::Binary
        }
    }
}

#[derive(Serialize)]
struct Base64Envelope<'a> {
    base64: String,
    #[serde(rename = "type")]
    format: &'a str,
}

pub fn image_response(encoded: EncodedImage, transport: Transport) -> Result<Response, AppError> {
    match transport {
        Transport::Binary => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, encoded.content_type())
            .header(header::CACHE_CONTROL, CACHE_CONTROL_SUCCESS)
            .header(header::CONTENT_LENGTH, encoded.bytes.len())
            .body(Body::from(encoded.bytes))
            .map_err(|e| AppError::Internal(format!("failed to build response: {}", e))),
        Transport::Base64Json => {
            let envelope = Base64Envelope {
                base64: BASE64.encode(&encoded.bytes),
                format: encoded.format.as_str(),
            };
            let body = serde_json::to_vec(&envelope)
                .map_err(|e| AppError::Internal(format!("failed to serialize envelope: {}", e)))?;
            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::CACHE_CONTROL, CACHE_CONTROL_SUCCESS)
                .header(header::CONTENT_LENGTH, body.len())
                .body(Body::from(body))
                .map_err(|e| AppError::Internal(format!("failed to build response: {}", e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use pictor_processing::OutputFormat;

    #[test]
    fn test_transport_from_query() {
        assert_eq!(Transport::from_query(None), Transport::Binary);
        assert_eq!(Transport::from_query(Some("binary")), Transport::Binary);
        assert_eq!(
            Transport::from_query(Some("base64")),
            Transport::Base64Json
        );
    }

    #[test]
    fn test_binary_response_headers() {
        let encoded = EncodedImage {
            bytes: Bytes::from_static(b"fakeimage"),
            format: OutputFormat::Png,
        };
        let response = image_response(encoded, Transport::Binary).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            CACHE_CONTROL_SUCCESS
        );
    }

    #[test]
    fn test_base64_response_is_json_enveloped() {
        let encoded = EncodedImage {
            bytes: Bytes::from_static(b"fakeimage"),
            format: OutputFormat::Jpeg,
        };
        let response = image_response(encoded, Transport::Base64Json).unwrap();
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}
