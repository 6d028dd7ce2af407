//! Query parameter contract shared by all image endpoints.
//!
//! Everything arrives as optional raw strings; each operation decides
//! which of them are required and how strictly to parse, and does so
//! before any source byte is fetched or decoded.

use pictor_core::AppError;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct TransformQuery {
    pub file: Option<String>,
    pub url: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub times: Option<String>,
    #[serde(rename = "type")]
    pub output_type: Option<String>,
    pub quality: Option<String>,
    pub output: Option<String>,
}

impl TransformQuery {
    /// Quality is lenient: absent or unparseable values become 0, which
    /// downstream means "codec default" (or lossless for WebP).
    pub fn quality(&self) -> i32 {
        self.quality
            .as_deref()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0)
    }
}

pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Strict parse for parameters that must be present and numeric.
pub fn require_u32(value: Option<&str>, name: &str) -> Result<u32, AppError> {
    let raw = non_empty(value)
        .ok_or_else(|| AppError::InvalidParameter(format!("{} can't be empty", name)))?;
    raw.parse::<u32>()
        .map_err(|_| AppError::InvalidParameter(format!("{} isn't a valid number", name)))
}

/// Lenient parse: absent or unparseable values become 0 ("derive this
/// dimension" for the resampler).
pub fn lenient_u32(value: Option<&str>) -> u32 {
    value.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

/// Positive integer or the given default; non-numeric and non-positive
/// values silently fall back.
pub fn positive_or_default(value: Option<&str>, default: u32) -> u32 {
    match value.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(v) if v > 0 => v as u32,
        _ => default,
    }
}
