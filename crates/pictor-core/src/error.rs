//! Error types module
//!
//! All failures in the transformation pipeline are unified under the
//! `AppError` enum. The HTTP layer renders every variant the same way
//! (status 500 with a one-line JSON message); what varies per variant is
//! only the log level and the client-facing message.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for bad sources and payloads supplied by the caller
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The `file` path or `url` could not be read, fetched, or decoded.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// The request body was not valid JSON with a decodable `base64` field.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Fetched bytes are not a recognized image format.
    #[error("decode failure: {0}")]
    DecodeFailure(String),

    /// A required query parameter is missing or not numeric.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The output codec rejected the image or parameters.
    #[error("encode failure: {0}")]
    EncodeFailure(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// One-line message for the `{"message": ...}` error body.
    pub fn message(&self) -> String {
        match self {
            AppError::SourceUnavailable(_)
            | AppError::InvalidPayload(_)
            | AppError::DecodeFailure(_) => "failed to load image data".to_string(),
            AppError::InvalidParameter(msg) => msg.clone(),
            AppError::EncodeFailure(_) => "failed to encode image data".to_string(),
            AppError::Internal(_) => "internal error".to_string(),
        }
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::InvalidParameter(_) => LogLevel::Debug,
            AppError::SourceUnavailable(_)
            | AppError::InvalidPayload(_)
            | AppError::DecodeFailure(_) => LogLevel::Warn,
            AppError::EncodeFailure(_) | AppError::Internal(_) => LogLevel::Error,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
