//! HTTP error response conversion
//!
//! Handlers return `Result<Response, HttpAppError>`; any `AppError` (or
//! type convertible into one) bubbles up with `?` and renders uniformly.
//! The contract is deliberately flat: every failure is a 500 with a
//! one-line `{"message": ...}` body — there is no per-kind status mapping
//! and no retry path, a failed request is simply over.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use pictor_core::{AppError, LogLevel};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: IntoResponse is external, AppError lives in pictor-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

fn log_error(error: &AppError) {
    match error.log_level() {
        LogLevel::Debug => tracing::debug!(error = %error, "request failed"),
        LogLevel::Warn => tracing::warn!(error = %error, "request failed"),
        LogLevel::Error => tracing::error!(error = %error, "request failed"),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        log_error(&self.0);

        let body = Json(ErrorResponse {
            message: self.0.message(),
        });
        let mut response = (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        response
    }
}
