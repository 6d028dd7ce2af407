//! Resize endpoint: direct resample.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    response::Response,
};
use pictor_core::AppError;
use pictor_processing::{decode_image, encode, Kernel, OutputFormat};

use crate::error::HttpAppError;
use crate::params::{self, TransformQuery};
use crate::respond::{self, Transport};
use crate::source;
use crate::state::AppState;

pub async fn resize_image(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TransformQuery>,
    body: Bytes,
) -> Result<Response, HttpAppError> {
    if params::non_empty(query.width.as_deref()).is_none()
        && params::non_empty(query.height.as_deref()).is_none()
    {
        return Err(AppError::InvalidParameter(
            "width and height can't both be empty".to_string(),
        )
        .into());
    }

    // Lenient parsing: a value that fails to parse means "derive this
    // dimension", exactly like an absent one.
    let width = params::lenient_u32(query.width.as_deref());
    let height = params::lenient_u32(query.height.as_deref());

    tracing::debug!(width, height, "resize request");

    let data = source::resolve(&state, &query, &body).await?;

    let requested = query.output_type.clone();
    let quality = query.quality();
    let transport = Transport::from_query(query.output.as_deref());
    let resampler = state.resampler.clone();

    let encoded = tokio::task::spawn_blocking(move || {
        let decoded = decode_image(&data)?;
        let format = OutputFormat::negotiate(requested.as_deref(), decoded.format);
        let resized = resampler.resize(&decoded.image, width, height, Kernel::Lanczos);
        encode(&resized, format, quality)
    })
    .await
    .map_err(|e| AppError::Internal(format!("blocking task failed: {}", e)))??;

    Ok(respond::image_response(encoded, transport)?)
}
