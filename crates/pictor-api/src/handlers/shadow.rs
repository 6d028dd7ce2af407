//! Shadow endpoint: blurred, vertically centered thumbnail.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    response::Response,
};
use pictor_core::AppError;
use pictor_processing::{decode_image, encode, shadow, OutputFormat, DEFAULT_BLUR_TIMES};

use crate::error::HttpAppError;
use crate::params::{self, TransformQuery};
use crate::respond::{self, Transport};
use crate::source;
use crate::state::AppState;

pub async fn shadow_image(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TransformQuery>,
    body: Bytes,
) -> Result<Response, HttpAppError> {
    // Required parameters are validated before any decode cost is paid.
    let width = params::require_u32(query.width.as_deref(), "width")?;
    let height = params::require_u32(query.height.as_deref(), "height")?;
    let times = params::positive_or_default(query.times.as_deref(), DEFAULT_BLUR_TIMES);

    tracing::debug!(width, height, times, "shadow request");

    let data = source::resolve(&state, &query, &body).await?;
    render_shadow(state, &query, data, width, height, times).await
}

/// Shared by the shadow and cover endpoints: decode, compose, encode,
/// respond. Runs the CPU work on the blocking pool.
pub(crate) async fn render_shadow(
    state: Arc<AppState>,
    query: &TransformQuery,
    data: Bytes,
    width: u32,
    height: u32,
    times: u32,
) -> Result<Response, HttpAppError> {
    let requested = query.output_type.clone();
    let quality = query.quality();
    let transport = Transport::from_query(query.output.as_deref());
    let resampler = state.resampler.clone();

    let encoded = tokio::task::spawn_blocking(move || {
        let decoded = decode_image(&data)?;
        let format = OutputFormat::negotiate(requested.as_deref(), decoded.format);
        let thumbnail = shadow::compose(resampler.as_ref(), &decoded.image, width, height, times)?;
        encode(&thumbnail, format, quality)
    })
    .await
    .map_err(|e| AppError::Internal(format!("blocking task failed: {}", e)))??;

    Ok(respond::image_response(encoded, transport)?)
}
