//! Primitive endpoint: polygon-approximation stylization.

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

pub async fn primitive_image(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TransformQuery>,
    body: Bytes,
) -> Result<Response, HttpAppError> {
    let width = params::lenient_u32(query.width.as_deref());
    let height = params::lenient_u32(query.height.as_deref());
    // `times` doubles as the shape budget here; 0 lets the stylizer pick
    // its default.
    let shapes = params::lenient_u32(query.times.as_deref());
    let workers = state.config.stylize_workers();

    tracing::debug!(width, height, shapes, workers, "primitive request");

    let data = source::resolve(&state, &query, &body).await?;

    let requested = query.output_type.clone();
    let quality = query.quality();
    let transport = Transport::from_query(query.output.as_deref());
    let resampler = state.resampler.clone();
    let stylizer = state.stylizer.clone();

    let encoded = tokio::task::spawn_blocking(move || {
        let decoded = decode_image(&data)?;
        let format = OutputFormat::negotiate(requested.as_deref(), decoded.format);

        // Pre-scale with the fast kernel when dimensions were given; the
        // output is synthetic shapes, so resample quality is irrelevant.
        let mut image = decoded.image;
        if width != 0 || height != 0 {
            image = resampler.resize(&image, width, height, Kernel::Bilinear);
        }

        let styled = stylizer.approximate(&image, shapes, workers)?;
        encode(&styled, format, quality)
    })
    .await
    .map_err(|e| AppError::Internal(format!("blocking task failed: {}", e)))??;

    Ok(respond::image_response(encoded, transport)?)
}
