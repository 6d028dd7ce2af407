//! Optim endpoint: quality-only re-encode at the source's own width.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    response::Response,
};
use pictor_core::AppError;
use pictor_processing::{decode_image, encode, Kernel, OutputFormat};

use crate::error::HttpAppError;
use crate::params::TransformQuery;
use crate::respond::{self, Transport};
use crate::source;
use crate::state::AppState;

pub async fn optim_image(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TransformQuery>,
    body: Bytes,
) -> Result<Response, HttpAppError> {
    let data = source::resolve(&state, &query, &body).await?;

    let requested = query.output_type.clone();
    let quality = query.quality();
    let transport = Transport::from_query(query.output.as_deref());
    let resampler = state.resampler.clone();

    let encoded = tokio::task::spawn_blocking(move || {
        let decoded = decode_image(&data)?;
        let format = OutputFormat::negotiate(requested.as_deref(), decoded.format);
        // Resize to the original width: dimensions stay put, only the
        // re-encode below changes the payload.
        let (width, _) = decoded.dimensions();
        tracing::debug!(
            source = decoded.format.as_str(),
            width,
            output = format.as_str(),
            "re-encoding at original width"
        );
        let passed = resampler.resize(&decoded.image, width, 0, Kernel::Lanczos);
        encode(&passed, format, quality)
    })
    .await
    .map_err(|e| AppError::Internal(format!("blocking task failed: {}", e)))??;

    Ok(respond::image_response(encoded, transport)?)
}
