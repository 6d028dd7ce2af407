//! Cover endpoint: shadow thumbnail for a cover image addressed by
//! `{author}/{name}` under the configured cover root.
//!
//! This folds the path-template service variants into the generic
//! pipeline: the route only exists when `COVER_ROOT` is set, and the
//! source is always `{root}/{author}/{name}/cover.jpg`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    response::Response,
};
use pictor_core::AppError;
use pictor_processing::DEFAULT_BLUR_TIMES;

use crate::error::HttpAppError;
use crate::handlers::shadow::render_shadow;
use crate::params::{self, TransformQuery};
use crate::state::AppState;

pub async fn cover_image(
    State(state): State<Arc<AppState>>,
    Path((author, name)): Path<(String, String)>,
    Query(query): Query<TransformQuery>,
    _body: Bytes,
) -> Result<Response, HttpAppError> {
    let root = state
        .config
        .cover_root()
        .ok_or_else(|| AppError::InvalidParameter("cover root is not configured".to_string()))?
        .clone();

    let width = params::require_u32(query.width.as_deref(), "width")?;
    let height = params::require_u32(query.height.as_deref(), "height")?;
    let times = params::positive_or_default(query.times.as_deref(), DEFAULT_BLUR_TIMES);

    validate_segment(&author)?;
    validate_segment(&name)?;

    let path = root.join(&author).join(&name).join("cover.jpg");
    tracing::debug!(cover = %path.display(), width, height, times, "cover request");

    let data = tokio::fs::read(&path)
        .await
        .map(Bytes::from)
        .map_err(|e| AppError::SourceUnavailable(format!("{}: {}", path.display(), e)))?;

    render_shadow(state, &query, data, width, height, times).await
}

/// Path segments must stay inside the cover root.
fn validate_segment(segment: &str) -> Result<(), AppError> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains('/')
        || segment.contains('\\')
    {
        return Err(AppError::InvalidParameter(
            "invalid cover path segment".to_string(),
        ));
    }
    Ok(())
}
