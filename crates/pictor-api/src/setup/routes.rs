//! Route configuration and setup

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Setup all application routes.
///
/// Every image endpoint answers both GET and POST: the source reader
/// falls back to the request body when neither `file` nor `url` is given,
/// and that body can arrive on either method.
pub fn setup_routes(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/ping", get(ping))
        .route(
            "/@images/optim",
            get(handlers::optim::optim_image).post(handlers::optim::optim_image),
        )
        .route(
            "/@images/shadow",
            get(handlers::shadow::shadow_image).post(handlers::shadow::shadow_image),
        )
        .route(
            "/@images/resize",
            get(handlers::resize::resize_image).post(handlers::resize::resize_image),
        )
        .route(
            "/@images/primitive",
            get(handlers::primitive::primitive_image).post(handlers::primitive::primitive_image),
        );

    if state.config.cover_root().is_some() {
        router = router.route(
            "/@images/cover/{author}/{name}",
            get(handlers::cover::cover_image),
        );
    }

    router
        .layer(RequestBodyLimitLayer::new(state.config.max_body_bytes()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness check.
async fn ping() -> &'static str {
    "pong"
}
