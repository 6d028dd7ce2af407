//! Shared test setup: a TestServer over the real router.

pub mod fixtures;

use std::path::PathBuf;
use std::sync::Arc;

use axum_test::TestServer;
use pictor_api::setup::routes::setup_routes;
use pictor_api::state::AppState;
use pictor_core::Config;

pub fn test_server(cover_root: Option<PathBuf>) -> TestServer {
    let state = Arc::new(AppState::new(Config::for_tests(cover_root)).expect("app state"));
    TestServer::new(setup_routes(state)).expect("test server")
}
