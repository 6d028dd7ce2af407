use std::sync::Arc;

use pictor_api::state::AppState;
use pictor_api::{setup, telemetry};
use pictor_core::Config;

// Use mimalloc as the global allocator for better performance and lower
// fragmentation, especially on musl-based systems inside containers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    telemetry::init_telemetry();

    let state = Arc::new(AppState::new(config.clone())?);
    let router = setup::routes::setup_routes(state);

    // Start the server
    setup::server::start_server(&config, router).await?;

    Ok(())
}
