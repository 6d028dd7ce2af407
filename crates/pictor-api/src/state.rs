//! Application state.
//!
//! One read-only state shared by every request: configuration, the HTTP
//! client for URL sources, and the two pipeline capabilities as trait
//! objects so tests can substitute deterministic fakes.

use std::sync::Arc;
use std::time::Duration;

use pictor_core::Config;
use pictor_processing::{Approximate, CpuResampler, Resample, TriangleStylizer};

pub struct AppState {
    pub config: Config,
    pub http: reqwest::Client,
    pub resampler: Arc<dyn Resample>,
    pub stylizer: Arc<dyn Approximate>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, anyhow::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs()))
            .build()?;

        Ok(Self {
            config,
            http,
            resampler: Arc::new(CpuResampler),
            stylizer: Arc::new(TriangleStylizer),
        })
    }
}
