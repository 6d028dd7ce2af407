//! Configuration module
//!
//! Environment-backed configuration for the service. Everything has a
//! default so a bare `pictor-api` starts up exactly like the original
//! deployment; `COVER_ROOT` is the one knob that changes the route
//! surface (it enables the cover endpoint).

use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 3015;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    server_port: u16,
    fetch_timeout_secs: u64,
    max_body_bytes: usize,
    /// Base directory for the cover endpoint; `None` disables it.
    cover_root: Option<PathBuf>,
    /// Worker count for the stylizer's parallel shape search.
    stylize_workers: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        // Load .env if present; real environment wins.
        dotenvy::dotenv().ok();

        let server_port = parse_env("PORT", DEFAULT_PORT)?;
        let fetch_timeout_secs = parse_env("FETCH_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT_SECS)?;
        let max_body_bytes = parse_env("MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?;
        let cover_root = env::var("COVER_ROOT").ok().map(PathBuf::from);
        let stylize_workers = parse_env("STYLIZE_WORKERS", default_workers())?;

        Ok(Self {
            server_port,
            fetch_timeout_secs,
            max_body_bytes,
            cover_root,
            stylize_workers: stylize_workers.max(1),
        })
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn fetch_timeout_secs(&self) -> u64 {
        self.fetch_timeout_secs
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    pub fn cover_root(&self) -> Option<&PathBuf> {
        self.cover_root.as_ref()
    }

    pub fn stylize_workers(&self) -> usize {
        self.stylize_workers
    }

    /// Configuration for tests: fixed defaults plus an optional cover root.
    pub fn for_tests(cover_root: Option<PathBuf>) -> Self {
        Self {
            server_port: 0,
            fetch_timeout_secs: 2,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            cover_root,
            stylize_workers: 2,
        }
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, anyhow::Error>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("invalid {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}
