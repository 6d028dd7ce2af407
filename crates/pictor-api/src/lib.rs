//! Pictor API library.
//!
//! HTTP handlers, source resolution, response shaping, and application
//! setup for the image transformation service.

pub mod error;
pub mod handlers;
pub mod params;
pub mod respond;
pub mod setup;
pub mod source;
pub mod state;
pub mod telemetry;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
