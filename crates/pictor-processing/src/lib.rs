//! Pictor processing library.
//!
//! CPU-side image pipeline: decoding, the resample capability, the shadow
//! compositor, the stylize capability, and the output encoder. No HTTP
//! types leak in here; handlers call these from `spawn_blocking`.

pub mod encode;
pub mod resample;
pub mod shadow;
pub mod source;
pub mod stylize;

// Re-export commonly used types
pub use encode::{encode, EncodedImage, OutputFormat};
pub use resample::{scaled_dimensions, CpuResampler, Kernel, Resample};
pub use shadow::{compose, DEFAULT_BLUR_TIMES};
pub use source::{decode_image, DecodedImage, SourceFormat};
pub use stylize::{Approximate, TriangleStylizer, DEFAULT_SHAPE_BUDGET};
