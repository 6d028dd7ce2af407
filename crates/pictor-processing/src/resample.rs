//! Resample capability.
//!
//! The pipeline only ever asks for "resize to (w, h) with this kernel";
//! everything else (filter selection, aspect math) stays behind the trait
//! so the shadow compositor can be tested with a deterministic fake.

use image::{imageops::FilterType, DynamicImage, GenericImageView};

/// Interpolation kernel requested by a pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    /// Quality-preserving scale (shadow and resize operations).
    Lanczos,
    /// Speed-oriented pre-scale (stylizer input).
    Bilinear,
}

/// Resizing primitive used by the transformation pipeline.
///
/// A `width` or `height` of 0 means "derive this dimension from the source
/// aspect ratio"; both non-zero resizes exactly (and may distort).
pub trait Resample: Send + Sync {
    fn resize(&self, img: &DynamicImage, width: u32, height: u32, kernel: Kernel) -> DynamicImage;
}

/// Resolve the 0-means-derive dimension convention against a source size.
pub fn scaled_dimensions(orig_width: u32, orig_height: u32, width: u32, height: u32) -> (u32, u32) {
    match (width, height) {
        (0, 0) => (orig_width, orig_height),
        (w, 0) => {
            let aspect = orig_height as f32 / orig_width as f32;
            (w, ((w as f32 * aspect).round() as u32).max(1))
        }
        (0, h) => {
            let aspect = orig_width as f32 / orig_height as f32;
            (((h as f32 * aspect).round() as u32).max(1), h)
        }
        (w, h) => (w, h),
    }
}

/// Production resampler backed by the `image` crate.
pub struct CpuResampler;

impl Resample for CpuResampler {
    fn resize(&self, img: &DynamicImage, width: u32, height: u32, kernel: Kernel) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let (target_width, target_height) =
            scaled_dimensions(orig_width, orig_height, width, height);

        if (target_width, target_height) == (orig_width, orig_height) {
            return img.clone();
        }

        let filter = match kernel {
            Kernel::Lanczos => FilterType::Lanczos3,
            Kernel::Bilinear => FilterType::Triangle,
        };
        img.resize_exact(target_width, target_height, filter)
    }
}
