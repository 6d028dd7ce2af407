//! Shadow compositor - the blur-thumbnail effect.
//!
//! The blur is produced by a deliberate quality-destroying round trip:
//! downscale the source by the blur factor, upscale back to the target
//! width, then crop or under-fill vertically onto a fixed-size canvas.
//!
//! Two quirks of the crop step are part of the contract and must not be
//! "fixed": when the upscaled image is shorter than the target height the
//! canvas rows below it stay transparent, and when it is narrower than the
//! target width the columns to the right stay transparent.

use image::{DynamicImage, GenericImageView, RgbaImage};
use pictor_core::AppError;

use crate::resample::{Kernel, Resample};

/// Default blur factor when `times` is absent, non-numeric, or non-positive.
pub const DEFAULT_BLUR_TIMES: u32 = 15;

/// Produce a `width` x `height` blurred thumbnail of `img`.
///
/// `times` divides the original width for the downscale step; larger
/// values blur more. It must stay within `1..=original_width`, otherwise
/// the downscale width would reach 0.
pub fn compose(
    resampler: &dyn Resample,
    img: &DynamicImage,
    width: u32,
    height: u32,
    times: u32,
) -> Result<DynamicImage, AppError> {
    let (orig_width, _) = img.dimensions();

    if times == 0 || times > orig_width {
        return Err(AppError::InvalidParameter(format!(
            "times must be between 1 and the source width ({})",
            orig_width
        )));
    }

    // Downscale then upscale; both steps keep the aspect ratio.
    let thumbnail = resampler.resize(img, orig_width / times, 0, Kernel::Lanczos);
    let upscaled = resampler.resize(&thumbnail, width, 0, Kernel::Lanczos);

    let upscaled = upscaled.to_rgba8();
    let (up_width, up_height) = upscaled.dimensions();

    let mut canvas = RgbaImage::new(width, height);

    // Vertical centering: crop from the middle when the upscaled image is
    // taller than the target, otherwise copy what exists from row 0.
    let offset_y = if up_height > height {
        (up_height - height) / 2
    } else {
        0
    };
    let rows = (up_height - offset_y).min(height);
    let cols = up_width.min(width);

    for y in 0..rows {
        for x in 0..cols {
            canvas.put_pixel(x, y, *upscaled.get_pixel(x, y + offset_y));
        }
    }

    Ok(DynamicImage::ImageRgba8(canvas))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resample::{scaled_dimensions, CpuResampler};
    use image::{Rgba, RgbaImage};

    /// Deterministic fake: ignores pixel content, emits an image of the
    /// requested size whose red channel encodes the row index.
    struct GradientResampler;

    impl Resample for GradientResampler {
        fn resize(
            &self,
            img: &DynamicImage,
            width: u32,
            height: u32,
            _kernel: Kernel,
        ) -> DynamicImage {
            let (orig_width, orig_height) = img.dimensions();
            let (w, h) = scaled_dimensions(orig_width, orig_height, width, height);
            DynamicImage::ImageRgba8(RgbaImage::from_fn(w, h, |_x, y| {
                Rgba([(y % 256) as u8, 0, 0, 255])
            }))
        }
    }

    fn solid(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([90, 90, 90, 255])))
    }

    #[test]
    fn test_output_dimensions_are_exact() {
        for times in [1, 3, 15, 100] {
            let out = compose(&CpuResampler, &solid(100, 50), 200, 300, times).unwrap();
            assert_eq!(out.dimensions(), (200, 300), "times={}", times);
        }
    }

    #[test]
    fn test_short_upscale_leaves_canvas_blank_below() {
        // 100x50 source, times 15: downscale to 6 wide (3 tall), upscale to
        // 100 wide (50 tall). 50 < 300, so rows [50, 300) stay transparent.
        let out = compose(&GradientResampler, &solid(100, 50), 100, 300, 15)
            .unwrap()
            .to_rgba8();

        assert_eq!(out.get_pixel(0, 49).0[3], 255);
        assert_eq!(out.get_pixel(0, 49).0[0], 49);
        for y in [50, 150, 299] {
            assert_eq!(out.get_pixel(0, y).0, [0, 0, 0, 0], "row {}", y);
        }
    }

    #[test]
    fn test_tall_upscale_crops_from_vertical_center() {
        // 100x400 source, times 10: downscale to (10, 40), upscale to
        // (100, 400). 400 > 200, so offset_y = (400 - 200) / 2 = 100 and
        // canvas row 0 holds upscaled row 100.
        let out = compose(&GradientResampler, &solid(100, 400), 100, 200, 10)
            .unwrap()
            .to_rgba8();

        assert_eq!(out.dimensions(), (100, 200));
        assert_eq!(out.get_pixel(0, 0).0[0], 100);
        // Last canvas row holds upscaled row 299 (299 % 256 = 43).
        assert_eq!(out.get_pixel(0, 199).0[0], 43);
    }

    #[test]
    fn test_times_equal_to_width_is_allowed() {
        let out = compose(&CpuResampler, &solid(40, 40), 80, 80, 40).unwrap();
        assert_eq!(out.dimensions(), (80, 80));
    }

    #[test]
    fn test_times_beyond_width_is_rejected() {
        let err = compose(&CpuResampler, &solid(40, 40), 80, 80, 41).unwrap_err();
        assert!(matches!(err, AppError::InvalidParameter(_)));
    }

    #[test]
    fn test_zero_times_is_rejected() {
        let err = compose(&CpuResampler, &solid(40, 40), 80, 80, 0).unwrap_err();
        assert!(matches!(err, AppError::InvalidParameter(_)));
    }
}
