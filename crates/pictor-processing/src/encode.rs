//! Output encoder - pixel buffer to JPEG/PNG/WebP bytes.
//!
//! Quality is an unvalidated integer handed straight to the codec:
//! 0 means "codec default" for JPEG, "lossless" for WebP, and is ignored
//! for PNG. Out-of-range values rely on the codec's own clamping.

use std::io::Cursor;

use bytes::Bytes;
use image::{DynamicImage, ImageFormat};
use pictor_core::AppError;

use crate::source::SourceFormat;

const DEFAULT_JPEG_QUALITY: i32 = 75;

/// Output format for encoded images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    /// Parse a `type` query value. Unrecognized values fall back to JPEG.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "png" => OutputFormat::Png,
            "webp" => OutputFormat::WebP,
            _ => OutputFormat::Jpeg,
        }
    }

    /// Negotiate the output format: an explicit `type` wins, otherwise the
    /// detected source format carries over (unknown sources become JPEG).
    pub fn negotiate(requested: Option<&str>, source: SourceFormat) -> Self {
        match requested {
            Some(s) if !s.is_empty() => Self::parse(s),
            _ => match source {
                SourceFormat::Png => OutputFormat::Png,
                SourceFormat::WebP => OutputFormat::WebP,
                SourceFormat::Jpeg | SourceFormat::Unknown => OutputFormat::Jpeg,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
        }
    }
}

/// Final encoded payload plus its format; exists only long enough to be
/// written to the response.
pub struct EncodedImage {
    pub bytes: Bytes,
    pub format: OutputFormat,
}

impl EncodedImage {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// Serialize a pixel buffer with the given format and quality.
pub fn encode(
    img: &DynamicImage,
    format: OutputFormat,
    quality: i32,
) -> Result<EncodedImage, AppError> {
    let bytes = match format {
        OutputFormat::Jpeg => encode_jpeg(img, quality)?,
        OutputFormat::Png => encode_png(img)?,
        OutputFormat::WebP => encode_webp(img, quality)?,
    };
    Ok(EncodedImage { bytes, format })
}

/// Encode to JPEG using mozjpeg.
fn encode_jpeg(img: &DynamicImage, quality: i32) -> Result<Bytes, AppError> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    let quality = if quality == 0 {
        DEFAULT_JPEG_QUALITY
    } else {
        quality
    };

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(quality as f32);
    comp.set_progressive_mode();
    comp.set_optimize_coding(true);

    let mut comp = comp
        .start_compress(Vec::new())
        .map_err(|e| AppError::EncodeFailure(e.to_string()))?;
    comp.write_scanlines(rgb.as_raw())
        .map_err(|e| AppError::EncodeFailure(e.to_string()))?;
    let data = comp
        .finish()
        .map_err(|e| AppError::EncodeFailure(e.to_string()))?;

    Ok(Bytes::from(data))
}

fn encode_png(img: &DynamicImage) -> Result<Bytes, AppError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| AppError::EncodeFailure(e.to_string()))?;
    Ok(Bytes::from(buf))
}

/// Encode to WebP: quality 0 selects lossless, anything else lossy.
fn encode_webp(img: &DynamicImage, quality: i32) -> Result<Bytes, AppError> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let encoder = webp::Encoder::from_rgba(&rgba, width, height);
    let data = if quality == 0 {
        encoder.encode_lossless()
    } else {
        encoder.encode(quality as f32)
    };

    Ok(Bytes::copy_from_slice(&data))
}
