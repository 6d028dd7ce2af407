//! Image decoding and source format detection.

use std::io::Cursor;

use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use pictor_core::AppError;

/// Encoding the source bytes arrived in, sniffed from the bytes themselves.
///
/// The query string never influences this: the same byte stream could be
/// any of the supported codecs regardless of what the URL claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
    WebP,
    Unknown,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Jpeg => "jpeg",
            SourceFormat::Png => "png",
            SourceFormat::WebP => "webp",
            SourceFormat::Unknown => "unknown",
        }
    }
}

/// A decoded pixel buffer plus the detected source encoding.
///
/// Built once per request by the source resolver and consumed by exactly
/// one transformation stage; transformations always produce a new image.
#[derive(Debug)]
pub struct DecodedImage {
    pub image: DynamicImage,
    pub format: SourceFormat,
}

impl DecodedImage {
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Decode raw bytes into a pixel buffer, tagging the detected format.
pub fn decode_image(data: &[u8]) -> Result<DecodedImage, AppError> {
    let format = match image::guess_format(data) {
        Ok(ImageFormat::Jpeg) => SourceFormat::Jpeg,
        Ok(ImageFormat::Png) => SourceFormat::Png,
        Ok(ImageFormat::WebP) => SourceFormat::WebP,
        _ => SourceFormat::Unknown,
    };

    let image = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| AppError::DecodeFailure(e.to_string()))?
        .decode()
        .map_err(|e| AppError::DecodeFailure(e.to_string()))?;

    Ok(DecodedImage { image, format })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([120, 30, 200, 255]),
        ));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_decode_png_detects_format() {
        let decoded = decode_image(&png_bytes(8, 6)).unwrap();
        assert_eq!(decoded.format, SourceFormat::Png);
        assert_eq!(decoded.image.dimensions(), (8, 6));
    }

    #[test]
    fn test_decode_jpeg_detects_format() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([10, 20, 30])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
            .unwrap();

        let decoded = decode_image(&buf).unwrap();
        assert_eq!(decoded.format, SourceFormat::Jpeg);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, AppError::DecodeFailure(_)));
    }
}
