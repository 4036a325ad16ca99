//! Image format detection and size probing.
//!
//! Fetched image bytes are checked here before they are embedded. Anything
//! that is not PNG, JPEG, GIF or BMP is rejected so the exporters can skip it.

use std::io::Cursor;

use image::ImageReader;

use crate::error::{Error, Result};

/// Image formats the exporters can embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// Portable Network Graphics
    Png,
    /// JPEG / JFIF
    Jpeg,
    /// GIF87a / GIF89a
    Gif,
    /// Windows bitmap
    Bmp,
}

impl ImageFormat {
    /// MIME type registered in the package content types.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
        }
    }

    /// File extension used for the media part.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
            ImageFormat::Bmp => "bmp",
        }
    }

    fn from_guessed(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Png => Some(ImageFormat::Png),
            image::ImageFormat::Jpeg => Some(ImageFormat::Jpeg),
            image::ImageFormat::Gif => Some(ImageFormat::Gif),
            image::ImageFormat::Bmp => Some(ImageFormat::Bmp),
            _ => None,
        }
    }

    fn to_image_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Detect the image format from magic bytes.
///
/// # Returns
/// * `Ok(ImageFormat)` for PNG, JPEG, GIF and BMP data
/// * `Err(Error::UnsupportedImage)` for anything else (SVG, WEBP, HTML error pages, ...)
pub fn detect_image_format(data: &[u8]) -> Result<ImageFormat> {
    image::guess_format(data)
        .ok()
        .and_then(ImageFormat::from_guessed)
        .ok_or(Error::UnsupportedImage)
}

/// Check if bytes hold an embeddable image.
pub fn is_supported_image(data: &[u8]) -> bool {
    detect_image_format(data).is_ok()
}

/// Read the pixel dimensions `(width, height)` from the image header.
///
/// Returns `None` when the header is truncated or malformed.
pub fn image_dimensions(data: &[u8], format: ImageFormat) -> Option<(u32, u32)> {
    let reader = ImageReader::with_format(Cursor::new(data), format.to_image_format());
    match reader.into_dimensions() {
        Ok((0, _)) | Ok((_, 0)) => None,
        Ok(dims) => Some(dims),
        Err(e) => {
            log::debug!("cannot read {} dimensions: {}", format, e);
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{DynamicImage, RgbaImage};

    /// Encode a blank image of the given size.
    pub(crate) fn encoded(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
        let mut data = Vec::new();
        let image = DynamicImage::ImageRgba8(RgbaImage::new(width, height));
        let image = match format {
            image::ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
            _ => image,
        };
        image.write_to(&mut Cursor::new(&mut data), format).unwrap();
        data
    }

    pub(crate) fn png_header(width: u32, height: u32) -> Vec<u8> {
        encoded(width, height, image::ImageFormat::Png)
    }

    #[test]
    fn test_detect_png() {
        let data = png_header(640, 480);
        assert_eq!(detect_image_format(&data).unwrap(), ImageFormat::Png);
        assert_eq!(image_dimensions(&data, ImageFormat::Png), Some((640, 480)));
    }

    #[test]
    fn test_detect_gif() {
        let data = encoded(32, 16, image::ImageFormat::Gif);
        assert_eq!(detect_image_format(&data).unwrap(), ImageFormat::Gif);
        assert_eq!(image_dimensions(&data, ImageFormat::Gif), Some((32, 16)));
    }

    #[test]
    fn test_detect_jpeg_dimensions() {
        let data = encoded(300, 200, image::ImageFormat::Jpeg);
        assert_eq!(detect_image_format(&data).unwrap(), ImageFormat::Jpeg);
        assert_eq!(image_dimensions(&data, ImageFormat::Jpeg), Some((300, 200)));
    }

    #[test]
    fn test_detect_bmp() {
        let data = encoded(7, 3, image::ImageFormat::Bmp);
        assert_eq!(detect_image_format(&data).unwrap(), ImageFormat::Bmp);
        assert_eq!(image_dimensions(&data, ImageFormat::Bmp), Some((7, 3)));
    }

    #[test]
    fn test_unsupported_formats() {
        assert!(matches!(
            detect_image_format(b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>"),
            Err(Error::UnsupportedImage)
        ));
        assert!(!is_supported_image(b"RIFF\x24\x00\x00\x00WEBPVP8 "));
        assert!(!is_supported_image(b"<!DOCTYPE html><html>404</html>"));
        assert!(!is_supported_image(b""));
    }

    #[test]
    fn test_truncated_header_has_no_dimensions() {
        let png = png_header(10, 10);
        assert_eq!(image_dimensions(&png[..12], ImageFormat::Png), None);
        assert_eq!(image_dimensions(&[0xFF, 0xD8, 0xFF], ImageFormat::Jpeg), None);
    }

    #[test]
    fn test_format_names() {
        assert_eq!(ImageFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(ImageFormat::Png.to_string(), "png");
    }
}
