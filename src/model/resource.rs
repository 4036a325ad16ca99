//! Resolved image assets.

use crate::detect::{detect_image_format, image_dimensions, ImageFormat};
use crate::error::Result;

/// An image fetched for a single export call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    /// The `src` the image was referenced by
    pub source_url: String,

    /// Raw binary data
    pub data: Vec<u8>,

    /// Detected format
    pub format: ImageFormat,

    /// Width in pixels, if the header could be read
    pub width: Option<u32>,

    /// Height in pixels, if the header could be read
    pub height: Option<u32>,
}

impl ImageAsset {
    /// Build an asset from fetched bytes.
    ///
    /// Fails with `Error::UnsupportedImage` when the bytes are not an
    /// embeddable image.
    pub fn from_bytes(source_url: impl Into<String>, data: Vec<u8>) -> Result<Self> {
        let format = detect_image_format(&data)?;
        let dims = image_dimensions(&data, format);
        Ok(Self {
            source_url: source_url.into(),
            data,
            format,
            width: dims.map(|d| d.0),
            height: dims.map(|d| d.1),
        })
    }

    /// Get the size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Height divided by width, when both are known.
    pub fn aspect_ratio(&self) -> Option<f64> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 => Some(h as f64 / w as f64),
            _ => None,
        }
    }

    /// Media part file name for the given sequence number.
    pub fn media_name(&self, index: usize) -> String {
        format!("image{}.{}", index, self.format.extension())
    }
}
