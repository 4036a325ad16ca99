//! Error types for reviewdoc library.

use std::io;
use thiserror::Error;

/// Result type alias for reviewdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while exporting documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The OOXML package (zip container) could not be written.
    #[error("Package error: {0}")]
    Package(String),

    /// Entity JSON could not be read or a JSON payload could not be built.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An image could not be fetched through the proxy.
    #[error("Image fetch error: {0}")]
    ImageFetch(String),

    /// Image bytes are not in a format the exporters can embed.
    #[error("Unsupported image format")]
    UnsupportedImage,

    /// The caller supplied input that cannot be exported.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Package(err.to_string()),
        }
    }
}

#[cfg(feature = "proxy")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::ImageFetch(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedImage;
        assert_eq!(err.to_string(), "Unsupported image format");

        let err = Error::InvalidInput("no columns".to_string());
        assert_eq!(err.to_string(), "Invalid input: no columns");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_zip_error_conversion() {
        let err: Error = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(err, Error::Package(_)));
    }
}
