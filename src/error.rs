//! Error types for the tile-watermark crate.

use std::fmt;

/// Which of the two input images an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    /// The image being marked.
    Primary,
    /// The stamp drawn onto the primary image.
    Watermark,
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("image"),
            Self::Watermark => f.write_str("watermark"),
        }
    }
}

/// Image axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal axis (width).
    X,
    /// Vertical axis (height).
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => f.write_str("width"),
            Self::Y => f.write_str("height"),
        }
    }
}

/// Errors that can occur while tiling a watermark onto an image.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The watermark is empty along an axis, or larger than the canvas so that
    /// not even one copy fits across it.
    #[error(
        "invalid watermark {axis}: watermark is {watermark}px, canvas is {canvas}px \
         (watermark must be between 1px and the canvas {axis})"
    )]
    InvalidWatermarkDimension {
        /// The offending axis.
        axis: Axis,
        /// Watermark size along `axis`.
        watermark: u32,
        /// Canvas size along `axis`.
        canvas: u32,
    },

    /// A decoded input image has zero width or height.
    #[error("{0} has no pixels")]
    EmptyImage(ImageRole),

    /// Failed to decode one of the input images.
    #[error("failed to decode {role}: {source}")]
    Decode {
        /// Which input failed.
        role: ImageRole,
        /// Underlying codec error.
        source: image::ImageError,
    },

    /// Failed to encode the composed image.
    #[error("failed to encode result: {0}")]
    Encode(image::ImageError),

    /// JPEG quality outside `1..=100`.
    #[error("invalid JPEG quality {0} (expected 1-100)")]
    InvalidQuality(u8),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The output format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let unsupported = Error::UnsupportedFormat("tiff".to_string());
        assert!(unsupported.to_string().contains("tiff"));

        let invalid = Error::InvalidWatermarkDimension {
            axis: Axis::X,
            watermark: 0,
            canvas: 1024,
        };
        let msg = invalid.to_string();
        assert!(msg.contains("width"));
        assert!(msg.contains("0px"));
        assert!(msg.contains("1024px"));

        assert_eq!(
            Error::EmptyImage(ImageRole::Watermark).to_string(),
            "watermark has no pixels"
        );
        assert!(Error::InvalidQuality(0).to_string().contains("1-100"));
    }

    #[test]
    fn decode_error_names_the_input() {
        let source = image::ImageError::IoError(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "truncated",
        ));
        let err = Error::Decode {
            role: ImageRole::Primary,
            source,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("failed to decode image"));
        assert!(msg.contains("truncated"));
    }
}
