//! Canonical resizing of the primary image.
//!
//! Landscape images are scaled to a fixed width, portrait and square images
//! to a fixed height. The other side follows the aspect ratio.

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};

use crate::error::{Error, ImageRole, Result};

/// Target sizes for the canonical resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeTarget {
    /// Width for images wider than they are tall.
    pub landscape_width: u32,
    /// Height for all other images.
    pub portrait_height: u32,
}

impl Default for ResizeTarget {
    fn default() -> Self {
        Self {
            landscape_width: 1024,
            portrait_height: 768,
        }
    }
}

/// Scale `other` by `target / long`, rounding to nearest, never below 1.
fn proportional(target: u32, other: u32, long: u32) -> u32 {
    let scaled = (u64::from(target) * u64::from(other) + u64::from(long) / 2) / u64::from(long);
    u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
}

impl ResizeTarget {
    /// Output dimensions for a `width` x `height` source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyImage`] if either dimension is zero.
    pub fn dimensions_for(&self, width: u32, height: u32) -> Result<(u32, u32)> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyImage(ImageRole::Primary));
        }
        if width > height {
            let w = self.landscape_width;
            Ok((w, proportional(w, height, width)))
        } else {
            let h = self.portrait_height;
            Ok((proportional(h, width, height), h))
        }
    }

    /// Resize `image` to its canonical size with a Lanczos3 filter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyImage`] if the image has no pixels.
    pub fn apply(&self, image: &DynamicImage) -> Result<RgbaImage> {
        let (w, h) = self.dimensions_for(image.width(), image.height())?;
        tracing::debug!(
            from_width = image.width(),
            from_height = image.height(),
            to_width = w,
            to_height = h,
            "resizing primary image"
        );
        Ok(image.resize_exact(w, h, FilterType::Lanczos3).to_rgba8())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case((2000, 1000), (1024, 512))]
    #[case((1024, 768), (1024, 768))]
    #[case((600, 800), (576, 768))]
    #[case((500, 500), (768, 768))]
    #[case((10, 5), (1024, 512))]
    #[case((3, 2), (1024, 683))]
    #[case((5000, 1), (1024, 1))]
    #[case((1, 5000), (1, 768))]
    fn canonical_dimensions(#[case] source: (u32, u32), #[case] expected: (u32, u32)) {
        let target = ResizeTarget::default();
        assert_eq!(target.dimensions_for(source.0, source.1).unwrap(), expected);
    }

    #[test]
    fn custom_targets() {
        let target = ResizeTarget {
            landscape_width: 640,
            portrait_height: 480,
        };
        assert_eq!(target.dimensions_for(1280, 720).unwrap(), (640, 360));
        assert_eq!(target.dimensions_for(720, 1280).unwrap(), (270, 480));
    }

    #[test]
    fn empty_source_is_rejected() {
        let target = ResizeTarget::default();
        assert!(matches!(
            target.dimensions_for(0, 10),
            Err(Error::EmptyImage(ImageRole::Primary))
        ));
    }

    #[test]
    fn apply_produces_canonical_raster() {
        let src = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            40,
            20,
            image::Rgba([10, 20, 30, 255]),
        ));
        let out = ResizeTarget::default().apply(&src).unwrap();
        assert_eq!(out.dimensions(), (1024, 512));
        let px = out.get_pixel(512, 256);
        assert!((i32::from(px[0]) - 10).abs() <= 1);
        assert_eq!(px[3], 255);
    }
}
