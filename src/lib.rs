//! Stamp a watermark across an image in a centered repeating grid.
//!
//! The primary image is first scaled to a canonical size (1024px wide for
//! landscape images, 768px tall otherwise). One copy of the watermark is then
//! drawn exactly in the middle, and further copies are walked outward along
//! both axes with a fixed stride until the grid covers the canvas.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use tile_watermark::{ProcessOptions, Watermarker};
//!
//! let marker = Watermarker::from_path(Path::new("watermark.png")).expect("bad watermark");
//! let img = image::open("photo.jpg").unwrap();
//! let marked = marker.apply(&img, &ProcessOptions::default()).unwrap();
//! tile_watermark::save_image(&marked, Path::new("marked.jpg"), 95).unwrap();
//! ```
//!
//! # Layout only
//!
//! The placement grid is plain integer geometry and can be inspected without
//! touching any pixels:
//!
//! ```
//! use tile_watermark::TileLayout;
//!
//! let layout = TileLayout::compute((1024, 768), (100, 50)).unwrap();
//! assert_eq!((layout.stride_x, layout.stride_y), (120, 66));
//! assert_eq!(layout.candidate_count(), 21 * 31);
//! ```

#![deny(missing_docs)]

pub mod compositing;
mod engine;
pub mod error;
pub mod layout;
pub mod resize;

pub use compositing::{tile_watermark, TileReport};
pub use engine::{
    encode_jpeg, is_supported_image, process_bytes, save_image, ProcessOptions, ProcessResult,
    Watermarker, DEFAULT_JPEG_QUALITY,
};
pub use error::{Axis, Error, ImageRole, Result};
pub use layout::{Placement, TileLayout};
pub use resize::ResizeTarget;
