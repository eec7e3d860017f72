//! Decode, resize, tile and encode pipeline.

use std::io::Write;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::compositing;
use crate::error::{Error, ImageRole, Result};
use crate::resize::ResizeTarget;

/// JPEG quality used when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Options controlling how images are marked and written.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// JPEG quality (1-100) for JPEG output.
    pub quality: u8,
    /// Canonical resize applied to the primary image, or `None` to keep its
    /// original resolution.
    pub resize: Option<ResizeTarget>,
    /// Enable verbose logging.
    pub verbose: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_JPEG_QUALITY,
            resize: Some(ResizeTarget::default()),
            verbose: false,
            quiet: false,
        }
    }
}

/// Result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the input file.
    pub path: PathBuf,
    /// Where the marked image was written, if it was.
    pub output: Option<PathBuf>,
    /// Whether processing succeeded.
    pub success: bool,
    /// Number of watermark copies that landed on the canvas.
    pub copies: usize,
    /// Human-readable status message.
    pub message: String,
}

impl ProcessResult {
    fn failed(path: &Path, message: String) -> Self {
        tracing::warn!(path = %path.display(), "{message}");
        Self {
            path: path.to_path_buf(),
            output: None,
            success: false,
            copies: 0,
            message,
        }
    }
}

/// Tiles one decoded watermark onto any number of images.
///
/// The watermark is decoded once and shared read-only; every call works on
/// its own canvas.
#[derive(Debug, Clone)]
pub struct Watermarker {
    watermark: RgbaImage,
}

impl Watermarker {
    /// Create a watermarker from an already decoded watermark.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyImage`] if the watermark has no pixels.
    pub fn new(watermark: &DynamicImage) -> Result<Self> {
        if watermark.width() == 0 || watermark.height() == 0 {
            return Err(Error::EmptyImage(ImageRole::Watermark));
        }
        Ok(Self {
            watermark: watermark.to_rgba8(),
        })
    }

    /// Load and decode the watermark from a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the file cannot be read or decoded.
    pub fn from_path(path: &Path) -> Result<Self> {
        let img = image::open(path).map_err(|source| Error::Decode {
            role: ImageRole::Watermark,
            source,
        })?;
        Self::new(&img)
    }

    /// Decode the watermark from encoded bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the bytes are not a supported image.
    pub fn from_memory(bytes: &[u8]) -> Result<Self> {
        Self::new(&decode(bytes, ImageRole::Watermark)?)
    }

    /// The decoded watermark.
    #[must_use]
    pub fn watermark(&self) -> &RgbaImage {
        &self.watermark
    }

    /// Resize `image` (unless disabled) and tile the watermark over it.
    ///
    /// Returns the marked canvas; its size is the resized image size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyImage`] for an empty image and
    /// [`Error::InvalidWatermarkDimension`] if the watermark does not fit on
    /// the canvas.
    pub fn apply(&self, image: &DynamicImage, opts: &ProcessOptions) -> Result<RgbaImage> {
        Ok(self.apply_counted(image, opts)?.0)
    }

    fn apply_counted(
        &self,
        image: &DynamicImage,
        opts: &ProcessOptions,
    ) -> Result<(RgbaImage, usize)> {
        let mut canvas = match &opts.resize {
            Some(target) => target.apply(image)?,
            None if image.width() == 0 || image.height() == 0 => {
                return Err(Error::EmptyImage(ImageRole::Primary));
            }
            None => image.to_rgba8(),
        };
        let report = compositing::tile_watermark(&mut canvas, &self.watermark)?;
        Ok((canvas, report.drawn))
    }

    /// Mark encoded image bytes and return the result as JPEG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] for undecodable input, [`Error::Encode`] if
    /// encoding fails, or any error of [`Watermarker::apply`].
    pub fn process_bytes(&self, image: &[u8], opts: &ProcessOptions) -> Result<Vec<u8>> {
        let decoded = decode(image, ImageRole::Primary)?;
        let canvas = self.apply(&decoded, opts)?;
        let mut out = Vec::new();
        encode_jpeg(&canvas, &mut out, opts.quality)?;
        Ok(out)
    }

    /// Process a single image file: load, resize, tile, save.
    ///
    /// The output format follows the extension of `output`.
    #[must_use]
    pub fn process_file(
        &self,
        input: &Path,
        output: &Path,
        opts: &ProcessOptions,
    ) -> ProcessResult {
        let dyn_img = match image::open(input) {
            Ok(img) => img,
            Err(source) => {
                let err = Error::Decode {
                    role: ImageRole::Primary,
                    source,
                };
                return ProcessResult::failed(input, err.to_string());
            }
        };

        let (canvas, copies) = match self.apply_counted(&dyn_img, opts) {
            Ok(marked) => marked,
            Err(e) => return ProcessResult::failed(input, e.to_string()),
        };

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    return ProcessResult::failed(
                        input,
                        format!("Failed to create output directory: {e}"),
                    );
                }
            }
        }

        if let Err(e) = save_image(&canvas, output, opts.quality) {
            return ProcessResult::failed(input, format!("Failed to save: {e}"));
        }

        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            width = canvas.width(),
            height = canvas.height(),
            copies,
            "watermarked image"
        );
        ProcessResult {
            path: input.to_path_buf(),
            output: Some(output.to_path_buf()),
            success: true,
            copies,
            message: format!(
                "Marked {}x{} with {copies} copies",
                canvas.width(),
                canvas.height()
            ),
        }
    }

    /// Process all supported images in a directory.
    ///
    /// Each file is written under `output_dir` with its original file name.
    /// Uses parallel iteration when the `cli` feature is enabled (via rayon).
    #[must_use]
    pub fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        opts: &ProcessOptions,
    ) -> Vec<ProcessResult> {
        let entries: Vec<_> = match std::fs::read_dir(input_dir) {
            Ok(rd) => rd
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
                .filter(|e| is_supported_image(e.path().as_path()))
                .collect(),
            Err(e) => {
                return vec![ProcessResult::failed(
                    input_dir,
                    format!("Failed to read directory: {e}"),
                )];
            }
        };

        if !output_dir.exists() {
            if let Err(e) = std::fs::create_dir_all(output_dir) {
                return vec![ProcessResult::failed(
                    output_dir,
                    format!("Failed to create output directory: {e}"),
                )];
            }
        }

        let process = |entry: &std::fs::DirEntry| {
            let output_path = output_dir.join(entry.file_name());
            self.process_file(&entry.path(), &output_path, opts)
        };

        #[cfg(feature = "cli")]
        {
            use rayon::prelude::*;
            entries.par_iter().map(process).collect()
        }

        #[cfg(not(feature = "cli"))]
        {
            entries.iter().map(process).collect()
        }
    }
}

/// Mark `image` with `watermark` using default options.
///
/// Both inputs are encoded images (JPEG, PNG, WebP or BMP). The primary image
/// is resized to its canonical size and the result is returned as a quality
/// 95 JPEG.
///
/// # Errors
///
/// See [`Watermarker::process_bytes`].
pub fn process_bytes(image: &[u8], watermark: &[u8]) -> Result<Vec<u8>> {
    Watermarker::from_memory(watermark)?.process_bytes(image, &ProcessOptions::default())
}

fn decode(bytes: &[u8], role: ImageRole) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|source| Error::Decode { role, source })
}

/// Encode `canvas` as JPEG into `writer`. Alpha is dropped.
///
/// # Errors
///
/// Returns [`Error::InvalidQuality`] for a quality outside `1..=100` and
/// [`Error::Encode`] if the encoder fails.
pub fn encode_jpeg<W: Write>(canvas: &RgbaImage, writer: W, quality: u8) -> Result<()> {
    if !(1..=100).contains(&quality) {
        return Err(Error::InvalidQuality(quality));
    }
    let rgb = DynamicImage::ImageRgba8(canvas.clone()).to_rgb8();
    let mut encoder = JpegEncoder::new_with_quality(writer, quality);
    encoder.encode_image(&rgb).map_err(Error::Encode)
}

/// Save a marked canvas, choosing the encoder from the file extension.
///
/// # Errors
///
/// Returns an error if the format is unsupported or writing fails.
pub fn save_image(canvas: &RgbaImage, path: &Path, quality: u8) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    match format {
        ImageFormat::Jpeg => {
            let file = std::io::BufWriter::new(std::fs::File::create(path)?);
            encode_jpeg(canvas, file, quality)?;
        }
        ImageFormat::Png | ImageFormat::WebP | ImageFormat::Bmp => {
            canvas.save_with_format(path, format).map_err(Error::Encode)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}

/// Extensions picked up by directory processing; all of them can also be
/// written by [`save_image`].
const BATCH_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "bmp"];

/// Whether directory processing should mark this file, judged by extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| BATCH_EXTENSIONS.iter().any(|b| ext.eq_ignore_ascii_case(b)))
}
