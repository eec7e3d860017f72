//! Draw-over compositing of the watermark grid.
//!
//! Each copy is composited with the Porter-Duff "over" operator on straight
//! (non-premultiplied) alpha:
//!
//! ```text
//! out_a = src_a + dst_a * (1 - src_a)
//! out_c = (src_c * src_a + dst_c * dst_a * (1 - src_a)) / out_a
//! ```
//!
//! evaluated in integer arithmetic with rounding, so an opaque canvas stays
//! fully opaque. Parts of a copy that fall outside the canvas are clipped.

use image::{Rgba, RgbaImage};

use crate::error::Result;
use crate::layout::{Placement, TileLayout};

/// Outcome of tiling a watermark onto a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileReport {
    /// The layout that was drawn.
    pub layout: TileLayout,
    /// Number of copies that landed on the canvas.
    pub drawn: usize,
}

/// Blend `src` over `dst`.
fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = u32::from(src[3]);
    match sa {
        0 => return dst,
        255 => return src,
        _ => {}
    }

    // Alpha values scaled by 255 * 255.
    let src_w = sa * 255;
    let dst_w = u32::from(dst[3]) * (255 - sa);
    let out_w = src_w + dst_w;
    if out_w == 0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |s: u8, d: u8| -> u8 {
        let num = u32::from(s) * src_w + u32::from(d) * dst_w;
        u8::try_from((num + out_w / 2) / out_w).unwrap_or(u8::MAX)
    };

    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        u8::try_from((out_w + 127) / 255).unwrap_or(u8::MAX),
    ])
}

/// Source offset, destination offset and length of the part of a
/// `src_len` span placed at `offset` that lies inside `0..dst_len`.
fn clip_span(offset: i64, src_len: u32, dst_len: u32) -> Option<(u32, u32, u32)> {
    let src_lo = (-offset).clamp(0, i64::from(src_len));
    let src_hi = (i64::from(dst_len) - offset).clamp(0, i64::from(src_len));
    if src_lo >= src_hi {
        return None;
    }
    let src_start = u32::try_from(src_lo).ok()?;
    let dst_start = u32::try_from(offset + src_lo).ok()?;
    let len = u32::try_from(src_hi - src_lo).ok()?;
    Some((src_start, dst_start, len))
}

/// Draw one copy of `watermark` onto `canvas` with its top-left at `at`.
///
/// Pixels outside the canvas are silently dropped. Returns whether any pixel
/// of the copy landed on the canvas.
pub fn draw_over(canvas: &mut RgbaImage, watermark: &RgbaImage, at: Placement) -> bool {
    let (cw, ch) = canvas.dimensions();
    let (ww, wh) = watermark.dimensions();
    let Some((src_x, dst_x, len_x)) = clip_span(at.x, ww, cw) else {
        return false;
    };
    let Some((src_y, dst_y, len_y)) = clip_span(at.y, wh, ch) else {
        return false;
    };

    for dy in 0..len_y {
        for dx in 0..len_x {
            let src = *watermark.get_pixel(src_x + dx, src_y + dy);
            let dst = canvas.get_pixel_mut(dst_x + dx, dst_y + dy);
            *dst = blend_over(*dst, src);
        }
    }
    true
}

/// Tile `watermark` across `canvas` in place.
///
/// Computes the [`TileLayout`] for the two sizes and draws every visible copy
/// in layout order.
///
/// # Errors
///
/// Returns [`Error::InvalidWatermarkDimension`](crate::Error::InvalidWatermarkDimension)
/// if the watermark cannot be tiled on this canvas. The canvas is left
/// untouched in that case.
pub fn tile_watermark(canvas: &mut RgbaImage, watermark: &RgbaImage) -> Result<TileReport> {
    let layout = TileLayout::compute(canvas.dimensions(), watermark.dimensions())?;

    let mut drawn = 0;
    for at in layout.visible_placements() {
        if draw_over(canvas, watermark, at) {
            drawn += 1;
        }
    }

    tracing::debug!(
        drawn,
        candidates = layout.candidate_count(),
        "tiled watermark"
    );
    Ok(TileReport { layout, drawn })
}
