//! Placement grid for tiled watermarks.
//!
//! One copy of the watermark is centered on the canvas. From there copies are
//! walked outward along both axes with a fixed stride:
//!
//! ```text
//! stride = watermark + (watermark / repeats) / 2 + 15
//! repeats = canvas / watermark
//! ```
//!
//! giving a grid of `(2 * repeats_x + 1) * (2 * repeats_y + 1)` candidate
//! positions. Positions are produced in draw order: the center, then the
//! vertical meridian, then each column pair outward with its diagonals.

use crate::error::{Axis, Error, Result};

/// Fixed pixel padding added to each stride.
pub const STRIDE_PADDING: u32 = 15;

/// Top-left corner of one watermark copy on the canvas.
///
/// Coordinates are signed: copies stepping left or up from the center may
/// start outside the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Horizontal offset in pixels.
    pub x: i64,
    /// Vertical offset in pixels.
    pub y: i64,
}

impl Placement {
    /// Create a placement at `(x, y)`.
    #[must_use]
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Geometry of a tiled watermark on a given canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLayout {
    canvas: (u32, u32),
    watermark: (u32, u32),
    /// Position of the centered copy.
    pub center: Placement,
    /// How many watermark widths fit across the canvas.
    pub repeat_x: u32,
    /// How many watermark heights fit down the canvas.
    pub repeat_y: u32,
    /// Horizontal distance between neighbouring copies.
    pub stride_x: u32,
    /// Vertical distance between neighbouring copies.
    pub stride_y: u32,
}

/// Repeat count and stride along one axis.
fn axis_metrics(axis: Axis, canvas: u32, watermark: u32) -> Result<(u32, u32)> {
    let invalid = Error::InvalidWatermarkDimension {
        axis,
        watermark,
        canvas,
    };
    if watermark == 0 {
        return Err(invalid);
    }
    let repeats = canvas / watermark;
    if repeats == 0 {
        return Err(invalid);
    }
    let stride = watermark + (watermark / repeats) / 2 + STRIDE_PADDING;
    Ok((repeats, stride))
}

impl TileLayout {
    /// Compute the layout for a `watermark` sized stamp on a `canvas`.
    ///
    /// Both arguments are `(width, height)` in pixels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWatermarkDimension`] if the watermark is zero
    /// pixels along an axis or larger than the canvas along it.
    pub fn compute(canvas: (u32, u32), watermark: (u32, u32)) -> Result<Self> {
        let (repeat_x, stride_x) = axis_metrics(Axis::X, canvas.0, watermark.0)?;
        let (repeat_y, stride_y) = axis_metrics(Axis::Y, canvas.1, watermark.1)?;

        // repeats >= 1 implies watermark <= canvas, so the offsets are non-negative.
        let center = Placement::new(
            i64::from((canvas.0 - watermark.0) / 2),
            i64::from((canvas.1 - watermark.1) / 2),
        );

        let layout = Self {
            canvas,
            watermark,
            center,
            repeat_x,
            repeat_y,
            stride_x,
            stride_y,
        };
        tracing::debug!(
            canvas_width = canvas.0,
            canvas_height = canvas.1,
            watermark_width = watermark.0,
            watermark_height = watermark.1,
            center_x = center.x,
            center_y = center.y,
            repeat_x,
            repeat_y,
            stride_x,
            stride_y,
            "computed tile layout"
        );
        Ok(layout)
    }

    /// Canvas size the layout was computed for.
    #[must_use]
    pub fn canvas_size(&self) -> (u32, u32) {
        self.canvas
    }

    /// Watermark size the layout was computed for.
    #[must_use]
    pub fn watermark_size(&self) -> (u32, u32) {
        self.watermark
    }

    /// Number of placements before clipping.
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        (2 * self.repeat_x as usize + 1) * (2 * self.repeat_y as usize + 1)
    }

    /// All placements in draw order.
    ///
    /// Later copies are drawn over earlier ones, so the order matters wherever
    /// copies overlap. The grid is generated lazily; nothing proportional to
    /// [`candidate_count`](Self::candidate_count) is allocated.
    pub fn placements(&self) -> impl Iterator<Item = Placement> {
        let Placement { x: cx, y: cy } = self.center;
        let sx = i64::from(self.stride_x);
        let sy = i64::from(self.stride_y);
        let rx = i64::from(self.repeat_x);
        let ry = i64::from(self.repeat_y);

        // central meridian
        let meridian = (1..=ry).flat_map(move |k| {
            [
                Placement::new(cx, cy + k * sy),
                Placement::new(cx, cy - k * sy),
            ]
        });

        let columns = (1..=rx).flat_map(move |j| {
            let right = cx + j * sx;
            let left = cx - j * sx;
            let diagonals = (1..=ry).flat_map(move |k| {
                let down = cy + k * sy;
                let up = cy - k * sy;
                [
                    Placement::new(right, down),
                    Placement::new(left, down),
                    Placement::new(right, up),
                    Placement::new(left, up),
                ]
            });
            [Placement::new(right, cy), Placement::new(left, cy)]
                .into_iter()
                .chain(diagonals)
        });

        std::iter::once(self.center).chain(meridian).chain(columns)
    }

    /// Whether a copy at `placement` covers at least one canvas pixel.
    #[must_use]
    pub fn is_visible(&self, placement: Placement) -> bool {
        let (cw, ch) = (i64::from(self.canvas.0), i64::from(self.canvas.1));
        let (ww, wh) = (i64::from(self.watermark.0), i64::from(self.watermark.1));
        placement.x < cw && placement.y < ch && placement.x + ww > 0 && placement.y + wh > 0
    }

    /// Placements that survive clipping, in draw order.
    pub fn visible_placements(&self) -> impl Iterator<Item = Placement> {
        let layout = *self;
        self.placements().filter(move |p| layout.is_visible(*p))
    }
}
