use image::{DynamicImage, GenericImageView, Rgb, RgbImage, imageops::FilterType};
use palette::Srgb;
use tracing::debug;

use crate::error::{BeadError, Result};
use crate::quantize::{BASE_COLORS, nearest_index, to_hex};

pub const DEFAULT_ROWS: u32 = 35;
pub const DEFAULT_COLS: u32 = 35;
pub const DEFAULT_CELL_SIZE: u32 = 25;
/// Largest rendered RGB buffer accepted (1 GiB).
pub const MAX_OUTPUT_BYTES: usize = 1 << 30;

/// Size of a bead pattern: grid resolution plus the rendered pixel size of
/// one bead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSpec {
    pub rows: u32,
    pub cols: u32,
    pub cell_size: u32,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl GridSpec {
    pub fn new(rows: u32, cols: u32, cell_size: u32) -> Self {
        Self { rows, cols, cell_size }
    }

    /// Reject zero sides and grids whose rendered image would be too large to
    /// allocate.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 || self.cell_size == 0 {
            return Err(self.invalid());
        }
        self.output_dimensions().map(|_| ())
    }

    /// Pixel `(width, height)` of the rendered pattern.
    ///
    /// Fails when a side overflows `u32`, the RGB buffer size overflows
    /// `usize`, or the buffer exceeds [`MAX_OUTPUT_BYTES`].
    pub fn output_dimensions(&self) -> Result<(u32, u32)> {
        let w = self.cols.checked_mul(self.cell_size);
        let h = self.rows.checked_mul(self.cell_size);
        let (w, h) = match (w, h) {
            (Some(w), Some(h)) => (w, h),
            _ => return Err(self.invalid()),
        };
        let bytes = (w as usize)
            .checked_mul(h as usize)
            .and_then(|px| px.checked_mul(3));
        match bytes {
            Some(n) if n <= MAX_OUTPUT_BYTES => Ok((w, h)),
            _ => Err(self.invalid()),
        }
    }

    fn invalid(&self) -> BeadError {
        BeadError::InvalidDimensions {
            rows: self.rows,
            cols: self.cols,
            cell_size: self.cell_size,
        }
    }
}

/// Number of beads needed of one palette color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeadCount {
    /// Position of the color in [`BASE_COLORS`].
    pub index: usize,
    pub color: Srgb<u8>,
    pub count: usize,
}

impl BeadCount {
    /// 1-based palette position, as shown to users.
    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn hex(&self) -> String {
        to_hex(self.color)
    }
}

/// A `rows x cols` grid of bead colors, stored row-major. Every entry is a
/// member of [`BASE_COLORS`].
#[derive(Clone, Debug, PartialEq)]
pub struct BeadLayout {
    rows: u32,
    cols: u32,
    beads: Vec<Srgb<u8>>,
}

impl BeadLayout {
    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Color of the bead at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: u32, col: u32) -> Option<Srgb<u8>> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.beads.get((row * self.cols + col) as usize).copied()
    }

    /// Rows of bead colors, top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Srgb<u8>]> {
        self.beads.chunks(self.cols as usize)
    }

    /// One pixel per bead, `cols` wide and `rows` tall.
    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.cols, self.rows, |x, y| {
            let c = self.beads[(y * self.cols + x) as usize];
            Rgb([c.red, c.green, c.blue])
        })
    }

    /// Bead totals per palette color, in palette order, skipping unused colors.
    pub fn color_counts(&self) -> Vec<BeadCount> {
        let mut counts = [0usize; BASE_COLORS.len()];
        for &bead in &self.beads {
            counts[nearest_index(bead)] += 1;
        }
        counts
            .iter()
            .enumerate()
            .filter(|(_, n)| **n > 0)
            .map(|(index, &count)| BeadCount {
                index,
                color: BASE_COLORS[index],
                count,
            })
            .collect()
    }
}

/// Build the bead layout for `img`.
///
/// Steps performed:
/// 1. Validate the grid; zero rows or columns fail before any pixel work.
/// 2. Resize to exactly `cols x rows` pixels with a triangle (bilinear) filter.
/// 3. Drop alpha / expand grayscale to plain RGB.
/// 4. Snap every pixel to its nearest bead color, independently of its neighbours.
pub fn image_to_bead_layout(img: &DynamicImage, grid: &GridSpec) -> Result<BeadLayout> {
    grid.validate()?;

    let (orig_w, orig_h) = img.dimensions();
    if orig_w == 0 || orig_h == 0 {
        return Err(BeadError::InvalidImage(format!(
            "image has no pixels ({orig_w}x{orig_h})"
        )));
    }

    let resized = img.resize_exact(grid.cols, grid.rows, FilterType::Triangle);
    let rgb = resized.to_rgb8();
    debug!(
        from_w = orig_w,
        from_h = orig_h,
        rows = grid.rows,
        cols = grid.cols,
        "resized source to bead grid"
    );

    let beads = rgb
        .pixels()
        .map(|p| BASE_COLORS[nearest_index(Srgb::new(p[0], p[1], p[2]))])
        .collect();

    Ok(BeadLayout {
        rows: grid.rows,
        cols: grid.cols,
        beads,
    })
}
