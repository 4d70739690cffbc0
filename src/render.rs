use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};
use imageproc::{drawing::draw_hollow_rect_mut, rect::Rect};
use tracing::debug;

use crate::error::{BeadError, Result};
use crate::font::draw_number;
use crate::layout::{BeadLayout, GridSpec};

const GRID_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const LABEL_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
/// Label offset from a cell's top-left corner, in pixels.
const LABEL_MARGIN: u32 = 2;

/// 1-based, row-major label of the cell at `(row, col)`.
#[inline]
pub fn cell_number(row: u32, col: u32, cols: u32) -> u64 {
    row as u64 * cols as u64 + col as u64 + 1
}

/// Blow every bead up into a solid `cell_size x cell_size` block.
pub fn upscale_layout(layout: &BeadLayout, cell_size: u32) -> Result<RgbImage> {
    let grid = GridSpec::new(layout.rows(), layout.cols(), cell_size);
    grid.validate()?;
    let (w, h) = grid.output_dimensions()?;

    // Integer block mapping instead of a resampling filter: no blending at cell edges.
    let small = layout.to_image();
    Ok(RgbImage::from_fn(w, h, |x, y| {
        *small.get_pixel(x / cell_size, y / cell_size)
    }))
}

/// Outline every cell and write its number in the top-left corner.
///
/// Neighbouring cells share a single 1-pixel line. A cell's closing edge at
/// `(j + 1) * cell_size` falls outside the image for the last row/column, so
/// it is clamped onto the final pixel to keep the outer border closed.
pub fn add_grid_and_numbers(img: &mut RgbImage, grid: &GridSpec) -> Result<()> {
    grid.validate()?;
    let (w, h) = grid.output_dimensions()?;
    if img.dimensions() != (w, h) {
        return Err(BeadError::InvalidDimensions {
            rows: grid.rows,
            cols: grid.cols,
            cell_size: grid.cell_size,
        });
    }

    let cs = grid.cell_size;
    for i in 0..grid.rows {
        for j in 0..grid.cols {
            let left = j * cs;
            let top = i * cs;
            let right = (left + cs).min(w - 1);
            let bottom = (top + cs).min(h - 1);
            // `right`/`bottom` are inclusive pixel positions.
            let outline = Rect::at(left as i32, top as i32).of_size(right - left + 1, bottom - top + 1);
            draw_hollow_rect_mut(img, outline, GRID_COLOR);

            let number = cell_number(i, j, grid.cols);
            draw_number(img, left + LABEL_MARGIN, top + LABEL_MARGIN, number, LABEL_COLOR);
        }
    }
    Ok(())
}

/// Render `layout` as a numbered bead pattern with `cell_size` pixels per bead.
pub fn render_pattern(layout: &BeadLayout, cell_size: u32) -> Result<RgbImage> {
    let grid = GridSpec::new(layout.rows(), layout.cols(), cell_size);
    let mut img = upscale_layout(layout, cell_size)?;
    add_grid_and_numbers(&mut img, &grid)?;
    debug!(
        width = img.width(),
        height = img.height(),
        "rendered bead pattern"
    );
    Ok(img)
}

/// PNG-encode `img` in memory.
pub fn encode_png(img: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buf);
        img.write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| BeadError::Encode(e.to_string()))?;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{GLYPH_H, GLYPH_W, glyph_pixel};
    use crate::layout::image_to_bead_layout;
    use image::DynamicImage;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    fn solid_layout(rows: u32, cols: u32, c: [u8; 3]) -> BeadLayout {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(cols * 3, rows * 3, Rgb(c)));
        image_to_bead_layout(&img, &GridSpec::new(rows, cols, 25)).unwrap()
    }

    /// Check a single-digit label at `(x, y)` against its glyph over `bg`.
    fn assert_digit(img: &RgbImage, x: u32, y: u32, digit: u8, bg: Rgb<u8>) {
        for row in 0..GLYPH_H {
            for col in 0..GLYPH_W {
                let want = if glyph_pixel(digit, col, row) { BLACK } else { bg };
                assert_eq!(
                    *img.get_pixel(x + col, y + row),
                    want,
                    "digit {digit} at ({}, {})",
                    x + col,
                    y + row
                );
            }
        }
    }

    #[test]
    fn numbering_is_row_major_from_one() {
        assert_eq!(cell_number(0, 0, 3), 1);
        assert_eq!(cell_number(0, 2, 3), 3);
        assert_eq!(cell_number(1, 0, 3), 4);
        assert_eq!(cell_number(1, 2, 3), 6);
        assert_eq!(cell_number(34, 34, 35), 1225);
    }

    #[test]
    fn upscale_produces_solid_blocks() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 { Rgb([0, 0, 255]) } else { Rgb([255, 255, 0]) }
        }));
        let layout = image_to_bead_layout(&img, &GridSpec::new(1, 2, 4)).unwrap();
        let big = upscale_layout(&layout, 4).unwrap();
        assert_eq!(big.dimensions(), (8, 4));
        for (x, _, p) in big.enumerate_pixels() {
            let want = layout.get(0, x / 4).unwrap();
            assert_eq!(p.0, [want.red, want.green, want.blue]);
        }
    }

    #[test]
    fn output_dimensions_are_cell_multiples() {
        for (rows, cols, cs) in [(1, 1, 25), (2, 3, 25), (7, 4, 10), (3, 9, 1)] {
            let img = render_pattern(&solid_layout(rows, cols, [0, 128, 0]), cs).unwrap();
            assert_eq!(img.dimensions(), (cols * cs, rows * cs));
        }
    }

    #[test]
    fn zero_cell_size_is_rejected() {
        let err = render_pattern(&solid_layout(2, 2, [0, 0, 0]), 0).unwrap_err();
        assert!(matches!(err, BeadError::InvalidDimensions { cell_size: 0, .. }));
    }

    #[test]
    fn mismatched_canvas_is_rejected() {
        let mut img = RgbImage::new(10, 10);
        let err = add_grid_and_numbers(&mut img, &GridSpec::new(2, 2, 25)).unwrap_err();
        assert!(matches!(err, BeadError::InvalidDimensions { .. }));
    }

    #[test]
    fn single_cell_has_only_an_outer_border() {
        let img = render_pattern(&solid_layout(1, 1, [255, 0, 0]), 25).unwrap();
        assert_eq!(img.dimensions(), (25, 25));
        for k in 0..25 {
            assert_eq!(*img.get_pixel(k, 0), BLACK);
            assert_eq!(*img.get_pixel(k, 24), BLACK);
            assert_eq!(*img.get_pixel(0, k), BLACK);
            assert_eq!(*img.get_pixel(24, k), BLACK);
        }
        // Interior away from the label stays bead colored.
        for y in 12..24 {
            for x in 1..24 {
                assert_eq!(*img.get_pixel(x, y), RED);
            }
        }
        assert_digit(&img, 2, 2, 1, RED);
    }

    #[test]
    fn small_cells_keep_every_grid_line() {
        let img = render_pattern(&solid_layout(2, 2, [255, 0, 0]), 3).unwrap();
        assert_eq!(img.dimensions(), (6, 6));
        for k in 0..6 {
            for line in [0, 3, 5] {
                assert_eq!(*img.get_pixel(line, k), BLACK);
                assert_eq!(*img.get_pixel(k, line), BLACK);
            }
        }

        // One-pixel cells are nothing but outline.
        let img = render_pattern(&solid_layout(3, 4, [255, 0, 0]), 1).unwrap();
        assert!(img.pixels().all(|p| *p == BLACK));
    }

    #[test]
    fn two_by_two_red_pattern() {
        let layout = solid_layout(2, 2, [255, 0, 0]);
        let img = render_pattern(&layout, 25).unwrap();
        assert_eq!(img.dimensions(), (50, 50));

        // Shared internal lines plus the clamped outer border.
        for k in 0..50 {
            for line in [0, 25, 49] {
                assert_eq!(*img.get_pixel(line, k), BLACK);
                assert_eq!(*img.get_pixel(k, line), BLACK);
            }
        }
        // No doubled line next to the shared edge.
        assert_eq!(*img.get_pixel(24, 15), RED);
        assert_eq!(*img.get_pixel(15, 24), RED);
        assert_eq!(*img.get_pixel(37, 40), RED);

        assert_digit(&img, 2, 2, 1, RED);
        assert_digit(&img, 27, 2, 2, RED);
        assert_digit(&img, 2, 27, 3, RED);
        assert_digit(&img, 27, 27, 4, RED);

        // Everything is either bead red or black ink.
        assert!(img.pixels().all(|p| *p == RED || *p == BLACK));
    }

    #[test]
    fn png_round_trips_dimensions() {
        let img = render_pattern(&solid_layout(2, 3, [255, 255, 255]), 5).unwrap();
        let png = encode_png(&img).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (15, 10));
    }
}
