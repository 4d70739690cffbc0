use wasm_bindgen::prelude::*;
use js_sys::{Array, Object, Reflect, Uint8Array};
use image::DynamicImage;
use tracing::debug;

pub mod error;
pub mod font;
pub mod layout;
pub mod quantize;
pub mod render;

pub use error::BeadError;
pub use layout::{BeadCount, BeadLayout, GridSpec, image_to_bead_layout};
pub use quantize::{BASE_COLORS, nearest_index, quantize_color, to_hex};
pub use render::{add_grid_and_numbers, cell_number, encode_png, render_pattern, upscale_layout};

/// A finished pattern: PNG bytes plus the beads needed to build it.
#[derive(Clone, Debug)]
pub struct BeadPattern {
    pub png: Vec<u8>,
    pub counts: Vec<BeadCount>,
}

/// Decode uploaded image bytes (JPEG, PNG, ...).
pub fn decode_image(input: &[u8]) -> error::Result<DynamicImage> {
    image::load_from_memory(input).map_err(|e| BeadError::InvalidImage(e.to_string()))
}

/// Turn encoded image bytes into a numbered bead pattern.
///
/// Steps performed:
/// 1. Validate the grid (before decoding anything).
/// 2. Decode the image.
/// 3. Resize to `rows x cols` and snap each pixel to the fixed bead palette.
/// 4. Up-scale each bead to a `cell_size` block, draw the grid and numbers.
/// 5. PNG-encode the result.
pub fn generate_pattern_bytes(input: &[u8], grid: &GridSpec) -> error::Result<BeadPattern> {
    grid.validate()?;
    let img = decode_image(input)?;
    debug!(width = img.width(), height = img.height(), "decoded source image");

    let layout = image_to_bead_layout(&img, grid)?;
    let rendered = render_pattern(&layout, grid.cell_size)?;
    let png = encode_png(&rendered)?;

    Ok(BeadPattern {
        png,
        counts: layout.color_counts(),
    })
}

/// Browser entry point.
///
/// Returns `{ image: Uint8Array, palette: string[], counts: number[] }` where
/// `palette[i]` is the `RRGGBB` hex of a used bead color and `counts[i]` how
/// many beads of it the pattern needs.
#[wasm_bindgen]
pub fn generate_pattern(
    input: Vec<u8>,
    rows: u32,
    cols: u32,
    cell_size: Option<u32>,
) -> Result<Object, JsValue> {
    let grid = GridSpec::new(rows, cols, cell_size.unwrap_or(layout::DEFAULT_CELL_SIZE));
    let pattern = generate_pattern_bytes(&input, &grid)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let img_js = Uint8Array::from(pattern.png.as_slice());
    let palette_js = Array::new();
    let counts_js = Array::new();
    for bead in &pattern.counts {
        palette_js.push(&JsValue::from_str(&bead.hex()));
        counts_js.push(&JsValue::from_f64(bead.count as f64));
    }

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("image"), &img_js)?;
    Reflect::set(&result, &JsValue::from_str("palette"), &palette_js)?;
    Reflect::set(&result, &JsValue::from_str("counts"), &counts_js)?;

    Ok(result)
}
