//! Embedded 5x7 bitmap digits used for cell labels.

use image::{Rgb, RgbImage};

pub const GLYPH_W: u32 = 5;
pub const GLYPH_H: u32 = 7;
/// Horizontal distance between the left edges of consecutive digits.
pub const ADVANCE: u32 = GLYPH_W + 1;

/// Each glyph: 7 rows, each row's lower 5 bits = pixels (MSB=left).
#[rustfmt::skip]
const DIGITS_5X7: [[u8; 7]; 10] = [
    [0x0E,0x11,0x13,0x15,0x19,0x11,0x0E], // '0'
    [0x04,0x0C,0x04,0x04,0x04,0x04,0x0E], // '1'
    [0x0E,0x11,0x01,0x02,0x04,0x08,0x1F], // '2'
    [0x1F,0x02,0x04,0x02,0x01,0x11,0x0E], // '3'
    [0x02,0x06,0x0A,0x12,0x1F,0x02,0x02], // '4'
    [0x1F,0x10,0x1E,0x01,0x01,0x11,0x0E], // '5'
    [0x06,0x08,0x10,0x1E,0x11,0x11,0x0E], // '6'
    [0x1F,0x01,0x02,0x04,0x08,0x08,0x08], // '7'
    [0x0E,0x11,0x11,0x0E,0x11,0x11,0x0E], // '8'
    [0x0E,0x11,0x11,0x0F,0x01,0x02,0x0C], // '9'
];

/// Whether pixel `(col, row)` of `digit`'s glyph is set.
pub fn glyph_pixel(digit: u8, col: u32, row: u32) -> bool {
    if digit > 9 || col >= GLYPH_W || row >= GLYPH_H {
        return false;
    }
    DIGITS_5X7[digit as usize][row as usize] & (0x10 >> col) != 0
}

/// Pixel width of `text` when drawn with [`draw_number`].
pub fn text_width(text: &str) -> u32 {
    match text.len() as u32 {
        0 => 0,
        n => (n - 1) * ADVANCE + GLYPH_W,
    }
}

/// Draw the decimal form of `n` with its top-left corner at `(x, y)`.
/// Pixels outside the image are dropped.
pub fn draw_number(img: &mut RgbImage, x: u32, y: u32, n: u64, color: Rgb<u8>) {
    let (w, h) = img.dimensions();
    for (i, ch) in n.to_string().bytes().enumerate() {
        let digit = ch - b'0';
        let gx = x + i as u32 * ADVANCE;
        for row in 0..GLYPH_H {
            for col in 0..GLYPH_W {
                let (px, py) = (gx + col, y + row);
                if px < w && py < h && glyph_pixel(digit, col, row) {
                    img.put_pixel(px, py, color);
                }
            }
        }
    }
}
