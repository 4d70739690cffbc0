use palette::Srgb;

/// The 24 bead colors every pattern is built from, in lookup order.
///
/// The order is significant: when a color sits exactly between two entries,
/// the one listed first wins.
pub const BASE_COLORS: [Srgb<u8>; 24] = [
    Srgb::new(255, 0, 0),     // red
    Srgb::new(0, 255, 0),     // lime
    Srgb::new(0, 0, 255),     // blue
    Srgb::new(255, 255, 0),   // yellow
    Srgb::new(0, 255, 255),   // cyan
    Srgb::new(255, 0, 255),   // magenta
    Srgb::new(128, 0, 0),     // maroon
    Srgb::new(0, 128, 0),     // green
    Srgb::new(0, 0, 128),     // navy
    Srgb::new(128, 128, 0),   // olive
    Srgb::new(128, 0, 128),   // purple
    Srgb::new(0, 128, 128),   // teal
    Srgb::new(255, 192, 203), // pink
    Srgb::new(173, 216, 230), // light blue
    Srgb::new(144, 238, 144), // light green
    Srgb::new(255, 218, 185), // peach puff
    Srgb::new(255, 239, 213), // papaya whip
    Srgb::new(221, 160, 221), // plum
    Srgb::new(255, 165, 0),   // orange
    Srgb::new(128, 128, 128), // gray
    Srgb::new(192, 192, 192), // silver
    Srgb::new(255, 255, 255), // white
    Srgb::new(0, 0, 0),       // black
    Srgb::new(165, 42, 42),   // brown
];

/// Index into [`BASE_COLORS`] of the entry closest to `color` by squared
/// Euclidean RGB distance. Ties resolve to the lowest index.
#[inline]
pub fn nearest_index(color: Srgb<u8>) -> usize {
    let r = color.red as i32;
    let g = color.green as i32;
    let b = color.blue as i32;

    // Linear scan, strict `<` keeps the first of equal distances.
    let mut best_idx = 0;
    let mut best_dist = i32::MAX;
    for (idx, c) in BASE_COLORS.iter().enumerate() {
        let dr = r - c.red as i32;
        let dg = g - c.green as i32;
        let db = b - c.blue as i32;
        let dist = dr * dr + dg * dg + db * db;
        if dist < best_dist {
            best_dist = dist;
            best_idx = idx;
        }
    }
    best_idx
}

/// Snap `color` to its nearest bead color.
#[inline]
pub fn quantize_color(color: Srgb<u8>) -> Srgb<u8> {
    BASE_COLORS[nearest_index(color)]
}

/// Uppercase `RRGGBB` form of a color.
pub fn to_hex(color: Srgb<u8>) -> String {
    format!("{:02X}{:02X}{:02X}", color.red, color.green, color.blue)
}
