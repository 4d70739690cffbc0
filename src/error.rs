use thiserror::Error;

/// Errors produced by the bead pattern pipeline.
///
/// Every failure aborts the whole run; no partially rendered image is ever
/// returned alongside an error.
#[derive(Debug, Error)]
pub enum BeadError {
    /// The source bytes could not be decoded, or decoded to an empty image.
    #[error("Unable to decode image: {0}")]
    InvalidImage(String),

    /// A grid side or the cell size is zero, or the output would not fit in `u32`.
    #[error("Invalid grid dimensions: {rows}x{cols} (cell size {cell_size})")]
    InvalidDimensions { rows: u32, cols: u32, cell_size: u32 },

    #[error("PNG encode error: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, BeadError>;
