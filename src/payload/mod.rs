//! Payload Module
//!
//! Binary payloads carried inside JSON results as base64 RLE blocks.
//!
//! ## Pipeline
//! ```text
//!  base64 text ──► RLE block ──► flat bytes ─┬─► Grid         (getmapdata)
//!                                            └─► LaserSample  (getlaserscan)
//! ```

pub mod rle;
mod grid;
mod laser;

pub use grid::Grid;
pub use laser::{decode_samples, LaserSample, DECODED_SIZE, NO_RETURN_DISTANCE, RECORD_SIZE};

use crate::error::Result;

/// Decode a base64 map block into a grid of the declared dimensions
pub fn decode_grid(text: &str, dimension_x: usize, dimension_y: usize) -> Result<Grid> {
    let cells = rle::decode_base64_block(text)?;
    Grid::reshape(cells, dimension_x, dimension_y)
}

/// Decode a base64 laser block into samples
pub fn decode_laser(text: &str, valid_only: bool) -> Result<Vec<LaserSample>> {
    let bytes = rle::decode_base64_block(text)?;
    decode_samples(&bytes, valid_only)
}
