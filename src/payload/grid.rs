//! Occupancy grid
//!
//! Reinterprets a decompressed map buffer as rows of cells.

use std::collections::BTreeMap;

use crate::error::{Result, SlamError};

/// Row-major occupancy grid, one byte per cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// Reshape a flat buffer into `dimension_y` rows of `dimension_x` cells
    pub fn reshape(cells: Vec<u8>, dimension_x: usize, dimension_y: usize) -> Result<Self> {
        let expected = dimension_x.checked_mul(dimension_y).ok_or_else(|| {
            SlamError::Decode(format!(
                "grid dimensions overflow: {} x {}",
                dimension_x, dimension_y
            ))
        })?;

        if cells.len() != expected {
            return Err(SlamError::DimensionMismatch {
                expected,
                actual: cells.len(),
            });
        }

        Ok(Self {
            width: dimension_x,
            height: dimension_y,
            cells,
        })
    }

    /// Cells per row (`dimension_x`)
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows (`dimension_y`)
    pub fn height(&self) -> usize {
        self.height
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<u8> {
        self.cells
    }

    /// Row by 1-based index
    pub fn row(&self, index: usize) -> Option<&[u8]> {
        if index == 0 || index > self.height {
            return None;
        }
        let start = (index - 1) * self.width;
        Some(&self.cells[start..start + self.width])
    }

    /// Rows in order, paired with their 1-based index
    pub fn rows(&self) -> impl Iterator<Item = (usize, &[u8])> + '_ {
        (1..=self.height).filter_map(move |i| self.row(i).map(|row| (i, row)))
    }

    /// Cell at 0-based column `x` of 0-based row `y`
    pub fn cell(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y * self.width + x])
    }

    /// Rows keyed by 1-based index
    pub fn to_row_map(&self) -> BTreeMap<usize, Vec<u8>> {
        self.rows().map(|(i, row)| (i, row.to_vec())).collect()
    }
}
