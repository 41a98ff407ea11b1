//! Rectangular pixel grids
//!
//! [`Grid`] is the container for both the source and the destination of the
//! filter. Construction validates the shape once, so the filter itself never
//! has to deal with malformed input.

use thiserror::Error;

/// Largest factor a grid is ever expanded by. Grids whose expansion would
/// overflow `usize` are rejected up front.
const MAX_EXPANSION: usize = 4;

/// Error when building a grid from malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Width or height is zero
    #[error("invalid dimensions {width}x{height}: width and height must be at least 1")]
    InvalidDimensions { width: usize, height: usize },
    /// Rows of different lengths
    #[error("ragged rows: row {row} has {actual} cells, expected {expected}")]
    RaggedRows { row: usize, expected: usize, actual: usize },
    /// Cell buffer does not match width * height
    #[error("expected {expected} cells, got {actual}")]
    CellCount { expected: usize, actual: usize },
    /// A 4x expansion of this grid would not be addressable
    #[error("grid {width}x{height} is too large to expand")]
    TooLarge { width: usize, height: usize },
}

/// A non-empty, rectangular, row-major grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Copy> Grid<T> {
    /// Build a grid from a row-major cell buffer.
    pub fn new(width: usize, height: usize, cells: Vec<T>) -> Result<Self, GridError> {
        let expected = checked_area(width, height)?;
        if cells.len() != expected {
            return Err(GridError::CellCount { expected, actual: cells.len() });
        }
        Ok(Self { width, height, cells })
    }

    /// Build a grid from rows, rejecting ragged input.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        checked_area(width, height)?;

        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(GridError::RaggedRows { row, expected: width, actual: r.len() });
        }

        let cells = rows.into_iter().flatten().collect();
        Ok(Self { width, height, cells })
    }

    /// A grid where every cell holds `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Result<Self, GridError> {
        let area = checked_area(width, height)?;
        Ok(Self { width, height, cells: vec![value; area] })
    }

    /// Wrap a buffer already known to be `width * height` long.
    pub(crate) fn from_parts(width: usize, height: usize, cells: Vec<T>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self { width, height, cells }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Cell at (x, y), or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Cell at (x, y) with coordinates clamped to the nearest edge.
    pub fn get_clamped(&self, x: isize, y: isize) -> T {
        let x = x.clamp(0, self.width as isize - 1) as usize;
        let y = y.clamp(0, self.height as isize - 1) as usize;
        self.cells[y * self.width + x]
    }

    /// Iterate rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.width)
    }

    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<T> {
        self.cells
    }

    /// Apply `f` to every cell, keeping the shape.
    pub fn map<U: Copy>(&self, f: impl FnMut(T) -> U) -> Grid<U> {
        Grid { width: self.width, height: self.height, cells: self.cells.iter().copied().map(f).collect() }
    }
}

/// width * height, provided both are non-zero and a 4x expansion still fits.
fn checked_area(width: usize, height: usize) -> Result<usize, GridError> {
    if width == 0 || height == 0 {
        return Err(GridError::InvalidDimensions { width, height });
    }
    let area = width.checked_mul(height).ok_or(GridError::TooLarge { width, height })?;
    area.checked_mul(MAX_EXPANSION * MAX_EXPANSION).ok_or(GridError::TooLarge { width, height })?;
    Ok(area)
}
