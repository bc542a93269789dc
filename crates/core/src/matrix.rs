//! Matrix shape and conversion between key coordinates and linear key indices.
//!
//! Keys are laid out in row-major order, which matches the row oriented wire protocol:
//! the keys of a single row occupy a contiguous range of indices.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Maximum number of rows or columns that can be addressed by a single byte row header.
pub const MAX_MATRIX_SIDE: u16 = 256;

/// Immutable `rows x cols` shape of the device LED matrix.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "(u16, u16)", into = "(u16, u16)")]
pub struct MatrixDimensions {
    rows: u16,
    cols: u16,
}

impl MatrixDimensions {
    /// Creates a new matrix shape.
    ///
    /// Both sides must be non-zero and must not exceed [`MAX_MATRIX_SIDE`], otherwise the
    /// row index or the last column index would not fit into the row frame header.
    pub fn new(rows: u16, cols: u16) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimensions);
        }
        if rows > MAX_MATRIX_SIDE || cols > MAX_MATRIX_SIDE {
            return Err(Error::ProtocolLimitExceeded);
        }
        Ok(Self { rows, cols })
    }

    pub const fn rows(self) -> u16 {
        self.rows
    }

    pub const fn cols(self) -> u16 {
        self.cols
    }

    /// Returns the total number of keys in the matrix.
    pub const fn key_count(self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Returns `true` if the given linear key index belongs to the matrix.
    pub const fn contains_key(self, key: usize) -> bool {
        key < self.key_count()
    }

    /// Returns `true` if the given position belongs to the matrix.
    pub const fn contains(self, position: KeyPosition) -> bool {
        position.col < self.cols as usize && position.row < self.rows as usize
    }
}

impl TryFrom<(u16, u16)> for MatrixDimensions {
    type Error = Error;

    fn try_from((rows, cols): (u16, u16)) -> Result<Self> {
        Self::new(rows, cols)
    }
}

impl From<MatrixDimensions> for (u16, u16) {
    fn from(value: MatrixDimensions) -> Self {
        (value.rows, value.cols)
    }
}

/// A 2D key coordinate.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyPosition {
    pub col: usize,
    pub row: usize,
}

impl KeyPosition {
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// Converts the `(col, row)` coordinate into the linear key index.
///
/// No bounds checks are performed, out of range keys are rejected by the lighting buffer.
pub const fn to_linear(col: usize, row: usize, dims: MatrixDimensions) -> usize {
    dims.cols as usize * row + col
}

/// Converts the linear key index into the `(col, row)` coordinate.
///
/// This is the exact inverse of [`to_linear`] for the keys inside of the matrix.
pub const fn to_2d(index: usize, dims: MatrixDimensions) -> KeyPosition {
    let cols = dims.cols as usize;
    KeyPosition {
        col: index % cols,
        row: index / cols,
    }
}
