//! Per-device lighting buffer.

use alloc::vec::Vec;

use rgb::FromSlice;

use crate::{
    color::Color,
    frame::BYTES_PER_KEY,
    matrix::{to_linear, KeyPosition, MatrixDimensions},
    Error, Result,
};

/// In-memory colors of every LED of a single device.
///
/// The buffer holds exactly `rows * cols` colors in row-major order and is never resized
/// after creation. Failed operations leave the buffer contents unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightingBuffer {
    dimensions: MatrixDimensions,
    colors: Vec<Color>,
}

impl LightingBuffer {
    /// Allocates a new buffer with all keys switched off.
    pub fn new(dimensions: MatrixDimensions) -> Result<Self> {
        let len = dimensions.key_count();

        let mut colors = Vec::new();
        colors.try_reserve_exact(len)?;
        colors.resize(len, Color::BLACK);
        Ok(Self { dimensions, colors })
    }

    pub fn dimensions(&self) -> MatrixDimensions {
        self.dimensions
    }

    /// Switches off every key.
    pub fn reset(&mut self) {
        self.fill(Color::BLACK);
    }

    /// Sets every key to the given color.
    pub fn fill(&mut self, color: Color) {
        self.colors.fill(color);
    }

    /// Sets the color of the key with the given linear index.
    pub fn set(&mut self, key: usize, color: Color) -> Result<()> {
        let slot = self.colors.get_mut(key).ok_or(Error::IndexOutOfRange)?;
        *slot = color;
        Ok(())
    }

    /// Returns the color of the key with the given linear index.
    pub fn get(&self, key: usize) -> Result<Color> {
        self.colors.get(key).copied().ok_or(Error::IndexOutOfRange)
    }

    /// Sets the color of the key at the given position.
    ///
    /// Unlike the linear index, a column outside of the matrix is rejected instead of
    /// wrapping to the next row.
    pub fn set_at(&mut self, position: KeyPosition, color: Color) -> Result<()> {
        let key = self.key_at(position)?;
        self.set(key, color)
    }

    /// Returns the color of the key at the given position.
    pub fn get_at(&self, position: KeyPosition) -> Result<Color> {
        self.get(self.key_at(position)?)
    }

    /// Returns colors of the given row, from the first column to the last one.
    pub fn row(&self, row: usize) -> Result<&[Color]> {
        if row >= usize::from(self.dimensions.rows()) {
            return Err(Error::IndexOutOfRange);
        }

        let from = to_linear(0, row, self.dimensions);
        let to = from + usize::from(self.dimensions.cols());
        Ok(&self.colors[from..to])
    }

    /// Returns an iterator over the matrix rows in ascending order.
    pub fn rows(&self) -> impl Iterator<Item = &[Color]> + '_ {
        self.colors.chunks_exact(usize::from(self.dimensions.cols()))
    }

    /// Returns all colors in the linear key order.
    pub fn as_slice(&self) -> &[Color] {
        &self.colors
    }

    /// Replaces the whole buffer contents by the raw row-major RGB bytes.
    ///
    /// The length of `bytes` must be exactly three bytes per key.
    pub fn load_rgb(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() != self.colors.len() * BYTES_PER_KEY {
            return Err(Error::LengthMismatch);
        }

        for (slot, rgb) in self.colors.iter_mut().zip(bytes.as_rgb()) {
            *slot = Color::from(*rgb);
        }
        Ok(())
    }

    fn key_at(&self, position: KeyPosition) -> Result<usize> {
        if !self.dimensions.contains(position) {
            return Err(Error::IndexOutOfRange);
        }
        Ok(to_linear(position.col, position.row, self.dimensions))
    }
}
