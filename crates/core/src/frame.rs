//! Row oriented wire format understood by the device daemon.
//!
//! A row frame is a three byte [`RowHeader`] followed by `cols` RGB triples in ascending
//! column order. A full frame is a plain concatenation of the row frames for every row in
//! ascending order, the daemon relies on the embedded headers only.
//!
//! ```text
//! | row | 0x00 | cols - 1 | r g b | r g b | ... |
//! ```

use alloc::vec::Vec;

pub use endian_codec::PackedSize;
use endian_codec::{DecodeLE, EncodeLE};
use rgb::FromSlice;

use crate::{
    color::Color,
    lighting::LightingBuffer,
    matrix::{MatrixDimensions, MAX_MATRIX_SIDE},
    Error, Result,
};

/// Bytes count per single key.
pub const BYTES_PER_KEY: usize = 3;
/// Max length of the single row frame.
pub const MAX_ROW_FRAME_LEN: usize =
    RowHeader::PACKED_LEN + BYTES_PER_KEY * MAX_MATRIX_SIDE as usize;

/// Encoded row frame, it never exceeds the protocol limits so it can live on the stack.
pub type RowFrame = heapless::Vec<u8, MAX_ROW_FRAME_LEN>;

/// Row frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PackedSize, EncodeLE, DecodeLE)]
pub struct RowHeader {
    /// Index of the row.
    pub row: u8,
    /// Always zero.
    pub reserved: u8,
    /// Index of the last column in the row.
    pub last_col: u8,
}

impl RowHeader {
    pub fn new(row: usize, cols: u16) -> Result<Self> {
        let last_col = cols.checked_sub(1).ok_or(Error::InvalidDimensions)?;
        Ok(Self {
            row: u8::try_from(row).map_err(|_| Error::ProtocolLimitExceeded)?,
            reserved: 0,
            last_col: u8::try_from(last_col).map_err(|_| Error::ProtocolLimitExceeded)?,
        })
    }

    /// Number of the colors following this header.
    pub fn cols(self) -> usize {
        usize::from(self.last_col) + 1
    }

    /// Total length of the row frame described by this header.
    pub fn frame_len(self) -> usize {
        row_frame_len(self.cols())
    }
}

/// Returns the length of the single row frame for the matrix with the given columns count.
pub const fn row_frame_len(cols: usize) -> usize {
    RowHeader::PACKED_LEN + BYTES_PER_KEY * cols
}

/// Returns the length of the full frame for the given matrix.
pub const fn frame_len(dims: MatrixDimensions) -> usize {
    dims.rows() as usize * row_frame_len(dims.cols() as usize)
}

/// Serializes a single row of the lighting buffer.
pub fn encode_row(buffer: &LightingBuffer, row: usize) -> Result<RowFrame> {
    let colors = buffer.row(row)?;
    let header = RowHeader::new(row, buffer.dimensions().cols())?;

    let mut header_buf = [0_u8; RowHeader::PACKED_LEN];
    header.encode_as_le_bytes(&mut header_buf);

    let mut frame = RowFrame::new();
    frame
        .extend_from_slice(&header_buf)
        .map_err(|()| Error::ProtocolLimitExceeded)?;
    for color in colors {
        frame
            .extend_from_slice(&color.to_bytes())
            .map_err(|()| Error::ProtocolLimitExceeded)?;
    }

    log::trace!("Encoded row {} into {} bytes", row, frame.len());
    Ok(frame)
}

/// Serializes the whole lighting buffer into a single transmittable frame.
pub fn encode_frame(buffer: &LightingBuffer) -> Result<Vec<u8>> {
    let dims = buffer.dimensions();

    let mut frame = Vec::new();
    frame.try_reserve_exact(frame_len(dims))?;
    for row in 0..usize::from(dims.rows()) {
        frame.extend_from_slice(&encode_row(buffer, row)?);
    }
    Ok(frame)
}

/// A single decoded row frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedRow<'a> {
    pub header: RowHeader,
    bytes: &'a [u8],
}

impl<'a> DecodedRow<'a> {
    /// Returns an iterator over the row colors.
    pub fn colors(&self) -> impl Iterator<Item = Color> + 'a {
        let bytes: &'a [u8] = self.bytes;
        bytes.as_rgb().iter().copied().map(Color::from)
    }
}

/// An iterator over the row frames of the encoded frame.
///
/// The iterator stops after the first malformed row.
#[derive(Debug, Clone)]
pub struct RowFrames<'a> {
    bytes: &'a [u8],
}

impl<'a> RowFrames<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    fn read_row(&mut self) -> Result<DecodedRow<'a>> {
        if self.bytes.len() < RowHeader::PACKED_LEN {
            return Err(Error::Decode);
        }

        let header = RowHeader::decode_from_le_bytes(&self.bytes[..RowHeader::PACKED_LEN]);
        if header.reserved != 0 || self.bytes.len() < header.frame_len() {
            return Err(Error::Decode);
        }

        let (row, rest) = self.bytes.split_at(header.frame_len());
        self.bytes = rest;
        Ok(DecodedRow {
            header,
            bytes: &row[RowHeader::PACKED_LEN..],
        })
    }
}

impl<'a> Iterator for RowFrames<'a> {
    type Item = Result<DecodedRow<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bytes.is_empty() {
            return None;
        }

        let row = self.read_row();
        if row.is_err() {
            self.bytes = &[];
        }
        Some(row)
    }
}

/// Restores the lighting buffer from the full frame of the matrix with the given shape.
///
/// Every row must be present exactly once and each row header must describe the given
/// columns count.
pub fn decode_frame(bytes: &[u8], dims: MatrixDimensions) -> Result<LightingBuffer> {
    if bytes.len() != frame_len(dims) {
        return Err(Error::LengthMismatch);
    }

    let mut buffer = LightingBuffer::new(dims)?;
    for (expected_row, row) in RowFrames::new(bytes).enumerate() {
        let row = row?;
        if usize::from(row.header.row) != expected_row
            || row.header.cols() != usize::from(dims.cols())
        {
            return Err(Error::Decode);
        }

        let first_key = expected_row * usize::from(dims.cols());
        for (col, color) in row.colors().enumerate() {
            buffer.set(first_key + col, color)?;
        }
    }
    Ok(buffer)
}
