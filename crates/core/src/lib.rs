//! Keyrow core
//!
//! Lighting buffer of an addressable keyboard LED matrix and the row frame protocol used to
//! transmit it to the device daemon.

#![cfg_attr(not(any(feature = "std", test)), no_std)]
// Linter configuration
#![warn(unsafe_code, clippy::pedantic, clippy::use_self)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

extern crate alloc;

pub use crate::{
    color::Color,
    device::{DeviceManager, DeviceSession},
    errors::{Error, Result},
    frame::{
        decode_frame, encode_frame, encode_row, DecodedRow, RowFrame, RowFrames, RowHeader,
    },
    lighting::LightingBuffer,
    matrix::{to_2d, to_linear, KeyPosition, MatrixDimensions},
};

pub mod color;
pub mod device;
pub mod errors;
pub mod frame;
pub mod lighting;
pub mod matrix;

#[cfg(feature = "std")]
pub mod test_utils;
