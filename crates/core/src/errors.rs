use alloc::collections::TryReserveError;
use core::fmt::Display;

use displaydoc::Display;
use serde::{Deserialize, Serialize};

/// A specialized result type for the lighting operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur while building or delivering lighting frames.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Debug, Serialize, Deserialize)]
pub enum Error {
    /// Unable to allocate memory for the lighting data.
    AllocationError,
    /// The key or row index is outside of the matrix bounds.
    IndexOutOfRange,
    /// The matrix must have at least one row and one column.
    InvalidDimensions,
    /// The matrix is too large to be addressed by a single byte row header.
    ProtocolLimitExceeded,
    /// The length of the color data does not match the matrix size.
    LengthMismatch,
    /// The device is unknown to the device manager.
    DeviceNotFound,
    /// Unable to deliver a frame to the device daemon.
    Transport,
    /// Frame decoding error.
    Decode,
}

impl Error {
    /// Creates a new transport error.
    pub fn transport<E>(_: E) -> Self
    where
        E: Display,
    {
        Self::Transport
    }
}

impl From<TryReserveError> for Error {
    fn from(_: TryReserveError) -> Self {
        Self::AllocationError
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
