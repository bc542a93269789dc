//! Color of a single LED.

use core::{fmt::Display, str::FromStr};

use rgb::RGB8;
use serde::{Deserialize, Serialize};

/// A 24-bit RGB color, one byte per channel.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    /// Color of the switched off LED.
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Returns color channels in the wire order.
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }
}

impl From<RGB8> for Color {
    fn from(value: RGB8) -> Self {
        Self::new(value.r, value.g, value.b)
    }
}

impl From<Color> for RGB8 {
    fn from(value: Color) -> Self {
        RGB8::new(value.red, value.green, value.blue)
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// Errors that can occur while parsing a hex color string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, displaydoc::Display)]
pub enum ParseColorError {
    /// Expected six hexadecimal digits, got {0} characters.
    InvalidLength(usize),
    /// The color string contains a non-hexadecimal character.
    InvalidDigit,
}

#[cfg(feature = "std")]
impl std::error::Error for ParseColorError {}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parses `RRGGBB` or `#RRGGBB` strings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseColorError::InvalidDigit);
        }
        if digits.len() != 6 {
            return Err(ParseColorError::InvalidLength(digits.len()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| ParseColorError::InvalidDigit)
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}
