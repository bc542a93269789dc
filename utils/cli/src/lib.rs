//! Host side helpers of the keyrow command line utility.

use std::{io::Write, path::Path, str::FromStr};

use anyhow::{anyhow, bail, ensure, Context};
use keyrow_core::{
    device::{device_object_path, SET_KEY_ROW_METHOD},
    Color, DeviceManager, Error, KeyPosition, MatrixDimensions, Result,
};

/// Frame output representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Lowercase hex string, one frame per line.
    Hex,
    /// Raw frame bytes.
    Raw,
}

impl OutputFormat {
    /// Returns the explicitly requested format, otherwise hex for the terminal and raw
    /// bytes for the files.
    pub fn for_output(requested: Option<Self>, to_file: bool) -> Self {
        match requested {
            Some(format) => format,
            None if to_file => Self::Raw,
            None => Self::Hex,
        }
    }
}

/// Device manager stand-in that writes every frame into the given output instead of
/// calling the device daemon.
pub struct OfflineDaemon<W> {
    dimensions: MatrixDimensions,
    output: W,
    format: OutputFormat,
}

impl<W: Write> OfflineDaemon<W> {
    pub fn new(dimensions: MatrixDimensions, output: W, format: OutputFormat) -> Self {
        Self {
            dimensions,
            output,
            format,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<W: Write> DeviceManager for OfflineDaemon<W> {
    fn device_matrix(&mut self, _device_id: &str) -> Result<MatrixDimensions> {
        Ok(self.dimensions)
    }

    fn send_frame(&mut self, device_id: &str, frame: &[u8]) -> Result<()> {
        log::info!(
            "{} {} with {} bytes",
            SET_KEY_ROW_METHOD,
            device_object_path(device_id),
            frame.len()
        );

        let written = match self.format {
            OutputFormat::Hex => writeln!(self.output, "{}", to_hex(frame)),
            OutputFormat::Raw => self.output.write_all(frame),
        };
        written
            .and_then(|()| self.output.flush())
            .map_err(|err| {
                log::error!("Unable to write frame of {}: {}", device_id, err);
                Error::transport(err)
            })
    }
}

/// A `KEY=RRGGBB` color assignment of the key with the given linear index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyColor {
    pub key: usize,
    pub color: Color,
}

impl FromStr for KeyColor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let (key, color) = split_assignment(s)?;
        Ok(Self {
            key: key.trim().parse().context("Invalid key index")?,
            color,
        })
    }
}

/// A `COL,ROW=RRGGBB` color assignment of the key at the given position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionColor {
    pub position: KeyPosition,
    pub color: Color,
}

impl FromStr for PositionColor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let (position, color) = split_assignment(s)?;
        let (col, row) = position
            .split_once(',')
            .ok_or_else(|| anyhow!("Expected COL,ROW position, got `{position}`"))?;
        Ok(Self {
            position: KeyPosition::new(
                col.trim().parse().context("Invalid column index")?,
                row.trim().parse().context("Invalid row index")?,
            ),
            color,
        })
    }
}

fn split_assignment(s: &str) -> anyhow::Result<(&str, Color)> {
    let (target, color) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected TARGET=RRGGBB assignment, got `{s}`"))?;
    Ok((target, color.trim().parse()?))
}

/// Reads an image with exactly the matrix shape and returns its raw row-major RGB bytes.
pub fn convert_image_to_raw(path: &Path, dimensions: MatrixDimensions) -> anyhow::Result<Vec<u8>> {
    let image = image::open(path)
        .with_context(|| format!("Unable to open image {}", path.display()))?
        .to_rgb8();

    ensure!(
        image.width() == u32::from(dimensions.cols())
            && image.height() == u32::from(dimensions.rows()),
        "Image {}x{} doesn't match the {}x{} matrix",
        image.width(),
        image.height(),
        dimensions.cols(),
        dimensions.rows()
    );
    Ok(image.into_raw())
}

pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

pub fn from_hex(s: &str) -> anyhow::Result<Vec<u8>> {
    let digits: Vec<u8> = s.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.len() % 2 != 0 {
        bail!("Hex string has odd number of digits");
    }

    digits
        .chunks_exact(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair)?;
            u8::from_str_radix(pair, 16).with_context(|| format!("Invalid hex byte `{pair}`"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use keyrow_core::DeviceSession;

    use super::*;

    #[test]
    fn test_parse_assignments() {
        let key: KeyColor = "4=00ff00".parse().unwrap();
        assert_eq!(key.key, 4);
        assert_eq!(key.color, Color::new(0, 255, 0));

        let position: PositionColor = "1, 1=#ff0000".parse().unwrap();
        assert_eq!(position.position, KeyPosition::new(1, 1));
        assert_eq!(position.color, Color::new(255, 0, 0));

        assert!("4".parse::<KeyColor>().is_err());
        assert!("x=ff0000".parse::<KeyColor>().is_err());
        assert!("1=ff00".parse::<KeyColor>().is_err());
        assert!("1=ff0000".parse::<PositionColor>().is_err());
    }

    #[test]
    fn test_hex() {
        assert_eq!(to_hex(&[0, 2, 255]), "0002ff");
        assert_eq!(from_hex("00 02ff\n").unwrap(), [0, 2, 255]);
        assert!(from_hex("0").is_err());
        assert!(from_hex("zz").is_err());
    }

    #[test]
    fn test_offline_daemon_writes_hex_frames() {
        let dims = MatrixDimensions::new(2, 3).unwrap();
        let daemon = OfflineDaemon::new(dims, Vec::new(), OutputFormat::Hex);

        let mut session = DeviceSession::open(daemon, "offline").unwrap();
        session.set_key_light(0, Color::new(255, 0, 0)).unwrap();
        session.set_key_light(4, Color::new(0, 255, 0)).unwrap();
        session.draw().unwrap();

        let output = session.into_manager().into_output();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "000002ff000000000000000001000200000000ff00000000\n"
        );
    }

    #[test]
    fn test_output_format_defaults() {
        assert_eq!(OutputFormat::for_output(None, false), OutputFormat::Hex);
        assert_eq!(OutputFormat::for_output(None, true), OutputFormat::Raw);
        assert_eq!(
            OutputFormat::for_output(Some(OutputFormat::Hex), true),
            OutputFormat::Hex
        );
        assert_eq!(
            OutputFormat::for_output(Some(OutputFormat::Raw), false),
            OutputFormat::Raw
        );
    }

    struct FullDevice;

    impl Write for FullDevice {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "No space left on device",
            ))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_offline_daemon_write_failure() {
        let _ = env_logger::builder().is_test(true).try_init();

        let dims = MatrixDimensions::new(1, 1).unwrap();
        let daemon = OfflineDaemon::new(dims, FullDevice, OutputFormat::Hex);

        let mut session = DeviceSession::open(daemon, "offline").unwrap();
        session.set_key_light(0, Color::new(1, 2, 3)).unwrap();
        assert_eq!(session.draw(), Err(Error::Transport));
        assert_eq!(session.key_light(0), Ok(Color::new(1, 2, 3)));
    }

    #[test]
    fn test_offline_daemon_writes_raw_frames() {
        let dims = MatrixDimensions::new(1, 1).unwrap();
        let daemon = OfflineDaemon::new(dims, Vec::new(), OutputFormat::Raw);

        let mut session = DeviceSession::open(daemon, "offline").unwrap();
        session.set_key_light(0, Color::new(1, 2, 3)).unwrap();
        session.draw().unwrap();

        assert_eq!(session.into_manager().into_output(), [0, 0, 0, 1, 2, 3]);
    }
}
