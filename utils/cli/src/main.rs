use std::{fs, io::Write, path::PathBuf};

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use keyrow_cli::{
    convert_image_to_raw, from_hex, KeyColor, OfflineDaemon, OutputFormat, PositionColor,
};
use keyrow_core::{DeviceSession, MatrixDimensions, RowFrames};

/// Keyboard LED matrix frame utility
///
/// Builds lighting frames in the row protocol understood by the device daemon and decodes
/// the captured ones.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = false)]
struct Cli {
    /// Actual command
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build a single frame and write it out
    Frame {
        /// Device identifier
        #[arg(short, long, default_value = "offline")]
        device: String,
        /// Number of the matrix rows
        #[arg(short, long, default_value = "6")]
        rows: u16,
        /// Number of the matrix columns
        #[arg(short, long, default_value = "22")]
        cols: u16,
        /// Image with exactly the matrix shape used as a background
        #[arg(short, long, value_name = "FILE")]
        image: Option<PathBuf>,
        /// Key color by linear index
        #[arg(short, long = "key", value_name = "KEY=RRGGBB")]
        keys: Vec<KeyColor>,
        /// Key color by position
        #[arg(short, long = "at", value_name = "COL,ROW=RRGGBB")]
        at: Vec<PositionColor>,
        /// Output representation, hex for stdout and raw for files by default
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
        /// Write the frame to the file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Decode a captured frame and print its rows
    Inspect {
        /// Raw frame file
        #[arg(value_name = "FILE", required_unless_present = "hex")]
        path: Option<PathBuf>,
        /// Frame as a hex string
        #[arg(long, conflicts_with = "path")]
        hex: Option<String>,
    },
    /// Generate shell completions
    Completions {
        /// The shell to generate the completions for
        #[arg(value_enum)]
        shell: clap_complete_command::Shell,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Frame {
            device,
            rows,
            cols,
            image,
            keys,
            at,
            format,
            output,
        } => {
            let dimensions = MatrixDimensions::new(rows, cols)?;
            let writer: Box<dyn Write> = match &output {
                Some(path) => Box::new(
                    fs::File::create(path)
                        .with_context(|| format!("Unable to create {}", path.display()))?,
                ),
                None => Box::new(std::io::stdout()),
            };

            let format = OutputFormat::for_output(format, output.is_some());
            let daemon = OfflineDaemon::new(dimensions, writer, format);
            let mut session = DeviceSession::open(daemon, device)?;
            if let Some(path) = image {
                let raw = convert_image_to_raw(&path, dimensions)?;
                session.lighting_mut().load_rgb(&raw)?;
                log::trace!("Loaded background image {:?}", path);
            }
            for KeyColor { key, color } in keys {
                session
                    .set_key_light(key, color)
                    .with_context(|| format!("Unable to set key {key}"))?;
            }
            for PositionColor { position, color } in at {
                session
                    .set_key_light_at(position, color)
                    .with_context(|| format!("Unable to set key at {position:?}"))?;
            }
            session.draw()?;
        }
        Command::Inspect { path, hex } => {
            let bytes = match (path, hex) {
                (_, Some(hex)) => from_hex(&hex)?,
                (Some(path), None) => fs::read(&path)
                    .with_context(|| format!("Unable to read {}", path.display()))?,
                (None, None) => anyhow::bail!("Either a frame file or a hex string is required"),
            };

            log::info!("Decoding {} bytes frame", bytes.len());
            for row in RowFrames::new(&bytes) {
                let row = row?;
                let colors = row
                    .colors()
                    .map(|color| color.to_string())
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("row {:>3} [{} keys]: {}", row.header.row, row.header.cols(), colors);
            }
        }
        Command::Completions { shell } => {
            shell.generate(&mut Cli::command(), &mut std::io::stdout());
        }
    }

    Ok(())
}
