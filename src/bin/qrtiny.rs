//! qrtiny CLI - generates a 21x21 QR code for a short value.
//!
//! Prints the symbol to the terminal with half-block characters, or writes it
//! as SVG or PNG.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use qrtiny::helper::{save_image, to_svg_string, to_text_medium};
use qrtiny::qrcode::{Mask, QrCode, QrCodeEcc, BUFFER_LEN, QUIET_STANDARD, SCRATCH_BUFFER_LEN};
use qrtiny::segment::QrSegmentMode;

/// Widest quiet zone accepted on the command line, in modules.
const MAX_QUIET: i64 = 64;

/// Largest PNG scale accepted on the command line, in pixels per module.
const MAX_SCALE: i64 = 256;

/// Tiny QR code generator for the smallest (21x21) symbol size
#[derive(Parser)]
#[command(name = "qrtiny")]
#[command(version)]
#[command(about = "Generate a version 1 QR code", long_about = None)]
#[command(after_help = "EXAMPLES:
    qrtiny \"HELLO WORLD\"
    qrtiny --ecl l --mask 3 --mode numeric 0123456789
    qrtiny --output svg --file hello.svg \"HELLO WORLD\"
    qrtiny --output png --scale 8 --file hello.png --mode byte \"hello, world\"")]
struct Cli {
    /// Value to encode
    value: String,

    /// Error correction level
    #[arg(long, default_value = "m", value_enum)]
    ecl: Level,

    /// Mask pattern applied to the data modules
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=7))]
    mask: u8,

    /// Segment mode used for the whole value
    #[arg(long, default_value = "alphanumeric", value_enum)]
    mode: Mode,

    /// Quiet zone width in modules
    #[arg(long, default_value_t = QUIET_STANDARD as u32,
        value_parser = clap::value_parser!(u32).range(0..=MAX_QUIET))]
    quiet: u32,

    /// Swap light and dark in text output
    #[arg(long)]
    invert: bool,

    /// Output format
    #[arg(long, default_value = "medium", value_enum)]
    output: OutputFormat,

    /// Pixels per module for PNG output
    #[arg(long, default_value_t = 8,
        value_parser = clap::value_parser!(u32).range(1..=MAX_SCALE))]
    scale: u32,

    /// Write to this file instead of standard output
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Level {
    L,
    M,
    Q,
    H,
}

impl From<Level> for QrCodeEcc {
    fn from(level: Level) -> Self {
        match level {
            Level::L => QrCodeEcc::Low,
            Level::M => QrCodeEcc::Medium,
            Level::Q => QrCodeEcc::Quartile,
            Level::H => QrCodeEcc::High,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Numeric,
    Alphanumeric,
    Byte,
}

impl From<Mode> for QrSegmentMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Numeric => QrSegmentMode::Numeric,
            Mode::Alphanumeric => QrSegmentMode::Alphanumeric,
            Mode::Byte => QrSegmentMode::Byte,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Half-block characters, two module rows per line
    Medium,
    /// SVG document
    Svg,
    /// PNG image (requires --file)
    Png,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.output == OutputFormat::Png && cli.file.is_none() {
        bail!("PNG output requires --file");
    }

    let ecl = QrCodeEcc::from(cli.ecl);
    let mask = Mask::try_from(cli.mask)?;
    let mut tempbuffer = [0u8; SCRATCH_BUFFER_LEN];
    let mut outbuffer = [0u8; BUFFER_LEN];
    let qr = QrCode::encode_text(
        &cli.value,
        cli.mode.into(),
        &mut tempbuffer,
        &mut outbuffer,
        ecl,
        mask,
    )
    .context("Could not generate QR Code")?;
    info!("generated {ecl:?} symbol with {mask:?}");

    let quiet = i32::try_from(cli.quiet).context("Quiet zone too wide")?;
    let text = match cli.output {
        OutputFormat::Medium => to_text_medium(&qr, quiet, cli.invert),
        OutputFormat::Svg => to_svg_string(&qr, quiet),
        OutputFormat::Png => {
            let path = cli.file.as_deref().context("PNG output requires --file")?;
            save_image(&qr, path, cli.quiet, cli.scale)
                .with_context(|| format!("Unable to write {}", path.display()))?;
            return Ok(());
        }
    };

    match &cli.file {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("Unable to open output filename: {}", path.display()))?,
        None => std::io::stdout().write_all(text.as_bytes())?,
    }
    Ok(())
}
