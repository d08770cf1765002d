use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use qr::{EcLevel, QrCode};

#[derive(Parser)]
#[command(name = "qrgen")]
#[command(about = "Generate QR code symbols", long_about = None)]
struct Cli {
    /// Text payload to encode
    input: String,

    /// Error correction level
    #[arg(short, long, value_enum, default_value_t = Level::M)]
    level: Level,

    /// Output file; prints ASCII art to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format; inferred from the output extension by default
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Module size in pixels (PNG and SVG)
    #[arg(long, default_value_t = 10)]
    module_size: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Level {
    L,
    M,
    Q,
    H,
}

impl From<Level> for EcLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::L => EcLevel::L,
            Level::M => EcLevel::M,
            Level::Q => EcLevel::Q,
            Level::H => EcLevel::H,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Png,
    Svg,
    Ascii,
}

/// Pick the output format: an explicit flag wins, otherwise the output
/// extension decides, otherwise ASCII for the terminal.
fn resolve_format(cli: &Cli) -> Result<Format> {
    if let Some(format) = cli.format {
        return Ok(format);
    }
    let Some(output) = &cli.output else {
        return Ok(Format::Ascii);
    };
    match output.extension().and_then(|e| e.to_str()) {
        Some("png") => Ok(Format::Png),
        Some("svg") => Ok(Format::Svg),
        Some("txt") => Ok(Format::Ascii),
        _ => bail!(
            "cannot infer output format from {}; pass --format",
            output.display()
        ),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = resolve_format(&cli)?;

    let code = QrCode::encode(&cli.input, cli.level.into())
        .with_context(|| format!("failed to encode {} characters", cli.input.len()))?;

    match (format, &cli.output) {
        (Format::Png, Some(path)) => {
            fs::write(path, code.to_png(cli.module_size))
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        (Format::Png, None) => bail!("PNG output requires --output"),
        (Format::Svg, Some(path)) => {
            fs::write(path, code.to_svg(cli.module_size))
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        (Format::Svg, None) => println!("{}", code.to_svg(cli.module_size)),
        (Format::Ascii, Some(path)) => {
            fs::write(path, code.to_ascii())
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        (Format::Ascii, None) => print!("{}", code.to_ascii()),
    }

    Ok(())
}
