use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use zen565::dump::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use zen565::{DumpRequest, ErrorKind, Raster, Unstoppable, bmp};

#[derive(Parser)]
#[command(about = "Decode an ILI9341 screen dump (run-length hex text) and save it as an image.")]
struct Args {
    /// File holding the dump text. Reads stdin when omitted or `-`.
    input: Option<PathBuf>,

    /// Output image; format follows the extension (bmp, png, gif, jpg).
    #[arg(short, long)]
    output: PathBuf,

    /// Raster width in pixels.
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: u32,

    /// Raster height in pixels.
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let text = read_input(args.input.as_deref())?;

    let dump = match DumpRequest::new(&text)
        .with_size(args.width, args.height)
        .decode(Unstoppable)
    {
        Ok(dump) => dump,
        Err(err) if err.kind() == ErrorKind::ValidationMismatch => {
            println!("Image data length mismatch.");
            println!("{err}");
            println!(
                "The dump was probably cut short. Try increasing ILI9341_SPI_CLKDIVIDER \
                 or change to NORMAL or EXTENDED SPI mode."
            );
            std::process::exit(1);
        }
        Err(err) => {
            println!("Failed to load an image from the dump: {err}");
            std::process::exit(1);
        }
    };

    if !dump.is_complete() {
        tracing::warn!(
            filled = dump.pixels_filled,
            capacity = dump.raster.capacity(),
            "dump did not cover the whole screen"
        );
    }

    save(&dump.raster, &args.output)?;
    println!(
        "Saved {}x{} image to {}",
        dump.raster.width(),
        dump.raster.height(),
        args.output.display()
    );
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read {}", p.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

fn save(raster: &Raster, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let format = match ext.as_str() {
        "" | "bmp" => {
            let bytes = bmp::encode_bmp(raster, Unstoppable)?;
            std::fs::write(path, bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            return Ok(());
        }
        "png" => image::ImageFormat::Png,
        "gif" => image::ImageFormat::Gif,
        "jpg" | "jpeg" => image::ImageFormat::Jpeg,
        other => bail!("unsupported output format '{other}' (expected: bmp|png|gif|jpg)"),
    };

    let rgb = raster.to_rgb8();
    let img = image::RgbImage::from_raw(rgb.width(), rgb.height(), rgb.into_pixels())
        .context("raster buffer does not match its dimensions")?;
    img.save_with_format(path, format)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
