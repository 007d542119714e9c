use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use zen565::fs::find_bmp_files;
use zen565::{ConvertRequest, Unstoppable};

#[derive(Parser)]
#[command(about = "Convert 24-bit BMP files to big-endian RGB565 (.565) for ILI9341 displays.")]
struct Args {
    /// BMP file to convert. Without it, every *.bmp in the current directory is converted.
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.file {
        Some(file) => convert_one(&file),
        None => {
            let files = find_bmp_files(&std::env::current_dir()?)?;
            if files.is_empty() {
                println!();
                println!("No .bmp files found.");
            }
            for file in &files {
                convert_one(file);
            }
        }
    }
    Ok(())
}

/// Convert one file, printing progress. Failures are reported, not fatal.
fn convert_one(path: &Path) {
    println!();
    println!("Converting {}...", path.display());

    let result = ConvertRequest::new(path).open().and_then(|mut session| {
        let header = session.header();
        println!("File size: {}", header.file_size);
        println!("Image Offset: {}", header.data_offset);
        println!("Header size: {}", header.header_size);
        println!("Bit Depth: {}", header.bit_depth);
        println!("Image size: {}x{}", header.width, header.height);
        println!("{} created", session.output_path().display());
        session.run(&Unstoppable)?;
        session.finish()
    });

    if let Err(err) = result {
        println!("{err}");
    }
}
