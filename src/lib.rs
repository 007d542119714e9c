//! # zen565
//!
//! Pixel-format transcoding for ILI9341-class TFT displays.
//!
//! ## Formats
//!
//! - **24-bit BMP → `.565`**: uncompressed 24-bit BMP (bottom-up or top-down)
//!   in, the same 54-byte header with the bit depth set to 16 out, followed
//!   by big-endian RGB565 rows top-to-bottom with no padding. The display
//!   firmware streams these rows straight to the panel.
//! - **Screen dumps**: the run-length hex text the firmware prints when
//!   dumping its framebuffer, decoded into a 320×240 RGB raster.
//! - **`.565` → raster** and **raster → 24-bit BMP** for previewing and
//!   saving.
//!
//! Color quantization is truncation (`r & 0xF8`, `g & 0xFC`, `b >> 3`),
//! matching the firmware's `color565()`.
//!
//! ## Non-Goals
//!
//! - Resizing or dithering
//! - Compressed, indexed or 32-bit BMP input
//! - Animated formats
//!
//! ## Usage
//!
//! ```no_run
//! use zen565::{DumpRequest, Unstoppable, bmp};
//!
//! let bmp_bytes: &[u8] = &[]; // your BMP file
//! let rgb565 = bmp::transcode(bmp_bytes, Unstoppable)?;
//!
//! let text = "FFFFFF00020000000A"; // two white pixels
//! let dump = DumpRequest::new(text).decode(Unstoppable)?;
//! let saved = bmp::encode_bmp(&dump.raster, Unstoppable)?;
//! # Ok::<(), zen565::Rgb565Error>(())
//! ```
//!
//! With the `std` feature (default), [`ConvertRequest`] converts files on
//! disk one row at a time.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod error;
mod limits;
mod pixel;
mod raster;

pub mod bmp;
pub mod dump;

#[cfg(feature = "std")]
pub mod fs;

// Re-exports
pub use dump::{DecodedDump, DumpRequest, Run};
pub use enough::{Stop, Unstoppable};
pub use error::{ErrorKind, Rgb565Error};
pub use limits::Limits;
pub use pixel::{PixelLayout, expand, quantize};
pub use raster::Raster;

#[cfg(feature = "std")]
pub use fs::{ConversionReport, ConversionSession, ConvertRequest, FileError};
