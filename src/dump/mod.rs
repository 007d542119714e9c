//! ILI9341 screen dump text.
//!
//! The display firmware dumps its framebuffer as ASCII hex so it can be
//! copied off a serial console. The stream is a list of runs followed by a
//! length field:
//!
//! ```text
//! RRGGBBCCCC RRGGBBCCCC ... LLLLLLLL
//! ```
//!
//! (without the spaces). Each run is a 24-bit color and a big-endian 16-bit
//! repeat count; `LLLLLLLL` is the number of characters before it. Runs fill
//! the raster row-major from the top-left corner, wrapping at the raster
//! width.
//!
//! A dump whose length field disagrees with what arrived is reported as
//! [`Rgb565Error::LengthMismatch`], which usually means the transfer was
//! truncated. Runs that would paint past the last cell are rejected with
//! [`Rgb565Error::RasterOverflow`].

mod decode;
mod encode;

use alloc::string::String;
use alloc::vec::Vec;
use enough::Stop;

use crate::error::Rgb565Error;
use crate::limits::Limits;
use crate::raster::Raster;

/// ILI9341 width in landscape orientation.
pub const DEFAULT_WIDTH: u32 = 320;
/// ILI9341 height in landscape orientation.
pub const DEFAULT_HEIGHT: u32 = 240;

/// One run: `count` consecutive pixels of `color`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Run {
    /// R, G, B.
    pub color: [u8; 3],
    pub count: u16,
}

/// Result of a successful dump decode.
#[derive(Clone, Debug)]
pub struct DecodedDump {
    /// `Rgb8` raster; cells no run reached stay black.
    pub raster: Raster,
    /// Cells painted by the runs.
    pub pixels_filled: usize,
    /// Runs in the stream, including zero-length ones.
    pub runs: usize,
}

impl DecodedDump {
    /// Where the next run would start, as `(column, row)`.
    pub fn cursor(&self) -> (u32, u32) {
        let w = self.raster.width() as usize;
        ((self.pixels_filled % w) as u32, (self.pixels_filled / w) as u32)
    }

    /// Whether every cell was painted.
    pub fn is_complete(&self) -> bool {
        self.pixels_filled == self.raster.capacity()
    }
}

/// Decode request for a screen dump.
///
/// ```
/// use zen565::{DumpRequest, Unstoppable};
///
/// // two white pixels
/// let dump = DumpRequest::new("FFFFFF00020000000A").decode(Unstoppable)?;
/// assert_eq!(dump.cursor(), (2, 0));
/// # Ok::<(), zen565::Rgb565Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct DumpRequest<'a> {
    text: &'a str,
    width: u32,
    height: u32,
    limits: Option<&'a Limits>,
}

impl<'a> DumpRequest<'a> {
    /// Request for the default 320×240 geometry.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            limits: None,
        }
    }

    /// Raster geometry, e.g. `(240, 320)` for a portrait-rotated panel.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Decode into a fresh raster. No raster is returned on any failure.
    pub fn decode(self, stop: impl Stop) -> Result<DecodedDump, Rgb565Error> {
        decode::decode_dump(self.text, self.width, self.height, self.limits, &stop)
    }
}

/// Validate a dump and return its runs without painting.
pub fn parse_runs(text: &str) -> Result<Vec<Run>, Rgb565Error> {
    decode::parse_runs(text)
}

/// Encode runs as dump text (upper-case hex with the length field).
pub fn encode_runs(runs: &[Run]) -> Result<String, Rgb565Error> {
    encode::encode_runs(runs)
}

/// Encode a raster as dump text, merging equal neighbours into runs.
pub fn encode(raster: &Raster) -> Result<String, Rgb565Error> {
    encode::encode_dump(raster)
}
