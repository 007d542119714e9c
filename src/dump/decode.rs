//! Screen dump text decoder.

use alloc::vec::Vec;
use enough::Stop;

use super::{DecodedDump, Run};
use crate::error::Rgb565Error;
use crate::limits::Limits;
use crate::pixel::PixelLayout;
use crate::raster::Raster;

/// Hex digits per run: RRGGBB + CCCC.
pub(crate) const RUN_DIGITS: usize = 10;
/// Hex digits in the trailing length field.
pub(crate) const TRAILER_DIGITS: usize = 8;

fn nibble(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Parse up to 8 hex digits. `offset` locates `digits` in the dump for errors.
fn parse_hex(digits: &[u8], offset: usize) -> Result<u32, Rgb565Error> {
    let mut v = 0u32;
    for (i, &d) in digits.iter().enumerate() {
        let n = nibble(d).ok_or(Rgb565Error::InvalidHex { offset: offset + i })?;
        v = (v << 4) | u32::from(n);
    }
    Ok(v)
}

/// Split a dump into its run body after checking the length trailer.
fn validated_body(text: &str) -> Result<&[u8], Rgb565Error> {
    let bytes = text.trim_ascii().as_bytes();
    if bytes.len() < TRAILER_DIGITS {
        return Err(Rgb565Error::InvalidData(alloc::format!(
            "dump is {} characters, shorter than the {TRAILER_DIGITS}-digit length field",
            bytes.len()
        )));
    }
    let (body, trailer) = bytes.split_at(bytes.len() - TRAILER_DIGITS);
    let declared = parse_hex(trailer, body.len())?;
    if u64::from(declared) != body.len() as u64 {
        return Err(Rgb565Error::LengthMismatch {
            declared,
            actual: body.len(),
        });
    }
    if body.len() % RUN_DIGITS != 0 {
        return Err(Rgb565Error::InvalidData(alloc::format!(
            "run data is {} characters, not a multiple of {RUN_DIGITS}",
            body.len()
        )));
    }
    Ok(body)
}

/// Runs of a validated body, in stream order.
struct Runs<'a> {
    chunks: core::iter::Enumerate<core::slice::ChunksExact<'a, u8>>,
}

impl<'a> Runs<'a> {
    fn new(body: &'a [u8]) -> Self {
        Self {
            chunks: body.chunks_exact(RUN_DIGITS).enumerate(),
        }
    }
}

impl Iterator for Runs<'_> {
    type Item = Result<Run, Rgb565Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let (idx, chunk) = self.chunks.next()?;
        let base = idx * RUN_DIGITS;
        Some(parse_run(chunk, base))
    }
}

fn parse_run(chunk: &[u8], base: usize) -> Result<Run, Rgb565Error> {
    let r = parse_hex(&chunk[0..2], base)? as u8;
    let g = parse_hex(&chunk[2..4], base + 2)? as u8;
    let b = parse_hex(&chunk[4..6], base + 4)? as u8;
    let count = parse_hex(&chunk[6..10], base + 6)? as u16;
    Ok(Run {
        color: [r, g, b],
        count,
    })
}

pub(crate) fn parse_runs(text: &str) -> Result<Vec<Run>, Rgb565Error> {
    let body = validated_body(text)?;
    Runs::new(body).collect()
}

pub(crate) fn decode_dump(
    text: &str,
    width: u32,
    height: u32,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<DecodedDump, Rgb565Error> {
    if width == 0 || height == 0 {
        return Err(Rgb565Error::InvalidData(alloc::format!(
            "raster size {width}x{height} has no pixels"
        )));
    }
    if let Some(limits) = limits {
        limits.check_output(width, height, PixelLayout::Rgb8.bytes_per_pixel())?;
    }

    let body = validated_body(text)?;
    let mut raster = Raster::new(width, height, PixelLayout::Rgb8)?;
    let capacity = raster.capacity();

    let mut filled = 0usize;
    let mut runs = 0usize;
    for (i, run) in Runs::new(body).enumerate() {
        if i % 1024 == 0 {
            stop.check()?;
        }
        let run = run?;
        runs += 1;
        let count = usize::from(run.count);
        if count == 0 {
            continue;
        }
        let end = filled + count;
        if end > capacity {
            return Err(Rgb565Error::RasterOverflow {
                capacity,
                requested: end,
            });
        }
        raster.fill_cells(filled, count, run.color);
        filled = end;
    }

    tracing::debug!(runs, pixels = filled, capacity, "decoded screen dump");

    Ok(DecodedDump {
        raster,
        pixels_filled: filled,
        runs,
    })
}
