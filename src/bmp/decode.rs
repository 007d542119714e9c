//! `.565` reader: the transcoder's output back into a raster.

use alloc::vec::Vec;
use enough::Stop;

use super::header::{BmpHeader, Cursor, HEADER_LEN};
use crate::error::Rgb565Error;
use crate::limits::Limits;
use crate::pixel::{PixelLayout, expand};
use crate::raster::Raster;

/// Parse a `.565` header: BMP magic, one plane, bit depth 16.
fn parse_565_header(data: &[u8]) -> Result<BmpHeader, Rgb565Error> {
    let header = BmpHeader::read(data)?;
    header.check_planes()?;
    if header.bit_depth != 16 {
        return Err(Rgb565Error::UnsupportedVariant(alloc::format!(
            "not an RGB565 file, found {} bits per pixel",
            header.bit_depth
        )));
    }
    Ok(header)
}

/// Read packed samples, keeping the big-endian 565 layout.
pub(crate) fn decode_565_packed(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Raster, Rgb565Error> {
    let header = parse_565_header(data)?;
    let width = header.width_px();
    let height = header.abs_height();
    if let Some(limits) = limits {
        limits.check_output(width, height, 2)?;
    }

    let row_bytes = (width as usize)
        .checked_mul(2)
        .ok_or(Rgb565Error::DimensionsTooLarge { width, height })?;
    let total = row_bytes
        .checked_mul(height as usize)
        .ok_or(Rgb565Error::DimensionsTooLarge { width, height })?;

    let mut cur = Cursor::new(data);
    cur.set_position(HEADER_LEN)?;
    let body = cur.take(total)?;

    let mut pixels = Vec::with_capacity(total);
    for (row_idx, row) in body.chunks_exact(row_bytes.max(1)).enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        pixels.extend_from_slice(row);
    }

    Raster::from_pixels(pixels, width, height, PixelLayout::Rgb565Be)
}

/// Read a `.565` file into 8-bit RGB, expanding each sample.
pub(crate) fn decode_565(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Raster, Rgb565Error> {
    let header = parse_565_header(data)?;
    if let Some(limits) = limits {
        limits.check_output(header.width_px(), header.abs_height(), 3)?;
    }
    let packed = decode_565_packed(data, limits, stop)?;
    let mut out = Vec::with_capacity(packed.capacity() * 3);
    for (i, pair) in packed.pixels().chunks_exact(2).enumerate() {
        if i % (16 * 1024) == 0 {
            stop.check()?;
        }
        out.extend_from_slice(&expand(u16::from_be_bytes([pair[0], pair[1]])));
    }
    Raster::from_pixels(out, packed.width(), packed.height(), PixelLayout::Rgb8)
}
