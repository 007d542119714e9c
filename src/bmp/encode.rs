//! BMP encoder: uncompressed 24-bit BMP from a raster.

use alloc::vec::Vec;
use enough::Stop;

use super::header::{HEADER_LEN, row_stride};
use crate::error::Rgb565Error;
use crate::pixel::PixelLayout;
use crate::raster::Raster;

/// Encode a raster as a bottom-up 24-bit BMP.
pub(crate) fn encode_bmp(raster: &Raster, stop: &dyn Stop) -> Result<Vec<u8>, Rgb565Error> {
    let width = raster.width();
    let height = raster.height();
    let too_large = || Rgb565Error::DimensionsTooLarge { width, height };

    if width > i32::MAX as u32 || height > i32::MAX as u32 {
        return Err(too_large());
    }
    let stride = usize::try_from(row_stride(width)).map_err(|_| too_large())?;
    let pixel_data_size = stride
        .checked_mul(height as usize)
        .ok_or_else(too_large)?;
    let file_size = pixel_data_size
        .checked_add(HEADER_LEN)
        .filter(|&n| n <= u32::MAX as usize)
        .ok_or_else(too_large)?;

    stop.check()?;

    let rgb;
    let src = match raster.layout() {
        PixelLayout::Rgb8 => raster,
        _ => {
            rgb = raster.to_rgb8();
            &rgb
        }
    };

    let mut out = Vec::with_capacity(file_size);
    write_bmp_header(&mut out, file_size, pixel_data_size, width, height);

    let w = width as usize;
    let pad_bytes = stride - w * 3;
    let pixels = src.pixels();
    for row in (0..height as usize).rev() {
        if row % 16 == 0 {
            stop.check()?;
        }
        let row_start = row * w * 3;
        for px in pixels[row_start..row_start + w * 3].chunks_exact(3) {
            out.push(px[2]);
            out.push(px[1]);
            out.push(px[0]);
        }
        out.extend(core::iter::repeat_n(0u8, pad_bytes));
    }

    Ok(out)
}

fn write_bmp_header(
    out: &mut Vec<u8>,
    file_size: usize,
    pixel_data_size: usize,
    width: u32,
    height: u32,
) {
    // File header (14 bytes)
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(file_size as u32).to_le_bytes());
    out.extend_from_slice(&[0u8; 4]); // reserved
    out.extend_from_slice(&(HEADER_LEN as u32).to_le_bytes()); // data offset

    // DIB header (BITMAPINFOHEADER, 40 bytes)
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&(width as i32).to_le_bytes());
    out.extend_from_slice(&(height as i32).to_le_bytes()); // positive = bottom-up
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&24u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // compression
    out.extend_from_slice(&(pixel_data_size as u32).to_le_bytes());
    out.extend_from_slice(&2835u32.to_le_bytes()); // h resolution (72 DPI)
    out.extend_from_slice(&2835u32.to_le_bytes()); // v resolution
    out.extend_from_slice(&0u32.to_le_bytes()); // colors used
    out.extend_from_slice(&0u32.to_le_bytes()); // important colors
}
