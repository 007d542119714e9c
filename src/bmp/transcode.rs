//! 24-bit BMP → `.565` transcoder over an in-memory file.

use alloc::vec;
use alloc::vec::Vec;
use enough::Stop;

use super::header::{BIT_DEPTH_OFFSET, BmpHeader, Cursor, HEADER_LEN, parse_header};
use crate::error::Rgb565Error;
use crate::limits::Limits;
use crate::pixel::bgr_row_to_565_be;

/// Copy the source header block with the bit depth rewritten to 16.
pub(crate) fn output_header(src: &[u8; HEADER_LEN]) -> [u8; HEADER_LEN] {
    let mut out = *src;
    out[BIT_DEPTH_OFFSET] = 16;
    out
}

/// Header validation plus limit checks, shared with the file session.
pub(crate) fn prepare(
    header_block: &[u8],
    limits: Option<&Limits>,
) -> Result<BmpHeader, Rgb565Error> {
    let (header, _variant) = parse_header(header_block)?;
    if let Some(limits) = limits {
        limits.check_output(header.width_px(), header.abs_height(), 2)?;
    }
    Ok(header)
}

/// Whether an input of `len` bytes holds every pixel row the header declares.
pub(crate) fn pixels_present(header: &BmpHeader, len: u64) -> bool {
    match header.pixel_data_end() {
        Some(end) => end <= len,
        None => header.abs_height() == 0,
    }
}

/// Transcode a whole BMP file held in memory.
pub(crate) fn transcode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Vec<u8>, Rgb565Error> {
    let header = prepare(data, limits)?;
    let mut cur = Cursor::new(data);
    let block = cur.read_fixed_bytes::<HEADER_LEN>()?;

    let w = header.width_px() as usize;
    let h = header.abs_height();
    let too_large = Rgb565Error::DimensionsTooLarge {
        width: header.width_px(),
        height: h,
    };
    let (Some(in_row), Some(out_row)) = (w.checked_mul(3), w.checked_mul(2)) else {
        return Err(too_large);
    };
    let total = out_row
        .checked_mul(h as usize)
        .and_then(|n| n.checked_add(HEADER_LEN))
        .ok_or(too_large)?;

    // Whole pixel area must be present before allocating the output.
    if !pixels_present(&header, data.len() as u64) {
        return Err(Rgb565Error::UnexpectedEof);
    }

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&output_header(&block));

    let mut row_buf = vec![0u8; if h == 0 { 0 } else { out_row }];
    for row in 0..h {
        if row % 16 == 0 {
            stop.check()?;
        }
        let pos = header
            .row_offset(row)
            .and_then(|p| usize::try_from(p).ok())
            .ok_or(Rgb565Error::UnexpectedEof)?;
        cur.set_position(pos)?;
        let bgr = cur.take(in_row)?;
        bgr_row_to_565_be(bgr, &mut row_buf);
        out.extend_from_slice(&row_buf);
    }

    Ok(out)
}
