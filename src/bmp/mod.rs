//! BMP side of the toolchain.
//!
//! - [`transcode`]: 24-bit uncompressed BMP → `.565` (BMP header with the
//!   bit depth field set to 16, then big-endian RGB565 rows top-to-bottom,
//!   no row padding).
//! - [`decode_565`] / [`decode_565_packed`]: read a `.565` file back.
//! - [`encode_bmp`]: save any [`Raster`] as a 24-bit BMP.
//!
//! For converting files on disk use [`crate::ConvertRequest`], which streams
//! rows instead of loading the whole image.

mod decode;
mod encode;
mod header;
mod transcode;

pub use header::{
    BmpCompression, BmpHeader, BmpVariant, HEADER_LEN, RowOrder, parse_header, row_stride,
};
pub(crate) use transcode::{output_header, pixels_present, prepare};

use crate::error::Rgb565Error;
use crate::limits::Limits;
use crate::raster::Raster;
use alloc::vec::Vec;
use enough::Stop;

/// Transcode an in-memory 24-bit BMP to `.565` bytes.
pub fn transcode(data: &[u8], stop: impl Stop) -> Result<Vec<u8>, Rgb565Error> {
    transcode::transcode(data, None, &stop)
}

/// [`transcode`] with resource limits applied after header validation.
pub fn transcode_with_limits(
    data: &[u8],
    limits: &Limits,
    stop: impl Stop,
) -> Result<Vec<u8>, Rgb565Error> {
    transcode::transcode(data, Some(limits), &stop)
}

/// Read a `.565` file into an 8-bit RGB raster.
pub fn decode_565(data: &[u8], stop: impl Stop) -> Result<Raster, Rgb565Error> {
    decode::decode_565(data, None, &stop)
}

/// Read a `.565` file keeping the packed [`PixelLayout::Rgb565Be`](crate::PixelLayout) samples.
pub fn decode_565_packed(data: &[u8], stop: impl Stop) -> Result<Raster, Rgb565Error> {
    decode::decode_565_packed(data, None, &stop)
}

/// Encode a raster as an uncompressed 24-bit BMP.
pub fn encode_bmp(raster: &Raster, stop: impl Stop) -> Result<Vec<u8>, Rgb565Error> {
    encode::encode_bmp(raster, &stop)
}
