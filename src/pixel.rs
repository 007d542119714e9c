/// Pixel memory layout of a [`Raster`](crate::Raster).
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelLayout {
    /// 3 channels, 8-bit RGB.
    Rgb8,
    /// Packed 5-6-5 RGB, one big-endian `u16` per pixel (display byte order).
    Rgb565Be,
}

impl PixelLayout {
    /// Bytes per pixel for this layout.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Rgb8 => 3,
            Self::Rgb565Be => 2,
        }
    }
}

/// Pack 8-bit RGB into RGB565 by truncation.
///
/// The low 3/2/3 bits of red/green/blue are dropped, no rounding. This is the
/// packing the ILI9341 driver uses, so converted assets match what the
/// firmware draws with `color565()`.
#[inline]
pub fn quantize(r: u8, g: u8, b: u8) -> u16 {
    ((u16::from(r) & 0xF8) << 8) | ((u16::from(g) & 0xFC) << 3) | (u16::from(b) >> 3)
}

/// Expand an RGB565 sample to 8-bit RGB, rounding to the nearest level.
///
/// Full-scale channels map to 255 and zero to 0.
#[inline]
pub fn expand(pix: u16) -> [u8; 3] {
    let r5 = u32::from(pix >> 11);
    let g6 = u32::from((pix >> 5) & 0x3F);
    let b5 = u32::from(pix & 0x1F);
    [
        ((r5 * 527 + 23) >> 6) as u8,
        ((g6 * 259 + 33) >> 6) as u8,
        ((b5 * 527 + 23) >> 6) as u8,
    ]
}

/// Quantize one stored BMP scanline (B,G,R triplets) into big-endian RGB565.
///
/// `out` must hold `2 * pixels` bytes for the `pixels` full triplets in `bgr`.
pub(crate) fn bgr_row_to_565_be(bgr: &[u8], out: &mut [u8]) {
    for (px, dst) in bgr.chunks_exact(3).zip(out.chunks_exact_mut(2)) {
        let v = quantize(px[2], px[1], px[0]);
        dst.copy_from_slice(&v.to_be_bytes());
    }
}
