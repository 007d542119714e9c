use alloc::vec;
use alloc::vec::Vec;

#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use crate::error::Rgb565Error;
use crate::pixel::{PixelLayout, expand, quantize};

/// Owned width × height pixel buffer, row-major, origin top-left.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    layout: PixelLayout,
}

impl Raster {
    /// All-zero (black) raster.
    pub fn new(width: u32, height: u32, layout: PixelLayout) -> Result<Self, Rgb565Error> {
        let len = buffer_len(width, height, layout)?;
        Ok(Self {
            pixels: vec![0u8; len],
            width,
            height,
            layout,
        })
    }

    /// Wrap an existing buffer. Returns [`Rgb565Error::BufferTooSmall`] unless
    /// `pixels` is exactly `width * height * bytes_per_pixel` long.
    pub fn from_pixels(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        layout: PixelLayout,
    ) -> Result<Self, Rgb565Error> {
        let needed = buffer_len(width, height, layout)?;
        if pixels.len() != needed {
            return Err(Rgb565Error::BufferTooSmall {
                needed,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
            layout,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Access the pixel data.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Take ownership of the pixel data.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Number of pixel cells.
    pub fn capacity(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Color at `(x, y)` as 8-bit RGB, expanding packed samples.
    pub fn rgb_at(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y as usize * self.width as usize + x as usize;
        Some(match self.layout {
            PixelLayout::Rgb8 => {
                let off = idx * 3;
                [self.pixels[off], self.pixels[off + 1], self.pixels[off + 2]]
            }
            PixelLayout::Rgb565Be => {
                let off = idx * 2;
                expand(u16::from_be_bytes([self.pixels[off], self.pixels[off + 1]]))
            }
        })
    }

    /// Packed RGB565 sample at `(x, y)`, quantizing 8-bit samples.
    pub fn rgb565_at(&self, x: u32, y: u32) -> Option<u16> {
        match self.layout {
            PixelLayout::Rgb565Be => {
                if x >= self.width || y >= self.height {
                    return None;
                }
                let off = (y as usize * self.width as usize + x as usize) * 2;
                Some(u16::from_be_bytes([self.pixels[off], self.pixels[off + 1]]))
            }
            PixelLayout::Rgb8 => self.rgb_at(x, y).map(|[r, g, b]| quantize(r, g, b)),
        }
    }

    /// Paint `count` cells starting at linear index `start` with `color`.
    ///
    /// Caller guarantees `start + count <= capacity()`.
    pub(crate) fn fill_cells(&mut self, start: usize, count: usize, color: [u8; 3]) {
        match self.layout {
            PixelLayout::Rgb8 => {
                for cell in self.pixels[start * 3..(start + count) * 3].chunks_exact_mut(3) {
                    cell.copy_from_slice(&color);
                }
            }
            PixelLayout::Rgb565Be => {
                let v = quantize(color[0], color[1], color[2]).to_be_bytes();
                for cell in self.pixels[start * 2..(start + count) * 2].chunks_exact_mut(2) {
                    cell.copy_from_slice(&v);
                }
            }
        }
    }

    /// Copy as an 8-bit RGB raster (no-op copy when already `Rgb8`).
    pub fn to_rgb8(&self) -> Raster {
        match self.layout {
            PixelLayout::Rgb8 => self.clone(),
            PixelLayout::Rgb565Be => {
                let mut out = Vec::with_capacity(self.capacity() * 3);
                for pair in self.pixels.chunks_exact(2) {
                    out.extend_from_slice(&expand(u16::from_be_bytes([pair[0], pair[1]])));
                }
                Raster {
                    pixels: out,
                    width: self.width,
                    height: self.height,
                    layout: PixelLayout::Rgb8,
                }
            }
        }
    }

    /// Copy as a packed big-endian RGB565 raster.
    pub fn to_rgb565(&self) -> Raster {
        match self.layout {
            PixelLayout::Rgb565Be => self.clone(),
            PixelLayout::Rgb8 => {
                let mut out = Vec::with_capacity(self.capacity() * 2);
                for px in self.pixels.chunks_exact(3) {
                    out.extend_from_slice(&quantize(px[0], px[1], px[2]).to_be_bytes());
                }
                Raster {
                    pixels: out,
                    width: self.width,
                    height: self.height,
                    layout: PixelLayout::Rgb565Be,
                }
            }
        }
    }

    /// Reinterpret pixel data as typed RGB pixels.
    ///
    /// Returns [`Rgb565Error::LayoutMismatch`] unless the layout is `Rgb8`.
    #[cfg(feature = "rgb")]
    pub fn as_rgb8(&self) -> Result<&[rgb::RGB8], Rgb565Error> {
        if self.layout != PixelLayout::Rgb8 {
            return Err(Rgb565Error::LayoutMismatch {
                expected: PixelLayout::Rgb8,
                actual: self.layout,
            });
        }
        Ok(self.pixels.as_pixels())
    }

    /// Zero-copy view as an [`imgref::ImgRef`] of RGB pixels.
    #[cfg(feature = "imgref")]
    pub fn as_imgref(&self) -> Result<imgref::ImgRef<'_, rgb::RGB8>, Rgb565Error> {
        let pixels = self.as_rgb8()?;
        Ok(imgref::ImgRef::new(
            pixels,
            self.width as usize,
            self.height as usize,
        ))
    }

    /// Convert to an [`imgref::ImgVec`] of RGB pixels, expanding packed data.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec(&self) -> imgref::ImgVec<rgb::RGB8> {
        let rgb = self.to_rgb8();
        let pixels: &[rgb::RGB8] = rgb.pixels.as_pixels();
        imgref::ImgVec::new(pixels.to_vec(), self.width as usize, self.height as usize)
    }
}

fn buffer_len(width: u32, height: u32, layout: PixelLayout) -> Result<usize, Rgb565Error> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|wh| wh.checked_mul(layout.bytes_per_pixel()))
        .ok_or(Rgb565Error::DimensionsTooLarge { width, height })
}
