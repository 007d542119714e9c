//! BMP file header and BITMAPINFOHEADER prefix.
//!
//! Only the fields up to the compression method are interpreted; the rest of
//! the 54-byte block is carried through verbatim by the transcoder.

use crate::error::Rgb565Error;

/// Length of the file header plus BITMAPINFOHEADER, copied into `.565` output.
pub const HEADER_LEN: usize = 54;

/// Offset of the 16-bit bits-per-pixel field.
pub(crate) const BIT_DEPTH_OFFSET: usize = 0x1C;

// ── Cursor for reading from &[u8] ───────────────────────────────────

pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn set_position(&mut self, pos: usize) -> Result<(), Rgb565Error> {
        if pos > self.data.len() {
            return Err(Rgb565Error::UnexpectedEof);
        }
        self.pos = pos;
        Ok(())
    }

    pub(crate) fn read_le16(&mut self) -> Result<u16, Rgb565Error> {
        let [a, b] = self.read_fixed_bytes::<2>()?;
        Ok(u16::from_le_bytes([a, b]))
    }

    pub(crate) fn read_le32(&mut self) -> Result<u32, Rgb565Error> {
        Ok(u32::from_le_bytes(self.read_fixed_bytes::<4>()?))
    }

    pub(crate) fn read_fixed_bytes<const N: usize>(&mut self) -> Result<[u8; N], Rgb565Error> {
        let end = self.pos.checked_add(N).ok_or(Rgb565Error::UnexpectedEof)?;
        let src = self
            .data
            .get(self.pos..end)
            .ok_or(Rgb565Error::UnexpectedEof)?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(src);
        self.pos = end;
        Ok(buf)
    }

    /// Borrow the next `n` bytes and advance past them.
    pub(crate) fn take(&mut self, n: usize) -> Result<&'a [u8], Rgb565Error> {
        let end = self.pos.checked_add(n).ok_or(Rgb565Error::UnexpectedEof)?;
        let out = self
            .data
            .get(self.pos..end)
            .ok_or(Rgb565Error::UnexpectedEof)?;
        self.pos = end;
        Ok(out)
    }
}

// ── Compression enum ────────────────────────────────────────────────

/// BMP compression method field.
#[non_exhaustive]
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum BmpCompression {
    Rgb,
    Rle8,
    Rle4,
    Bitfields,
    Jpeg,
    Png,
    Unknown(u32),
}

impl BmpCompression {
    fn from_u32(num: u32) -> Self {
        match num {
            0 => Self::Rgb,
            1 => Self::Rle8,
            2 => Self::Rle4,
            3 | 6 => Self::Bitfields, // 6 = BI_ALPHABITFIELDS
            4 => Self::Jpeg,
            5 => Self::Png,
            other => Self::Unknown(other),
        }
    }
}

// ── Accepted variants ───────────────────────────────────────────────

/// BMP pixel encodings the transcoder accepts.
#[non_exhaustive]
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum BmpVariant {
    /// Uncompressed 24-bit B,G,R.
    Rgb24,
}

impl BmpVariant {
    /// Classify a bit depth / compression pair.
    pub fn from_fields(bit_depth: u16, compression: BmpCompression) -> Result<Self, Rgb565Error> {
        match (bit_depth, compression) {
            (24, BmpCompression::Rgb) => Ok(Self::Rgb24),
            (24, other) => Err(Rgb565Error::UnsupportedVariant(alloc::format!(
                "BMP must be uncompressed, found {other:?}"
            ))),
            (other, _) => Err(Rgb565Error::UnsupportedVariant(alloc::format!(
                "image is not 24-bit, found {other} bits per pixel"
            ))),
        }
    }

    /// Bytes per stored pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb24 => 3,
        }
    }
}

/// Storage order of scanlines in the file.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum RowOrder {
    /// Canonical BMP: last image row first. Positive height.
    BottomUp,
    /// Negative height; first image row first.
    TopDown,
}

// ── Parsed BMP header ───────────────────────────────────────────────

/// Header fields read from the start of a BMP file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmpHeader {
    pub file_size: u32,
    /// Start of pixel data in the file.
    pub data_offset: u32,
    /// DIB header size (40 for BITMAPINFOHEADER).
    pub header_size: u32,
    pub width: i32,
    /// Negative for top-down storage.
    pub height: i32,
    pub planes: u16,
    pub bit_depth: u16,
    pub compression: BmpCompression,
}

impl BmpHeader {
    /// Read the fields without checking planes, depth or compression.
    ///
    /// Fails only on wrong magic, a truncated header or negative width.
    pub fn read(data: &[u8]) -> Result<Self, Rgb565Error> {
        let mut cur = Cursor::new(data);
        cur.set_position(0)?;

        if cur.read_le16()? != 0x4D42 {
            return Err(Rgb565Error::UnrecognizedFormat);
        }
        let file_size = cur.read_le32()?;
        let _creator = cur.read_le32()?;
        let data_offset = cur.read_le32()?;
        let header_size = cur.read_le32()?;
        let width = cur.read_le32()? as i32;
        let height = cur.read_le32()? as i32;
        let planes = cur.read_le16()?;
        let bit_depth = cur.read_le16()?;
        let compression = BmpCompression::from_u32(cur.read_le32()?);

        if width < 0 {
            return Err(Rgb565Error::InvalidHeader(alloc::format!(
                "BMP width is negative ({width})"
            )));
        }

        Ok(Self {
            file_size,
            data_offset,
            header_size,
            width,
            height,
            planes,
            bit_depth,
            compression,
        })
    }

    pub(crate) fn check_planes(&self) -> Result<(), Rgb565Error> {
        if self.planes != 1 {
            return Err(Rgb565Error::InvalidHeader(alloc::format!(
                "number of planes must be 1, found {}",
                self.planes
            )));
        }
        Ok(())
    }

    /// Accepted variant for these fields.
    pub fn variant(&self) -> Result<BmpVariant, Rgb565Error> {
        BmpVariant::from_fields(self.bit_depth, self.compression)
    }

    pub fn row_order(&self) -> RowOrder {
        if self.height < 0 {
            RowOrder::TopDown
        } else {
            RowOrder::BottomUp
        }
    }

    /// Width in pixels.
    pub fn width_px(&self) -> u32 {
        self.width.unsigned_abs()
    }

    /// Height in pixels regardless of storage order.
    pub fn abs_height(&self) -> u32 {
        self.height.unsigned_abs()
    }

    /// Padded byte length of one stored 24-bit row.
    pub fn stride(&self) -> u64 {
        row_stride(self.width_px())
    }

    /// Index of the stored row holding output row `row` (counted top-down).
    /// `None` when `row` is past the last row.
    pub fn stored_row(&self, row: u32) -> Option<u32> {
        if row >= self.abs_height() {
            return None;
        }
        match self.row_order() {
            RowOrder::BottomUp => (self.abs_height() - 1).checked_sub(row),
            RowOrder::TopDown => Some(row),
        }
    }

    /// File offset of output row `row`.
    pub fn row_offset(&self, row: u32) -> Option<u64> {
        let stored = u64::from(self.stored_row(row)?);
        stored
            .checked_mul(self.stride())?
            .checked_add(u64::from(self.data_offset))
    }

    /// Offset one past the last pixel byte the rows occupy, or `None` for
    /// an empty image.
    pub fn pixel_data_end(&self) -> Option<u64> {
        let last = match self.row_order() {
            RowOrder::BottomUp => 0,
            RowOrder::TopDown => self.abs_height().checked_sub(1)?,
        };
        let pixels = u64::from(self.width_px()) * 3;
        self.row_offset(last)?.checked_add(pixels)
    }
}

/// 24-bit BMP rows are padded to a 4-byte boundary.
pub fn row_stride(width: u32) -> u64 {
    (u64::from(width) * 3 + 3) & !3
}

/// Parse and validate a 24-bit uncompressed BMP header.
///
/// Checks run in file order: magic, planes, bit depth, compression.
pub fn parse_header(data: &[u8]) -> Result<(BmpHeader, BmpVariant), Rgb565Error> {
    let header = BmpHeader::read(data)?;
    header.check_planes()?;
    let variant = header.variant()?;
    tracing::debug!(
        file_size = header.file_size,
        data_offset = header.data_offset,
        header_size = header.header_size,
        width = header.width,
        height = header.height,
        bit_depth = header.bit_depth,
        "parsed BMP header"
    );
    Ok((header, variant))
}
