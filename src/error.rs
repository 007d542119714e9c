use alloc::string::String;
use enough::StopReason;

/// Errors from BMP transcoding and screen dump decoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Rgb565Error {
    #[error("not a BMP file")]
    UnrecognizedFormat,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported format variant: {0}")]
    UnsupportedVariant(String),

    #[error("malformed hex digit at offset {offset}")]
    InvalidHex { offset: usize },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("image data length mismatch: declared {declared}, actual {actual}")]
    LengthMismatch { declared: u32, actual: usize },

    #[error("raster overflow: {requested} pixels do not fit in {capacity}")]
    RasterOverflow { capacity: usize, requested: usize },

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("pixel layout mismatch: expected {expected:?}, got {actual:?}")]
    LayoutMismatch {
        expected: crate::PixelLayout,
        actual: crate::PixelLayout,
    },

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for Rgb565Error {
    fn from(r: StopReason) -> Self {
        Rgb565Error::Cancelled(r)
    }
}

impl Rgb565Error {
    /// Coarse category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::LengthMismatch { .. } => ErrorKind::ValidationMismatch,
            Self::DimensionsTooLarge { .. } | Self::LimitExceeded(_) => ErrorKind::Limit,
            Self::Cancelled(_) => ErrorKind::Cancelled,
            _ => ErrorKind::Format,
        }
    }
}

/// Error category, for callers that present failures differently by cause.
///
/// A [`ValidationMismatch`](ErrorKind::ValidationMismatch) on a screen dump
/// usually means the transfer was cut short or garbled, not that the data
/// format is wrong.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong magic, unsupported header fields, malformed hex or run layout.
    Format,
    /// Declared dump length disagrees with the received length.
    ValidationMismatch,
    /// File open/read/write failure.
    Io,
    /// Input path does not exist.
    NotFound,
    /// Configured [`Limits`](crate::Limits) exceeded.
    Limit,
    /// Stopped through [`enough::Stop`].
    Cancelled,
}
