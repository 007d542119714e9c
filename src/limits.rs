use crate::error::Rgb565Error;

/// Caps applied to a BMP header or a dump geometry before any pixel buffer
/// is allocated.
///
/// A BMP header is untrusted input: its width and height alone decide how
/// large the `.565` output and the row buffers get. `None` leaves a bound
/// open, which is the default for every field.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Cap on width * height.
    pub max_pixels: Option<u64>,
    /// Cap on the bytes of the output raster or `.565` pixel area.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Geometry plus output size for an image stored at `bytes_per_pixel`
    /// (2 for `.565`, 3 for an 8-bit raster).
    pub(crate) fn check_output(
        &self,
        width: u32,
        height: u32,
        bytes_per_pixel: usize,
    ) -> Result<(), Rgb565Error> {
        let pixels = u64::from(width) * u64::from(height);
        let bytes = usize::try_from(pixels)
            .ok()
            .and_then(|px| px.checked_mul(bytes_per_pixel))
            .ok_or(Rgb565Error::DimensionsTooLarge { width, height })?;

        within("width", u64::from(width), self.max_width)?;
        within("height", u64::from(height), self.max_height)?;
        within("pixel count", pixels, self.max_pixels)?;
        within("output bytes", bytes as u64, self.max_memory_bytes)
    }
}

fn within(what: &str, value: u64, cap: Option<u64>) -> Result<(), Rgb565Error> {
    match cap {
        Some(max) if value > max => Err(Rgb565Error::LimitExceeded(alloc::format!(
            "{what} {value} exceeds limit {max}"
        ))),
        _ => Ok(()),
    }
}
