//! Screen dump text encoder, the host-side mirror of the firmware's
//! screenshot routine.

use alloc::string::String;
use core::fmt::Write as _;

use super::Run;
use super::decode::{RUN_DIGITS, TRAILER_DIGITS};
use crate::error::Rgb565Error;
use crate::raster::Raster;

/// Collapse a raster into runs, row-major, splitting at `u16::MAX`.
pub(crate) fn raster_runs(raster: &Raster) -> alloc::vec::Vec<Run> {
    let mut runs: alloc::vec::Vec<Run> = alloc::vec::Vec::new();
    for y in 0..raster.height() {
        for x in 0..raster.width() {
            let Some(color) = raster.rgb_at(x, y) else {
                continue;
            };
            match runs.last_mut() {
                Some(last) if last.color == color && last.count < u16::MAX => last.count += 1,
                _ => runs.push(Run { color, count: 1 }),
            }
        }
    }
    runs
}

pub(crate) fn encode_runs(runs: &[Run]) -> Result<String, Rgb565Error> {
    let body_len = runs.len().checked_mul(RUN_DIGITS).filter(|&n| n <= u32::MAX as usize);
    let Some(body_len) = body_len else {
        return Err(Rgb565Error::InvalidData(alloc::format!(
            "{} runs exceed the 32-bit length field",
            runs.len()
        )));
    };

    let mut out = String::with_capacity(body_len + TRAILER_DIGITS);
    for run in runs {
        let [r, g, b] = run.color;
        // fmt::Write for String cannot fail
        let _ = write!(out, "{r:02X}{g:02X}{b:02X}{:04X}", run.count);
    }
    let _ = write!(out, "{body_len:08X}");
    Ok(out)
}

pub(crate) fn encode_dump(raster: &Raster) -> Result<String, Rgb565Error> {
    encode_runs(&raster_runs(raster))
}
