//! BMP fixtures built in memory.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use enough::{Stop, StopReason};

pub const WHITE: [u8; 3] = [255, 255, 255];
pub const BLACK: [u8; 3] = [0, 0, 0];
pub const RED: [u8; 3] = [255, 0, 0];
pub const BLUE: [u8; 3] = [0, 0, 255];

/// Build a 24-bit BMP from rows in *file* order (bottom row first when
/// `height > 0`). Row padding is filled with 0xAA so leaks are visible.
pub fn bmp24(width: i32, height: i32, stored_rows: &[Vec<[u8; 3]>]) -> Vec<u8> {
    bmp_with_fields(width, height, 1, 24, 0, stored_rows)
}

pub fn bmp_with_fields(
    width: i32,
    height: i32,
    planes: u16,
    bpp: u16,
    compression: u32,
    stored_rows: &[Vec<[u8; 3]>],
) -> Vec<u8> {
    let stride = (width as usize * 3 + 3) & !3;
    let data_size = stride * stored_rows.len();
    let mut out = Vec::new();
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&((54 + data_size) as u32).to_le_bytes());
    out.extend_from_slice(&[0u8; 4]);
    out.extend_from_slice(&54u32.to_le_bytes());
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&planes.to_le_bytes());
    out.extend_from_slice(&bpp.to_le_bytes());
    out.extend_from_slice(&compression.to_le_bytes());
    out.extend_from_slice(&(data_size as u32).to_le_bytes());
    out.extend_from_slice(&2835u32.to_le_bytes());
    out.extend_from_slice(&2835u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    assert_eq!(out.len(), 54);

    for row in stored_rows {
        for &[r, g, b] in row {
            out.extend_from_slice(&[b, g, r]);
        }
        out.extend(std::iter::repeat_n(0xAAu8, stride - row.len() * 3));
    }
    out
}

/// Deterministic test pattern, `height` rows of `width` pixels, top-down.
pub fn pattern(width: usize, height: usize) -> Vec<Vec<[u8; 3]>> {
    let mut state: u32 = 0xDEAD_BEEF;
    (0..height)
        .map(|_| {
            (0..width)
                .map(|_| {
                    state ^= state << 13;
                    state ^= state >> 17;
                    state ^= state << 5;
                    let [a, b, c, _] = state.to_le_bytes();
                    [a, b, c]
                })
                .collect()
        })
        .collect()
}

/// Big-endian RGB565 bytes for a top-down pixel grid.
pub fn expected_565(rows: &[Vec<[u8; 3]>]) -> Vec<u8> {
    rows.iter()
        .flatten()
        .flat_map(|&[r, g, b]| zen565::quantize(r, g, b).to_be_bytes())
        .collect()
}

/// Stop source that allows `checks` polls, then reports a cancellation.
pub struct StopAfter {
    checks_left: AtomicUsize,
}

impl StopAfter {
    pub fn new(checks: usize) -> Self {
        Self {
            checks_left: AtomicUsize::new(checks),
        }
    }
}

impl Stop for StopAfter {
    fn check(&self) -> Result<(), StopReason> {
        self.checks_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .map(|_| ())
            .map_err(|_| StopReason::Cancelled)
    }
}
