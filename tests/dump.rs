mod common;

use common::StopAfter;
use enough::Unstoppable;
use zen565::dump::{self, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use zen565::*;

const WHITE: [u8; 3] = [255, 255, 255];
const RED: [u8; 3] = [255, 0, 0];
const GREEN: [u8; 3] = [0, 255, 0];
const BLACK: [u8; 3] = [0, 0, 0];

fn run(color: [u8; 3], count: u16) -> Run {
    Run { color, count }
}

fn decode(runs: &[Run]) -> Result<DecodedDump, Rgb565Error> {
    let text = dump::encode_runs(runs).unwrap();
    DumpRequest::new(&text).decode(Unstoppable)
}

#[test]
fn single_white_run() {
    let dump = DumpRequest::new("FFFFFF00020000000A")
        .decode(Unstoppable)
        .unwrap();
    let r = &dump.raster;
    assert_eq!((r.width(), r.height()), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
    assert_eq!(r.layout(), PixelLayout::Rgb8);
    assert_eq!(r.rgb_at(0, 0), Some(WHITE));
    assert_eq!(r.rgb_at(1, 0), Some(WHITE));
    assert_eq!(r.rgb_at(2, 0), Some(BLACK));
    assert_eq!(r.rgb_at(0, 1), Some(BLACK));
    assert_eq!(dump.cursor(), (2, 0));
    assert_eq!(dump.pixels_filled, 2);
    assert_eq!(dump.runs, 1);
}

#[test]
fn length_mismatch() {
    // declares 11 characters, 10 present
    let err = DumpRequest::new("FFFFFF00020000000B")
        .decode(Unstoppable)
        .unwrap_err();
    assert!(matches!(
        err,
        Rgb565Error::LengthMismatch {
            declared: 11,
            actual: 10
        }
    ));
    assert_eq!(err.kind(), ErrorKind::ValidationMismatch);
}

#[test]
fn empty_stream() {
    let dump = DumpRequest::new("00000000").decode(Unstoppable).unwrap();
    assert_eq!(dump.pixels_filled, 0);
    assert_eq!(dump.runs, 0);
    assert_eq!(dump.cursor(), (0, 0));
    assert!(dump.raster.pixels().iter().all(|&b| b == 0));
}

#[test]
fn wraps_exactly_at_width() {
    let dump = decode(&[run(WHITE, 320), run(RED, 1)]).unwrap();
    let r = &dump.raster;
    assert_eq!(r.rgb_at(319, 0), Some(WHITE));
    assert_eq!(r.rgb_at(0, 1), Some(RED));
    assert_eq!(r.rgb_at(1, 1), Some(BLACK));
    assert_eq!(dump.cursor(), (1, 1));
}

#[test]
fn run_spans_rows() {
    let dump = decode(&[run(GREEN, 318), run(RED, 4)]).unwrap();
    let r = &dump.raster;
    assert_eq!(r.rgb_at(317, 0), Some(GREEN));
    assert_eq!(r.rgb_at(318, 0), Some(RED));
    assert_eq!(r.rgb_at(319, 0), Some(RED));
    assert_eq!(r.rgb_at(0, 1), Some(RED));
    assert_eq!(r.rgb_at(1, 1), Some(RED));
    assert_eq!(r.rgb_at(2, 1), Some(BLACK));
    assert_eq!(dump.cursor(), (2, 1));
}

#[test]
fn zero_count_is_noop() {
    let dump = decode(&[run(WHITE, 0), run(RED, 1), run(GREEN, 0)]).unwrap();
    assert_eq!(dump.raster.rgb_at(0, 0), Some(RED));
    assert_eq!(dump.raster.rgb_at(1, 0), Some(BLACK));
    assert_eq!(dump.pixels_filled, 1);
    assert_eq!(dump.runs, 3);
}

#[test]
fn full_screen() {
    // 76800 = 65535 + 11265
    let dump = decode(&[run(WHITE, u16::MAX), run(RED, 11265)]).unwrap();
    assert!(dump.is_complete());
    assert_eq!(dump.cursor(), (0, 240));
    assert_eq!(dump.raster.rgb_at(319, 239), Some(RED));
}

#[test]
fn overflow_is_rejected() {
    let err = decode(&[run(WHITE, u16::MAX), run(RED, 11266)]).unwrap_err();
    assert!(matches!(
        err,
        Rgb565Error::RasterOverflow {
            capacity: 76800,
            requested: 76801
        }
    ));
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn malformed_hex() {
    let err = DumpRequest::new("FFFFGF00020000000A")
        .decode(Unstoppable)
        .unwrap_err();
    assert!(matches!(err, Rgb565Error::InvalidHex { offset: 4 }));
    assert_eq!(err.kind(), ErrorKind::Format);

    let err = DumpRequest::new("FFFFFF0002000000ZA")
        .decode(Unstoppable)
        .unwrap_err();
    assert!(matches!(err, Rgb565Error::InvalidHex { offset: 16 }));
}

#[test]
fn partial_run_is_format_error() {
    // 12 characters of run data, correctly declared
    let err = DumpRequest::new("FFFFFF0002FF0000000C")
        .decode(Unstoppable)
        .unwrap_err();
    assert!(matches!(err, Rgb565Error::InvalidData(_)));
}

#[test]
fn shorter_than_trailer() {
    let err = DumpRequest::new("000A").decode(Unstoppable).unwrap_err();
    assert!(matches!(err, Rgb565Error::InvalidData(_)));
    assert!(DumpRequest::new("").decode(Unstoppable).is_err());
}

#[test]
fn lowercase_and_line_endings() {
    // interior whitespace is not skipped
    let err = DumpRequest::new("ff00 000030000000a")
        .decode(Unstoppable)
        .unwrap_err();
    assert!(matches!(err, Rgb565Error::InvalidHex { offset: 4 }));

    let dump = DumpRequest::new("ff000000030000000a\r\n")
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(dump.raster.rgb_at(2, 0), Some(RED));
    assert_eq!(dump.cursor(), (3, 0));
}

#[test]
fn portrait_geometry() {
    let text = dump::encode_runs(&[run(WHITE, 241)]).unwrap();
    let dump = DumpRequest::new(&text)
        .with_size(240, 320)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!((dump.raster.width(), dump.raster.height()), (240, 320));
    assert_eq!(dump.raster.rgb_at(0, 1), Some(WHITE));
    assert_eq!(dump.cursor(), (1, 1));
}

#[test]
fn zero_sized_raster_rejected() {
    assert!(DumpRequest::new("00000000")
        .with_size(0, 240)
        .decode(Unstoppable)
        .is_err());
}

#[test]
fn limits_apply() {
    let limits = Limits {
        max_memory_bytes: Some(1000),
        ..Default::default()
    };
    let err = DumpRequest::new("00000000")
        .with_limits(&limits)
        .decode(Unstoppable)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Limit);
}

#[test]
fn parse_runs_lists_stream() {
    let runs = dump::parse_runs("10203000050000FF00010000000014").unwrap();
    assert_eq!(runs, vec![run([0x10, 0x20, 0x30], 5), run([0, 0, 0xFF], 1)]);
}

#[test]
fn encode_format() {
    let text = dump::encode_runs(&[run([0xAB, 0x01, 0x02], 0x1234)]).unwrap();
    assert_eq!(text, "AB010212340000000A");
}

#[test]
fn raster_encode_decode_identity() {
    let mut pixels = Vec::with_capacity(320 * 240 * 3);
    for y in 0..240u32 {
        for x in 0..320u32 {
            // horizontal bands with a stripe, so runs cross row ends
            let c = if x % 50 < 3 { RED } else { [(y / 10) as u8 * 10, 0, 40] };
            pixels.extend_from_slice(&c);
        }
    }
    let raster = Raster::from_pixels(pixels, 320, 240, PixelLayout::Rgb8).unwrap();

    let text = dump::encode(&raster).unwrap();
    let dump = DumpRequest::new(&text).decode(Unstoppable).unwrap();
    assert!(dump.is_complete());
    assert_eq!(dump.raster, raster);
}

#[test]
fn encode_splits_long_runs() {
    let raster = Raster::new(320, 240, PixelLayout::Rgb8).unwrap();
    let runs = dump::parse_runs(&dump::encode(&raster).unwrap()).unwrap();
    assert_eq!(runs, vec![run(BLACK, u16::MAX), run(BLACK, 11265)]);
}

#[test]
fn stop_request_cancels_decode() {
    let runs: Vec<Run> = (0..1100u32)
        .map(|i| run([i as u8, 0, 0], 1))
        .collect();
    let text = dump::encode_runs(&runs).unwrap();

    // allows the check at run 0, refuses the one at run 1024
    let err = DumpRequest::new(&text)
        .decode(StopAfter::new(1))
        .unwrap_err();
    assert!(matches!(err, Rgb565Error::Cancelled(_)));
    assert_eq!(err.kind(), ErrorKind::Cancelled);

    let dump = DumpRequest::new(&text).decode(StopAfter::new(2)).unwrap();
    assert_eq!(dump.pixels_filled, 1100);
}
