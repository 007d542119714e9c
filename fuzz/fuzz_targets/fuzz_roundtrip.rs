#![no_main]
use libfuzzer_sys::fuzz_target;
use zen565::*;

fuzz_target!(|data: &[u8]| {
    // Any 8-bit raster must survive dump encode/decode unchanged
    if data.len() < 2 {
        return;
    }
    let width = u32::from(data[0] % 32) + 1;
    let pixels = &data[1..];
    let height = (pixels.len() / (width as usize * 3)) as u32;
    if height == 0 {
        return;
    }
    let used = (width * height * 3) as usize;
    let Ok(raster) = Raster::from_pixels(pixels[..used].to_vec(), width, height, PixelLayout::Rgb8)
    else {
        return;
    };

    let text = dump::encode(&raster).expect("encode failed");
    let decoded = DumpRequest::new(&text)
        .with_size(width, height)
        .decode(enough::Unstoppable)
        .expect("re-encoded dump failed to decode");

    assert!(decoded.is_complete());
    assert_eq!(decoded.raster, raster, "roundtrip pixel mismatch");
});
