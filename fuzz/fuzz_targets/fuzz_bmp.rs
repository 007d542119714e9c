#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let limits = zen565::Limits {
        max_pixels: Some(1 << 22),
        ..Default::default()
    };
    // Must never panic
    if let Ok(out) = zen565::bmp::transcode_with_limits(data, &limits, enough::Unstoppable) {
        let _ = zen565::bmp::decode_565(&out, enough::Unstoppable);
    }
    let _ = zen565::bmp::decode_565_packed(data, enough::Unstoppable);
});
