#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    // Must never panic, whatever the text
    let _ = zen565::dump::parse_runs(text);
    if let Ok(dump) = zen565::DumpRequest::new(text).decode(enough::Unstoppable) {
        assert!(dump.pixels_filled <= dump.raster.capacity());
    }
    let _ = zen565::DumpRequest::new(text)
        .with_size(7, 3)
        .decode(enough::Unstoppable);
});
