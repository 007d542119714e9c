use enough::Unstoppable;
use proptest::prelude::*;
use zen565::dump;
use zen565::*;

proptest! {
    #[test]
    fn quantize_is_truncation(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let v = quantize(r, g, b);
        prop_assert_eq!((v >> 11) as u8, r >> 3);
        prop_assert_eq!(((v >> 5) & 0x3F) as u8, g >> 2);
        prop_assert_eq!((v & 0x1F) as u8, b >> 3);
    }

    #[test]
    fn expand_stays_close(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let [er, eg, eb] = expand(quantize(r, g, b));
        prop_assert!(er.abs_diff(r) <= 8);
        prop_assert!(eg.abs_diff(g) <= 4);
        prop_assert!(eb.abs_diff(b) <= 8);
    }

    #[test]
    fn quantize_fixes_expanded_values(v in any::<u16>()) {
        let [r, g, b] = expand(v);
        prop_assert_eq!(quantize(r, g, b), v);
    }

    #[test]
    fn stride_is_padded_row(width in 0u32..100_000) {
        let stride = bmp::row_stride(width);
        prop_assert_eq!(stride % 4, 0);
        prop_assert!(stride >= u64::from(width) * 3);
        prop_assert!(stride < u64::from(width) * 3 + 4);
    }

    #[test]
    fn runs_fill_their_total(
        runs in prop::collection::vec((any::<[u8; 3]>(), 0u16..500), 0..64)
    ) {
        let runs: Vec<Run> = runs
            .into_iter()
            .map(|(color, count)| Run { color, count })
            .collect();
        let total: usize = runs.iter().map(|r| usize::from(r.count)).sum();
        let text = dump::encode_runs(&runs).unwrap();

        let decoded = DumpRequest::new(&text).decode(Unstoppable).unwrap();
        prop_assert_eq!(decoded.pixels_filled, total);
        prop_assert_eq!(decoded.runs, runs.len());
        prop_assert_eq!(dump::parse_runs(&text).unwrap(), runs);
    }

    #[test]
    fn transcode_output_length(width in 1i32..24, height in 1i32..12, top_down in any::<bool>()) {
        let stride = (width as usize * 3 + 3) & !3;
        let h = if top_down { -height } else { height };
        let mut data = vec![0u8; 54 + stride * height as usize];
        data[0..2].copy_from_slice(b"BM");
        data[10..14].copy_from_slice(&54u32.to_le_bytes());
        data[14..18].copy_from_slice(&40u32.to_le_bytes());
        data[18..22].copy_from_slice(&width.to_le_bytes());
        data[22..26].copy_from_slice(&h.to_le_bytes());
        data[26..28].copy_from_slice(&1u16.to_le_bytes());
        data[28..30].copy_from_slice(&24u16.to_le_bytes());

        let out = bmp::transcode(&data, Unstoppable).unwrap();
        prop_assert_eq!(out.len(), 54 + width as usize * height as usize * 2);
        prop_assert_eq!(out[0x1C], 16);
    }
}
