#![no_main]
use libfuzzer_sys::fuzz_target;

use qoi::{decode_to_vec, encode_max_len, encode_to_vec};

fuzz_target!(|input: (bool, u8, &[u8])| {
    let (is_4, w_frac, data) = input;
    let channels: u8 = if is_4 { 4 } else { 3 };
    let n_pixels = data.len() / channels as usize;
    let (w, h) = if n_pixels == 0 {
        (0, 0)
    } else {
        let w = ((n_pixels * (1 + w_frac as usize)) / 256).max(1);
        let h = n_pixels / w;
        (w, h)
    };
    let raw = &data[..(w * h * channels as usize)];
    let out = encode_to_vec(raw, w as u32, h as u32, channels).unwrap();
    assert!(out.len() <= encode_max_len(w as u32, h as u32, channels));

    let (header, decoded) = decode_to_vec(&out).unwrap();
    assert_eq!((header.width, header.height), (w as u32, h as u32));
    if is_4 {
        assert_eq!(decoded, raw);
    } else {
        let alpha = decoded.chunks_exact(4).all(|px| px[3] == 0xff);
        let rgb = decoded.chunks_exact(4).flat_map(|px| &px[..3]).copied().collect::<Vec<_>>();
        assert!(alpha);
        assert_eq!(rgb, raw);
    }
});
