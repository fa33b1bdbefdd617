#![no_main]
use libfuzzer_sys::fuzz_target;

use qoi::{consts::QOI_PADDING, decode_header, decode_to_vec, Channels, ColorSpace, Header};

fuzz_target!(|input: (u16, u16, bool, &[u8])| {
    let (w, h, is_4, data) = input;
    let (w, h) = (1 + u32::from(w) % 260, 1 + u32::from(h) % 260);
    let channels = if is_4 { Channels::Rgba } else { Channels::Rgb };
    let header_expected = Header::try_new(w, h, channels, ColorSpace::Srgb).unwrap();

    let mut vec = header_expected.encode().to_vec();
    vec.extend(data);
    vec.extend(QOI_PADDING);

    assert_eq!(decode_header(&vec).unwrap(), header_expected);

    match decode_to_vec(&vec) {
        Ok((header, out)) => {
            assert_eq!(header, header_expected);
            assert_eq!(out.len(), header.n_bytes());
        }
        Err(err) => assert!(err.is_malformed_stream()),
    }
});
