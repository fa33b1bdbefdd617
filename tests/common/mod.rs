#![allow(dead_code)]

/// Cache slot of a raw pixel; three-channel pixels are hashed as opaque.
pub fn hash<const N: usize>(px: [u8; N]) -> u8 {
    let r = px[0].wrapping_mul(3);
    let g = px[1].wrapping_mul(5);
    let b = px[2].wrapping_mul(7);
    let a = px.get(3).copied().unwrap_or(0xff).wrapping_mul(11);
    r.wrapping_add(g).wrapping_add(b).wrapping_add(a) % 64
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Op {
    Index(u8),
    Diff,
    Luma,
    Run(u8),
    Rgb,
    Rgba,
}

/// Walks the chunk body of an encoded stream and lists its opcodes.
pub fn ops(encoded: &[u8]) -> Vec<Op> {
    let body = &encoded[14..encoded.len() - 8];
    let mut out = vec![];
    let mut i = 0;
    while i < body.len() {
        let b1 = body[i];
        let (op, len) = match b1 {
            0xfe => (Op::Rgb, 4),
            0xff => (Op::Rgba, 5),
            _ => match b1 >> 6 {
                0 => (Op::Index(b1 & 0x3f), 1),
                1 => (Op::Diff, 1),
                2 => (Op::Luma, 2),
                _ => (Op::Run((b1 & 0x3f) + 1), 1),
            },
        };
        out.push(op);
        i += len;
    }
    out
}

/// Expands RGB pixels to RGBA with opaque alpha; RGBA input is returned as is.
pub fn to_rgba(data: &[u8], channels: usize) -> Vec<u8> {
    if channels == 4 {
        return data.to_vec();
    }
    data.chunks_exact(3).flat_map(|px| [px[0], px[1], px[2], 0xff]).collect()
}
