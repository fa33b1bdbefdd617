use alloc::{vec, vec::Vec};

use bytemuck::cast_slice_mut;

use crate::chunk::Chunk;
use crate::consts::{QOI_HEADER_SIZE, QOI_PADDING, QOI_PADDING_SIZE, QOI_RUN_MAX};
use crate::error::{Error, Result};
use crate::header::Header;
use crate::pixel::Color;
use crate::state::State;
use crate::utils::{cold, unlikely, Bytes};

/// Applies one chunk to the state, returning the produced color and how many
/// pixels it covers.
#[inline]
fn decode_chunk(state: &mut State, chunk: Chunk) -> (Color, usize) {
    let px_prev = state.px_prev;
    let px = match chunk {
        Chunk::Run(run) => return (px_prev, usize::from(run)),
        Chunk::Index(slot) => {
            let px = state.lookup(slot);
            state.px_prev = px;
            return (px, 1);
        }
        Chunk::Diff(dr, dg, db) => px_prev.rgb_add(dr, dg, db),
        Chunk::Luma(dg, dr_dg, db_dg) => {
            px_prev.rgb_add(dg.wrapping_add(dr_dg), dg, dg.wrapping_add(db_dg))
        }
        Chunk::Rgb(r, g, b) => px_prev.with_rgb(r, g, b),
        Chunk::Rgba(px) => px,
    };
    state.insert(px);
    state.px_prev = px;
    (px, 1)
}

fn decode_impl(pixels: &mut [Color], body: &[u8]) -> Result<()> {
    let expected = pixels.len();
    let mut bytes = Bytes::new(body);
    let mut state = State::new();
    let mut pos = 0;

    while !bytes.is_empty() {
        let chunk = Chunk::read(&mut bytes)?;
        let (px, n) = decode_chunk(&mut state, chunk);
        let end = pos + n;
        if unlikely(end > expected) {
            return Err(Error::PixelCountMismatch { expected, decoded: end });
        }
        pixels[pos..end].fill(px);
        pos = end;
    }

    if unlikely(pos != expected) {
        return Err(Error::PixelCountMismatch { expected, decoded: pos });
    }
    Ok(())
}

/// Decodes the header and splits the stream into the chunk body and the end marker.
fn decode_parts(data: &[u8]) -> Result<(Header, &[u8])> {
    let header = Header::decode(data)?;
    let body_len = data.len() - QOI_HEADER_SIZE - QOI_PADDING_SIZE;
    let (body, padding) = data[QOI_HEADER_SIZE..].split_at(body_len);
    if unlikely(padding != QOI_PADDING) {
        return Err(Error::InvalidPadding);
    }
    // no body byte can describe more than a full run; checked before allocating
    let expected = header.n_pixels();
    if unlikely(expected > body.len().saturating_mul(usize::from(QOI_RUN_MAX))) {
        return Err(Error::PixelCountMismatch { expected, decoded: 0 });
    }
    Ok((header, body))
}

/// Decode the image header from a slice of bytes.
///
/// Fails if the slice is too short to hold a header and the end marker, or if
/// the magic bytes don't match.
#[inline]
pub fn decode_header(data: impl AsRef<[u8]>) -> Result<Header> {
    Header::decode(data)
}

/// Decode the image into a pre-allocated buffer.
///
/// Pixels are always written as RGBA, so the buffer must be at least
/// `header.n_bytes()` long. Returns the decoded header.
///
/// The buffer is left untouched if the header, the end marker or the buffer size
/// are rejected. An error raised while walking the chunks leaves its contents
/// unspecified.
#[inline]
pub fn decode_to_buf(mut buf: impl AsMut<[u8]>, data: impl AsRef<[u8]>) -> Result<Header> {
    let buf = buf.as_mut();
    let (header, body) = decode_parts(data.as_ref())?;
    let required = header.n_bytes();
    if unlikely(buf.len() < required) {
        cold();
        return Err(Error::OutputBufferTooSmall { size: buf.len(), required });
    }
    decode_impl(cast_slice_mut(&mut buf[..required]), body)?;
    Ok(header)
}

/// Decode the image into a newly allocated vector of RGBA bytes.
///
/// Returns the parsed header together with `4 * width * height` bytes of pixels.
#[inline]
pub fn decode_to_vec(data: impl AsRef<[u8]>) -> Result<(Header, Vec<u8>)> {
    let (header, body) = decode_parts(data.as_ref())?;
    let mut out = vec![0_u8; header.n_bytes()];
    decode_impl(cast_slice_mut(&mut out[..]), body)?;
    Ok((header, out))
}
