use alloc::{vec, vec::Vec};

use crate::chunk::Chunk;
use crate::consts::{QOI_HEADER_SIZE, QOI_PADDING, QOI_PADDING_SIZE, QOI_RUN_MAX};
use crate::error::{Error, Result};
use crate::header::Header;
use crate::pixel::Color;
use crate::state::State;
use crate::types::{Channels, ColorSpace};
use crate::utils::{unlikely, BytesMut};

/// Picks the chunk for a pixel that differs from the previous one.
///
/// Order matters for byte-exact output: INDEX, then DIFF, LUMA, RGB and RGBA.
#[inline]
fn encode_pixel(state: &mut State, px: Color) -> Chunk {
    let slot = px.hash_index();
    if state.lookup(slot) == px {
        return Chunk::Index(slot);
    }
    state.insert(px);

    let d = px.delta(state.px_prev);
    if d.a != 0 {
        return Chunk::Rgba(px);
    }
    if matches!((d.r, d.g, d.b), (-2..=1, -2..=1, -2..=1)) {
        return Chunk::Diff(d.r, d.g, d.b);
    }
    let (dr_dg, db_dg) = (d.r.wrapping_sub(d.g), d.b.wrapping_sub(d.g));
    if matches!((d.g, dr_dg, db_dg), (-32..=31, -8..=7, -8..=7)) {
        Chunk::Luma(d.g, dr_dg, db_dg)
    } else {
        Chunk::Rgb(px.r, px.g, px.b)
    }
}

fn encode_impl<'a, const N: usize>(mut buf: BytesMut<'a>, data: &[u8]) -> BytesMut<'a> {
    let mut state = State::new();
    let mut run = 0_u8;
    let mut px = Color::default();

    let n_pixels = data.len() / N;
    for (i, chunk) in data.chunks_exact(N).enumerate() {
        px.read::<N>(chunk);
        if px == state.px_prev {
            run += 1;
            if run == QOI_RUN_MAX || unlikely(i == n_pixels - 1) {
                buf = Chunk::Run(run).write(buf);
                run = 0;
            }
        } else {
            if run != 0 {
                buf = Chunk::Run(run).write(buf);
                run = 0;
            }
            buf = encode_pixel(&mut state, px).write(buf);
            state.px_prev = px;
        }
    }

    buf.write_many(&QOI_PADDING)
}

/// The maximum number of bytes the encoded image will take.
///
/// Can be used to pre-allocate the buffer to encode the image into.
#[inline]
pub fn encode_max_len(width: u32, height: u32, channels: impl Into<u8>) -> usize {
    let (width, height) = (width as usize, height as usize);
    let n_pixels = width.saturating_mul(height);
    QOI_HEADER_SIZE
        + n_pixels.saturating_mul(channels.into() as usize)
        + n_pixels
        + QOI_PADDING_SIZE
}

/// Encode the image into a pre-allocated buffer.
///
/// Returns the total number of bytes written.
#[inline]
pub fn encode_to_buf(
    buf: impl AsMut<[u8]>, data: impl AsRef<[u8]>, width: u32, height: u32, channels: u8,
) -> Result<usize> {
    Encoder::new(&data, width, height, channels)?.encode_to_buf(buf)
}

/// Encode the image into a newly allocated vector.
///
/// The color space flag is written as linear (1).
#[inline]
pub fn encode_to_vec(
    data: impl AsRef<[u8]>, width: u32, height: u32, channels: u8,
) -> Result<Vec<u8>> {
    Encoder::new(&data, width, height, channels)?.encode_to_vec()
}

/// Encode QOI images from raw pixel buffers.
#[derive(Clone)]
pub struct Encoder<'a> {
    data: &'a [u8],
    header: Header,
}

impl<'a> Encoder<'a> {
    /// Creates a new encoder from a given array of pixel data and image dimensions.
    ///
    /// The length of `data` must be exactly `width * height * channels`, with
    /// `channels` being 3 (RGB) or 4 (RGBA).
    #[inline]
    pub fn new(
        data: &'a (impl AsRef<[u8]> + ?Sized), width: u32, height: u32, channels: u8,
    ) -> Result<Self> {
        let data = data.as_ref();
        let channels = Channels::try_from(channels)?;
        let header = Header::try_new(width, height, channels, ColorSpace::Linear)?;
        let size = data.len();
        if unlikely(size != header.n_raw_bytes()) {
            return Err(Error::InvalidImageLength {
                size,
                width,
                height,
                channels: channels.as_u8(),
            });
        }
        Ok(Self { data, header })
    }

    /// Returns a new encoder with modified color space.
    ///
    /// Note: the color space doesn't affect encoding or decoding in any way, it's
    /// a purely informative field that's stored in the image header.
    #[inline]
    pub const fn with_colorspace(mut self, colorspace: ColorSpace) -> Self {
        self.header = self.header.with_colorspace(colorspace);
        self
    }

    #[inline]
    pub const fn channels(&self) -> Channels {
        self.header.channels
    }

    #[inline]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// The maximum number of bytes the encoded image will take.
    #[inline]
    pub fn required_buf_len(&self) -> usize {
        self.header.encode_max_len()
    }

    /// Encodes the image to a pre-allocated buffer and returns the number of bytes written.
    ///
    /// The buffer must be at least `required_buf_len()` bytes long.
    #[inline]
    pub fn encode_to_buf(&self, mut buf: impl AsMut<[u8]>) -> Result<usize> {
        let buf = buf.as_mut();
        let size_required = self.required_buf_len();
        if unlikely(buf.len() < size_required) {
            return Err(Error::OutputBufferTooSmall { size: buf.len(), required: size_required });
        }
        let size = buf.len();
        let out = BytesMut::new(buf).write_many(&self.header.encode());
        let out = match self.header.channels {
            Channels::Rgb => encode_impl::<3>(out, self.data),
            Channels::Rgba => encode_impl::<4>(out, self.data),
        };
        Ok(size - out.len())
    }

    /// Encodes the image into a newly allocated vector of bytes and returns it.
    #[inline]
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let mut out = vec![0_u8; self.required_buf_len()];
        let size = self.encode_to_buf(&mut out)?;
        out.truncate(size);
        Ok(out)
    }
}
