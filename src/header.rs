use crate::consts::{QOI_HEADER_SIZE, QOI_MAGIC, QOI_PADDING_SIZE, QOI_PIXELS_MAX};
use crate::encode::encode_max_len;
use crate::error::{Error, Result};
use crate::types::{Channels, ColorSpace};
use crate::utils::unlikely;

/// Image header: dimensions, channel count and color space.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Header {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of channels in the raw (unencoded) image
    pub channels: Channels,
    /// Color space flag, informative only
    pub colorspace: ColorSpace,
}

impl Default for Header {
    #[inline]
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            channels: Channels::default(),
            colorspace: ColorSpace::default(),
        }
    }
}

#[inline(always)]
const fn u32_from_be(v: &[u8]) -> u32 {
    u32::from_be_bytes([v[0], v[1], v[2], v[3]])
}

impl Header {
    /// Size of the serialized header in bytes.
    pub const SIZE: usize = QOI_HEADER_SIZE;

    /// Creates a new header and validates the image dimensions.
    #[inline]
    pub const fn try_new(
        width: u32, height: u32, channels: Channels, colorspace: ColorSpace,
    ) -> Result<Self> {
        let n_pixels = (width as usize).saturating_mul(height as usize);
        if unlikely(n_pixels > QOI_PIXELS_MAX) {
            return Err(Error::ImageTooLarge { width, height });
        }
        Ok(Self { width, height, channels, colorspace })
    }

    #[inline]
    pub const fn with_colorspace(mut self, colorspace: ColorSpace) -> Self {
        self.colorspace = colorspace;
        self
    }

    /// Serializes the header into its 14-byte wire layout.
    #[inline]
    pub fn encode(&self) -> [u8; QOI_HEADER_SIZE] {
        let mut out = [0; QOI_HEADER_SIZE];
        out[..4].copy_from_slice(&QOI_MAGIC.to_be_bytes());
        out[4..8].copy_from_slice(&self.width.to_be_bytes());
        out[8..12].copy_from_slice(&self.height.to_be_bytes());
        out[12] = self.channels.into();
        out[13] = self.colorspace.into();
        out
    }

    /// Parses the header at the start of an encoded stream.
    ///
    /// The stream has to be at least large enough to hold the header and the
    /// end marker, since no valid stream can be any shorter.
    #[inline]
    pub fn decode(data: impl AsRef<[u8]>) -> Result<Self> {
        let data = data.as_ref();
        let required = QOI_HEADER_SIZE + QOI_PADDING_SIZE;
        if unlikely(data.len() < required) {
            return Err(Error::InputBufferTooSmall { size: data.len(), required });
        }
        let v = &data[..QOI_HEADER_SIZE];
        let magic = u32_from_be(&v[..4]);
        if unlikely(magic != QOI_MAGIC) {
            return Err(Error::InvalidMagic { magic });
        }
        let (width, height) = (u32_from_be(&v[4..8]), u32_from_be(&v[8..12]));
        let (channels, colorspace) = (v[12], v[13]);
        let invalid = Error::InvalidHeader { width, height, channels, colorspace };
        let channels = Channels::try_from(channels).map_err(|_| invalid.clone())?;
        let colorspace = ColorSpace::try_from(colorspace).map_err(|_| invalid.clone())?;
        Self::try_new(width, height, channels, colorspace).map_err(|_| invalid)
    }

    /// Total number of pixels in the image.
    #[inline]
    pub const fn n_pixels(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Size of the raw (unencoded) image in bytes.
    #[inline]
    pub const fn n_raw_bytes(&self) -> usize {
        self.n_pixels().saturating_mul(self.channels.stride())
    }

    /// Size of the decoded image in bytes; decoding always yields RGBA.
    #[inline]
    pub const fn n_bytes(&self) -> usize {
        self.n_pixels().saturating_mul(4)
    }

    /// The maximum number of bytes the encoded image can take.
    #[inline]
    pub fn encode_max_len(&self) -> usize {
        encode_max_len(self.width, self.height, self.channels)
    }
}
