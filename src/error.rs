use core::fmt::{self, Display};

use crate::consts::{QOI_MAGIC, QOI_PIXELS_MAX};

/// Errors that can occur during encoding or decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Channel count outside of the supported set (3 or 4)
    InvalidChannels { channels: u8 },
    /// Color space flag other than 0 (sRGB) or 1 (linear)
    InvalidColorSpace { colorspace: u8 },
    /// Image exceeds the maximum supported number of pixels
    ImageTooLarge { width: u32, height: u32 },
    /// Raw pixel buffer length doesn't match the image dimensions
    InvalidImageLength { size: usize, width: u32, height: u32, channels: u8 },
    /// Encoded input is too short to even hold the header and the end marker
    InputBufferTooSmall { size: usize, required: usize },
    /// Output buffer can't fit the result
    OutputBufferTooSmall { size: usize, required: usize },
    /// Stream doesn't start with `qoif`
    InvalidMagic { magic: u32 },
    /// Header fields that no valid stream can carry
    InvalidHeader { width: u32, height: u32, channels: u8, colorspace: u8 },
    /// Chunk payload runs into the end marker
    UnexpectedBufferEnd,
    /// Chunk stream describes a different number of pixels than the header
    PixelCountMismatch { expected: usize, decoded: usize },
    /// Last 8 bytes are not the end marker
    InvalidPadding,
}

/// Broad classification of an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The encoded stream is truncated or not a QOI stream at all.
    MalformedStream,
    /// The caller passed arguments that violate the codec's preconditions.
    InvalidInput,
}

pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidChannels { .. }
            | Self::InvalidColorSpace { .. }
            | Self::ImageTooLarge { .. }
            | Self::InvalidImageLength { .. }
            | Self::OutputBufferTooSmall { .. } => ErrorKind::InvalidInput,
            Self::InputBufferTooSmall { .. }
            | Self::InvalidMagic { .. }
            | Self::InvalidHeader { .. }
            | Self::UnexpectedBufferEnd
            | Self::PixelCountMismatch { .. }
            | Self::InvalidPadding => ErrorKind::MalformedStream,
        }
    }

    pub const fn is_malformed_stream(&self) -> bool {
        matches!(self.kind(), ErrorKind::MalformedStream)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::InvalidChannels { channels } => {
                write!(f, "invalid number of channels: {}", channels)
            }
            Self::InvalidColorSpace { colorspace } => {
                write!(f, "invalid color space: {} (expected 0 or 1)", colorspace)
            }
            Self::ImageTooLarge { width, height } => {
                let mp = QOI_PIXELS_MAX / 1_000_000;
                write!(f, "image is too large: {}x{} (max={}Mp)", width, height, mp)
            }
            Self::InvalidImageLength { size, width, height, channels } => {
                write!(
                    f,
                    "invalid image length: {} bytes for {}x{}x{}",
                    size, width, height, channels
                )
            }
            Self::InputBufferTooSmall { size, required } => {
                write!(f, "input buffer size too small: {} (minimum required: {})", size, required)
            }
            Self::OutputBufferTooSmall { size, required } => {
                write!(f, "output buffer size too small: {} (minimum required: {})", size, required)
            }
            Self::InvalidMagic { magic } => {
                write!(f, "invalid magic: expected {:#010x}, got {:#010x}", QOI_MAGIC, magic)
            }
            Self::InvalidHeader { width, height, channels, colorspace } => {
                write!(
                    f,
                    "invalid header: {}x{}, channels={}, colorspace={}",
                    width, height, channels, colorspace
                )
            }
            Self::UnexpectedBufferEnd => {
                write!(f, "unexpected input buffer end while decoding")
            }
            Self::PixelCountMismatch { expected, decoded } => {
                write!(f, "pixel count mismatch: expected {}, decoded {}", expected, decoded)
            }
            Self::InvalidPadding => {
                write!(f, "invalid padding (stream end marker)")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::InvalidChannels { channels: 5 }.kind(), ErrorKind::InvalidInput);
        assert_eq!(
            Error::InvalidImageLength { size: 3, width: 2, height: 1, channels: 3 }.kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(Error::InvalidColorSpace { colorspace: 2 }.kind(), ErrorKind::InvalidInput);
        assert!(Error::InvalidMagic { magic: 0 }.is_malformed_stream());
        assert!(Error::InputBufferTooSmall { size: 10, required: 22 }.is_malformed_stream());
        assert!(Error::UnexpectedBufferEnd.is_malformed_stream());
        assert!(!Error::OutputBufferTooSmall { size: 0, required: 22 }.is_malformed_stream());
    }
}
