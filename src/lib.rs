//! Lossless encoder and decoder for the [QOI image format](https://qoiformat.org).
//!
//! Encoding takes a raw interleaved RGB or RGBA buffer together with its
//! dimensions and produces a complete QOI stream: a 14-byte header, the chunk
//! body and the 8-byte end marker. Decoding reverses this and always yields
//! RGBA pixels, whatever channel count the header declares.
//!
//! Both directions are pure functions of their input; the color cache and the
//! previous pixel live only for the duration of a single call.
//!
//! ```ignore
//! let rgba = [10, 10, 10, 255, 10, 10, 10, 255];
//! let encoded = qoi::encode_to_vec(&rgba, 2, 1, 4)?;
//! let (header, decoded) = qoi::decode_to_vec(&encoded)?;
//! assert_eq!((header.width, header.height), (2, 1));
//! assert_eq!(decoded, rgba);
//! ```
#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(
    clippy::inline_always,
    clippy::similar_names,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::cargo_common_metadata,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]

extern crate alloc;

mod chunk;
mod decode;
mod encode;
mod error;
mod header;
mod pixel;
mod state;
mod types;
mod utils;

#[doc(hidden)]
pub mod consts;

pub use crate::decode::{decode_header, decode_to_buf, decode_to_vec};
pub use crate::encode::{encode_max_len, encode_to_buf, encode_to_vec, Encoder};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::header::Header;
pub use crate::pixel::{Color, Delta};
pub use crate::types::{Channels, ColorSpace};
