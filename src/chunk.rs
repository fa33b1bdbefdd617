use crate::consts::{
    QOI_MASK_2, QOI_OP_DIFF, QOI_OP_INDEX, QOI_OP_LUMA, QOI_OP_RGB, QOI_OP_RGBA, QOI_OP_RUN,
};
use crate::error::Result;
use crate::pixel::Color;
use crate::utils::{Bytes, BytesMut};

/// One unit of the encoded stream.
///
/// ```text
/// INDEX  00iiiiii                      cache slot 0..63
/// DIFF   01rrggbb                      dr, dg, db in -2..1, biased by 2
/// LUMA   10gggggg rrrrbbbb             dg in -32..31 (bias 32), dr-dg and db-dg in -8..7 (bias 8)
/// RUN    11llllll                      length 1..62, stored as length - 1
/// RGB    11111110 r g b
/// RGBA   11111111 r g b a
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Chunk {
    Run(u8),
    Index(u8),
    Diff(i8, i8, i8),
    Luma(i8, i8, i8),
    Rgb(u8, u8, u8),
    Rgba(Color),
}

#[inline(always)]
const fn bias(v: i8, by: u8) -> u8 {
    (v as u8).wrapping_add(by)
}

#[inline(always)]
const fn unbias(v: u8, by: u8) -> i8 {
    v.wrapping_sub(by) as i8
}

impl Chunk {
    #[inline]
    pub fn write(self, buf: BytesMut<'_>) -> BytesMut<'_> {
        match self {
            Self::Run(run) => buf.write_one(QOI_OP_RUN | (run - 1)),
            Self::Index(slot) => buf.write_one(QOI_OP_INDEX | slot),
            Self::Diff(dr, dg, db) => {
                buf.write_one(QOI_OP_DIFF | bias(dr, 2) << 4 | bias(dg, 2) << 2 | bias(db, 2))
            }
            Self::Luma(dg, dr_dg, db_dg) => {
                buf.write_many(&[QOI_OP_LUMA | bias(dg, 32), bias(dr_dg, 8) << 4 | bias(db_dg, 8)])
            }
            Self::Rgb(r, g, b) => buf.write_many(&[QOI_OP_RGB, r, g, b]),
            Self::Rgba(px) => buf.write_many(&[QOI_OP_RGBA, px.r, px.g, px.b, px.a]),
        }
    }

    /// Reads the next chunk; fails if its payload is cut short.
    #[inline]
    pub fn read(bytes: &mut Bytes) -> Result<Self> {
        let b1 = bytes.read_one()?;
        let chunk = match b1 {
            QOI_OP_RGB => {
                let [r, g, b] = bytes.read_array()?;
                Self::Rgb(r, g, b)
            }
            QOI_OP_RGBA => Self::Rgba(Color::from(bytes.read_array::<4>()?)),
            _ => match b1 & QOI_MASK_2 {
                QOI_OP_INDEX => Self::Index(b1 & 0x3f),
                QOI_OP_DIFF => Self::Diff(
                    unbias((b1 >> 4) & 0x03, 2),
                    unbias((b1 >> 2) & 0x03, 2),
                    unbias(b1 & 0x03, 2),
                ),
                QOI_OP_LUMA => {
                    let b2 = bytes.read_one()?;
                    Self::Luma(unbias(b1 & 0x3f, 32), unbias(b2 >> 4, 8), unbias(b2 & 0x0f, 8))
                }
                _ => Self::Run((b1 & 0x3f) + 1),
            },
        };
        Ok(chunk)
    }
}
