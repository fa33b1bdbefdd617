use bytemuck::{Pod, Zeroable};

use crate::consts::QOI_HASH_SIZE;

/// An RGBA color, laid out exactly like one pixel of a decoded image.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Pod, Zeroable)]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Color {
    /// Opaque black, the "previous pixel" both codec directions start from.
    fn default() -> Self {
        Self::new(0, 0, 0, 0xff)
    }
}

impl Color {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Transparent black; every slot of a fresh color cache holds this.
    #[inline]
    pub const fn zero() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Overwrites the channels present in `s`; with three channels alpha is kept.
    #[inline]
    pub(crate) fn read<const N: usize>(&mut self, s: &[u8]) {
        self.r = s[0];
        self.g = s[1];
        self.b = s[2];
        if N >= 4 {
            self.a = s[3];
        }
    }

    /// Slot of this color in the 64-entry color cache.
    #[inline]
    pub const fn hash_index(self) -> u8 {
        let r = self.r.wrapping_mul(3);
        let g = self.g.wrapping_mul(5);
        let b = self.b.wrapping_mul(7);
        let a = self.a.wrapping_mul(11);
        r.wrapping_add(g).wrapping_add(b).wrapping_add(a) % (QOI_HASH_SIZE as u8)
    }

    /// Component-wise `self - prev`, wrapped into the signed 8-bit range.
    #[inline]
    pub const fn delta(self, prev: Self) -> Delta {
        Delta {
            r: self.r.wrapping_sub(prev.r) as i8,
            g: self.g.wrapping_sub(prev.g) as i8,
            b: self.b.wrapping_sub(prev.b) as i8,
            a: self.a.wrapping_sub(prev.a) as i8,
        }
    }

    #[inline]
    pub const fn rgb_add(self, r: i8, g: i8, b: i8) -> Self {
        Self {
            r: self.r.wrapping_add(r as u8),
            g: self.g.wrapping_add(g as u8),
            b: self.b.wrapping_add(b as u8),
            a: self.a,
        }
    }

    #[inline]
    pub const fn with_rgb(self, r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: self.a }
    }
}

impl From<[u8; 4]> for Color {
    #[inline(always)]
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<Color> for [u8; 4] {
    #[inline(always)]
    fn from(px: Color) -> Self {
        [px.r, px.g, px.b, px.a]
    }
}

/// Wrapping per-channel difference between two colors.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Delta {
    pub r: i8,
    pub g: i8,
    pub b: i8,
    pub a: i8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_index() {
        assert_eq!(Color::default().hash_index(), 53); // 255 * 11 % 64
        assert_eq!(Color::zero().hash_index(), 0);
        assert_eq!(Color::new(101, 102, 103, 104).hash_index(), 54);
    }

    #[test]
    fn test_delta_wraps() {
        let d = Color::new(0, 10, 255, 200).delta(Color::new(255, 0, 0, 255));
        assert_eq!(d, Delta { r: 1, g: 10, b: -1, a: -55 });
        let back = Color::new(255, 0, 0, 200).rgb_add(d.r, d.g, d.b);
        assert_eq!(back, Color::new(0, 10, 255, 200));
    }

    #[test]
    fn test_read_keeps_alpha_for_rgb() {
        let mut px = Color::new(1, 2, 3, 77);
        px.read::<3>(&[4, 5, 6]);
        assert_eq!(px, Color::new(4, 5, 6, 77));
        px.read::<4>(&[7, 8, 9, 10]);
        assert_eq!(px, Color::new(7, 8, 9, 10));
    }
}
