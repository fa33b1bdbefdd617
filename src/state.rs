use crate::consts::QOI_HASH_SIZE;
use crate::pixel::Color;

/// Rolling codec state: the color cache and the previous pixel.
///
/// A fresh `State` is created at the start of every encode or decode call and
/// dropped at its end, so nothing carries over between images.
pub struct State {
    index: [Color; QOI_HASH_SIZE],
    pub px_prev: Color,
}

impl State {
    pub fn new() -> Self {
        Self { index: [Color::zero(); QOI_HASH_SIZE], px_prev: Color::default() }
    }

    #[inline]
    pub fn lookup(&self, slot: u8) -> Color {
        self.index[usize::from(slot) % QOI_HASH_SIZE]
    }

    /// Stores `px` at its hash slot, evicting whatever was there.
    #[inline]
    pub fn insert(&mut self, px: Color) {
        self.index[usize::from(px.hash_index())] = px;
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
