//! Endless scrolling background strip
//!
//! Tiles sit side by side; the whole strip slides left one tile width per
//! period and snaps back, so the pattern repeats seamlessly.

use crate::consts::BACKDROP_TILES;

#[derive(Debug, Clone, Default)]
pub struct Backdrop {
    /// Unpaused seconds accumulated
    elapsed: f32,
}

impl Backdrop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, dt: f32, period: f32) {
        self.elapsed = (self.elapsed + dt) % period;
    }

    /// Left shift of the strip, in [0, tile_width)
    pub fn shift(&self, tile_width: f32, period: f32) -> f32 {
        (self.elapsed / period) * tile_width
    }

    /// x of each tile's left edge
    pub fn tile_positions(&self, tile_width: f32, period: f32) -> [f32; BACKDROP_TILES] {
        let shift = self.shift(tile_width, period);
        std::array::from_fn(|i| tile_width * i as f32 - shift)
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}
