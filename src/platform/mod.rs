//! Platform abstraction layer
//!
//! Terminal-facing plumbing kept out of the simulation:
//! - Mapping between terminal cells, half-block pixels and world pixels
//! - Input events and held-key tracking
//! - Frame pacing

pub mod input;
pub mod time;

pub use input::{InputAction, KeyTracker, map_event};
pub use time::FrameClock;

use glam::Vec2;

use crate::sim::state::Viewport;

/// Scales the world onto a terminal of `cols × rows` cells. Each cell
/// holds two vertically stacked pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenMap {
    pub cols: u16,
    pub rows: u16,
    pub viewport: Viewport,
}

impl ScreenMap {
    pub fn new(cols: u16, rows: u16, viewport: Viewport) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
            viewport,
        }
    }

    /// Pixel-buffer dimensions
    pub fn pixel_size(&self) -> (usize, usize) {
        (self.cols as usize, self.rows as usize * 2)
    }

    /// Pixels per world unit on each axis
    pub fn scale(&self) -> Vec2 {
        let (w, h) = self.pixel_size();
        Vec2::new(w as f32 / self.viewport.width, h as f32 / self.viewport.height)
    }

    pub fn world_to_pixel(&self, p: Vec2) -> (i32, i32) {
        let s = p * self.scale();
        (s.x.floor() as i32, s.y.floor() as i32)
    }

    /// Size in pixels of a world-space extent; never collapses to zero
    pub fn extent_to_pixels(&self, size: Vec2) -> (i32, i32) {
        let s = size * self.scale();
        ((s.x.round() as i32).max(1), (s.y.round() as i32).max(1))
    }

    /// Terminal cell holding a world point
    pub fn world_to_cell(&self, p: Vec2) -> (i32, i32) {
        let (x, y) = self.world_to_pixel(p);
        (x, y.div_euclid(2))
    }

    /// World point at the centre of a terminal cell
    pub fn cell_to_world(&self, col: u16, row: u16) -> Vec2 {
        let scale = self.scale();
        Vec2::new(
            (col as f32 + 0.5) / scale.x,
            (row as f32 * 2.0 + 1.0) / scale.y,
        )
    }
}
