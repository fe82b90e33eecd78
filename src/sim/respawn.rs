//! Screen-wrap ("reappear") policy
//!
//! An obstacle whose box has fully left the viewport is moved back to a
//! spawn edge at a fresh random height. Surviving a pass-by is what scores.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::movement::StrategyKind;
use super::state::Viewport;

/// Viewport edge an entity left through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WrapEdge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Inclusive integer range for random spawn coordinates.
///
/// Never empty: a range whose upper bound falls below its lower bound is
/// clamped to the single value `lo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnRange {
    lo: i32,
    hi: i32,
}

impl SpawnRange {
    pub fn new(lo: f32, hi: f32) -> Self {
        let lo = lo.floor() as i32;
        let hi = (hi.floor() as i32).max(lo);
        Self { lo, hi }
    }

    pub fn lo(&self) -> i32 {
        self.lo
    }

    pub fn hi(&self) -> i32 {
        self.hi
    }

    /// Intersect with `[lo, hi]`. When they do not meet, collapse onto the
    /// bound nearest to this range.
    pub fn within(self, lo: f32, hi: f32) -> Self {
        let band = SpawnRange::new(lo, hi);
        if self.hi < band.lo {
            return Self { lo: band.lo, hi: band.lo };
        }
        if self.lo > band.hi {
            return Self { lo: band.hi, hi: band.hi };
        }
        Self {
            lo: self.lo.max(band.lo),
            hi: self.hi.min(band.hi),
        }
    }

    pub fn sample(&self, rng: &mut impl Rng) -> f32 {
        rng.random_range(self.lo..=self.hi) as f32
    }
}

/// Which edges an entity wraps on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrapPolicy {
    /// All four edges, checked left, right, top, bottom
    AllEdges,
    /// Left edge only, respawning inside the wave's vertical margin
    LeftOnly,
    /// Players and props
    Never,
}

impl WrapPolicy {
    pub fn for_strategy(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::Linear | StrategyKind::DiagonalUp | StrategyKind::DiagonalDown => {
                WrapPolicy::AllEdges
            }
            StrategyKind::Sinusoidal => WrapPolicy::LeftOnly,
            StrategyKind::VerticalOscillation | StrategyKind::PlayerInput => WrapPolicy::Never,
        }
    }

    /// First exit condition that holds, in priority order
    pub fn exit_edge(&self, pos: Vec2, size: Vec2, viewport: Viewport) -> Option<WrapEdge> {
        match self {
            WrapPolicy::Never => None,
            WrapPolicy::LeftOnly => (pos.x <= -size.x).then_some(WrapEdge::Left),
            WrapPolicy::AllEdges => exit_edge(pos, size, viewport),
        }
    }

    /// Apply the wrap for this tick, if any. Returns the edge and the new
    /// top-left position.
    pub fn apply(
        &self,
        pos: Vec2,
        size: Vec2,
        velocity: f32,
        viewport: Viewport,
        rng: &mut impl Rng,
    ) -> Option<(WrapEdge, Vec2)> {
        let edge = self.exit_edge(pos, size, viewport)?;
        let (w, h) = (viewport.width, viewport.height);

        let (x, ys) = match (self, edge) {
            (WrapPolicy::LeftOnly, _) => (w, SpawnRange::new(velocity, h - size.y - velocity)),
            (_, WrapEdge::Left) => (w, SpawnRange::new(0.0, h - size.y)),
            (_, WrapEdge::Right) => (-size.x, SpawnRange::new(0.0, h - size.y)),
            (_, WrapEdge::Top) => (w, SpawnRange::new(h / 2.0, h * 2.0)),
            // [-2H, -H/2] never meets the re-entry band; use the strip just
            // above the screen instead so the height stays random
            (_, WrapEdge::Bottom) => (w, SpawnRange::new(-size.y + 1.0, -1.0)),
        };

        // Keep the new position strictly inside the re-entry band so no
        // exit condition holds right after a wrap.
        let ys = ys.within(-size.y + 1.0, h + size.y - 1.0);
        let x = x.clamp(-size.x + 1.0, w + size.x - 1.0);
        Some((edge, Vec2::new(x, ys.sample(rng))))
    }
}

/// Four-edge exit test: left, right, top, bottom
pub fn exit_edge(pos: Vec2, size: Vec2, viewport: Viewport) -> Option<WrapEdge> {
    if pos.x <= -size.x {
        Some(WrapEdge::Left)
    } else if pos.x >= viewport.width + size.x {
        Some(WrapEdge::Right)
    } else if pos.y <= -size.y {
        Some(WrapEdge::Top)
    } else if pos.y >= viewport.height + size.y {
        Some(WrapEdge::Bottom)
    } else {
        None
    }
}
