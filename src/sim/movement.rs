//! Movement strategies
//!
//! Each strategy owns only its own state and returns the next position by
//! value. The entity stays the sole owner of its position and box.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::animation::Facing;
use super::state::Viewport;
use crate::consts::{DIAGONAL_DY, OSCILLATION_AMPLITUDE, SINE_PERIOD};

/// Arrow keys currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldDirections {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldDirections {
    pub const NONE: Self = Self {
        up: false,
        down: false,
        left: false,
        right: false,
    };
}

/// Read-only inputs for one `advance` call
#[derive(Debug, Clone, Copy)]
pub struct MoveContext {
    /// Per-entity speed (pixels/tick)
    pub velocity: f32,
    /// Size of the entity's current frame
    pub size: Vec2,
    pub viewport: Viewport,
    pub held: HeldDirections,
    /// Animation index before this tick's advance
    pub anim_index: f32,
    /// Length of the entity's frame list
    pub anim_len: usize,
    /// Vertical sweep direction from an oscillating sequencer
    pub rising: bool,
}

/// A per-tick position algorithm
pub trait Movement {
    /// Compute the next top-left position from the previous one
    fn advance(&mut self, pos: Vec2, ctx: &MoveContext) -> Vec2;

    /// Facing reported to the animation sequencer, if this strategy steers it
    fn facing(&self) -> Option<Facing> {
        None
    }
}

/// Straight leftward drift
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Linear;

impl Movement for Linear {
    fn advance(&mut self, pos: Vec2, ctx: &MoveContext) -> Vec2 {
        Vec2::new(pos.x - ctx.velocity, pos.y)
    }
}

/// Leftward drift with a sine wave in y, phased by x
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sinusoidal;

impl Sinusoidal {
    /// Vertical step taken at horizontal position `x`
    pub fn delta_y(x: f32, velocity: f32) -> f32 {
        if velocity == 0.0 {
            return 0.0;
        }
        velocity * (PI * x / (SINE_PERIOD * velocity)).sin()
    }
}

impl Movement for Sinusoidal {
    fn advance(&mut self, pos: Vec2, ctx: &MoveContext) -> Vec2 {
        let dy = Self::delta_y(pos.x, ctx.velocity);
        Vec2::new(pos.x - ctx.velocity, pos.y + dy)
    }
}

/// Leftward drift with a constant vertical slope
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Diagonal {
    pub dy: f32,
}

impl Diagonal {
    pub const fn up() -> Self {
        Self { dy: -DIAGONAL_DY }
    }

    pub const fn down() -> Self {
        Self { dy: DIAGONAL_DY }
    }
}

impl Movement for Diagonal {
    fn advance(&mut self, pos: Vec2, ctx: &MoveContext) -> Vec2 {
        Vec2::new(pos.x - ctx.velocity, pos.y + self.dy)
    }
}

/// Bobs around a fixed anchor, synced to the animation cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerticalOscillation {
    pub anchor: Vec2,
}

impl Movement for VerticalOscillation {
    fn advance(&mut self, _pos: Vec2, ctx: &MoveContext) -> Vec2 {
        let len = ctx.anim_len.max(1) as f32;
        let change = OSCILLATION_AMPLITUDE * (ctx.anim_index * PI / len).sin();
        let dy = if ctx.rising { change } else { -change };
        Vec2::new(self.anchor.x, self.anchor.y + dy)
    }
}

/// Arrow-key steering clamped to the viewport
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub facing: Facing,
}

impl Movement for PlayerInput {
    fn advance(&mut self, pos: Vec2, ctx: &MoveContext) -> Vec2 {
        let v = ctx.velocity;
        let mut next = pos;

        if ctx.held.right {
            next.x += v;
            self.facing = Facing::Right;
        }
        if ctx.held.left {
            next.x -= v;
            self.facing = Facing::Left;
        }
        if ctx.held.up {
            next.y -= v;
        }
        if ctx.held.down {
            next.y += v;
        }

        let max_x = (ctx.viewport.width - ctx.size.x).max(0.0);
        let max_y = (ctx.viewport.height - ctx.size.y).max(0.0);
        Vec2::new(next.x.clamp(0.0, max_x), next.y.clamp(0.0, max_y))
    }

    fn facing(&self) -> Option<Facing> {
        Some(self.facing)
    }
}

/// Variant tag, used to pick a strategy at spawn time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    Linear,
    Sinusoidal,
    DiagonalUp,
    DiagonalDown,
    VerticalOscillation,
    PlayerInput,
}

impl StrategyKind {
    /// Strategies the obstacle spawner draws from
    pub const OBSTACLE_KINDS: [StrategyKind; 3] = [
        StrategyKind::Linear,
        StrategyKind::Sinusoidal,
        StrategyKind::DiagonalUp,
    ];

    pub fn random_obstacle(rng: &mut impl Rng) -> Self {
        *Self::OBSTACLE_KINDS
            .choose(rng)
            .unwrap_or(&StrategyKind::Linear)
    }
}

/// Tagged strategy bound to one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MovementStrategy {
    Linear(Linear),
    Sinusoidal(Sinusoidal),
    DiagonalUp(Diagonal),
    DiagonalDown(Diagonal),
    VerticalOscillation(VerticalOscillation),
    PlayerInput(PlayerInput),
}

impl MovementStrategy {
    /// Build a fresh strategy; `spawn` anchors the oscillation
    pub fn from_kind(kind: StrategyKind, spawn: Vec2) -> Self {
        match kind {
            StrategyKind::Linear => Self::Linear(Linear),
            StrategyKind::Sinusoidal => Self::Sinusoidal(Sinusoidal),
            StrategyKind::DiagonalUp => Self::DiagonalUp(Diagonal::up()),
            StrategyKind::DiagonalDown => Self::DiagonalDown(Diagonal::down()),
            StrategyKind::VerticalOscillation => {
                Self::VerticalOscillation(VerticalOscillation { anchor: spawn })
            }
            StrategyKind::PlayerInput => Self::PlayerInput(PlayerInput::default()),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::Linear(_) => StrategyKind::Linear,
            Self::Sinusoidal(_) => StrategyKind::Sinusoidal,
            Self::DiagonalUp(_) => StrategyKind::DiagonalUp,
            Self::DiagonalDown(_) => StrategyKind::DiagonalDown,
            Self::VerticalOscillation(_) => StrategyKind::VerticalOscillation,
            Self::PlayerInput(_) => StrategyKind::PlayerInput,
        }
    }

    fn as_movement(&mut self) -> &mut dyn Movement {
        match self {
            Self::Linear(m) => m,
            Self::Sinusoidal(m) => m,
            Self::DiagonalUp(m) | Self::DiagonalDown(m) => m,
            Self::VerticalOscillation(m) => m,
            Self::PlayerInput(m) => m,
        }
    }
}

impl Movement for MovementStrategy {
    fn advance(&mut self, pos: Vec2, ctx: &MoveContext) -> Vec2 {
        self.as_movement().advance(pos, ctx)
    }

    fn facing(&self) -> Option<Facing> {
        match self {
            Self::PlayerInput(m) => m.facing(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ctx(velocity: f32) -> MoveContext {
        MoveContext {
            velocity,
            size: Vec2::new(40.0, 40.0),
            viewport: Viewport::default(),
            held: HeldDirections::NONE,
            anim_index: 0.0,
            anim_len: 2,
            rising: true,
        }
    }

    #[test]
    fn test_linear_and_diagonal_deltas() {
        let start = Vec2::new(500.0, 300.0);
        let c = ctx(4.0);
        assert_eq!(Linear.advance(start, &c), Vec2::new(496.0, 300.0));
        assert_eq!(Diagonal::up().advance(start, &c), Vec2::new(496.0, 298.0));
        assert_eq!(Diagonal::down().advance(start, &c), Vec2::new(496.0, 302.0));
    }

    #[test]
    fn test_sinusoidal_delta_at_x3() {
        // 5 * sin(3π/200)
        let dy = Sinusoidal::delta_y(3.0, 5.0);
        assert!((dy - 0.2355).abs() < 1e-3, "dy = {dy}");

        let next = Sinusoidal.advance(Vec2::new(3.0, 100.0), &ctx(5.0));
        assert!((next.x - -2.0).abs() < 1e-6);
        assert!((next.y - 100.2355).abs() < 1e-3);
    }

    #[test]
    fn test_vertical_oscillation_follows_direction() {
        let mut bird = VerticalOscillation {
            anchor: Vec2::new(461.0, 256.0),
        };
        let mut c = ctx(0.0);
        c.anim_len = 4;
        c.anim_index = 2.0; // sin(π/2) = 1
        let up = bird.advance(Vec2::ZERO, &c);
        assert_eq!(up.x, 461.0);
        assert!((up.y - 271.0).abs() < 1e-4);

        c.rising = false;
        let down = bird.advance(up, &c);
        assert!((down.y - 241.0).abs() < 1e-4);
    }

    #[test]
    fn test_player_input_clamps_and_faces() {
        let mut player = PlayerInput::default();
        let mut c = ctx(6.0);
        c.held.left = true;
        c.held.up = true;
        let next = player.advance(Vec2::new(2.0, 3.0), &c);
        assert_eq!(next, Vec2::ZERO);
        assert_eq!(player.facing(), Some(Facing::Left));

        c.held = HeldDirections {
            right: true,
            down: true,
            ..HeldDirections::NONE
        };
        let next = player.advance(Vec2::new(1078.0, 657.0), &c);
        assert_eq!(next, Vec2::new(1080.0, 660.0));
        assert_eq!(player.facing(), Some(Facing::Right));
    }

    #[test]
    fn test_player_input_without_keys_keeps_facing() {
        let mut player = PlayerInput {
            facing: Facing::Left,
        };
        let next = player.advance(Vec2::new(50.0, 50.0), &ctx(6.0));
        assert_eq!(next, Vec2::new(50.0, 50.0));
        assert_eq!(player.facing, Facing::Left);
    }

    #[test]
    fn test_random_obstacle_kinds() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let kind = StrategyKind::random_obstacle(&mut rng);
            assert!(StrategyKind::OBSTACLE_KINDS.contains(&kind));
        }
    }

    #[test]
    fn test_from_kind_round_trips_tag() {
        for kind in [
            StrategyKind::Linear,
            StrategyKind::Sinusoidal,
            StrategyKind::DiagonalUp,
            StrategyKind::DiagonalDown,
            StrategyKind::VerticalOscillation,
            StrategyKind::PlayerInput,
        ] {
            assert_eq!(MovementStrategy::from_kind(kind, Vec2::ZERO).kind(), kind);
        }
    }
}
