//! Sprite entities
//!
//! An entity owns its position, box, frame list, sequencer and movement
//! strategy. One `update` per tick moves it, animates it and, for
//! obstacles, applies the wrap policy.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::animation::Sequencer;
use super::collision::Aabb;
use super::movement::{HeldDirections, MoveContext, Movement, MovementStrategy, StrategyKind};
use super::respawn::{WrapEdge, WrapPolicy};
use super::state::Viewport;

pub use super::animation::Facing;

/// Role of an entity in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// The unique collision target
    Player,
    /// A python; collides with the player and wraps around the screen
    Obstacle,
    /// Decoration (story-mode letter bird); never collides or wraps
    Prop,
}

/// Opaque handle to one image of a sprite sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameHandle {
    /// Index of the sheet in the sprite catalog
    pub sheet: u16,
    /// 1-based image number within the sheet
    pub image: u16,
}

/// Ordered frame list for one entity, already ping-ponged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSet {
    pub frames: Vec<FrameHandle>,
    /// Rendered size shared by every frame of the sheet
    pub size: Vec2,
}

impl FrameSet {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// A sprite in the scene
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    pub velocity: f32,
    frames: FrameSet,
    frame: usize,
    sequencer: Sequencer,
    strategy: MovementStrategy,
    wrap: WrapPolicy,
}

impl Entity {
    pub fn new(
        id: u32,
        kind: EntityKind,
        pos: Vec2,
        frames: FrameSet,
        sequencer: Sequencer,
        velocity: f32,
        strategy: MovementStrategy,
    ) -> Self {
        let wrap = match kind {
            EntityKind::Obstacle => WrapPolicy::for_strategy(strategy.kind()),
            EntityKind::Player | EntityKind::Prop => WrapPolicy::Never,
        };
        let facing = strategy.facing().unwrap_or_default();
        Self {
            id,
            kind,
            pos,
            size: frames.size,
            facing,
            velocity,
            frame: sequencer.frame(),
            frames,
            sequencer,
            strategy,
            wrap,
        }
    }

    /// Arrow-key driven player using a facing frame list
    pub fn player(id: u32, pos: Vec2, frames: FrameSet, base_frames: usize, velocity: f32, frame_speed: f32) -> Self {
        Self::new(
            id,
            EntityKind::Player,
            pos,
            frames,
            Sequencer::facing(base_frames, frame_speed),
            velocity,
            MovementStrategy::from_kind(StrategyKind::PlayerInput, pos),
        )
    }

    /// Leftward-moving python with the given strategy
    pub fn obstacle(id: u32, pos: Vec2, frames: FrameSet, velocity: f32, kind: StrategyKind, frame_speed: f32) -> Self {
        let sequencer = Sequencer::looping(frames.len(), frame_speed);
        Self::new(
            id,
            EntityKind::Obstacle,
            pos,
            frames,
            sequencer,
            velocity,
            MovementStrategy::from_kind(kind, pos),
        )
    }

    /// Hovering prop that bobs in place, one sweep per animation cycle
    pub fn hovering_prop(id: u32, pos: Vec2, frames: FrameSet, frame_speed: f32) -> Self {
        let sequencer = Sequencer::oscillating(frames.len(), frame_speed);
        Self::new(
            id,
            EntityKind::Prop,
            pos,
            frames,
            sequencer,
            0.0,
            MovementStrategy::from_kind(StrategyKind::VerticalOscillation, pos),
        )
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Image to draw this tick
    pub fn current_frame(&self) -> FrameHandle {
        self.frames.frames[self.frame.min(self.frames.len().saturating_sub(1))]
    }

    pub fn frame_index(&self) -> usize {
        self.frame
    }

    pub fn strategy(&self) -> &MovementStrategy {
        &self.strategy
    }

    pub fn wrap_policy(&self) -> WrapPolicy {
        self.wrap
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Advance one tick: move, then animate with the facing the move
    /// produced, then wrap. Returns the edge the entity wrapped from.
    pub fn update(&mut self, held: HeldDirections, viewport: Viewport, rng: &mut impl Rng) -> Option<WrapEdge> {
        let ctx = MoveContext {
            velocity: self.velocity,
            size: self.size,
            viewport,
            held,
            anim_index: self.sequencer.index(),
            anim_len: self.sequencer.len(),
            rising: self.sequencer.rising(),
        };
        self.pos = self.strategy.advance(self.pos, &ctx);
        if let Some(facing) = self.strategy.facing() {
            self.facing = facing;
        }

        self.frame = self.sequencer.advance(self.facing).frame;

        let (edge, pos) = self.wrap.apply(self.pos, self.size, self.velocity, viewport, rng)?;
        log::debug!("entity {} wrapped from {:?} to ({:.0}, {:.0})", self.id, edge, pos.x, pos.y);
        self.pos = pos;
        Some(edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::animation::{facing_ping_pong, ping_pong};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn frames(images: Vec<u16>, size: Vec2) -> FrameSet {
        FrameSet {
            frames: images.into_iter().map(|image| FrameHandle { sheet: 0, image }).collect(),
            size,
        }
    }

    #[test]
    fn test_linear_obstacle_wraps_left_edge() {
        let mut rng = Pcg32::seed_from_u64(1);
        let viewport = Viewport::default();
        let mut python = Entity::obstacle(
            1,
            Vec2::new(-40.0, 200.0),
            frames(ping_pong(2), Vec2::new(40.0, 40.0)),
            4.0,
            StrategyKind::Linear,
            0.02,
        );
        let edge = python.update(HeldDirections::NONE, viewport, &mut rng);
        assert_eq!(edge, Some(WrapEdge::Left));
        assert_eq!(python.pos.x, 1120.0);
        assert!((0.0..=660.0).contains(&python.pos.y));
    }

    #[test]
    fn test_player_never_wraps() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut player = Entity::player(
            1,
            Vec2::new(0.0, 350.0),
            frames(facing_ping_pong(2), Vec2::new(60.0, 50.0)),
            2,
            6.0,
            0.1,
        );
        let held = HeldDirections {
            left: true,
            ..HeldDirections::NONE
        };
        for _ in 0..10 {
            assert_eq!(player.update(held, Viewport::default(), &mut rng), None);
        }
        assert_eq!(player.pos.x, 0.0);
    }

    #[test]
    fn test_facing_flip_shows_in_same_update() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut player = Entity::player(
            1,
            Vec2::new(300.0, 350.0),
            frames(facing_ping_pong(3), Vec2::new(60.0, 50.0)),
            3,
            4.0,
            0.1,
        );
        let right = HeldDirections {
            right: true,
            ..HeldDirections::NONE
        };
        player.update(right, Viewport::default(), &mut rng);
        assert_eq!(player.facing, Facing::Right);
        assert!(player.current_frame().image <= 3);

        let left = HeldDirections {
            left: true,
            ..HeldDirections::NONE
        };
        player.update(left, Viewport::default(), &mut rng);
        assert_eq!(player.facing, Facing::Left);
        // left half of the list holds images 4..=6
        assert!(player.current_frame().image >= 4);
    }

    #[test]
    fn test_hovering_prop_bobs_around_anchor() {
        let mut rng = Pcg32::seed_from_u64(3);
        let anchor = Vec2::new(461.0, 256.0);
        let mut bird = Entity::hovering_prop(9, anchor, frames(ping_pong(7), Vec2::new(90.0, 80.0)), 0.2);
        let mut max_offset: f32 = 0.0;
        for _ in 0..200 {
            assert_eq!(bird.update(HeldDirections::NONE, Viewport::default(), &mut rng), None);
            assert_eq!(bird.pos.x, anchor.x);
            max_offset = max_offset.max((bird.pos.y - anchor.y).abs());
        }
        assert!(max_offset > 10.0);
        assert!(max_offset <= 15.0 + 1e-3);
    }
}
