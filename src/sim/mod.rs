//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, fixed per-tick deltas
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod animation;
pub mod collision;
pub mod entity;
pub mod flow;
pub mod movement;
pub mod respawn;
pub mod state;
pub mod tick;

pub use animation::{FrameStep, Sequencer, facing_ping_pong, ping_pong};
pub use collision::{Aabb, overlapping};
pub use entity::{Entity, EntityKind, Facing, FrameHandle, FrameSet};
pub use flow::{Button, ButtonId, FlowOutcome, Game, MenuInput, end_button, mode_buttons};
pub use movement::{HeldDirections, MoveContext, Movement, MovementStrategy, StrategyKind};
pub use respawn::{SpawnRange, WrapEdge, WrapPolicy};
pub use state::{Difficulty, GamePhase, GameSession, HudLabel, PlayerName, StoryScene, Viewport};
pub use tick::{GameEvent, HudSlot, TickInput, TickReport, tick};
