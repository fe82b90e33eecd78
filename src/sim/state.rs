//! Game session state and core simulation types
//!
//! A session is one play-through, from difficulty selection to game over
//! or quit. It exclusively owns its entities, score, health and RNG.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::entity::{Entity, FrameSet};
use super::movement::StrategyKind;
use super::respawn::SpawnRange;
use crate::assets::{AssetError, FrameLayout, SpriteCatalog};
use crate::consts::*;

/// Play area size in world pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
        }
    }
}

/// Selected mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Story,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Story,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Story => "Story",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "story" => Some(Difficulty::Story),
            _ => None,
        }
    }

    /// Sprite sheet of the animal the player controls
    pub fn player_sheet(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Frog",
            Difficulty::Medium => "Rabbit",
            Difficulty::Hard => "Chick",
            Difficulty::Story => "LetterBird",
        }
    }

    /// Player speed (pixels/tick)
    pub fn player_velocity(&self) -> f32 {
        match self {
            Difficulty::Easy => 6.0,
            Difficulty::Medium => 9.0,
            Difficulty::Hard => 4.0,
            Difficulty::Story => 3.0,
        }
    }

    /// Pythons on screen at any time
    pub fn obstacle_count(&self) -> usize {
        match self {
            Difficulty::Easy => 4,
            Difficulty::Medium => 5,
            Difficulty::Hard => 6,
            Difficulty::Story => 4,
        }
    }
}

/// The two story-mode cutscenes, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoryScene {
    /// The letter bird arrives
    Delivery,
    /// The opened letter
    Letter,
}

/// Current screen of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Name entry
    Introduction,
    /// Mode buttons
    DifficultySelect,
    /// Story-mode cutscene
    Story(StoryScene),
    /// Active gameplay
    Playing,
    /// Updates blocked, overlay drawn
    Paused,
    /// Health ran out; only the End button works
    GameOver,
}

/// Player name: up to `MAX_NAME_LEN` printable characters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the printable prefix of `s`, capped at the maximum length
    pub fn parse(s: &str) -> Self {
        let mut name = Self::new();
        for c in s.chars() {
            name.push(c);
        }
        name
    }

    /// Append one character. Non-printable input and input past the cap
    /// are ignored; returns whether the name changed.
    pub fn push(&mut self, c: char) -> bool {
        if c.is_control() || self.len() >= MAX_NAME_LEN {
            return false;
        }
        self.0.push(c);
        true
    }

    /// Remove the last character; returns whether the name changed
    pub fn pop(&mut self) -> bool {
        self.0.pop().is_some()
    }

    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A line of HUD text with a collision box
#[derive(Debug, Clone, PartialEq)]
pub struct HudLabel {
    pub text: String,
    pub pos: Vec2,
    glyph: Vec2,
}

impl HudLabel {
    pub fn new(text: String, pos: Vec2, glyph: Vec2) -> Self {
        Self { text, pos, glyph }
    }

    pub fn set_text(&mut self, text: String) {
        self.text = text;
    }

    pub fn bounds(&self) -> Aabb {
        let chars = self.text.chars().count() as f32;
        Aabb::new(self.pos, Vec2::new(chars * self.glyph.x, self.glyph.y))
    }
}

/// One play-through
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub viewport: Viewport,
    pub name: PlayerName,
    pub difficulty: Difficulty,
    pub phase: GamePhase,
    /// Pass-bys survived; never decreases
    pub score: u32,
    /// Remaining hits; floors at 0
    pub health: u8,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Entity,
    /// Active obstacles (sorted by id)
    pub obstacles: Vec<Entity>,
    /// Story-mode cutscene bird
    pub story_bird: Option<Entity>,
    pub score_label: HudLabel,
    pub health_label: HudLabel,
    obstacle_frames: FrameSet,
    next_id: u32,
}

impl GameSession {
    /// Build a session for `difficulty`, placing the player and the
    /// initial pythons. Fails only if the catalog lacks a needed sheet.
    pub fn new(
        name: PlayerName,
        difficulty: Difficulty,
        viewport: Viewport,
        catalog: &SpriteCatalog,
        seed: u64,
    ) -> Result<Self, AssetError> {
        let player_sheet = catalog.sheet(difficulty.player_sheet())?;
        let player_frames = catalog.frames(difficulty.player_sheet(), FrameLayout::Facing)?;
        let obstacle_frames = catalog.frames(OBSTACLE_SHEET, FrameLayout::PingPong)?;

        let glyph = catalog.font().glyph_size();
        let score_label = HudLabel::new("Score: 0".to_string(), Vec2::ZERO, glyph);
        let health_label = HudLabel::new(
            format!("Health: {START_HEALTH}"),
            Vec2::new(0.0, 20.0 + glyph.y),
            glyph,
        );

        let player = Entity::player(
            1,
            Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            player_frames,
            player_sheet.frames,
            difficulty.player_velocity(),
            PLAYER_FRAME_SPEED,
        );

        let (phase, story_bird) = if difficulty == Difficulty::Story {
            let bird = Entity::hovering_prop(
                2,
                Vec2::new(STORY_BIRD_X, STORY_BIRD_Y),
                catalog.frames(STORY_BIRD_SHEET, FrameLayout::PingPong)?,
                STORY_BIRD_FRAME_SPEED,
            );
            (GamePhase::Story(StoryScene::Delivery), Some(bird))
        } else {
            (GamePhase::Playing, None)
        };

        let mut session = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            viewport,
            name,
            difficulty,
            phase,
            score: 0,
            health: START_HEALTH,
            time_ticks: 0,
            player,
            obstacles: Vec::new(),
            story_bird,
            score_label,
            health_label,
            obstacle_frames,
            next_id: 3,
        };

        // Narrow viewports collapse the band onto the right edge
        let band = SpawnRange::new(OBSTACLE_INITIAL_MIN_X.min(viewport.width), viewport.width);
        for _ in 0..difficulty.obstacle_count() {
            let x = band.sample(&mut session.rng);
            session.spawn_obstacle(x);
        }

        log::info!(
            "Session started: {} on {} (seed {seed})",
            session.name,
            difficulty.as_str()
        );
        Ok(session)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Disjoint borrows of everything the gameplay tick moves
    pub(crate) fn split_for_update(&mut self) -> (&mut Entity, &mut [Entity], &mut Pcg32) {
        (&mut self.player, &mut self.obstacles, &mut self.rng)
    }

    /// Disjoint borrows for the cutscene tick
    pub(crate) fn split_for_story(&mut self) -> (Option<&mut Entity>, &mut Pcg32) {
        (self.story_bird.as_mut(), &mut self.rng)
    }

    /// Spawn a fresh python at `x` with a random strategy, height and
    /// speed. Returns its id.
    pub fn spawn_obstacle(&mut self, x: f32) -> u32 {
        let id = self.next_entity_id();
        let size = self.obstacle_frames.size;
        let kind = StrategyKind::random_obstacle(&mut self.rng);
        let y = SpawnRange::new(0.0, self.viewport.height - size.y).sample(&mut self.rng);
        let velocity = self
            .rng
            .random_range(OBSTACLE_MIN_VELOCITY..=OBSTACLE_MAX_VELOCITY) as f32;

        log::debug!("Spawned obstacle {id}: {kind:?} at ({x:.0}, {y:.0}) v={velocity}");
        self.obstacles.push(Entity::obstacle(
            id,
            Vec2::new(x, y),
            self.obstacle_frames.clone(),
            velocity,
            kind,
            OBSTACLE_FRAME_SPEED,
        ));
        id
    }

    /// Destroy obstacle `id` and spawn a brand-new one at the right edge.
    /// Returns the replacement's id.
    pub fn replace_obstacle(&mut self, id: u32) -> Option<u32> {
        let idx = self.obstacles.iter().position(|o| o.id == id)?;
        self.obstacles.remove(idx);
        Some(self.spawn_obstacle(self.viewport.width))
    }

    pub fn refresh_score_label(&mut self) {
        self.score_label.set_text(format!("Score: {}", self.score));
    }

    pub fn refresh_health_label(&mut self) {
        self.health_label.set_text(format!("Health: {}", self.health));
    }

    /// HUD labels the player can overlap
    pub fn labels(&self) -> [&HudLabel; 2] {
        [&self.score_label, &self.health_label]
    }
}
