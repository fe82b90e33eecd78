//! Serpent Sprint - a side-scrolling python-dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (animation, movement, wrap, collisions, scene flow)
//! - `assets`: Sprite manifest loading
//! - `renderer`: Terminal rendering
//! - `platform`: Terminal input and frame pacing
//! - `highscores`: CSV score log and leaderboard
//! - `audio`: Sound effect queue played through the terminal bell
//! - `settings`: User configuration

pub mod assets;
pub mod audio;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use assets::{AssetError, SpriteCatalog};
pub use highscores::{HighScores, ScoreLog, ScoreRecord};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Play area dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 1120.0;
    pub const SCREEN_HEIGHT: f32 = 700.0;

    /// Frame-rate cap; the simulation advances one tick per frame
    pub const FPS: u32 = 30;

    /// Player defaults
    pub const START_HEALTH: u8 = 3;
    pub const PLAYER_START_X: f32 = 0.0;
    pub const PLAYER_START_Y: f32 = 350.0;
    pub const PLAYER_FRAME_SPEED: f32 = 0.1;

    /// Obstacle defaults
    pub const OBSTACLE_SHEET: &str = "Python";
    pub const OBSTACLE_FRAME_SPEED: f32 = 0.02;
    pub const OBSTACLE_MIN_VELOCITY: u32 = 3;
    pub const OBSTACLE_MAX_VELOCITY: u32 = 5;
    /// Leftmost x for obstacles placed at session start
    pub const OBSTACLE_INITIAL_MIN_X: f32 = 600.0;

    /// Vertical speed of the diagonal strategies (pixels/tick)
    pub const DIAGONAL_DY: f32 = 2.0;
    /// Sine wavelength factor: Δy = v·sin(π·x / (SINE_PERIOD·v))
    pub const SINE_PERIOD: f32 = 40.0;
    /// Peak offset of the vertical oscillation (pixels)
    pub const OSCILLATION_AMPLITUDE: f32 = 15.0;

    /// Longest accepted player name (characters)
    pub const MAX_NAME_LEN: usize = 8;

    /// Story-mode letter bird
    pub const STORY_BIRD_SHEET: &str = "LetterBird";
    pub const STORY_BIRD_X: f32 = 461.0;
    pub const STORY_BIRD_Y: f32 = 256.0;
    pub const STORY_BIRD_FRAME_SPEED: f32 = 0.2;
}
