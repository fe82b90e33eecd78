//! Game settings and preferences
//!
//! Stored as pretty JSON next to the game. A missing or unreadable file
//! never stops the game; defaults are used instead.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{FPS, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::state::Viewport;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "serpent_sprint.json";

/// Error type for loading and saving settings
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
    Validation(String),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "I/O error: {}", e),
            SettingsError::Serialization(e) => write!(f, "Serialization error: {}", e),
            SettingsError::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Serialization(e)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === World ===
    /// Play area width (world pixels)
    pub viewport_width: f32,
    /// Play area height (world pixels)
    pub viewport_height: f32,
    /// Frame-rate cap; one simulation tick per frame
    pub fps: u32,

    // === Persistence ===
    /// CSV score log
    pub score_log: PathBuf,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport_width: SCREEN_WIDTH,
            viewport_height: SCREEN_HEIGHT,
            fps: FPS,

            score_log: PathBuf::from("scores.csv"),

            show_fps: false,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Load from `path`, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if !(self.viewport_width >= 1.0 && self.viewport_height >= 1.0) {
            return Err(SettingsError::Validation(format!(
                "viewport {}x{} is too small",
                self.viewport_width, self.viewport_height
            )));
        }
        if self.fps == 0 {
            return Err(SettingsError::Validation("fps must be positive".to_string()));
        }
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.viewport_width,
            height: self.viewport_height,
        }
    }

    /// Target wall-clock time per frame
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }

    /// Effective sound-effect gain (0 when muted)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }
}
