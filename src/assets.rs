//! Sprite manifest
//!
//! Sheets are described in a small JSON manifest rather than image files:
//! each sheet has a base frame count, a rendered size and a palette the
//! terminal renderer draws procedural shapes with. The built-in manifest is
//! embedded at compile time.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::animation::{facing_ping_pong, ping_pong};
use crate::sim::entity::{FrameHandle, FrameSet};

const BUILTIN_MANIFEST: &str = include_str!("../assets/sprites.json");

/// Error type for manifest loading and lookups
#[derive(Debug)]
pub enum AssetError {
    /// Manifest is not valid JSON for the expected shape
    Parse(String),
    /// A sheet the game needs is not in the manifest
    MissingSheet(String),
    /// Manifest parsed but contains unusable values
    Validation(String),
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetError::Parse(msg) => write!(f, "Manifest parse error: {}", msg),
            AssetError::MissingSheet(name) => write!(f, "Missing sprite sheet: {}", name),
            AssetError::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for AssetError {}

impl From<serde_json::Error> for AssetError {
    fn from(e: serde_json::Error) -> Self {
        AssetError::Parse(e.to_string())
    }
}

/// How a sheet's base images are ordered into a frame list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLayout {
    /// `1..=n` then back down, for looping and oscillating sprites
    PingPong,
    /// Right-facing ping-pong followed by its left-facing mirror
    Facing,
}

/// One sprite sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetSpec {
    pub name: String,
    /// Base (distinct) images per facing
    pub frames: usize,
    /// Rendered size in world pixels
    pub width: f32,
    pub height: f32,
    /// Body colour (RGB)
    pub color: [u8; 3],
    /// Detail colour (eyes, stripes)
    #[serde(default = "default_accent")]
    pub accent: [u8; 3],
}

fn default_accent() -> [u8; 3] {
    [255, 255, 255]
}

impl SheetSpec {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// HUD font metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub name: String,
    pub size: u32,
    pub glyph_width: f32,
    pub glyph_height: f32,
}

impl FontSpec {
    /// World-pixel cell of one character
    pub fn glyph_size(&self) -> Vec2 {
        Vec2::new(self.glyph_width, self.glyph_height)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Manifest {
    sheets: Vec<SheetSpec>,
    font: FontSpec,
}

/// All sprite sheets known to the game, indexed by position
#[derive(Debug, Clone)]
pub struct SpriteCatalog {
    sheets: Vec<SheetSpec>,
    font: FontSpec,
}

impl SpriteCatalog {
    /// Parse and validate a manifest
    pub fn from_json(json: &str) -> Result<Self, AssetError> {
        let manifest: Manifest = serde_json::from_str(json)?;
        if manifest.sheets.len() > u16::MAX as usize {
            return Err(AssetError::Validation("too many sheets".to_string()));
        }
        for (i, sheet) in manifest.sheets.iter().enumerate() {
            if sheet.frames == 0 || sheet.frames > u16::MAX as usize / 2 {
                return Err(AssetError::Validation(format!(
                    "sheet {} has {} frames",
                    sheet.name, sheet.frames
                )));
            }
            if !(sheet.width > 0.0 && sheet.height > 0.0) {
                return Err(AssetError::Validation(format!(
                    "sheet {} has size {}x{}",
                    sheet.name, sheet.width, sheet.height
                )));
            }
            if manifest.sheets[..i].iter().any(|s| s.name == sheet.name) {
                return Err(AssetError::Validation(format!("duplicate sheet {}", sheet.name)));
            }
        }
        if !(manifest.font.glyph_width > 0.0 && manifest.font.glyph_height > 0.0) {
            return Err(AssetError::Validation("font glyph size must be positive".to_string()));
        }

        log::info!("Loaded sprite manifest: {} sheets", manifest.sheets.len());
        Ok(Self {
            sheets: manifest.sheets,
            font: manifest.font,
        })
    }

    /// The manifest compiled into the binary
    pub fn builtin() -> Result<Self, AssetError> {
        Self::from_json(BUILTIN_MANIFEST)
    }

    fn position(&self, name: &str) -> Result<usize, AssetError> {
        self.sheets
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| AssetError::MissingSheet(name.to_string()))
    }

    pub fn sheet(&self, name: &str) -> Result<&SheetSpec, AssetError> {
        self.position(name).map(|i| &self.sheets[i])
    }

    pub fn sheet_by_id(&self, id: u16) -> Option<&SheetSpec> {
        self.sheets.get(id as usize)
    }

    pub fn sheets(&self) -> &[SheetSpec] {
        &self.sheets
    }

    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    /// Frame list for `name` in the requested order
    pub fn frames(&self, name: &str, layout: FrameLayout) -> Result<FrameSet, AssetError> {
        let id = self.position(name)?;
        let spec = &self.sheets[id];
        let images = match layout {
            FrameLayout::PingPong => ping_pong(spec.frames),
            FrameLayout::Facing => facing_ping_pong(spec.frames),
        };
        Ok(FrameSet {
            frames: images
                .into_iter()
                .map(|image| FrameHandle {
                    sheet: id as u16,
                    image,
                })
                .collect(),
            size: spec.size(),
        })
    }
}
