//! Scene flow
//!
//! Menu screens live outside any session: the introduction collects a
//! name, the difficulty screen starts a session. From then on the
//! session's own phase drives the flow until its End button hands back a
//! score record and the game returns to the difficulty screen.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Aabb;
use super::state::{Difficulty, GamePhase, GameSession, PlayerName, StoryScene, Viewport};
use super::tick::{TickInput, TickReport, tick};
use crate::assets::{AssetError, SpriteCatalog};
use crate::highscores::ScoreRecord;

/// Size of the four mode buttons
pub const MODE_BUTTON_SIZE: Vec2 = Vec2::new(250.0, 120.0);
/// Top-left of the game-over End button
pub const END_BUTTON_POS: Vec2 = Vec2::new(442.0, 266.0);
pub const END_BUTTON_SIZE: Vec2 = Vec2::new(236.0, 70.0);

/// Menu-level input, already decoded from the terminal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuInput {
    /// Printable character typed
    Char(char),
    Backspace,
    Enter,
    /// Left click at a world position
    Click(Vec2),
    /// Keyboard shortcut for a mode button
    Choose(Difficulty),
}

/// Result of feeding one input to the flow
#[derive(Debug, Clone, PartialEq)]
pub enum FlowOutcome {
    Unchanged,
    NameEdited,
    Advanced(GamePhase),
    SessionStarted(Difficulty),
    /// End pressed on the game-over screen; persist this record
    SessionFinished(ScoreRecord),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    Mode(Difficulty),
    End,
}

/// A clickable rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Button {
    pub id: ButtonId,
    pub label: &'static str,
    pub bounds: Aabb,
}

impl Button {
    pub fn hit(&self, point: Vec2) -> bool {
        self.bounds.contains(point)
    }
}

/// Buttons of the difficulty screen
pub fn mode_buttons() -> [Button; 4] {
    let mode = |d: Difficulty, x: f32, y: f32| Button {
        id: ButtonId::Mode(d),
        label: d.as_str(),
        bounds: Aabb::new(Vec2::new(x, y), MODE_BUTTON_SIZE),
    };
    [
        mode(Difficulty::Easy, 80.0, 160.0),
        mode(Difficulty::Medium, 80.0, 314.0),
        mode(Difficulty::Hard, 80.0, 468.0),
        mode(Difficulty::Story, 789.0, 160.0),
    ]
}

pub fn end_button() -> Button {
    Button {
        id: ButtonId::End,
        label: "End",
        bounds: Aabb::new(END_BUTTON_POS, END_BUTTON_SIZE),
    }
}

/// Top-level game: menus plus at most one live session
#[derive(Debug)]
pub struct Game {
    menu_phase: GamePhase,
    name: PlayerName,
    session: Option<GameSession>,
    catalog: SpriteCatalog,
    viewport: Viewport,
    seeder: Pcg32,
}

impl Game {
    /// Start at the introduction screen. Each session draws its own seed
    /// from a generator seeded with `seed`.
    pub fn new(catalog: SpriteCatalog, viewport: Viewport, seed: u64) -> Self {
        Self {
            menu_phase: GamePhase::Introduction,
            name: PlayerName::new(),
            session: None,
            catalog,
            viewport,
            seeder: Pcg32::seed_from_u64(seed),
        }
    }

    /// Pre-fill the name. A non-empty name skips the introduction.
    pub fn with_name(mut self, name: PlayerName) -> Self {
        if !name.is_empty() {
            self.menu_phase = GamePhase::DifficultySelect;
        }
        self.name = name;
        self
    }

    pub fn phase(&self) -> GamePhase {
        self.session.as_ref().map_or(self.menu_phase, |s| s.phase)
    }

    pub fn name(&self) -> &PlayerName {
        &self.name
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn catalog(&self) -> &SpriteCatalog {
        &self.catalog
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Advance the live session, if any
    pub fn tick(&mut self, input: &TickInput) -> TickReport {
        match self.session.as_mut() {
            Some(session) => tick(session, input),
            None => TickReport::default(),
        }
    }

    /// Apply one menu input. Only session construction can fail.
    pub fn handle_input(&mut self, input: MenuInput) -> Result<FlowOutcome, AssetError> {
        let outcome = match (self.phase(), input) {
            (GamePhase::Introduction, MenuInput::Char(c)) => edited(self.name.push(c)),
            (GamePhase::Introduction, MenuInput::Backspace) => edited(self.name.pop()),
            (GamePhase::Introduction, MenuInput::Enter) if !self.name.is_empty() => {
                self.menu_phase = GamePhase::DifficultySelect;
                FlowOutcome::Advanced(GamePhase::DifficultySelect)
            }

            (GamePhase::DifficultySelect, MenuInput::Choose(d)) => self.start(d)?,
            (GamePhase::DifficultySelect, MenuInput::Click(p)) => {
                match mode_buttons().iter().find(|b| b.hit(p)).map(|b| b.id) {
                    Some(ButtonId::Mode(d)) => self.start(d)?,
                    _ => FlowOutcome::Unchanged,
                }
            }

            (GamePhase::Story(scene), MenuInput::Enter) => {
                let next = match scene {
                    StoryScene::Delivery => GamePhase::Story(StoryScene::Letter),
                    StoryScene::Letter => GamePhase::Playing,
                };
                match self.session.as_mut() {
                    Some(session) => {
                        session.phase = next;
                        log::info!("Story advanced to {next:?}");
                        FlowOutcome::Advanced(next)
                    }
                    None => FlowOutcome::Unchanged,
                }
            }

            (GamePhase::GameOver, MenuInput::Enter) => self.finish(),
            (GamePhase::GameOver, MenuInput::Click(p)) if end_button().hit(p) => self.finish(),

            _ => FlowOutcome::Unchanged,
        };
        Ok(outcome)
    }

    fn start(&mut self, difficulty: Difficulty) -> Result<FlowOutcome, AssetError> {
        let seed = self.seeder.random::<u64>();
        let session = GameSession::new(self.name.clone(), difficulty, self.viewport, &self.catalog, seed)?;
        self.session = Some(session);
        Ok(FlowOutcome::SessionStarted(difficulty))
    }

    fn finish(&mut self) -> FlowOutcome {
        let Some(session) = self.session.take() else {
            return FlowOutcome::Unchanged;
        };
        self.menu_phase = GamePhase::DifficultySelect;
        let record = ScoreRecord::new(session.name.as_str(), session.score, session.difficulty);
        log::info!("Session finished: {} scored {}", record.name, record.score);
        FlowOutcome::SessionFinished(record)
    }
}

fn edited(changed: bool) -> FlowOutcome {
    if changed {
        FlowOutcome::NameEdited
    } else {
        FlowOutcome::Unchanged
    }
}
