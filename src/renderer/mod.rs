//! Terminal rendering module
//!
//! Draws the current phase into a half-block pixel canvas scaled from the
//! world viewport, then writes it to the terminal in one pass.

pub mod canvas;
pub mod screens;
pub mod shapes;

pub use canvas::{PixelBuf, Rgb};

use std::io::{self, Write};

use crate::highscores::HighScores;
use crate::platform::ScreenMap;
use crate::sim::flow::Game;
use crate::sim::state::{GamePhase, StoryScene};

#[derive(Debug)]
pub struct TerminalRenderer {
    screen: ScreenMap,
    buf: PixelBuf,
}

impl TerminalRenderer {
    pub fn new(screen: ScreenMap) -> Self {
        let (w, h) = screen.pixel_size();
        Self {
            screen,
            buf: PixelBuf::new(w, h),
        }
    }

    pub fn screen(&self) -> &ScreenMap {
        &self.screen
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.screen = ScreenMap::new(cols, rows, self.screen.viewport);
        let (w, h) = self.screen.pixel_size();
        self.buf.resize(w, h);
        log::debug!("Renderer resized to {cols}x{rows} cells");
    }

    /// Compose the frame for the game's current phase
    pub fn draw(&mut self, game: &Game, best: &HighScores, fps: Option<f32>) {
        let screen = self.screen;
        let buf = &mut self.buf;
        let catalog = game.catalog();

        match (game.phase(), game.session()) {
            (GamePhase::Introduction, _) => screens::introduction(buf, &screen, game.name()),
            (GamePhase::DifficultySelect, _) => screens::difficulty_select(buf, &screen, game.name(), best),
            (GamePhase::Story(StoryScene::Delivery), Some(session)) => {
                screens::story_delivery(buf, &screen, session, catalog)
            }
            (GamePhase::Story(StoryScene::Letter), Some(session)) => screens::story_letter(buf, &screen, session),
            (GamePhase::Playing, Some(session)) => screens::playing(buf, &screen, session, catalog),
            (GamePhase::Paused, Some(session)) => {
                screens::playing(buf, &screen, session, catalog);
                screens::paused(buf, &screen);
            }
            (GamePhase::GameOver, Some(session)) => {
                screens::playing(buf, &screen, session, catalog);
                screens::game_over(buf, &screen, session);
            }
            (phase, None) => log::warn!("No session to draw for {phase:?}"),
        }

        if let Some(fps) = fps {
            let text = format!("{fps:.0} FPS");
            let col = buf.width() as i32 - text.len() as i32;
            buf.text(col, 0, &text, canvas::WHITE);
        }
    }

    pub fn present(&self, out: &mut impl Write) -> io::Result<()> {
        self.buf.render(out)
    }

    pub fn canvas(&self) -> &PixelBuf {
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SpriteCatalog;
    use crate::sim::flow::MenuInput;
    use crate::sim::state::{Difficulty, PlayerName, Viewport};

    fn row_text(buf: &PixelBuf, row: usize) -> String {
        (0..buf.width()).map(|c| buf.char_at(c, row).unwrap_or(' ')).collect()
    }

    fn screen_text(buf: &PixelBuf) -> String {
        (0..buf.height() / 2).map(|r| row_text(buf, r)).collect::<Vec<_>>().join("\n")
    }

    fn renderer() -> TerminalRenderer {
        TerminalRenderer::new(ScreenMap::new(112, 35, Viewport::default()))
    }

    #[test]
    fn test_intro_shows_name() {
        let mut game = Game::new(SpriteCatalog::builtin().unwrap(), Viewport::default(), 1);
        game.handle_input(MenuInput::Char('Z')).unwrap();

        let mut r = renderer();
        r.draw(&game, &HighScores::new(), None);
        assert!(screen_text(r.canvas()).contains("Z_"));
    }

    #[test]
    fn test_story_and_hud_text() {
        let mut game = Game::new(SpriteCatalog::builtin().unwrap(), Viewport::default(), 1)
            .with_name(PlayerName::parse("Ana"));
        game.handle_input(MenuInput::Choose(Difficulty::Story)).unwrap();

        let mut r = renderer();
        r.draw(&game, &HighScores::new(), None);
        assert!(screen_text(r.canvas()).contains("Delivery for Ana!!"));

        game.handle_input(MenuInput::Enter).unwrap();
        game.handle_input(MenuInput::Enter).unwrap();
        r.draw(&game, &HighScores::new(), Some(29.6));
        let text = screen_text(r.canvas());
        assert!(text.contains("Score: 0"));
        assert!(text.contains("Health: 3"));
        assert!(row_text(r.canvas(), 0).trim_end().ends_with("30 FPS"));
    }

    #[test]
    fn test_resize_rebuilds_canvas() {
        let mut r = renderer();
        r.resize(40, 10);
        assert_eq!(r.canvas().width(), 40);
        assert_eq!(r.canvas().height(), 20);
        assert_eq!(r.screen().cols, 40);
    }
}
