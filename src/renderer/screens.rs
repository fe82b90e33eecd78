//! One draw function per game phase

use glam::Vec2;

use super::canvas::{BLACK, PixelBuf, Rgb, WHITE};
use super::shapes;
use crate::assets::SpriteCatalog;
use crate::highscores::HighScores;
use crate::platform::ScreenMap;
use crate::sim::collision::Aabb;
use crate::sim::entity::Entity;
use crate::sim::flow::{ButtonId, end_button, mode_buttons};
use crate::sim::state::{GameSession, PlayerName};

const MENU_BG: Rgb = Rgb(24, 60, 40);
const FIELD_BG: Rgb = Rgb(84, 168, 55);
const STORY_BG: Rgb = Rgb(250, 250, 250);
const OVERLAY: Rgb = Rgb(128, 128, 128);
const TITLE: Rgb = Rgb(245, 200, 66);
const INK: Rgb = Rgb(30, 30, 30);

/// Title line shared by the menus and the overlays
const GAME_TITLE: &str = "PYTHON MARATHON";

fn center_x(screen: &ScreenMap) -> f32 {
    screen.viewport.width / 2.0
}

pub fn introduction(buf: &mut PixelBuf, screen: &ScreenMap, name: &PlayerName) {
    buf.clear(MENU_BG);
    let cx = center_x(screen);
    shapes::label_centered(buf, screen, Vec2::new(cx, 120.0), GAME_TITLE, TITLE);
    shapes::label_centered(buf, screen, Vec2::new(cx, 280.0), "Enter your name:", WHITE);
    shapes::label_centered(buf, screen, Vec2::new(cx, 340.0), &format!("{name}_"), TITLE);
    shapes::label_centered(buf, screen, Vec2::new(cx, 480.0), "Press Enter to continue", WHITE);
}

pub fn difficulty_select(buf: &mut PixelBuf, screen: &ScreenMap, name: &PlayerName, best: &HighScores) {
    buf.clear(MENU_BG);
    let cx = center_x(screen);
    shapes::label_centered(buf, screen, Vec2::new(cx, 60.0), GAME_TITLE, TITLE);
    shapes::label_centered(buf, screen, Vec2::new(cx, 100.0), &format!("Choose a mode, {name}"), WHITE);

    for (i, button) in mode_buttons().iter().enumerate() {
        shapes::button(buf, screen, button, &format!("{} {}", i + 1, button.label));
        if let ButtonId::Mode(mode) = button.id {
            let line = match best.best_for(mode) {
                Some(record) => format!("Best: {} by {}", record.score, record.name),
                None => "Best: -".to_string(),
            };
            let below = button.bounds.pos + Vec2::new(button.bounds.size.x / 2.0, button.bounds.size.y + 8.0);
            shapes::label_centered(buf, screen, below, &line, WHITE);
        }
    }

    if let Some(top) = best.top_score() {
        shapes::label_centered(buf, screen, Vec2::new(914.0, 468.0), &format!("High score: {top}"), TITLE);
    }
}

pub fn story_delivery(buf: &mut PixelBuf, screen: &ScreenMap, session: &GameSession, catalog: &SpriteCatalog) {
    buf.clear(STORY_BG);
    if let Some(bird) = &session.story_bird {
        entity(buf, screen, bird, catalog);
    }
    let cx = center_x(screen);
    shapes::label_centered(
        buf,
        screen,
        Vec2::new(cx, 440.0),
        &format!("Tweet tweet!! Delivery for {}!!", session.name),
        INK,
    );
    shapes::label_centered(buf, screen, Vec2::new(cx, 500.0), "Press Enter to open it!!", INK);
}

pub fn story_letter(buf: &mut PixelBuf, screen: &ScreenMap, session: &GameSession) {
    buf.clear(STORY_BG);
    let paper = Aabb::new(Vec2::new(240.0, 80.0), Vec2::new(640.0, 540.0));
    shapes::rect(buf, screen, &paper, Rgb(245, 235, 200));

    let cx = center_x(screen);
    let lines = [
        format!("Dear {},", session.name),
        String::new(),
        "The pythons are loose in the meadow.".to_string(),
        "Run as far as you can and dodge".to_string(),
        "every one of them.".to_string(),
        String::new(),
        "Good luck!".to_string(),
    ];
    for (i, line) in lines.iter().enumerate() {
        shapes::label_centered(buf, screen, Vec2::new(cx, 140.0 + i as f32 * 50.0), line, INK);
    }
    shapes::label_centered(buf, screen, Vec2::new(cx, 560.0), "Press Enter to start", INK);
}

/// Gameplay scene with HUD
pub fn playing(buf: &mut PixelBuf, screen: &ScreenMap, session: &GameSession, catalog: &SpriteCatalog) {
    buf.clear(FIELD_BG);
    for obstacle in &session.obstacles {
        entity(buf, screen, obstacle, catalog);
    }
    entity(buf, screen, &session.player, catalog);
    for label in session.labels() {
        shapes::label(buf, screen, label.pos, &label.text, WHITE);
    }
}

pub fn paused(buf: &mut PixelBuf, screen: &ScreenMap) {
    overlay(buf, screen);
    shapes::label_centered(buf, screen, Vec2::new(center_x(screen), 365.0), "PAUSED", BLACK);
}

pub fn game_over(buf: &mut PixelBuf, screen: &ScreenMap, session: &GameSession) {
    overlay(buf, screen);
    let end = end_button();
    shapes::button(buf, screen, &end, end.label);
    let cx = center_x(screen);
    shapes::label_centered(buf, screen, Vec2::new(cx, 365.0), "GAME OVER", BLACK);
    shapes::label_centered(buf, screen, Vec2::new(cx, 420.0), &format!("Score: {}", session.score), BLACK);
}

/// Dim the scene and show the title, as both overlays do
fn overlay(buf: &mut PixelBuf, screen: &ScreenMap) {
    buf.tint(OVERLAY, 150);
    shapes::label_centered(buf, screen, Vec2::new(center_x(screen), 94.0), GAME_TITLE, TITLE);
}

fn entity(buf: &mut PixelBuf, screen: &ScreenMap, entity: &Entity, catalog: &SpriteCatalog) {
    let frame = entity.current_frame();
    match catalog.sheet_by_id(frame.sheet) {
        Some(sheet) => shapes::sprite(buf, screen, entity, sheet),
        None => log::debug!("entity {} has unknown sheet {}", entity.id, frame.sheet),
    }
}
