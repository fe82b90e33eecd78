//! Terminal input
//!
//! Terminals report key presses but rarely releases, so "held" is inferred:
//! a key counts as held if its last press or repeat arrived within
//! `HOLD_WINDOW` frames. Terminals that support the kitty keyboard protocol
//! also send releases, which drop the key immediately.

use std::collections::HashMap;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use super::ScreenMap;
use crate::sim::flow::MenuInput;
use crate::sim::movement::HeldDirections;
use crate::sim::state::{Difficulty, GamePhase};

/// Frames a key stays held without a fresh press/repeat event. OS key
/// repeat runs at 15 Hz or faster, which refreshes well inside 4 frames.
pub const HOLD_WINDOW: u64 = 4;

/// What a single terminal event means to the game
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    /// Leave the program
    Quit,
    /// Space during play
    TogglePause,
    Menu(MenuInput),
    /// Terminal resized to `cols × rows`
    Resize(u16, u16),
}

/// Last frame each key was seen
#[derive(Debug, Default)]
pub struct KeyTracker {
    last_seen: HashMap<KeyCode, u64>,
    frame: u64,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame; call once before draining events
    pub fn begin_frame(&mut self) {
        self.frame += 1;
        let frame = self.frame;
        self.last_seen
            .retain(|_, &mut last| frame.saturating_sub(last) <= HOLD_WINDOW);
    }

    pub fn observe(&mut self, key: &KeyEvent) {
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.last_seen.insert(key.code, self.frame);
            }
            KeyEventKind::Release => {
                self.last_seen.remove(&key.code);
            }
        }
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.last_seen
            .get(&code)
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    pub fn held_directions(&self) -> HeldDirections {
        HeldDirections {
            up: self.is_held(KeyCode::Up),
            down: self.is_held(KeyCode::Down),
            left: self.is_held(KeyCode::Left),
            right: self.is_held(KeyCode::Right),
        }
    }

    /// Forget everything (e.g. when a session ends)
    pub fn clear(&mut self) {
        self.last_seen.clear();
    }
}

/// Translate one terminal event for the current phase. Arrow keys map to
/// nothing here; they only feed the `KeyTracker`.
pub fn map_event(event: &Event, screen: &ScreenMap, phase: GamePhase) -> Option<InputAction> {
    match event {
        Event::Key(key) => map_key(key, phase),
        Event::Mouse(mouse) => map_mouse(mouse, screen),
        Event::Resize(cols, rows) => Some(InputAction::Resize(*cols, *rows)),
        _ => None,
    }
}

fn map_key(key: &KeyEvent, phase: GamePhase) -> Option<InputAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
    {
        return Some(InputAction::Quit);
    }

    match (phase, key.code) {
        (GamePhase::Playing | GamePhase::Paused, KeyCode::Char(' ')) => Some(InputAction::TogglePause),
        (GamePhase::Introduction, KeyCode::Char(c))
            if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(InputAction::Menu(MenuInput::Char(c)))
        }
        (GamePhase::Introduction, KeyCode::Backspace) => Some(InputAction::Menu(MenuInput::Backspace)),
        (GamePhase::DifficultySelect, KeyCode::Char(c)) => {
            shortcut(c).map(|d| InputAction::Menu(MenuInput::Choose(d)))
        }
        (_, KeyCode::Enter) => Some(InputAction::Menu(MenuInput::Enter)),
        _ => None,
    }
}

/// `1`–`4` pick a mode in button order
fn shortcut(c: char) -> Option<Difficulty> {
    let index = c.to_digit(10)?.checked_sub(1)?;
    Difficulty::ALL.get(index as usize).copied()
}

fn map_mouse(mouse: &MouseEvent, screen: &ScreenMap) -> Option<InputAction> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(InputAction::Menu(MenuInput::Click(
            screen.cell_to_world(mouse.column, mouse.row),
        ))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(key(code, KeyEventKind::Press))
    }

    fn screen() -> ScreenMap {
        ScreenMap::new(112, 35, Viewport::default())
    }

    #[test]
    fn test_hold_window_expires() {
        let mut tracker = KeyTracker::new();
        tracker.begin_frame();
        tracker.observe(&key(KeyCode::Left, KeyEventKind::Press));
        assert!(tracker.held_directions().left);

        for _ in 0..HOLD_WINDOW {
            tracker.begin_frame();
        }
        assert!(tracker.is_held(KeyCode::Left));
        tracker.begin_frame();
        assert!(!tracker.is_held(KeyCode::Left));
    }

    #[test]
    fn test_release_drops_key() {
        let mut tracker = KeyTracker::new();
        tracker.begin_frame();
        tracker.observe(&key(KeyCode::Up, KeyEventKind::Press));
        tracker.observe(&key(KeyCode::Right, KeyEventKind::Press));
        tracker.observe(&key(KeyCode::Up, KeyEventKind::Release));
        let held = tracker.held_directions();
        assert!(!held.up);
        assert!(held.right);
    }

    #[test]
    fn test_name_entry_keys() {
        let s = screen();
        assert_eq!(
            map_event(&press(KeyCode::Char('1')), &s, GamePhase::Introduction),
            Some(InputAction::Menu(MenuInput::Char('1')))
        );
        assert_eq!(
            map_event(&press(KeyCode::Backspace), &s, GamePhase::Introduction),
            Some(InputAction::Menu(MenuInput::Backspace))
        );
        assert_eq!(
            map_event(&press(KeyCode::Enter), &s, GamePhase::Introduction),
            Some(InputAction::Menu(MenuInput::Enter))
        );
    }

    #[test]
    fn test_difficulty_shortcuts() {
        let s = screen();
        assert_eq!(
            map_event(&press(KeyCode::Char('4')), &s, GamePhase::DifficultySelect),
            Some(InputAction::Menu(MenuInput::Choose(Difficulty::Story)))
        );
        assert_eq!(map_event(&press(KeyCode::Char('5')), &s, GamePhase::DifficultySelect), None);
        assert_eq!(map_event(&press(KeyCode::Char('0')), &s, GamePhase::DifficultySelect), None);
    }

    #[test]
    fn test_space_pauses_only_in_play() {
        let s = screen();
        assert_eq!(
            map_event(&press(KeyCode::Char(' ')), &s, GamePhase::Paused),
            Some(InputAction::TogglePause)
        );
        assert_eq!(map_event(&press(KeyCode::Char(' ')), &s, GamePhase::GameOver), None);
        assert_eq!(map_event(&press(KeyCode::Left), &s, GamePhase::Playing), None);
    }

    #[test]
    fn test_quit_and_release_filtering() {
        let s = screen();
        assert_eq!(map_event(&press(KeyCode::Esc), &s, GamePhase::Playing), Some(InputAction::Quit));
        let ctrl_c = Event::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        });
        assert_eq!(map_event(&ctrl_c, &s, GamePhase::Introduction), Some(InputAction::Quit));

        let release = Event::Key(key(KeyCode::Enter, KeyEventKind::Release));
        assert_eq!(map_event(&release, &s, GamePhase::Introduction), None);
    }

    #[test]
    fn test_left_click_maps_to_world() {
        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 15,
            row: 10,
            modifiers: KeyModifiers::NONE,
        });
        match map_event(&click, &screen(), GamePhase::DifficultySelect) {
            Some(InputAction::Menu(MenuInput::Click(p))) => {
                assert!((p.x - 155.0).abs() < 1e-3);
                assert!((p.y - 210.0).abs() < 1e-3);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
