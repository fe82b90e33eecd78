//! Procedural sprite shapes
//!
//! Sheets carry no bitmaps; each frame is drawn from the sheet palette.
//! The image number selects a pose so animation stays visible, and
//! left-facing images mirror the detail side.

use glam::Vec2;

use super::canvas::{PixelBuf, Rgb, WHITE};
use crate::assets::SheetSpec;
use crate::platform::ScreenMap;
use crate::sim::collision::Aabb;
use crate::sim::entity::{Entity, Facing};
use crate::sim::flow::Button;

const OUTLINE: Rgb = Rgb(20, 20, 20);
const BUTTON_FILL: Rgb = Rgb(60, 60, 90);
const BUTTON_EDGE: Rgb = Rgb(220, 220, 240);

/// Pose index within a facing half: 0-based, wraps at the base count
fn pose(image: u16, base_frames: usize) -> usize {
    let base = base_frames.max(1);
    (image.saturating_sub(1) as usize) % base
}

/// Draw one entity's current frame
pub fn sprite(buf: &mut PixelBuf, screen: &ScreenMap, entity: &Entity, sheet: &SheetSpec) {
    let (x, y) = screen.world_to_pixel(entity.pos);
    let (w, h) = screen.extent_to_pixels(entity.size);
    let frame = entity.current_frame();
    let pose = pose(frame.image, sheet.frames);
    let body = Rgb::from_array(sheet.color);
    let accent = Rgb::from_array(sheet.accent);

    // Python: long body with a travelling wiggle
    if w > h * 2 {
        let segments = w.max(1);
        for dx in 0..segments {
            let phase = (dx as f32 / segments as f32 + pose as f32 * 0.5) * std::f32::consts::TAU;
            let lift = (phase.sin() * h as f32 * 0.25).round() as i32;
            buf.fill_rect(x + dx, y + h / 4 + lift, 1, (h / 2).max(1), body);
        }
        // Head leads to the left
        buf.fill_rect(x, y + h / 4, (w / 8).max(1), (h / 2).max(1), accent);
        buf.set(x + 1, y + h / 3, OUTLINE);
        return;
    }

    let bob = if pose % 2 == 1 { 1 } else { 0 };
    buf.fill_ellipse(x, y + bob, w, h - bob, body);

    // Eye on the leading side
    let eye_x = match entity.facing {
        Facing::Right => x + w * 3 / 4 - 1,
        Facing::Left => x + w / 4,
    };
    let eye_y = y + h / 3 + bob;
    buf.fill_rect(eye_x, eye_y, (w / 6).max(1), (h / 6).max(1), accent);
    buf.set(eye_x, eye_y, OUTLINE);

    // Feet alternate with the pose
    let foot = (w / 5).max(1);
    let offset = (pose as i32 % 2) * foot / 2;
    buf.fill_rect(x + w / 4 - offset, y + h - 1, foot, 1, accent);
    buf.fill_rect(x + w * 3 / 4 - foot + offset, y + h - 1, foot, 1, accent);
}

/// Filled button with a centred label
pub fn button(buf: &mut PixelBuf, screen: &ScreenMap, button: &Button, caption: &str) {
    rect(buf, screen, &button.bounds, BUTTON_FILL);
    let (x, y) = screen.world_to_pixel(button.bounds.pos);
    let (w, h) = screen.extent_to_pixels(button.bounds.size);
    buf.stroke_rect(x, y, w, h, BUTTON_EDGE);

    let center = button.bounds.pos + button.bounds.size / 2.0;
    let (col, row) = screen.world_to_cell(center);
    buf.text_centered(col, row, caption, WHITE);
}

pub fn rect(buf: &mut PixelBuf, screen: &ScreenMap, bounds: &Aabb, c: Rgb) {
    let (x, y) = screen.world_to_pixel(bounds.pos);
    let (w, h) = screen.extent_to_pixels(bounds.size);
    buf.fill_rect(x, y, w, h, c);
}

/// Text whose top-left sits at a world position
pub fn label(buf: &mut PixelBuf, screen: &ScreenMap, pos: Vec2, text: &str, fg: Rgb) {
    let (col, row) = screen.world_to_cell(pos);
    buf.text(col, row, text, fg);
}

/// Text centred horizontally at a world position
pub fn label_centered(buf: &mut PixelBuf, screen: &ScreenMap, pos: Vec2, text: &str, fg: Rgb) {
    let (col, row) = screen.world_to_cell(pos);
    buf.text_centered(col, row, text, fg);
}
