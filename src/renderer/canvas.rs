//! Half-block pixel canvas
//!
//! Every terminal cell shows two pixels: the upper one as the foreground
//! of `▀`, the lower one as the background. Text is kept on a separate
//! cell layer and printed over the pixels on top of whatever colour the
//! lower pixel has.

use std::io::{self, Write};

use crossterm::style::{self, Color as CColor};
use crossterm::{cursor, queue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn from_array(c: [u8; 3]) -> Self {
        Rgb(c[0], c[1], c[2])
    }

    /// Blend toward `b`; `t_256` of 256 means all `b`
    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    fn term(self) -> CColor {
        CColor::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }
}

pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const WHITE: Rgb = Rgb(255, 255, 255);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Glyph {
    ch: char,
    fg: Rgb,
}

/// Pixel buffer plus text layer
#[derive(Debug, Clone)]
pub struct PixelBuf {
    w: usize,
    /// pixel height = terminal rows * 2
    h: usize,
    px: Vec<Rgb>,
    text: Vec<Option<Glyph>>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        let h = h + h % 2;
        Self {
            w,
            h,
            px: vec![BLACK; w * h],
            text: vec![None; w * h / 2],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        *self = Self::new(w, h);
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn clear(&mut self, c: Rgb) {
        self.px.fill(c);
        self.text.fill(None);
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    /// One-pixel outline
    pub fn stroke_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dx in 0..w {
            self.set(x + dx, y, c);
            self.set(x + dx, y + h - 1, c);
        }
        for dy in 0..h {
            self.set(x, y + dy, c);
            self.set(x + w - 1, y + dy, c);
        }
    }

    /// Filled ellipse inscribed in the rectangle
    pub fn fill_ellipse(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (rx, ry) = (w as f32 / 2.0, h as f32 / 2.0);
        for dy in 0..h {
            for dx in 0..w {
                let nx = (dx as f32 + 0.5 - rx) / rx;
                let ny = (dy as f32 + 0.5 - ry) / ry;
                if nx * nx + ny * ny <= 1.0 {
                    self.set(x + dx, y + dy, c);
                }
            }
        }
    }

    /// Blend every pixel toward `c`, for overlays
    pub fn tint(&mut self, c: Rgb, t_256: u16) {
        for p in &mut self.px {
            *p = Rgb::lerp(*p, c, t_256);
        }
    }

    /// Write text into the cell layer; clipped at the edges
    pub fn text(&mut self, col: i32, row: i32, s: &str, fg: Rgb) {
        let rows = (self.h / 2) as i32;
        if row < 0 || row >= rows {
            return;
        }
        for (i, ch) in s.chars().enumerate() {
            let x = col + i as i32;
            if x >= 0 && (x as usize) < self.w {
                self.text[row as usize * self.w + x as usize] = Some(Glyph { ch, fg });
            }
        }
    }

    /// Text centred on a column
    pub fn text_centered(&mut self, center_col: i32, row: i32, s: &str, fg: Rgb) {
        let len = s.chars().count() as i32;
        self.text(center_col - len / 2, row, s, fg);
    }

    /// Character at a cell of the text layer
    pub fn char_at(&self, col: usize, row: usize) -> Option<char> {
        self.text.get(row * self.w + col).copied().flatten().map(|g| g.ch)
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = BLACK;
        let mut prev_bg = BLACK;
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);
                let glyph = self.text[row * self.w + col];

                let (ch, fg, bg) = match glyph {
                    Some(g) => (g.ch, g.fg, bot),
                    None if top == bot => (' ', prev_fg, top),
                    None => ('\u{2580}', top, bot), // ▀
                };

                if ch != ' ' && (need_fg || prev_fg != fg) {
                    queue!(out, style::SetForegroundColor(fg.term()))?;
                    prev_fg = fg;
                    need_fg = false;
                }
                if need_bg || prev_bg != bg {
                    queue!(out, style::SetBackgroundColor(bg.term()))?;
                    prev_bg = bg;
                    need_bg = false;
                }
                queue!(out, style::Print(ch))?;
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_clips() {
        let mut buf = PixelBuf::new(4, 4);
        buf.set(-1, 0, WHITE);
        buf.set(4, 0, WHITE);
        buf.set(0, 4, WHITE);
        assert!(buf.px.iter().all(|&p| p == BLACK));
        buf.set(3, 3, WHITE);
        assert_eq!(buf.get(3, 3), WHITE);
    }

    #[test]
    fn test_odd_height_rounds_up() {
        let buf = PixelBuf::new(3, 5);
        assert_eq!(buf.height(), 6);
    }

    #[test]
    fn test_ellipse_stays_in_box() {
        let mut buf = PixelBuf::new(10, 10);
        buf.fill_ellipse(2, 2, 6, 4, WHITE);
        for y in 0..10 {
            for x in 0..10 {
                let inside = (2..8).contains(&x) && (2..6).contains(&y);
                if !inside {
                    assert_eq!(buf.get(x, y), BLACK);
                }
            }
        }
        assert_eq!(buf.get(5, 4), WHITE);
    }

    #[test]
    fn test_text_layer_and_tint() {
        let mut buf = PixelBuf::new(10, 4);
        buf.text_centered(5, 1, "GO", WHITE);
        assert_eq!(buf.char_at(4, 1), Some('G'));
        assert_eq!(buf.char_at(5, 1), Some('O'));
        buf.text(8, 0, "abc", WHITE);
        assert_eq!(buf.char_at(9, 0), Some('b'));

        buf.clear(WHITE);
        buf.tint(BLACK, 128);
        assert_eq!(buf.get(0, 0), Rgb(128, 128, 128));
        assert_eq!(buf.char_at(4, 1), None);
    }

    #[test]
    fn test_render_emits_half_blocks() {
        let mut buf = PixelBuf::new(2, 2);
        buf.set(0, 0, WHITE);
        let mut out = Vec::new();
        buf.render(&mut out).unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.contains('\u{2580}'));
    }
}
