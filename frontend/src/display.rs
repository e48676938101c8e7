//! Drawing surface shared by the browser and the overlays.
//!
//! Everything in the shell draws through [`Display`]; the SDL host implements
//! it on top of a software canvas and the tests implement it with a recorder.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Expand a 16-bit 5-6-5 panel color to 24-bit.
    pub const fn from_rgb565(c: u16) -> Self {
        let r = ((c >> 11) & 0x1f) as u8;
        let g = ((c >> 5) & 0x3f) as u8;
        let b = (c & 0x1f) as u8;
        Color {
            r: (r << 3) | (r >> 2),
            g: (g << 2) | (g >> 4),
            b: (b << 3) | (b >> 2),
        }
    }
}

impl From<[u8; 3]> for Color {
    fn from(c: [u8; 3]) -> Self {
        Color::rgb(c[0], c[1], c[2])
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }
}

pub trait Display {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// One pixel outline.
    fn draw_rect(&mut self, rect: Rect, color: Color);
    /// Draw `text` with its top-left corner at (x, y), transparent background.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color);
    /// Rendered width in pixels. Glyphs are proportional, so this is the only
    /// reliable way to fit text into a row.
    fn text_width(&self, text: &str) -> i32;
    fn present(&mut self) {}
}
