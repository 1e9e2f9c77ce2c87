mod canvas;
mod font;
#[cfg(test)]
pub(crate) mod recording;

pub use canvas::{CanvasFrame, LoadedTexture, TextureLoadError, TextureSet};
pub use font::{glyph_rows, GLYPH_COLUMNS, GLYPH_ROWS};

use crate::color::Color;
use crate::geometry::{Rect, Vec2};
use crate::tiles::SpriteCoord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontId {
    Tile,
    Symbol,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteDraw {
    pub texture: usize,
    pub cell: SpriteCoord,
    pub pos: Vec2,
    pub size: Vec2,
    pub tint: Color,
}

impl SpriteDraw {
    pub fn new(texture: usize, cell: SpriteCoord, pos: Vec2, size: Vec2) -> Self {
        Self {
            texture,
            cell,
            pos,
            size,
            tint: crate::color::WHITE,
        }
    }

    pub fn tinted(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextDraw<'a> {
    pub font: FontId,
    pub size: i32,
    pub color: Color,
    pub pos: Vec2,
    pub text: &'a str,
    pub centered: bool,
}

pub trait RenderBackend {
    fn draw_sprite(&mut self, sprite: &SpriteDraw);

    fn draw_filled_rect(&mut self, rect: Rect, fill: Color, outline: Option<Color>);

    fn draw_text(&mut self, text: &TextDraw<'_>);

    fn text_width(&self, font: FontId, size: i32, text: &str) -> i32;

    fn tile_size(&self, texture: usize) -> Vec2;

    fn nominal_size(&self) -> Vec2;

    fn mouse_pos(&self) -> Option<Vec2>;
}
