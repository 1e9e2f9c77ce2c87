use std::collections::HashMap;

use crate::color::Color;
use crate::geometry::{Rect, Vec2};

use super::{FontId, RenderBackend, SpriteDraw, TextDraw};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DrawCall {
    Sprite(SpriteDraw),
    Rect {
        rect: Rect,
        fill: Color,
        outline: Option<Color>,
    },
    Text {
        font: FontId,
        size: i32,
        color: Color,
        pos: Vec2,
        text: String,
    },
}

#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    pub calls: Vec<DrawCall>,
    pub mouse: Option<Vec2>,
    pub nominal: Vec2,
    pub tile_sizes: HashMap<usize, Vec2>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            nominal: Vec2::new(24, 24),
            ..Self::default()
        }
    }

    pub fn sprites(&self) -> Vec<SpriteDraw> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Sprite(sprite) => Some(*sprite),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<(String, Color)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Text { text, color, .. } => Some((text.clone(), *color)),
                _ => None,
            })
            .collect()
    }

    pub fn rects(&self) -> Vec<(Rect, Color, Option<Color>)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Rect {
                    rect,
                    fill,
                    outline,
                } => Some((*rect, *fill, *outline)),
                _ => None,
            })
            .collect()
    }
}

impl RenderBackend for RecordingBackend {
    fn draw_sprite(&mut self, sprite: &SpriteDraw) {
        self.calls.push(DrawCall::Sprite(*sprite));
    }

    fn draw_filled_rect(&mut self, rect: Rect, fill: Color, outline: Option<Color>) {
        self.calls.push(DrawCall::Rect {
            rect,
            fill,
            outline,
        });
    }

    fn draw_text(&mut self, text: &TextDraw<'_>) {
        self.calls.push(DrawCall::Text {
            font: text.font,
            size: text.size,
            color: text.color,
            pos: text.pos,
            text: text.text.to_string(),
        });
    }

    fn text_width(&self, _font: FontId, size: i32, text: &str) -> i32 {
        text.chars().count() as i32 * size / 2
    }

    fn tile_size(&self, texture: usize) -> Vec2 {
        self.tile_sizes
            .get(&texture)
            .copied()
            .unwrap_or(self.nominal)
    }

    fn nominal_size(&self) -> Vec2 {
        self.nominal
    }

    fn mouse_pos(&self) -> Option<Vec2> {
        self.mouse
    }
}
