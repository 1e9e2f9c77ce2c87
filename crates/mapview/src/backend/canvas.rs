use std::path::{Path, PathBuf};

use image::ImageReader;
use thiserror::Error;
use tracing::{debug, warn};

use crate::color::Color;
use crate::geometry::{Rect, Vec2};
use crate::tiles::TextureSpec;

use super::font::{glyph_rows, GLYPH_COLUMNS, GLYPH_ROWS};
use super::{FontId, RenderBackend, SpriteDraw, TextDraw};

const PLACEHOLDER_COLOR: Color = Color::rgba(220, 220, 240, 160);
// Glyph cell height plus one row of spacing above and below.
const TEXT_CELL_ROWS: i32 = GLYPH_ROWS + 2;

#[derive(Debug, Error)]
pub enum TextureLoadError {
    #[error("failed to open texture {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode texture {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTexture {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl LoadedTexture {
    pub fn load(path: &Path) -> Result<Self, TextureLoadError> {
        let reader = ImageReader::open(path).map_err(|source| TextureLoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let decoded = reader.decode().map_err(|source| TextureLoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let image = decoded.to_rgba8();
        Ok(Self {
            width: image.width(),
            height: image.height(),
            rgba: image.into_raw(),
        })
    }

    fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba.get(offset..offset + 4)?;
        Some(Color::rgba(px[0], px[1], px[2], px[3]))
    }
}

#[derive(Debug, Clone)]
struct TextureEntry {
    tile_size: Vec2,
    image: Option<LoadedTexture>,
}

#[derive(Debug, Clone, Default)]
pub struct TextureSet {
    entries: Vec<TextureEntry>,
}

impl TextureSet {
    pub fn load(asset_dir: &Path, specs: &[TextureSpec]) -> Self {
        let entries = specs
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                let path = asset_dir.join(&spec.file);
                let image = match LoadedTexture::load(&path) {
                    Ok(texture) => {
                        debug!(
                            texture = index,
                            path = %path.display(),
                            width = texture.width,
                            height = texture.height,
                            "texture_loaded"
                        );
                        Some(texture)
                    }
                    Err(error) => {
                        warn!(
                            texture = index,
                            path = %path.display(),
                            error = %error,
                            "texture_load_failed_using_placeholder"
                        );
                        None
                    }
                };
                TextureEntry {
                    tile_size: Vec2::new(spec.tile_size[0], spec.tile_size[1]),
                    image,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn from_textures(textures: Vec<(Vec2, Option<LoadedTexture>)>) -> Self {
        let entries = textures
            .into_iter()
            .map(|(tile_size, image)| TextureEntry { tile_size, image })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn loaded_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.image.is_some())
            .count()
    }

    fn tile_size(&self, texture: usize) -> Option<Vec2> {
        self.entries.get(texture).map(|entry| entry.tile_size)
    }

    fn image(&self, texture: usize) -> Option<&LoadedTexture> {
        self.entries
            .get(texture)
            .and_then(|entry| entry.image.as_ref())
    }
}

pub struct CanvasFrame<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
    textures: &'a TextureSet,
    nominal_size: Vec2,
    mouse: Option<Vec2>,
}

impl<'a> CanvasFrame<'a> {
    pub fn new(
        frame: &'a mut [u8],
        width: u32,
        height: u32,
        textures: &'a TextureSet,
        nominal_size: Vec2,
    ) -> Self {
        Self {
            frame,
            width,
            height,
            textures,
            nominal_size,
            mouse: None,
        }
    }

    pub fn with_mouse(mut self, mouse: Option<Vec2>) -> Self {
        self.mouse = mouse;
        self
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    fn clip(&self, rect: Rect) -> Rect {
        rect.intersection(self.bounds())
    }

    fn fill(&mut self, rect: Rect, color: Color) {
        if color.a == 0 {
            return;
        }
        let clipped = self.clip(rect);
        for pos in clipped.positions() {
            blend_pixel(self.frame, self.width, pos.x, pos.y, color);
        }
    }

    fn outline(&mut self, rect: Rect, color: Color) {
        if rect.is_empty() {
            return;
        }
        let bottom = rect.bottom - 1;
        let right = rect.right - 1;
        for x in rect.left..rect.right {
            blend_pixel_clipped(self.frame, self.width, self.height, x, rect.top, color);
            if bottom != rect.top {
                blend_pixel_clipped(self.frame, self.width, self.height, x, bottom, color);
            }
        }
        for y in (rect.top + 1)..bottom {
            blend_pixel_clipped(self.frame, self.width, self.height, rect.left, y, color);
            if right != rect.left {
                blend_pixel_clipped(self.frame, self.width, self.height, right, y, color);
            }
        }
    }
}

fn text_scale(size: i32) -> i32 {
    (size / TEXT_CELL_ROWS).max(1)
}

fn glyph_advance(size: i32) -> i32 {
    (GLYPH_COLUMNS + 1) * text_scale(size)
}

fn blend_pixel_clipped(frame: &mut [u8], width: u32, height: u32, x: i32, y: i32, color: Color) {
    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
        return;
    }
    blend_pixel(frame, width, x, y, color);
}

// Source-over; destination alpha stays opaque.
fn blend_pixel(frame: &mut [u8], width: u32, x: i32, y: i32, color: Color) {
    let offset = (y as usize * width as usize + x as usize) * 4;
    let Some(dst) = frame.get_mut(offset..offset + 4) else {
        return;
    };
    let alpha = color.a as u32;
    let inv = 255 - alpha;
    let mix = |src: u8, dst: u8| ((src as u32 * alpha + dst as u32 * inv + 127) / 255) as u8;
    dst[0] = mix(color.r, dst[0]);
    dst[1] = mix(color.g, dst[1]);
    dst[2] = mix(color.b, dst[2]);
    dst[3] = 255;
}

impl RenderBackend for CanvasFrame<'_> {
    fn draw_sprite(&mut self, sprite: &SpriteDraw) {
        let dst = Rect::from_size(sprite.pos, sprite.size);
        if dst.is_empty() {
            return;
        }
        let tile_size = self.tile_size(sprite.texture);
        let textures = self.textures;
        let Some(texture) = textures.image(sprite.texture) else {
            self.fill(dst, PLACEHOLDER_COLOR.modulate(sprite.tint));
            return;
        };
        let origin = sprite.cell.pixel_origin(tile_size);
        for pos in self.clip(dst).positions() {
            let local = pos - dst.top_left();
            let src_x = origin.x + local.x * tile_size.x / sprite.size.x;
            let src_y = origin.y + local.y * tile_size.y / sprite.size.y;
            let Some(texel) = texture.pixel(src_x, src_y) else {
                continue;
            };
            if texel.a == 0 {
                continue;
            }
            blend_pixel(self.frame, self.width, pos.x, pos.y, texel.modulate(sprite.tint));
        }
    }

    fn draw_filled_rect(&mut self, rect: Rect, fill: Color, outline: Option<Color>) {
        self.fill(rect, fill);
        if let Some(outline) = outline {
            self.outline(rect, outline);
        }
    }

    fn draw_text(&mut self, text: &TextDraw<'_>) {
        let scale = text_scale(text.size);
        let advance = glyph_advance(text.size);
        let mut x = text.pos.x;
        if text.centered {
            x -= self.text_width(text.font, text.size, text.text) / 2;
        }
        let top = text.pos.y + scale;
        for ch in text.text.chars() {
            let rows = glyph_rows(ch);
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_COLUMNS {
                    if bits & (1 << (GLYPH_COLUMNS - 1 - col)) == 0 {
                        continue;
                    }
                    let cell = Rect::from_size(
                        Vec2::new(x + col * scale, top + row as i32 * scale),
                        Vec2::new(scale, scale),
                    );
                    self.fill(cell, text.color);
                }
            }
            x += advance;
        }
    }

    fn text_width(&self, _font: FontId, size: i32, text: &str) -> i32 {
        text.chars().count() as i32 * glyph_advance(size)
    }

    fn tile_size(&self, texture: usize) -> Vec2 {
        self.textures
            .tile_size(texture)
            .unwrap_or(self.nominal_size)
    }

    fn nominal_size(&self) -> Vec2 {
        self.nominal_size
    }

    fn mouse_pos(&self) -> Option<Vec2> {
        self.mouse
    }
}
