use rand::Rng;

use crate::backend::{FontId, RenderBackend, SpriteDraw, TextDraw};
use crate::color::{self, channel, Color};
use crate::geometry::{DirSet, Rect, Vec2};
use crate::tiles::{GlyphTile, SpriteCoord, SpriteTile, TileLookup};
use crate::view::{Modifiers, ViewId, ViewLayer, ViewObject};

use super::connection::TileCaches;
use super::fog::FogMask;

const ROUND_SHADOW_TEXTURE: usize = 0;
const ROUND_SHADOW_CELL: SpriteCoord = SpriteCoord::new(2, 22);
const ROUND_SHADOW_LIFT: i32 = 2;
const FLAME_TEXTURE: usize = 2;
const FLAME_FIRST_FRAME: i32 = 10;
const FLAME_LAST_FRAME: i32 = 11;
const LOCK_TEXTURE: usize = 3;
const LOCK_CELL: SpriteCoord = SpriteCoord::new(5, 6);
const SHADOW_TEXTURE: usize = 5;
const SHADOW_CELL: SpriteCoord = SpriteCoord::new(1, 21);

const HIDDEN_ALPHA: u8 = 70;
const ILLUSION_ALPHA: u8 = 150;
const PLANNED_ALPHA: u8 = 100;
const MAX_WATER_DEPTH: f64 = 2.0;
const WATER_DARKENING_PER_DEPTH: f64 = 60.0;

const GLYPH_LIFT: i32 = 3;
pub const FIRE_GLYPH: char = 'ѡ';
pub const STRONG_FIRE_GLYPH: char = 'Ѡ';
const STRONG_FIRE_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub screen: Vec2,
    pub size: Vec2,
    pub world: Vec2,
}

impl Cell {
    pub fn rect(&self) -> Rect {
        Rect::from_size(self.screen, self.size)
    }
}

pub fn bleeding_color(bleeding: f64) -> Color {
    if bleeding <= 0.0 {
        return color::WHITE;
    }
    let amount = 0.3 + 0.7 * bleeding;
    let rest = channel(((1.0 - amount) * 255.0).max(0.0));
    Color::rgb(255, rest, rest)
}

pub fn object_color(object: &ViewObject, translucent: f64) -> Color {
    let attributes = object.attributes();
    let mut color = bleeding_color(attributes.bleeding);
    if object.has_modifier(Modifiers::INVISIBLE) || object.has_modifier(Modifiers::HIDDEN) {
        color = color.with_alpha(HIDDEN_ALPHA);
    } else if translucent > 0.0 {
        color = color.with_alpha(channel(255.0 * (1.0 - translucent)));
    } else if object.has_modifier(Modifiers::ILLUSION) {
        color = color.with_alpha(ILLUSION_ALPHA);
    }
    if object.has_modifier(Modifiers::PLANNED) {
        color = color.with_alpha(PLANNED_ALPHA);
    }
    if attributes.water_depth > 0.0 {
        let depth = attributes.water_depth.min(MAX_WATER_DEPTH);
        let value = channel((255.0 - depth * WATER_DARKENING_PER_DEPTH).max(0.0));
        color = Color::rgb(value, value, value);
    }
    color
}

pub fn fire_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    let red = 200 + rng.gen_range(-50..=50);
    Color::rgba(
        channel(red as f64),
        rng.gen_range(0..=50),
        rng.gen_range(0..=50),
        150,
    )
}

pub struct ObjectPainter<'a> {
    tiles: &'a dyn TileLookup,
    caches: &'a TileCaches,
    sprite_mode: bool,
}

impl<'a> ObjectPainter<'a> {
    pub fn new(tiles: &'a dyn TileLookup, caches: &'a TileCaches, sprite_mode: bool) -> Self {
        Self {
            tiles,
            caches,
            sprite_mode,
        }
    }

    pub fn draw<R: Rng + ?Sized>(
        &self,
        backend: &mut dyn RenderBackend,
        rng: &mut R,
        object: &ViewObject,
        cell: Cell,
    ) {
        if object.has_modifier(Modifiers::PLAYER) {
            backend.draw_filled_rect(cell.rect(), Color::TRANSPARENT, Some(color::LIGHT_GRAY));
        }
        if object.has_modifier(Modifiers::TEAM_HIGHLIGHT) {
            backend.draw_filled_rect(cell.rect(), Color::TRANSPARENT, Some(color::DARK_GREEN));
        }
        let tile = self.tiles.resolve(object, self.sprite_mode);
        match tile.sprite() {
            Some(sprite) => self.draw_sprite_tile(backend, rng, object, sprite, cell),
            None => draw_glyph_tile(backend, rng, object, &tile.glyph, cell),
        }
    }

    fn draw_sprite_tile<R: Rng + ?Sized>(
        &self,
        backend: &mut dyn RenderBackend,
        rng: &mut R,
        object: &ViewObject,
        sprite: &SpriteTile,
        cell: Cell,
    ) {
        let tint = object_color(object, sprite.translucent);
        let nominal = backend.nominal_size();
        let native = backend.tile_size(sprite.texture);
        let size = native.mult(cell.size).div(nominal);
        let mut offset = (nominal - native)
            .mult(cell.size)
            .div(nominal.mult(Vec2::new(2, 2)));
        if native.y > nominal.y {
            offset.y *= 2;
        }
        let lift = Vec2::new(0, Vec2::new(0, -4 * cell.size.y).div(nominal).y);
        let shadowed = self.caches.is_shadowed(cell.world);

        let mut move_up = Vec2::default();
        if object.has_modifier(Modifiers::MOVE_UP) {
            move_up = lift;
        }
        if object.layer() == ViewLayer::Creature || object.has_modifier(Modifiers::ROUND_SHADOW) {
            backend.draw_sprite(&SpriteDraw::new(
                ROUND_SHADOW_TEXTURE,
                ROUND_SHADOW_CELL,
                cell.screen - Vec2::new(0, ROUND_SHADOW_LIFT),
                Vec2::new(nominal.x.min(size.x), nominal.y.min(size.y)),
            ));
            move_up = lift;
        }
        if let Some(background) = sprite.background {
            backend.draw_sprite(
                &SpriteDraw::new(sprite.texture, background, cell.screen + offset, size)
                    .tinted(tint),
            );
            if shadowed {
                draw_shadow_overlay(backend, cell.screen, size);
            }
        }

        let dirs = self.caches.connected_dirs(object, cell.world);
        let coord = sprite.sprite_coord(dirs);
        if !coord.is_valid() {
            return;
        }
        backend.draw_sprite(
            &SpriteDraw::new(sprite.texture, coord, cell.screen + move_up + offset, size)
                .tinted(tint),
        );
        if object.layer().is_floor() && shadowed && !sprite.no_shadow {
            draw_shadow_overlay(backend, cell.screen, size);
        }
        if object.attributes().burning > 0.0 {
            let frame = rng.gen_range(FLAME_FIRST_FRAME..=FLAME_LAST_FRAME);
            backend.draw_sprite(&SpriteDraw::new(
                FLAME_TEXTURE,
                SpriteCoord::new(frame, 0),
                cell.screen,
                size,
            ));
        }
        if object.has_modifier(Modifiers::LOCKED) {
            let lock_size = size.div(Vec2::new(2, 2));
            let centered = Vec2::new((size.x - lock_size.x) / 2, 0);
            backend.draw_sprite(&SpriteDraw::new(
                LOCK_TEXTURE,
                LOCK_CELL,
                cell.screen + centered,
                lock_size,
            ));
        }
    }

    pub fn draw_fog(&self, backend: &mut dyn RenderBackend, mask: FogMask, cell: Cell) {
        if let Some(edges) = self.tiles.sprite_for(ViewId::FogOfWar) {
            draw_variant(backend, edges, mask.edges, cell);
        }
        if mask.corners.is_empty() {
            return;
        }
        if let Some(corners) = self.tiles.sprite_for(ViewId::FogOfWarCorner) {
            for dir in mask.corners.dirs() {
                draw_variant(backend, corners, dir.as_set(), cell);
            }
        }
    }
}

fn draw_variant(backend: &mut dyn RenderBackend, sprite: &SpriteTile, dirs: DirSet, cell: Cell) {
    let coord = sprite.sprite_coord(dirs);
    if coord.is_valid() {
        backend.draw_sprite(&SpriteDraw::new(sprite.texture, coord, cell.screen, cell.size));
    }
}

fn draw_shadow_overlay(backend: &mut dyn RenderBackend, pos: Vec2, size: Vec2) {
    backend.draw_sprite(&SpriteDraw::new(SHADOW_TEXTURE, SHADOW_CELL, pos, size));
}

fn draw_glyph_tile<R: Rng + ?Sized>(
    backend: &mut dyn RenderBackend,
    rng: &mut R,
    object: &ViewObject,
    glyph: &GlyphTile,
    cell: Cell,
) {
    let pos = Vec2::new(cell.screen.x + cell.size.x / 2, cell.screen.y - GLYPH_LIFT);
    let font = if glyph.symbol_font {
        FontId::Symbol
    } else {
        FontId::Tile
    };
    draw_char(backend, font, cell.size.y, glyph.color, pos, glyph.text);

    let burning = object.attributes().burning;
    if burning > 0.0 {
        draw_char(backend, FontId::Symbol, cell.size.y, fire_color(rng), pos, FIRE_GLYPH);
        if burning > STRONG_FIRE_THRESHOLD {
            draw_char(
                backend,
                FontId::Symbol,
                cell.size.y,
                fire_color(rng),
                pos,
                STRONG_FIRE_GLYPH,
            );
        }
    }
}

fn draw_char(
    backend: &mut dyn RenderBackend,
    font: FontId,
    size: i32,
    color: Color,
    pos: Vec2,
    ch: char,
) {
    let mut buf = [0u8; 4];
    backend.draw_text(&TextDraw {
        font,
        size,
        color,
        pos,
        text: ch.encode_utf8(&mut buf),
        centered: true,
    });
}
