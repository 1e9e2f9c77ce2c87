use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::backend::{FontId, RenderBackend, TextDraw};
use crate::clock::{Clock, SystemClock};
use crate::color::{self, Color};
use crate::geometry::{Rect, Vec2};
use crate::layout::MapLayout;
use crate::options::{HintHandle, ModalOverlay, OptionRow, OptionsPanel};
use crate::tiles::TileLookup;
use crate::view::{MapSnapshot, ViewObject};

use super::animation::{Animation, AnimationOverlay};
use super::connection::TileCaches;
use super::draw::{Cell, ObjectPainter};
use super::fog::FogOfWar;
use super::highlight::highlight_color;

const HINT_HEIGHT: i32 = 30;
const HINT_PADDING: i32 = 30;
const HINT_TEXT_OFFSET: Vec2 = Vec2::new(10, 1);
const HINT_TEXT_SIZE: i32 = 19;
const HINT_BACKGROUND: Color = color::BLACK.with_alpha(180);
const OVERLAY_MARGIN: i32 = 10;
const OVERLAY_RIGHT: i32 = 380;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameSummary {
    pub tiles_drawn: usize,
    pub fogged_tiles: usize,
    pub animations: usize,
    pub tooltip: Option<String>,
}

pub struct MapView {
    bounds: Rect,
    layout: Box<dyn MapLayout>,
    tiles: Box<dyn TileLookup>,
    clock: Box<dyn Clock>,
    on_click: Box<dyn FnMut(Vec2)>,
    snapshot: MapSnapshot,
    caches: TileCaches,
    fog: FogOfWar,
    animations: AnimationOverlay,
    level_bounds: Option<Rect>,
    sprite_mode: bool,
    hovered: Option<Vec2>,
    held: Option<Vec2>,
    hint: HintHandle,
    overlay: Option<Box<dyn ModalOverlay>>,
    rng: StdRng,
}

impl MapView {
    pub fn new(
        layout: Box<dyn MapLayout>,
        tiles: Box<dyn TileLookup>,
        on_click: impl FnMut(Vec2) + 'static,
    ) -> Self {
        Self {
            bounds: Rect::default(),
            layout,
            tiles,
            clock: Box::new(SystemClock::new()),
            on_click: Box::new(on_click),
            snapshot: MapSnapshot::default(),
            caches: TileCaches::default(),
            fog: FogOfWar::default(),
            animations: AnimationOverlay::new(),
            level_bounds: None,
            sprite_mode: true,
            hovered: None,
            held: None,
            hint: HintHandle::new(),
            overlay: None,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.place_overlay();
        self.refresh_caches();
    }

    pub fn set_layout(&mut self, layout: Box<dyn MapLayout>) {
        self.layout = layout;
        self.refresh_caches();
    }

    pub fn layout(&self) -> &dyn MapLayout {
        self.layout.as_ref()
    }

    pub fn scroll(&mut self, delta: Vec2) {
        self.layout.scroll(delta);
        self.refresh_caches();
    }

    pub fn set_sprite_mode(&mut self, sprite_mode: bool) {
        if self.sprite_mode != sprite_mode {
            debug!(sprite_mode, "map_view_mode_changed");
        }
        self.sprite_mode = sprite_mode;
    }

    pub fn sprite_mode(&self) -> bool {
        self.sprite_mode
    }

    pub fn set_level_bounds(&mut self, bounds: Rect) {
        self.level_bounds = Some(bounds);
    }

    pub fn level_bounds(&self) -> Rect {
        self.level_bounds.unwrap_or_else(|| self.snapshot.bounds())
    }

    pub fn snapshot(&self) -> &MapSnapshot {
        &self.snapshot
    }

    pub fn update_objects(&mut self, snapshot: MapSnapshot) {
        self.fog.resize(snapshot.bounds());
        self.snapshot = snapshot;
        self.refresh_caches();
    }

    fn refresh_caches(&mut self) {
        let tiles = self
            .layout
            .visible_tiles(self.bounds, self.snapshot.bounds());
        self.caches.rebuild(&self.snapshot, tiles);
    }

    pub fn add_animation(&mut self, animation: Box<dyn Animation>, position: Vec2) {
        self.animations.add(animation, position, self.clock.now());
    }

    pub fn set_hint(&mut self, text: impl Into<String>) {
        self.hint.set(text);
    }

    pub fn reset_hint(&mut self) {
        self.hint.clear();
    }

    pub fn hint_setter(&self, text: impl Into<String>) -> impl Fn() + 'static {
        self.hint.setter(text)
    }

    pub fn set_options(&mut self, title: impl Into<String>, rows: Vec<OptionRow>) {
        let panel = OptionsPanel::new(title, rows, self.hint.clone());
        self.set_overlay(Box::new(panel));
    }

    pub fn set_overlay(&mut self, overlay: Box<dyn ModalOverlay>) {
        self.overlay = Some(overlay);
        self.place_overlay();
    }

    pub fn clear_options(&mut self) {
        self.overlay = None;
    }

    pub fn has_options(&self) -> bool {
        self.overlay.is_some()
    }

    fn place_overlay(&mut self) {
        let bottom = self.bounds.bottom;
        if let Some(overlay) = self.overlay.as_mut() {
            let height = overlay.height();
            overlay.set_bounds(Rect::new(
                OVERLAY_MARGIN,
                bottom - height - OVERLAY_MARGIN,
                OVERLAY_RIGHT,
                bottom - OVERLAY_MARGIN,
            ));
        }
    }

    fn over_overlay(&self, pos: Vec2) -> bool {
        self.overlay
            .as_ref()
            .is_some_and(|overlay| overlay.bounds().contains(pos))
    }

    // Returns false when the click hit neither an overlay row nor a tile.
    pub fn on_left_click(&mut self, pos: Vec2) -> bool {
        if self.over_overlay(pos) {
            return self
                .overlay
                .as_mut()
                .is_some_and(|overlay| overlay.on_left_click(pos));
        }
        if !self.bounds.contains(pos) {
            return false;
        }
        let tile = self.layout.project_on_map(self.bounds, pos);
        (self.on_click)(tile);
        self.held = Some(tile);
        true
    }

    pub fn on_right_click(&mut self, _pos: Vec2) {}

    pub fn on_mouse_move(&mut self, pos: Vec2) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.on_mouse_move(pos);
        }
        if !self.bounds.contains(pos) || self.over_overlay(pos) {
            self.hovered = None;
            return;
        }
        let tile = self.layout.project_on_map(self.bounds, pos);
        if let Some(held) = self.held {
            if held != tile {
                (self.on_click)(tile);
                self.held = Some(tile);
            }
        }
        self.hovered = Some(tile);
    }

    pub fn on_mouse_release(&mut self) {
        self.held = None;
    }

    pub fn hovered_tile(&self) -> Option<Vec2> {
        self.hovered
    }

    pub fn highlighted_tile(&self, backend: &dyn RenderBackend) -> Option<Vec2> {
        let pos = backend.mouse_pos()?;
        if !self.bounds.contains(pos) || self.over_overlay(pos) {
            return None;
        }
        Some(self.layout.project_on_map(self.bounds, pos))
    }

    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    pub fn render(&mut self, backend: &mut dyn RenderBackend) -> FrameSummary {
        let view = self.bounds;
        let level = self.level_bounds();
        let square = self.layout.square_size();
        let layers = self.layout.layers().to_vec();
        let last_layer = layers.last().copied();
        let tiles = self.layout.visible_tiles(view, level);

        backend.draw_filled_rect(view, color::ALMOST_BLACK, None);
        self.fog.clear();

        let painter = ObjectPainter::new(self.tiles.as_ref(), &self.caches, self.sprite_mode);
        let mut hovered_object: Option<ViewObject> = None;
        for &layer in &layers {
            for &tile in &tiles {
                let cell = Cell {
                    screen: self.layout.project_on_screen(view, tile),
                    size: square,
                    world: tile,
                };
                let in_level = level.contains(tile);
                if !self.sprite_mode && in_level {
                    backend.draw_filled_rect(cell.rect(), color::BLACK, None);
                }
                let index = match self.snapshot.present(tile) {
                    Some(index) if !index.is_empty() => index,
                    _ => {
                        if Some(layer) == last_layer && in_level {
                            backend.draw_filled_rect(cell.rect(), color::BLACK, None);
                        }
                        self.fog.mark(tile);
                        continue;
                    }
                };
                let object = if self.sprite_mode {
                    index.object(layer)
                } else {
                    index.top_object(&layers)
                };
                if let Some(object) = object {
                    painter.draw(backend, &mut self.rng, object, cell);
                    if self.hovered == Some(tile) {
                        hovered_object = Some(object.clone());
                    }
                }
                if layer.is_floor() && self.hovered == Some(tile) {
                    draw_hover_outline(backend, cell.rect());
                }
            }
            if !self.sprite_mode {
                break;
            }
        }

        let mut fogged_tiles = 0;
        for &tile in &tiles {
            if self.fog.is_fogged(tile) {
                fogged_tiles += 1;
            } else if self.sprite_mode {
                let cell = Cell {
                    screen: self.layout.project_on_screen(view, tile),
                    size: square,
                    world: tile,
                };
                painter.draw_fog(backend, self.fog.mask(tile), cell);
            }
        }

        for &tile in &tiles {
            let Some(index) = self.snapshot.present(tile) else {
                continue;
            };
            let rect = Rect::from_size(self.layout.project_on_screen(view, tile), square);
            for (highlight, amount) in index.highlights() {
                backend.draw_filled_rect(rect, highlight_color(highlight, amount), None);
            }
            if self.hovered == Some(tile) {
                draw_hover_outline(backend, rect);
            }
        }

        let now = self.clock.now();
        self.animations.prune(now);
        let layout = &self.layout;
        self.animations
            .render(backend, view, now, |pos| layout.project_on_screen(view, pos));

        let tooltip = match self.hint.get() {
            Some(text) => {
                draw_hint(backend, view, color::WHITE, &text);
                Some(text)
            }
            None => match (self.hovered, hovered_object) {
                (Some(_), Some(object)) => {
                    let color = if object.is_hostile() {
                        color::RED
                    } else if object.is_friendly() {
                        color::GREEN
                    } else {
                        color::WHITE
                    };
                    draw_hint(backend, view, color, object.description());
                    Some(object.description().to_string())
                }
                _ => None,
            },
        };

        self.place_overlay();
        if let Some(overlay) = self.overlay.as_ref() {
            overlay.render(backend);
        }

        FrameSummary {
            tiles_drawn: tiles.len(),
            fogged_tiles,
            animations: self.animations.len(),
            tooltip,
        }
    }
}

fn draw_hover_outline(backend: &mut dyn RenderBackend, rect: Rect) {
    backend.draw_filled_rect(rect, Color::TRANSPARENT, Some(color::LIGHT_GRAY));
}

fn draw_hint(backend: &mut dyn RenderBackend, view: Rect, color: Color, text: &str) {
    let width = backend.text_width(FontId::Text, HINT_TEXT_SIZE, text) + HINT_PADDING;
    let pos = Vec2::new(view.right - width, view.bottom - HINT_HEIGHT);
    backend.draw_filled_rect(
        Rect::from_size(pos, Vec2::new(width, HINT_HEIGHT)),
        HINT_BACKGROUND,
        None,
    );
    backend.draw_text(&TextDraw {
        font: FontId::Text,
        size: HINT_TEXT_SIZE,
        color,
        pos: pos + HINT_TEXT_OFFSET,
        text,
        centered: false,
    });
}
