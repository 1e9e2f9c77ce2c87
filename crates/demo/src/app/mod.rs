pub(crate) mod bootstrap;
mod dungeon;

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use mapview::color::{self, Color};
use mapview::{
    run_viewer, FlashAnimation, GlyphPopAnimation, GridLayout, MapView, OptionRow, TileAtlasError,
    TileLookup, Vec2, ViewerError,
};
use thiserror::Error;
use tracing::{debug, info};

use self::dungeon::{Brush, Dungeon};

const FRAMES_PER_TURN: u64 = 30;
const PAINT_FLASH: Color = color::YELLOW.with_alpha(160);
const PAINT_FLASH_DURATION: Duration = Duration::from_millis(250);
const TURN_POP_DURATION: Duration = Duration::from_millis(600);

#[derive(Debug, Error)]
pub(crate) enum DemoError {
    #[error("failed to load tile atlas: {0}")]
    Atlas(#[from] TileAtlasError),
    #[error(transparent)]
    Viewer(#[from] ViewerError),
}

pub(crate) fn run() -> Result<(), DemoError> {
    let bootstrap::DemoWiring {
        config,
        atlas,
        textures,
    } = bootstrap::build_demo()?;
    let nominal_size = atlas.nominal_size();
    let mut session = DemoSession::new(Dungeon::new(), nominal_size);
    let view = session.build_view(Box::new(atlas));

    run_viewer(config, view, textures, nominal_size, move |view| {
        session.on_frame(view)
    })?;
    Ok(())
}

struct DemoSession {
    dungeon: Dungeon,
    clicks: Rc<RefCell<Vec<Vec2>>>,
    brush: Rc<Cell<Brush>>,
    square: Vec2,
    frames: u64,
}

impl DemoSession {
    fn new(dungeon: Dungeon, square: Vec2) -> Self {
        Self {
            dungeon,
            clicks: Rc::default(),
            brush: Rc::new(Cell::new(Brush::Wall)),
            square,
            frames: 0,
        }
    }

    fn build_view(&self, tiles: Box<dyn TileLookup>) -> MapView {
        let sink = Rc::clone(&self.clicks);
        let layout = GridLayout::new(self.square, self.dungeon.keeper_position());
        let mut view = MapView::new(Box::new(layout), tiles, move |pos| {
            sink.borrow_mut().push(pos)
        });
        view.set_level_bounds(self.dungeon.bounds());
        view.update_objects(self.dungeon.snapshot());
        view.set_options("Brush", self.brush_rows());
        view
    }

    fn brush_rows(&self) -> Vec<OptionRow> {
        Brush::ALL
            .into_iter()
            .map(|brush| {
                let selected = Rc::clone(&self.brush);
                OptionRow::new(brush.label(), move || {
                    selected.set(brush);
                    info!(brush = brush.label(), "brush_selected");
                })
                .with_hint(brush.hint())
            })
            .collect()
    }

    fn on_frame(&mut self, view: &mut MapView) {
        let mut changed = false;
        let clicks: Vec<Vec2> = self.clicks.borrow_mut().drain(..).collect();
        for pos in clicks {
            if self.dungeon.paint(pos, self.brush.get()) {
                view.add_animation(
                    Box::new(FlashAnimation::new(
                        PAINT_FLASH,
                        self.square,
                        PAINT_FLASH_DURATION,
                    )),
                    pos,
                );
                changed = true;
            }
        }

        self.frames += 1;
        if self.frames % FRAMES_PER_TURN == 0 {
            self.dungeon.advance();
            let keeper = self.dungeon.keeper_position();
            view.add_animation(
                Box::new(GlyphPopAnimation::new(
                    self.dungeon.turn().to_string(),
                    color::LIGHT_GRAY,
                    self.square,
                    TURN_POP_DURATION,
                )),
                keeper,
            );
            debug!(turn = self.dungeon.turn(), "demo_turn_advanced");
            changed = true;
        }

        if changed {
            view.update_objects(self.dungeon.snapshot());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use mapview::{Rect, TileAtlas, ViewId, ViewLayer};

    use super::*;

    fn bundled_atlas() -> TileAtlas {
        TileAtlas::load(&Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/tiles.json"))
            .expect("bundled atlas parses")
    }

    fn session_and_view() -> (DemoSession, MapView) {
        let session = DemoSession::new(Dungeon::new(), Vec2::new(24, 24));
        let mut view = session.build_view(Box::new(bundled_atlas()));
        view.set_bounds(Rect::new(0, 0, 480, 360));
        (session, view)
    }

    fn floor_id(view: &MapView, pos: Vec2) -> Option<ViewId> {
        view.snapshot()
            .get(pos)?
            .as_ref()?
            .object(ViewLayer::Floor)
            .map(|object| object.id())
    }

    #[test]
    fn view_starts_with_the_brush_panel_and_current_snapshot() {
        let (session, view) = session_and_view();
        assert!(view.has_options());
        assert_eq!(view.snapshot().bounds(), session.dungeon.bounds());
        assert_eq!(view.level_bounds(), session.dungeon.bounds());
    }

    #[test]
    fn queued_click_paints_with_the_selected_brush() {
        let (mut session, mut view) = session_and_view();
        session.brush.set(Brush::Water);
        session.clicks.borrow_mut().push(Vec2::new(5, 5));

        session.on_frame(&mut view);

        assert_eq!(floor_id(&view, Vec2::new(5, 5)), Some(ViewId::Water));
        assert_eq!(view.animation_count(), 1);
        assert!(session.clicks.borrow().is_empty());
    }

    #[test]
    fn click_on_the_border_changes_nothing() {
        let (mut session, mut view) = session_and_view();
        session.clicks.borrow_mut().push(Vec2::new(0, 0));
        session.on_frame(&mut view);
        assert_eq!(view.animation_count(), 0);
    }

    #[test]
    fn patrols_advance_every_turn() {
        let (mut session, mut view) = session_and_view();
        for _ in 0..FRAMES_PER_TURN {
            session.on_frame(&mut view);
        }
        assert_eq!(session.dungeon.turn(), 1);
        assert_eq!(view.animation_count(), 1);
    }

    #[test]
    fn brush_rows_follow_brush_order() {
        let (session, _) = session_and_view();
        let labels: Vec<_> = session
            .brush_rows()
            .iter()
            .map(|row| row.label().to_string())
            .collect();
        assert_eq!(
            labels,
            Brush::ALL.map(|brush| brush.label().to_string()).to_vec()
        );
    }
}
