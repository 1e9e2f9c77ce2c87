use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::backend::{FontId, RenderBackend, TextDraw};
use crate::color::{self, Color};
use crate::geometry::{Rect, Vec2};

const PANEL_MARGIN: i32 = 10;
const TITLE_HEIGHT: i32 = 40;
const ROW_HEIGHT: i32 = 30;
const ROW_INDENT: i32 = 15;
const TEXT_SIZE: i32 = 19;
const PANEL_BACKGROUND: Color = color::BLACK.with_alpha(180);

#[derive(Clone, Default)]
pub struct HintHandle {
    text: Rc<RefCell<Option<String>>>,
}

impl HintHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, text: impl Into<String>) {
        *self.text.borrow_mut() = Some(text.into());
    }

    pub fn clear(&self) {
        *self.text.borrow_mut() = None;
    }

    pub fn get(&self) -> Option<String> {
        self.text.borrow().clone()
    }

    pub fn setter(&self, text: impl Into<String>) -> impl Fn() + 'static {
        let handle = self.clone();
        let text = text.into();
        move || handle.set(text.clone())
    }
}

impl fmt::Debug for HintHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HintHandle")
            .field("text", &self.text.borrow())
            .finish()
    }
}

pub trait ModalOverlay {
    fn bounds(&self) -> Rect;
    fn set_bounds(&mut self, bounds: Rect);
    fn height(&self) -> i32;
    fn on_left_click(&mut self, pos: Vec2) -> bool;
    fn on_mouse_move(&mut self, pos: Vec2);
    fn render(&self, backend: &mut dyn RenderBackend);
}

pub struct OptionRow {
    label: String,
    hint: Option<String>,
    on_select: Box<dyn FnMut()>,
}

impl OptionRow {
    pub fn new(label: impl Into<String>, on_select: impl FnMut() + 'static) -> Self {
        Self {
            label: label.into(),
            hint: None,
            on_select: Box::new(on_select),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for OptionRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionRow")
            .field("label", &self.label)
            .field("hint", &self.hint)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct OptionsPanel {
    title: String,
    rows: Vec<OptionRow>,
    bounds: Rect,
    hovered: Option<usize>,
    hint: HintHandle,
}

impl OptionsPanel {
    pub fn new(title: impl Into<String>, rows: Vec<OptionRow>, hint: HintHandle) -> Self {
        Self {
            title: title.into(),
            rows,
            bounds: Rect::default(),
            hovered: None,
            hint,
        }
    }

    pub fn hovered_row(&self) -> Option<usize> {
        self.hovered
    }

    fn row_rect(&self, index: usize) -> Rect {
        let top = self.bounds.top + PANEL_MARGIN + TITLE_HEIGHT + index as i32 * ROW_HEIGHT;
        Rect::new(
            self.bounds.left + PANEL_MARGIN,
            top,
            self.bounds.right - PANEL_MARGIN,
            top + ROW_HEIGHT,
        )
    }

    fn row_at(&self, pos: Vec2) -> Option<usize> {
        (0..self.rows.len()).find(|index| self.row_rect(*index).contains(pos))
    }
}

impl ModalOverlay for OptionsPanel {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn height(&self) -> i32 {
        ROW_HEIGHT * self.rows.len() as i32 + TITLE_HEIGHT + 2 * PANEL_MARGIN
    }

    fn on_left_click(&mut self, pos: Vec2) -> bool {
        let Some(index) = self.row_at(pos) else {
            return false;
        };
        if let Some(row) = self.rows.get_mut(index) {
            (row.on_select)();
        }
        true
    }

    fn on_mouse_move(&mut self, pos: Vec2) {
        let hovered = self.row_at(pos);
        if hovered == self.hovered {
            return;
        }
        if self.hovered.is_some() {
            self.hint.clear();
        }
        if let Some(hint) = hovered.and_then(|index| self.rows.get(index)?.hint.clone()) {
            self.hint.set(hint);
        }
        self.hovered = hovered;
    }

    fn render(&self, backend: &mut dyn RenderBackend) {
        backend.draw_filled_rect(self.bounds, PANEL_BACKGROUND, None);
        backend.draw_text(&TextDraw {
            font: FontId::Text,
            size: TEXT_SIZE,
            color: color::WHITE,
            pos: Vec2::new(
                self.bounds.left + PANEL_MARGIN,
                self.bounds.top + PANEL_MARGIN,
            ),
            text: &self.title,
            centered: false,
        });
        for (index, row) in self.rows.iter().enumerate() {
            let rect = self.row_rect(index);
            let color = if self.hovered == Some(index) {
                color::YELLOW
            } else {
                color::WHITE
            };
            backend.draw_text(&TextDraw {
                font: FontId::Text,
                size: TEXT_SIZE,
                color,
                pos: Vec2::new(rect.left + ROW_INDENT, rect.top),
                text: &row.label,
                centered: false,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::RecordingBackend;
    use std::cell::Cell;

    fn panel(clicks: Rc<Cell<u32>>, hint: HintHandle) -> OptionsPanel {
        let rows = vec![
            OptionRow::new("Dig", move || clicks.set(clicks.get() + 1)).with_hint("Dig tunnels"),
            OptionRow::new("Cancel", || {}),
        ];
        let mut panel = OptionsPanel::new("Orders", rows, hint);
        panel.set_bounds(Rect::new(10, 100, 380, 100 + panel.height()));
        panel
    }

    #[test]
    fn height_counts_rows_title_and_margins() {
        let panel = panel(Rc::new(Cell::new(0)), HintHandle::new());
        assert_eq!(panel.height(), 30 * 2 + 40 + 20);
    }

    #[test]
    fn clicking_a_row_runs_its_action() {
        let clicks = Rc::new(Cell::new(0));
        let mut panel = panel(clicks.clone(), HintHandle::new());
        // First row spans y 150..180.
        assert!(panel.on_left_click(Vec2::new(40, 160)));
        assert_eq!(clicks.get(), 1);
        assert!(!panel.on_left_click(Vec2::new(40, 115)));
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn hovering_rows_sets_and_clears_the_hint() {
        let hint = HintHandle::new();
        let mut panel = panel(Rc::new(Cell::new(0)), hint.clone());
        panel.on_mouse_move(Vec2::new(40, 160));
        assert_eq!(hint.get().as_deref(), Some("Dig tunnels"));
        assert_eq!(panel.hovered_row(), Some(0));
        panel.on_mouse_move(Vec2::new(40, 190));
        assert_eq!(hint.get(), None);
        assert_eq!(panel.hovered_row(), Some(1));
    }

    #[test]
    fn render_draws_backing_title_and_rows() {
        let panel = panel(Rc::new(Cell::new(0)), HintHandle::new());
        let mut backend = RecordingBackend::new();
        panel.render(&mut backend);
        let rects = backend.rects();
        assert_eq!(rects[0].1, Color::rgba(0, 0, 0, 180));
        let texts: Vec<String> = backend.texts().into_iter().map(|(text, _)| text).collect();
        assert_eq!(texts, vec!["Orders", "Dig", "Cancel"]);
    }

    #[test]
    fn hint_setter_writes_the_shared_text() {
        let hint = HintHandle::new();
        let setter = hint.setter("Build here");
        setter();
        assert_eq!(hint.get().as_deref(), Some("Build here"));
        hint.clear();
        assert!(hint.get().is_none());
    }
}
