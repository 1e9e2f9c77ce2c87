use thiserror::Error;

use crate::geometry::{Rect, Vec2};

use super::index::ViewIndex;

/// Per-tile view data for a whole level; `None` cells have never been seen.
pub type MapSnapshot = Table<Option<ViewIndex>>;

#[derive(Debug, Clone, PartialEq)]
pub struct Table<T> {
    bounds: Rect,
    cells: Vec<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("cell count mismatch: expected {expected}, got {actual}")]
    CellCountMismatch { expected: usize, actual: usize },
}

impl<T> Table<T> {
    pub fn new(bounds: Rect, cells: Vec<T>) -> Result<Self, TableError> {
        let expected = bounds.width() as usize * bounds.height() as usize;
        let actual = cells.len();
        if expected != actual {
            return Err(TableError::CellCountMismatch { expected, actual });
        }
        Ok(Self { bounds, cells })
    }

    pub fn from_fn(bounds: Rect, mut cell: impl FnMut(Vec2) -> T) -> Self {
        let cells = bounds.positions().map(&mut cell).collect();
        Self { bounds, cells }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    fn index_of(&self, pos: Vec2) -> Option<usize> {
        if !self.bounds.contains(pos) {
            return None;
        }
        let x = (pos.x - self.bounds.left) as usize;
        let y = (pos.y - self.bounds.top) as usize;
        Some(y * self.bounds.width() as usize + x)
    }

    pub fn get(&self, pos: Vec2) -> Option<&T> {
        self.index_of(pos).and_then(|index| self.cells.get(index))
    }

    pub fn get_mut(&mut self, pos: Vec2) -> Option<&mut T> {
        self.index_of(pos)
            .and_then(move |index| self.cells.get_mut(index))
    }

    pub fn set(&mut self, pos: Vec2, value: T) -> bool {
        match self.get_mut(pos) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }
}

impl<T: Clone> Table<T> {
    pub fn filled(bounds: Rect, value: T) -> Self {
        Self::from_fn(bounds, |_| value.clone())
    }

    pub fn fill(&mut self, value: T) {
        for cell in &mut self.cells {
            *cell = value.clone();
        }
    }
}

impl<T> Table<Option<T>> {
    pub fn present(&self, pos: Vec2) -> Option<&T> {
        self.get(pos).and_then(Option::as_ref)
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            bounds: Rect::default(),
            cells: Vec::new(),
        }
    }
}
