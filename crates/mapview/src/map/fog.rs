use crate::geometry::{Dir, DirSet, Rect, Vec2};
use crate::view::Table;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FogMask {
    pub edges: DirSet,
    pub corners: DirSet,
}

#[derive(Debug, Clone, Default)]
pub struct FogOfWar {
    grid: Table<bool>,
}

impl FogOfWar {
    pub fn new(bounds: Rect) -> Self {
        Self {
            grid: Table::filled(bounds, false),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.grid.bounds()
    }

    pub fn resize(&mut self, bounds: Rect) {
        if self.grid.bounds() != bounds {
            self.grid = Table::filled(bounds, false);
        }
    }

    pub fn clear(&mut self) {
        self.grid.fill(false);
    }

    pub fn mark(&mut self, pos: Vec2) {
        self.grid.set(pos, true);
    }

    // Out of bounds counts as fogged.
    pub fn is_fogged(&self, pos: Vec2) -> bool {
        self.grid.get(pos).copied().unwrap_or(true)
    }

    pub fn fogged_count(&self) -> usize {
        self.grid
            .bounds()
            .positions()
            .filter(|pos| self.is_fogged(*pos))
            .count()
    }

    // A diagonal gets a corner when it is fogged and both flanking cardinals are visible.
    pub fn mask(&self, pos: Vec2) -> FogMask {
        let visible = |dir: Dir| !self.is_fogged(pos + dir.offset());
        let edges: DirSet = Dir::CARDINAL.into_iter().filter(|dir| visible(*dir)).collect();
        let corners = Dir::DIAGONAL
            .into_iter()
            .filter(|dir| match dir.flanking_cardinals() {
                Some((a, b)) => edges.has(a) && edges.has(b) && !visible(*dir),
                None => false,
            })
            .collect();
        FogMask { edges, corners }
    }
}
