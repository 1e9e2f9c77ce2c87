use crate::geometry::{Rect, Vec2};
use crate::view::ViewLayer;

pub trait MapLayout {
    fn square_width(&self) -> i32;
    fn square_height(&self) -> i32;

    fn layers(&self) -> &[ViewLayer];

    fn visible_tiles(&self, view: Rect, world: Rect) -> Vec<Vec2>;

    fn project_on_screen(&self, view: Rect, pos: Vec2) -> Vec2;

    fn project_on_map(&self, view: Rect, pos: Vec2) -> Vec2;

    fn scroll(&mut self, _delta: Vec2) {}

    fn square_size(&self) -> Vec2 {
        Vec2::new(self.square_width(), self.square_height())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    square: Vec2,
    center: Vec2,
    layers: Vec<ViewLayer>,
}

impl GridLayout {
    pub fn new(square: Vec2, center: Vec2) -> Self {
        Self {
            square: Vec2::new(square.x.max(1), square.y.max(1)),
            center,
            layers: ViewLayer::ALL.to_vec(),
        }
    }

    pub fn with_layers(mut self, layers: Vec<ViewLayer>) -> Self {
        self.layers = layers;
        self
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    fn origin(&self, view: Rect) -> Vec2 {
        view.center() - self.center.mult(self.square) - self.square.div(Vec2::new(2, 2))
    }
}

fn floor_div(value: i32, divisor: i32) -> i32 {
    value.div_euclid(divisor)
}

impl MapLayout for GridLayout {
    fn square_width(&self) -> i32 {
        self.square.x
    }

    fn square_height(&self) -> i32 {
        self.square.y
    }

    fn layers(&self) -> &[ViewLayer] {
        &self.layers
    }

    fn visible_tiles(&self, view: Rect, world: Rect) -> Vec<Vec2> {
        if view.is_empty() {
            return Vec::new();
        }
        let min = self.project_on_map(view, view.top_left());
        let max = self.project_on_map(view, Vec2::new(view.right - 1, view.bottom - 1));
        Rect::new(min.x, min.y, max.x + 1, max.y + 1)
            .intersection(world)
            .positions()
            .collect()
    }

    fn project_on_screen(&self, view: Rect, pos: Vec2) -> Vec2 {
        self.origin(view) + pos.mult(self.square)
    }

    fn project_on_map(&self, view: Rect, pos: Vec2) -> Vec2 {
        let local = pos - self.origin(view);
        Vec2::new(
            floor_div(local.x, self.square.x),
            floor_div(local.y, self.square.y),
        )
    }

    fn scroll(&mut self, delta: Vec2) {
        self.center = self.center + delta;
    }
}
