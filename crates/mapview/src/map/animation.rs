use std::collections::VecDeque;
use std::time::Duration;

use tracing::warn;

use crate::backend::{FontId, RenderBackend, TextDraw};
use crate::color::{channel, Color};
use crate::geometry::{Rect, Vec2};

pub const MAX_ANIMATIONS: usize = 256;

pub trait Animation {
    fn is_done(&self, elapsed: Duration) -> bool;

    fn render(&self, backend: &mut dyn RenderBackend, view: Rect, anchor: Vec2, elapsed: Duration);
}

struct AnimationEntry {
    animation: Box<dyn Animation>,
    position: Vec2,
    started: Duration,
}

#[derive(Default)]
pub struct AnimationOverlay {
    entries: VecDeque<AnimationEntry>,
}

impl AnimationOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, animation: Box<dyn Animation>, position: Vec2, now: Duration) {
        if self.entries.len() >= MAX_ANIMATIONS {
            self.entries.pop_front();
            warn!(
                cap = MAX_ANIMATIONS,
                x = position.x,
                y = position.y,
                "animation_cap_reached_dropping_oldest"
            );
        }
        self.entries.push_back(AnimationEntry {
            animation,
            position,
            started: now,
        });
    }

    pub fn prune(&mut self, now: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| {
            !entry
                .animation
                .is_done(now.saturating_sub(entry.started))
        });
        before - self.entries.len()
    }

    pub fn render(
        &self,
        backend: &mut dyn RenderBackend,
        view: Rect,
        now: Duration,
        project: impl Fn(Vec2) -> Vec2,
    ) {
        for entry in &self.entries {
            let elapsed = now.saturating_sub(entry.started);
            entry
                .animation
                .render(backend, view, project(entry.position), elapsed);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.entries.iter().map(|entry| entry.position)
    }
}

fn remaining_fraction(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 0.0;
    }
    (1.0 - elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlashAnimation {
    pub color: Color,
    pub size: Vec2,
    pub duration: Duration,
}

impl FlashAnimation {
    pub fn new(color: Color, size: Vec2, duration: Duration) -> Self {
        Self {
            color,
            size,
            duration,
        }
    }
}

impl Animation for FlashAnimation {
    fn is_done(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }

    fn render(&self, backend: &mut dyn RenderBackend, view: Rect, anchor: Vec2, elapsed: Duration) {
        let rect = Rect::from_size(anchor, self.size).intersection(view);
        if rect.is_empty() {
            return;
        }
        let alpha = channel(self.color.a as f64 * remaining_fraction(elapsed, self.duration));
        backend.draw_filled_rect(rect, self.color.with_alpha(alpha), None);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlyphPopAnimation {
    pub text: String,
    pub color: Color,
    pub size: Vec2,
    pub rise: i32,
    pub duration: Duration,
}

impl GlyphPopAnimation {
    pub fn new(text: impl Into<String>, color: Color, size: Vec2, duration: Duration) -> Self {
        Self {
            text: text.into(),
            color,
            size,
            rise: size.y,
            duration,
        }
    }
}

impl Animation for GlyphPopAnimation {
    fn is_done(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }

    fn render(&self, backend: &mut dyn RenderBackend, view: Rect, anchor: Vec2, elapsed: Duration) {
        if !view.contains(anchor) {
            return;
        }
        let remaining = remaining_fraction(elapsed, self.duration);
        let risen = (self.rise as f64 * (1.0 - remaining)) as i32;
        backend.draw_text(&TextDraw {
            font: FontId::Text,
            size: self.size.y,
            color: self
                .color
                .with_alpha(channel(self.color.a as f64 * remaining)),
            pos: Vec2::new(anchor.x + self.size.x / 2, anchor.y - risen),
            text: &self.text,
            centered: true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::RecordingBackend;
    use crate::color;
    use std::cell::RefCell;
    use std::rc::Rc;

    const VIEW: Rect = Rect::new(0, 0, 200, 200);

    struct Probe {
        duration: Duration,
        seen: Rc<RefCell<Vec<(Vec2, Duration)>>>,
    }

    impl Animation for Probe {
        fn is_done(&self, elapsed: Duration) -> bool {
            elapsed >= self.duration
        }

        fn render(&self, _: &mut dyn RenderBackend, _: Rect, anchor: Vec2, elapsed: Duration) {
            self.seen.borrow_mut().push((anchor, elapsed));
        }
    }

    fn flash() -> Box<dyn Animation> {
        Box::new(FlashAnimation::new(
            color::WHITE,
            Vec2::new(10, 10),
            Duration::from_millis(100),
        ))
    }

    #[test]
    fn animation_lives_until_its_duration_ends() {
        let mut overlay = AnimationOverlay::new();
        overlay.add(flash(), Vec2::new(1, 1), Duration::from_millis(1_000));

        assert_eq!(overlay.prune(Duration::from_millis(1_050)), 0);
        assert_eq!(overlay.len(), 1);
        assert_eq!(overlay.prune(Duration::from_millis(1_100)), 1);
        assert!(overlay.is_empty());
    }

    #[test]
    fn render_passes_projected_anchor_and_elapsed_time() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut overlay = AnimationOverlay::new();
        overlay.add(
            Box::new(Probe {
                duration: Duration::from_secs(1),
                seen: seen.clone(),
            }),
            Vec2::new(2, 3),
            Duration::from_millis(500),
        );
        let mut backend = RecordingBackend::new();
        overlay.render(&mut backend, VIEW, Duration::from_millis(750), |pos| {
            pos.mult(Vec2::new(10, 10))
        });
        assert_eq!(
            *seen.borrow(),
            vec![(Vec2::new(20, 30), Duration::from_millis(250))]
        );
    }

    #[test]
    fn cap_drops_the_oldest_animation() {
        let mut overlay = AnimationOverlay::new();
        for index in 0..MAX_ANIMATIONS as i32 + 1 {
            overlay.add(flash(), Vec2::new(index, 0), Duration::ZERO);
        }
        assert_eq!(overlay.len(), MAX_ANIMATIONS);
        assert_eq!(overlay.positions().next(), Some(Vec2::new(1, 0)));
    }

    #[test]
    fn flash_fades_over_its_duration() {
        let animation = FlashAnimation::new(color::WHITE, Vec2::new(10, 10), Duration::from_millis(100));
        let mut backend = RecordingBackend::new();
        animation.render(&mut backend, VIEW, Vec2::new(5, 5), Duration::from_millis(50));
        let rects = backend.rects();
        assert_eq!(rects[0].0, Rect::new(5, 5, 15, 15));
        assert_eq!(rects[0].1.a, 127);
    }

    #[test]
    fn flash_outside_the_view_draws_nothing() {
        let animation = FlashAnimation::new(color::WHITE, Vec2::new(10, 10), Duration::from_millis(100));
        let mut backend = RecordingBackend::new();
        animation.render(&mut backend, VIEW, Vec2::new(300, 5), Duration::ZERO);
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn glyph_pop_rises_and_fades() {
        let animation = GlyphPopAnimation::new("+5", color::YELLOW, Vec2::new(20, 20), Duration::from_millis(200));
        let mut backend = RecordingBackend::new();
        animation.render(&mut backend, VIEW, Vec2::new(40, 40), Duration::from_millis(100));
        match &backend.calls[0] {
            crate::backend::recording::DrawCall::Text { pos, color, text, .. } => {
                assert_eq!(text, "+5");
                assert_eq!(*pos, Vec2::new(50, 30));
                assert_eq!(color.a, 127);
            }
            other => panic!("unexpected call: {other:?}"),
        }
        assert!(animation.is_done(Duration::from_millis(200)));
    }
}
