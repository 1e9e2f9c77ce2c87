use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameMetricsSnapshot {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub tiles_drawn: usize,
}

#[derive(Debug)]
pub(crate) struct FrameMetrics {
    interval_start: Instant,
    interval: Duration,
    frames: u32,
    frame_time_sum: Duration,
    last_tiles_drawn: usize,
}

impl FrameMetrics {
    pub(crate) fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval_start: now,
            interval,
            frames: 0,
            frame_time_sum: Duration::ZERO,
            last_tiles_drawn: 0,
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration, tiles_drawn: usize) {
        self.frames = self.frames.saturating_add(1);
        self.frame_time_sum = self.frame_time_sum.saturating_add(frame_dt);
        self.last_tiles_drawn = tiles_drawn;
    }

    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<FrameMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed < self.interval {
            return None;
        }

        let elapsed_seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = if self.frames == 0 {
            0.0
        } else {
            (self.frame_time_sum.as_secs_f32() / self.frames as f32) * 1000.0
        };
        let snapshot = FrameMetricsSnapshot {
            fps: self.frames as f32 / elapsed_seconds,
            frame_time_ms,
            tiles_drawn: self.last_tiles_drawn,
        };

        self.interval_start = now;
        self.frames = 0;
        self.frame_time_sum = Duration::ZERO;
        Some(snapshot)
    }
}
