use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::{Error as PixelsError, Pixels, SurfaceTexture};
use thiserror::Error;
use tracing::{debug, info, warn};
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::error::{EventLoopError, OsError};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::backend::{CanvasFrame, TextureSet};
use crate::geometry::{Rect, Vec2};
use crate::map::MapView;

use super::input::{InputCollector, PointerEvent, ViewerAction};
use super::metrics::FrameMetrics;

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub max_render_fps: Option<u32>,
    pub metrics_log_interval: Duration,
    pub sprite_mode: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_title: "Map View".to_string(),
            window_width: 1280,
            window_height: 720,
            max_render_fps: Some(60),
            metrics_log_interval: Duration::from_secs(1),
            sprite_mode: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create viewer window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize pixel surface: {0}")]
    CreatePixels(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_viewer(
    config: ViewerConfig,
    mut view: MapView,
    textures: TextureSet,
    nominal_size: Vec2,
    mut on_frame: impl FnMut(&mut MapView),
) -> Result<(), ViewerError> {
    let event_loop = EventLoop::new().map_err(ViewerError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(ViewerError::CreateWindow)?,
    );
    let size = window.inner_size();
    let mut surface = ViewerSurface::new(Arc::clone(&window), size.width, size.height)
        .map_err(ViewerError::CreatePixels)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    view.set_sprite_mode(config.sprite_mode);
    view.set_bounds(surface.bounds());

    let render_cap = normalize_render_fps_cap(config.max_render_fps);
    let frame_target = target_frame_duration(render_cap);
    let metrics_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    info!(
        width = size.width,
        height = size.height,
        sprite_mode = config.sprite_mode,
        textures = textures.len(),
        textures_loaded = textures.loaded_count(),
        render_fps_cap = %format_render_cap(render_cap),
        "viewer_config"
    );

    let mut input = InputCollector::new();
    let mut metrics = FrameMetrics::new(metrics_interval, Instant::now());
    let mut last_frame_instant = Instant::now();
    let mut last_present_instant = Instant::now();

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = surface.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "viewer_resize_failed");
                        window_target.exit();
                        return;
                    }
                    view.set_bounds(surface.bounds());
                }
                WindowEvent::CursorMoved { position, .. } => {
                    input.set_cursor(surface.cursor_to_pixel(position));
                }
                WindowEvent::CursorLeft { .. } => input.clear_cursor(),
                WindowEvent::MouseInput { state, button, .. } => {
                    input.handle_mouse_input(button, state);
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input.handle_key(event.physical_key, event.state);
                }
                WindowEvent::RedrawRequested => {
                    for pointer in input.take_pointer_events() {
                        apply_pointer_event(&mut view, pointer);
                    }
                    for action in input.take_actions() {
                        if apply_action(&mut view, action) {
                            info!(reason = "escape_key", "shutdown_requested");
                            window_target.exit();
                            return;
                        }
                    }

                    let now = Instant::now();
                    let frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;

                    on_frame(&mut view);

                    let cap_sleep = compute_cap_sleep(
                        Instant::now().saturating_duration_since(last_present_instant),
                        frame_target,
                    );
                    if cap_sleep > Duration::ZERO {
                        thread::sleep(cap_sleep);
                    }

                    let summary = match surface.draw(&mut view, &textures, nominal_size, input.cursor())
                    {
                        Ok(summary) => summary,
                        Err(error) => {
                            warn!(error = %error, "viewer_draw_failed");
                            window_target.exit();
                            return;
                        }
                    };
                    last_present_instant = Instant::now();
                    metrics.record_frame(frame_dt, summary.tiles_drawn);

                    if let Some(snapshot) = metrics.maybe_snapshot(now) {
                        info!(
                            fps = snapshot.fps,
                            frame_time_ms = snapshot.frame_time_ms,
                            tiles_drawn = snapshot.tiles_drawn,
                            animations = summary.animations,
                            "viewer_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => window.request_redraw(),
            Event::LoopExiting => info!("shutdown"),
            _ => {}
        })
        .map_err(ViewerError::EventLoopRun)
}

struct ViewerSurface {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    width: u32,
    height: u32,
}

impl ViewerSurface {
    fn new(window: Arc<Window>, width: u32, height: u32) -> Result<Self, PixelsError> {
        let (width, height) = (width.max(1), height.max(1));
        let pixels = Self::build_pixels(Arc::clone(&window), width, height)?;
        Ok(Self {
            window,
            pixels,
            width,
            height,
        })
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, PixelsError> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), PixelsError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.width = width;
        self.height = height;
        debug!(width, height, "viewer_resized");
        Ok(())
    }

    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    fn cursor_to_pixel(&self, position: PhysicalPosition<f64>) -> Vec2 {
        match self
            .pixels
            .window_pos_to_pixel((position.x as f32, position.y as f32))
        {
            Ok((x, y)) => Vec2::new(x as i32, y as i32),
            Err((x, y)) => Vec2::new(x as i32, y as i32),
        }
    }

    fn draw(
        &mut self,
        view: &mut MapView,
        textures: &TextureSet,
        nominal_size: Vec2,
        cursor: Option<Vec2>,
    ) -> Result<crate::map::FrameSummary, PixelsError> {
        let summary = {
            let frame = self.pixels.frame_mut();
            clear_frame(frame);
            let mut canvas = CanvasFrame::new(frame, self.width, self.height, textures, nominal_size)
                .with_mouse(cursor);
            view.render(&mut canvas)
        };
        self.pixels.render()?;
        Ok(summary)
    }
}

fn clear_frame(frame: &mut [u8]) {
    for pixel in frame.chunks_exact_mut(4) {
        pixel.copy_from_slice(&[0, 0, 0, 255]);
    }
}

fn apply_pointer_event(view: &mut MapView, event: PointerEvent) {
    match event {
        PointerEvent::Moved(pos) => view.on_mouse_move(pos),
        PointerEvent::LeftPressed(pos) => {
            if !view.on_left_click(pos) {
                debug!(x = pos.x, y = pos.y, "viewer_click_ignored");
            }
        }
        PointerEvent::RightPressed(pos) => view.on_right_click(pos),
        PointerEvent::LeftReleased => view.on_mouse_release(),
    }
}

fn apply_action(view: &mut MapView, action: ViewerAction) -> bool {
    match action {
        ViewerAction::Quit => return true,
        ViewerAction::ToggleSpriteMode => {
            let sprite_mode = !view.sprite_mode();
            view.set_sprite_mode(sprite_mode);
        }
        ViewerAction::Scroll(delta) => view.scroll(delta),
    }
    false
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn normalize_render_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn format_render_cap(cap: Option<u32>) -> String {
    match cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    }
}
