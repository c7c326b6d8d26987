#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed screen renderer for Cannonade.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature. Consumers that need sound playback can opt back
//! in by enabling `macroquad/audio` in their own `Cargo.toml` dependency
//! specification.
//!
//! Every figure is drawn as an outline over a solid background: the field
//! frame first, then the tank, building and crater silhouettes, then each
//! trail as a run of dash chords. The session closure blocks on terminal
//! input between frames, so the window holds the last presented frame while
//! a player types their orders.

use anyhow::{Context, Result};
use cannonade_core::{Circle, Point, Rect};
use cannonade_rendering::{
    dash_segments, present, Color, DeviceError, OutputDevice, Presentation, RenderingBackend,
    Scene, SessionFlow,
};
use macroquad::input::{is_key_pressed, KeyCode};
use std::sync::mpsc;

/// Stroke width of every outline, in field pixels before scaling.
const STROKE_WIDTH: f32 = 4.0;

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to close the window and end the session.
    quit_requested: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);

        Self { quit_requested }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut advance: F) -> Result<()>
    where
        F: FnMut(&mut Scene) -> Result<SessionFlow> + 'static,
    {
        let Self { swap_interval } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 960,
            window_height: 640,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (outcome_sender, outcome_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut outcome_sender = Some(outcome_sender);
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                let mut device = MacroquadDevice::new(metrics);
                if let Err(error) =
                    present(&mut device, &scene).context("failed to present the scene")
                {
                    if let Some(sender) = outcome_sender.take() {
                        let _ = sender.send(Err(error));
                    }
                    break;
                }

                macroquad::window::next_frame().await;

                // The session blocks on terminal input here; the window keeps
                // showing the frame presented above until orders arrive.
                match advance(&mut scene) {
                    Ok(SessionFlow::Continue) => {}
                    Ok(SessionFlow::Quit) => break,
                    Err(error) => {
                        if let Some(sender) = outcome_sender.take() {
                            let _ = sender.send(Err(error));
                        }
                        break;
                    }
                }
            }

            if let Some(sender) = outcome_sender.take() {
                let _ = sender.send(Ok(()));
            }
        });

        outcome_receiver.recv().unwrap_or_else(|_| Ok(()))
    }
}

/// Projection from field space onto the window, computed once per frame.
#[derive(Clone, Copy, Debug)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    field_height: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let world_width = scene.field.width() as f32;
        let world_height = scene.field.height() as f32;
        let scale = if world_width <= 0.0 || world_height <= 0.0 {
            1.0
        } else {
            (screen_width / world_width).min(screen_height / world_height)
        };
        let offset_x = ((screen_width - world_width * scale) * 0.5).max(0.0);
        let offset_y = ((screen_height - world_height * scale) * 0.5).max(0.0);

        Self {
            scale,
            offset_x,
            offset_y,
            field_height: world_height,
        }
    }

    /// Maps a field-space point onto the window, flipping the upward field
    /// y axis onto the downward screen y axis.
    fn project(&self, point: Point) -> (f32, f32) {
        (
            self.offset_x + point.x() as f32 * self.scale,
            self.offset_y + (self.field_height - point.y() as f32) * self.scale,
        )
    }

    fn stroke(&self) -> f32 {
        (STROKE_WIDTH * self.scale).max(1.0)
    }
}

/// Output device drawing outline figures straight onto the macroquad canvas.
#[derive(Clone, Copy, Debug)]
struct MacroquadDevice {
    metrics: SceneMetrics,
}

impl MacroquadDevice {
    fn new(metrics: SceneMetrics) -> Self {
        Self { metrics }
    }
}

impl OutputDevice for MacroquadDevice {
    fn draw_rectangle(&mut self, rect: Rect, color: Color) -> Result<(), DeviceError> {
        let (left, top) = self.metrics.project(rect.top_left());
        let (right, bottom) = self.metrics.project(rect.bottom_right());
        macroquad::shapes::draw_rectangle_lines(
            left,
            top,
            right - left,
            bottom - top,
            self.metrics.stroke(),
            to_macroquad_color(color),
        );
        Ok(())
    }

    fn draw_circle(&mut self, circle: Circle, color: Color) -> Result<(), DeviceError> {
        let (center_x, center_y) = self.metrics.project(circle.center());
        macroquad::shapes::draw_circle_lines(
            center_x,
            center_y,
            circle.radius() as f32 * self.metrics.scale,
            self.metrics.stroke(),
            to_macroquad_color(color),
        );
        Ok(())
    }

    fn draw_path(&mut self, path: &[Point], color: Color) -> Result<(), DeviceError> {
        let ink = to_macroquad_color(color);
        for (start, end) in dash_segments(path) {
            let (start_x, start_y) = self.metrics.project(start);
            let (end_x, end_y) = self.metrics.project(end);
            macroquad::shapes::draw_line(
                start_x,
                start_y,
                end_x,
                end_y,
                self.metrics.stroke(),
                ink,
            );
        }
        Ok(())
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
