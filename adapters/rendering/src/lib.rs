#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Cannonade output devices.
//!
//! Devices speak the same small protocol: rectangles, circles and dashed
//! projectile paths, with sprites dispatched onto the first two. A scene can
//! be replayed through any device in full, which is how the interactive
//! screen refreshes, while pen hardware is fed figure by figure instead.

use anyhow::Result as AnyResult;
use cannonade_core::{Circle, FieldSize, Point, Rect, Shape};
use std::{error::Error, fmt, io};

/// Number of path samples bridged by a single dash chord.
pub const DASH_SPAN: usize = 10;

/// Number of path samples between the starts of consecutive dash chords.
pub const DASH_STRIDE: usize = 20;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Surface shared by every output device.
///
/// Coordinates are field pixels with y growing upward; each device owns its
/// own flip and scaling. Filled versus outlined interpretation is also the
/// device's business, since pen hardware cannot fill.
pub trait OutputDevice {
    /// Renders an axis-aligned rectangle.
    fn draw_rectangle(&mut self, rect: Rect, color: Color) -> Result<(), DeviceError>;

    /// Renders a circle.
    fn draw_circle(&mut self, circle: Circle, color: Color) -> Result<(), DeviceError>;

    /// Renders a projectile path using the shared dash pattern.
    fn draw_path(&mut self, path: &[Point], color: Color) -> Result<(), DeviceError>;

    /// Renders a sprite by dispatching each shape onto the primitive calls.
    fn draw_sprite(&mut self, sprite: &[Shape], color: Color) -> Result<(), DeviceError> {
        for shape in sprite {
            match shape {
                Shape::Rectangle(rect) => self.draw_rectangle(*rect, color)?,
                Shape::Circle(circle) => self.draw_circle(*circle, color)?,
            }
        }
        Ok(())
    }
}

/// Splits a projectile path into the chords composing its dashed rendering.
///
/// Chords bridge [`DASH_SPAN`] samples and start every [`DASH_STRIDE`]
/// samples, so paths shorter than `DASH_SPAN + 1` produce no chords at all.
#[must_use]
pub fn dash_segments(path: &[Point]) -> Vec<(Point, Point)> {
    (0..path.len().saturating_sub(DASH_SPAN))
        .step_by(DASH_STRIDE)
        .map(|index| (path[index], path[index + DASH_SPAN]))
        .collect()
}

/// Figure drawn with a single sprite and ink color.
#[derive(Clone, Debug, PartialEq)]
pub struct SpritePresentation {
    /// Shapes composing the figure, drawn in order.
    pub shapes: Vec<Shape>,
    /// Ink used for every shape of the figure.
    pub color: Color,
}

impl SpritePresentation {
    /// Creates a new sprite presentation descriptor.
    #[must_use]
    pub fn new(shapes: Vec<Shape>, color: Color) -> Self {
        Self { shapes, color }
    }
}

/// Dashed projectile trail left behind by a resolved shot.
#[derive(Clone, Debug, PartialEq)]
pub struct TrailPresentation {
    /// In-field samples of the shot in flight order.
    pub path: Vec<Point>,
    /// Ink used for the dash chords.
    pub color: Color,
}

impl TrailPresentation {
    /// Creates a new trail presentation descriptor.
    #[must_use]
    pub fn new(path: Vec<Point>, color: Color) -> Self {
        Self { path, color }
    }
}

/// Scene description combining the field frame and every visible figure.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Dimensions of the playing field, framing every figure.
    pub field: FieldSize,
    /// Ink used for the field frame.
    pub frame_color: Color,
    /// Current sprites for tanks, buildings and craters, in draw order.
    pub sprites: Vec<SpritePresentation>,
    /// Trails of every shot resolved so far, oldest first.
    pub trails: Vec<TrailPresentation>,
}

impl Scene {
    /// Creates a new scene descriptor with no figures.
    #[must_use]
    pub fn new(field: FieldSize, frame_color: Color) -> Self {
        Self {
            field,
            frame_color,
            sprites: Vec::new(),
            trails: Vec::new(),
        }
    }

    /// Rectangle framing the playing field.
    #[must_use]
    pub fn frame(&self) -> Rect {
        Rect::from_corners(
            Point::new(0, self.field.height()),
            Point::new(self.field.width(), 0),
        )
    }
}

/// Replays a full scene through a device, frame first, trails last.
pub fn present(device: &mut dyn OutputDevice, scene: &Scene) -> Result<(), DeviceError> {
    device.draw_rectangle(scene.frame(), scene.frame_color)?;
    for sprite in &scene.sprites {
        device.draw_sprite(&sprite.shapes, sprite.color)?;
    }
    for trail in &scene.trails {
        device.draw_path(&trail.path, trail.color)?;
    }
    Ok(())
}

/// Presentation descriptor consumed by windowed rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Whether the session wants the backend to keep running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionFlow {
    /// Keep presenting frames and asking the session to advance.
    Continue,
    /// Tear the backend down after the current frame.
    Quit,
}

/// Rendering backend capable of presenting Cannonade scenes in a window.
pub trait RenderingBackend {
    /// Runs the rendering backend until the session asks it to quit.
    ///
    /// The provided `advance` closure blocks on player input, applies the
    /// resulting turn and rewrites the scene to match the new world state.
    fn run<F>(self, presentation: Presentation, advance: F) -> AnyResult<()>
    where
        F: FnMut(&mut Scene) -> AnyResult<SessionFlow> + 'static;
}

/// Errors surfaced by output devices while drawing.
#[derive(Debug)]
pub enum DeviceError {
    /// The device's sink refused the emitted figure.
    Io(io::Error),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(error) => write!(formatter, "output device write failed: {error}"),
        }
    }
}

impl Error for DeviceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(error) => Some(error),
        }
    }
}

impl From<io::Error> for DeviceError {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}
