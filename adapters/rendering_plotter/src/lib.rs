#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pen-plotter rendering adapter for Cannonade.
//!
//! A plotter lays permanent ink, so this adapter never repaints. It streams
//! an append-only pen program onto an `io::Write` sink, one command per line
//! with coordinates in inches: the driver options from the profile open the
//! program, and every figure ends with the pen raised and parked at the
//! machine origin. Field coordinates grow upward while plot coordinates grow
//! away from the carriage home, so figures are flipped during projection.

use std::{fs, io::Write, path::Path};

use anyhow::{bail, Context, Result};
use cannonade_core::{Circle, FieldSize, Point, Rect};
use cannonade_rendering::{dash_segments, Color, DeviceError, OutputDevice};

const SUPPORTED_PROFILE_VERSION: u32 = 1;

/// Conversion factor from field pixels to plotter inches.
const PX_TO_INCH: f64 = 1.0 / 96.0;

/// Angular distance between consecutive rim samples of a plotted circle.
const RIM_STEP_DEGREES: usize = 20;

/// Driver options replayed at the top of every pen program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlotterProfile {
    /// Hardware model selector understood by the plotter driver.
    pub model: u32,
    /// Raised pen height as a percentage of the servo range.
    pub pen_pos_up: u32,
}

impl Default for PlotterProfile {
    fn default() -> Self {
        // Model 4 selects the MiniKit on stock AxiDraw firmware.
        Self {
            model: 4,
            pen_pos_up: 70,
        }
    }
}

impl PlotterProfile {
    /// Loads a profile from the TOML file at the provided path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let profile_path = path.as_ref();
        let contents = fs::read_to_string(profile_path).with_context(|| {
            format!(
                "failed to read plotter profile at {}",
                profile_path.display()
            )
        })?;
        parse_profile(&contents)
    }
}

#[derive(Debug, serde::Deserialize)]
struct ProfileFile {
    version: u32,
    model: u32,
    pen_pos_up: u32,
}

fn parse_profile(contents: &str) -> Result<PlotterProfile> {
    let profile: ProfileFile =
        toml::from_str(contents).context("failed to parse plotter profile toml contents")?;
    if profile.version != SUPPORTED_PROFILE_VERSION {
        bail!(
            "unsupported plotter profile version {}; expected {}",
            profile.version,
            SUPPORTED_PROFILE_VERSION
        );
    }

    Ok(PlotterProfile {
        model: profile.model,
        pen_pos_up: profile.pen_pos_up,
    })
}

/// Output device that streams a single-ink pen program onto a writer.
#[derive(Debug)]
pub struct PenPlotterDevice<W> {
    sink: W,
    field: FieldSize,
}

impl<W> PenPlotterDevice<W>
where
    W: Write,
{
    /// Opens a pen program on the sink, replaying the profile options first.
    pub fn new(
        mut sink: W,
        field: FieldSize,
        profile: PlotterProfile,
    ) -> Result<Self, DeviceError> {
        writeln!(sink, "option model {}", profile.model)?;
        writeln!(sink, "option pen_pos_up {}", profile.pen_pos_up)?;
        Ok(Self { sink, field })
    }

    /// Hands the sink back so the caller can flush or close it.
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Maps a field-space position onto the sheet, flipping the upward field
    /// y axis onto the downward plot y axis.
    fn project(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * PX_TO_INCH,
            (f64::from(self.field.height()) - y) * PX_TO_INCH,
        )
    }

    fn inside_field(&self, x: f64, y: f64) -> bool {
        let width = f64::from(self.field.width());
        let height = f64::from(self.field.height());
        0.0 < x && x < width && 0.0 < y && y < height
    }

    fn travel(&mut self, x: f64, y: f64) -> Result<(), DeviceError> {
        writeln!(self.sink, "goto {x:.4} {y:.4}")?;
        Ok(())
    }

    fn stroke(&mut self, x: f64, y: f64) -> Result<(), DeviceError> {
        writeln!(self.sink, "lineto {x:.4} {y:.4}")?;
        Ok(())
    }

    fn pen_down(&mut self) -> Result<(), DeviceError> {
        writeln!(self.sink, "pendown")?;
        Ok(())
    }

    fn pen_up(&mut self) -> Result<(), DeviceError> {
        writeln!(self.sink, "penup")?;
        Ok(())
    }

    fn park(&mut self) -> Result<(), DeviceError> {
        self.travel(0.0, 0.0)
    }
}

impl<W> OutputDevice for PenPlotterDevice<W>
where
    W: Write,
{
    fn draw_rectangle(&mut self, rect: Rect, _color: Color) -> Result<(), DeviceError> {
        let top_left = rect.top_left();
        let bottom_right = rect.bottom_right();
        let (left, top) = self.project(f64::from(top_left.x()), f64::from(top_left.y()));
        let (right, bottom) =
            self.project(f64::from(bottom_right.x()), f64::from(bottom_right.y()));

        self.travel(left, top)?;
        self.pen_down()?;
        self.stroke(left, bottom)?;
        self.stroke(right, bottom)?;
        self.stroke(right, top)?;
        self.stroke(left, top)?;
        self.pen_up()?;
        self.park()
    }

    fn draw_circle(&mut self, circle: Circle, _color: Color) -> Result<(), DeviceError> {
        let center_x = f64::from(circle.center().x());
        let center_y = f64::from(circle.center().y());
        let radius = f64::from(circle.radius());

        // Rim samples falling outside the field are dropped; the pen bridges
        // the gap with a straight stroke between the surviving neighbours.
        let mut rim = Vec::new();
        for phi in (0..360).step_by(RIM_STEP_DEGREES) {
            let (sin, cos) = (phi as f64).to_radians().sin_cos();
            let x = center_x + radius * sin;
            let y = center_y - radius * cos;
            if self.inside_field(x, y) {
                rim.push(self.project(x, y));
            }
        }

        let Some(&(first_x, first_y)) = rim.first() else {
            return Ok(());
        };

        self.travel(first_x, first_y)?;
        self.pen_down()?;
        for (x, y) in rim.into_iter().skip(1) {
            self.stroke(x, y)?;
        }
        self.pen_up()?;
        self.park()
    }

    fn draw_path(&mut self, path: &[Point], _color: Color) -> Result<(), DeviceError> {
        let chords = dash_segments(path);
        if chords.is_empty() {
            return Ok(());
        }

        for (start, end) in chords {
            let (start_x, start_y) = self.project(f64::from(start.x()), f64::from(start.y()));
            let (end_x, end_y) = self.project(f64::from(end.x()), f64::from(end.y()));
            self.travel(start_x, start_y)?;
            self.pen_down()?;
            self.stroke(end_x, end_y)?;
            self.pen_up()?;
        }
        self.park()
    }
}
