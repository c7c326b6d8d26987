#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line shell that wires the Cannonade systems to an output device.
//!
//! The shell prepares a board, prints its shareable code, then alternates
//! stdin prompts between the players until a tank falls. Each resolved shot
//! is presented either in a live window or appended to a pen program for an
//! AxiDraw-style plotter.

mod layout_code;

use std::{
    fs::File,
    io::{self, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context as _, Result};
use cannonade_core::{Circle, Event, Point, ShotOutcome, BLAST_RADIUS};
use cannonade_rendering::{
    present, Color, OutputDevice as _, Presentation, RenderingBackend as _, Scene, SessionFlow,
    SpritePresentation, TrailPresentation,
};
use cannonade_rendering_macroquad::MacroquadBackend;
use cannonade_rendering_plotter::{PenPlotterDevice, PlotterProfile};
use cannonade_system_bootstrap::Bootstrap;
use cannonade_system_gunnery::{Gunnery, Phase};
use cannonade_system_layout::{Config as LayoutConfig, Layout};
use cannonade_world::{self as world, query, World};
use clap::Parser as _;

use crate::layout_code::BoardLayoutSnapshot;

/// Paper tone shared by the screen clear color and the plotter sheet.
const PAPER: Color = Color::new(1.0, 1.0, 1.0, 1.0);
/// Ink used for the frame, the skyline, the tanks and blast rims.
const INK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
/// Lighter ink for shot trails so the skyline stays readable underneath.
const TRAIL_INK: Color = Color::from_rgb_u8(51, 51, 51);
/// Title of the window opened by the screen backend.
const WINDOW_TITLE: &str = "battlefield";

/// Two-player artillery duel fought over a randomised skyline.
#[derive(clap::Parser, Debug)]
struct Arguments {
    /// Output device that presents the battlefield.
    #[clap(long, value_enum, default_value = "screen")]
    output: OutputKind,
    /// Seed for the skyline generator; drawn at random when omitted.
    #[clap(long)]
    seed: Option<u64>,
    /// Number of buildings raised between the tanks.
    #[clap(long, default_value = "3")]
    buildings: u32,
    /// Board code from an earlier session, replayed instead of generating.
    #[clap(long)]
    layout: Option<String>,
    /// File the pen program is written to when plotting.
    #[clap(long, default_value = "cannonade-plot.txt")]
    plotter_file: PathBuf,
    /// TOML profile describing the plotter hardware.
    #[clap(long)]
    plotter_profile: Option<PathBuf>,
}

/// Devices the match can be presented on.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq)]
enum OutputKind {
    /// Follow the match in a window.
    Screen,
    /// Record the match as a pen program for a plotter.
    Plotter,
}

/// Entry point wiring the systems together for one match.
fn main() -> Result<()> {
    let arguments = Arguments::parse();
    let bootstrap = Bootstrap::default();
    let session = Session::start(&bootstrap, &arguments)?;

    println!("{}", bootstrap.welcome_banner(&session.world));
    println!("Board code: {}", session.board_code());

    match arguments.output {
        OutputKind::Screen => run_screen(session),
        OutputKind::Plotter => {
            let profile = match &arguments.plotter_profile {
                Some(path) => PlotterProfile::from_path(path)?,
                None => PlotterProfile::default(),
            };
            run_plotter(session, &arguments.plotter_file, profile)
        }
    }
}

/// Interactive play session: the world plus the turn-keeping gunnery system.
#[derive(Debug)]
struct Session {
    world: World,
    gunnery: Gunnery,
}

impl Session {
    /// Prepares a board from a shared code or from the skyline generator.
    fn start(bootstrap: &Bootstrap, arguments: &Arguments) -> Result<Self> {
        let mut world = World::new();
        let mut events = Vec::new();

        match &arguments.layout {
            Some(code) => {
                let snapshot = BoardLayoutSnapshot::decode(code)
                    .context("failed to decode the shared board code")?;
                for command in snapshot.commands() {
                    world::apply(&mut world, command, &mut events);
                }
            }
            None => {
                let seed = arguments.seed.unwrap_or_else(rand::random);
                let mut layout = Layout::new(LayoutConfig::new(arguments.buildings, seed));

                let open_field = bootstrap.open_field(bootstrap.field(&world));
                world::apply(&mut world, open_field, &mut events);

                let mut commands = Vec::new();
                layout.handle(&events, &mut commands);
                for command in commands {
                    world::apply(&mut world, command, &mut events);
                }
            }
        }

        if let Some(rejection) = describe_rejection(&events) {
            bail!("board setup failed: {rejection}");
        }
        if query::tank_view(&world).iter().count() != 2 {
            bail!("board setup must deploy a tank for each player");
        }

        let mut gunnery = Gunnery::new();
        gunnery.handle(&events);
        Ok(Self { world, gunnery })
    }

    /// Shareable code reproducing the current board.
    fn board_code(&self) -> String {
        BoardLayoutSnapshot::capture(&self.world).encode()
    }

    fn match_over(&self) -> bool {
        query::match_over(&self.world)
    }

    /// Prompts the active player until one shot resolves.
    ///
    /// Returns `None` once the match is over or the input stream ends.
    fn play_turn(&mut self) -> Result<Option<ShotReport>> {
        loop {
            let Phase::AwaitingOrders(player) = self.gunnery.phase() else {
                return Ok(None);
            };

            print!(
                "Player {}: Enter angle and velocity (i.e. 50 160) ",
                player.number()
            );
            io::stdout().flush().context("failed to flush the prompt")?;

            let mut line = String::new();
            let read = io::stdin()
                .read_line(&mut line)
                .context("failed to read an aiming order")?;
            if read == 0 {
                return Ok(None);
            }
            let Some((angle_degrees, force)) = parse_orders(&line) else {
                continue;
            };

            let command = match self.gunnery.fire_order(angle_degrees, force) {
                Ok(command) => command,
                Err(error) => {
                    println!("{error}");
                    continue;
                }
            };

            let mut events = Vec::new();
            world::apply(&mut self.world, command, &mut events);
            self.gunnery.handle(&events);

            let mut report = None;
            for event in &events {
                match event {
                    Event::ShotResolved { outcome, path, .. } => {
                        match outcome {
                            ShotOutcome::TankHit { .. } | ShotOutcome::BuildingHit { .. } => {
                                println!("hit");
                            }
                            ShotOutcome::Miss { .. } => println!("out"),
                        }
                        report = Some(ShotReport {
                            outcome: *outcome,
                            path: path.clone(),
                        });
                    }
                    Event::MatchEnded { winner } => {
                        println!("Player {} wins", winner.number());
                    }
                    _ => {}
                }
            }

            if let Some(report) = report {
                return Ok(Some(report));
            }
        }
    }
}

/// Outcome of one resolved shot, kept for presentation.
struct ShotReport {
    outcome: ShotOutcome,
    path: Vec<Point>,
}

/// Presents the match in a window, reading orders between frames.
fn run_screen(mut session: Session) -> Result<()> {
    let mut scene = Scene::new(query::field(&session.world), INK);
    populate_sprites(&session.world, &mut scene);
    let presentation = Presentation::new(WINDOW_TITLE, PAPER, scene);

    MacroquadBackend::new()
        .with_vsync(true)
        .run(presentation, move |scene| {
            if session.match_over() {
                return Ok(SessionFlow::Continue);
            }
            match session.play_turn()? {
                Some(report) => {
                    scene
                        .trails
                        .push(TrailPresentation::new(report.path, TRAIL_INK));
                    populate_sprites(&session.world, scene);
                    Ok(SessionFlow::Continue)
                }
                None => Ok(SessionFlow::Quit),
            }
        })
}

/// Records the match as an append-only pen program.
fn run_plotter(mut session: Session, path: &Path, profile: PlotterProfile) -> Result<()> {
    let field = query::field(&session.world);
    let file = File::create(path)
        .with_context(|| format!("failed to create pen program at {}", path.display()))?;
    let mut device = PenPlotterDevice::new(BufWriter::new(file), field, profile)?;

    let mut scene = Scene::new(field, INK);
    populate_sprites(&session.world, &mut scene);
    present(&mut device, &scene).context("failed to plot the opening board")?;

    while let Some(report) = session.play_turn()? {
        device.draw_path(&report.path, TRAIL_INK)?;
        if let ShotOutcome::TankHit { at, .. } | ShotOutcome::BuildingHit { at, .. } =
            report.outcome
        {
            device.draw_circle(Circle::new(at, BLAST_RADIUS), INK)?;
        }
    }

    let mut sink = device.into_inner();
    sink.flush().context("failed to flush the pen program")?;
    println!("Pen program written to {}", path.display());
    Ok(())
}

/// Rebuilds the sprite list from the world's tanks, skyline and craters.
fn populate_sprites(world: &World, scene: &mut Scene) {
    scene.sprites.clear();
    for building in query::building_view(world).iter() {
        scene.sprites.push(SpritePresentation::new(building.sprite(), INK));
    }
    for tank in query::tank_view(world).iter() {
        scene.sprites.push(SpritePresentation::new(tank.sprite(), INK));
    }
    for crater in query::explosion_view(world).iter() {
        scene.sprites.push(SpritePresentation::new(crater.sprite(), INK));
    }
}

/// First setup rejection in the event stream, described for the operator.
fn describe_rejection(events: &[Event]) -> Option<String> {
    events.iter().find_map(|event| match event {
        Event::FieldRejected { size, reason } => Some(format!(
            "field of {}x{} refused: {reason:?}",
            size.width(),
            size.height()
        )),
        Event::BuildingRejected { center_x, reason } => {
            Some(format!("building at column {center_x} refused: {reason:?}"))
        }
        Event::TankRejected { player, reason } => Some(format!(
            "tank for player {} refused: {reason:?}",
            player.number()
        )),
        _ => None,
    })
}

/// Parses an aiming order of the form `"<angle> <force>"`.
///
/// Any other shape, including trailing tokens, yields `None` so the prompt
/// can be repeated.
fn parse_orders(line: &str) -> Option<(i32, i32)> {
    let mut tokens = line.split_whitespace();
    let angle_degrees = tokens.next()?.parse().ok()?;
    let force = tokens.next()?.parse().ok()?;
    if tokens.next().is_some() {
        return None;
    }
    Some((angle_degrees, force))
}
