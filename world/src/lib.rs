#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative match state management for Cannonade.
//!
//! The world owns the playing field, the two tank emplacements, the skyline
//! of destructible buildings and the craters left behind by demolitions. All
//! mutation flows through [`apply`], which validates commands, simulates
//! shots to their terminal sample and broadcasts the resulting events.

use cannonade_core::{
    BuildingId, Circle, Command, Direction, Event, FieldSize, FireError, PlacementError, PlayerId,
    Point, Rect, Shape, ShotOutcome, BLAST_RADIUS, BUILDING_MAX_HEALTH, TANK_HIT_RADIUS,
    WELCOME_BANNER,
};
use cannonade_system_ballistics::{muzzle_velocity, Trajectory, TrajectoryError};

/// Half extent of the square tank body sprite.
const TANK_BODY_HALF_EXTENT: i32 = 5;

/// Radius of the turret disc layered on top of the tank body sprite.
const TANK_TURRET_RADIUS: i32 = 4;

/// Number of slabs used to approximate a demolition cut.
const DEMOLITION_STEPS: i32 = 4;

/// Represents the authoritative Cannonade match state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    field: FieldSize,
    tanks: Vec<Tank>,
    buildings: Vec<Building>,
    explosions: Vec<Explosion>,
    active_player: PlayerId,
    winner: Option<PlayerId>,
    next_building_id: u32,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates a new match on the standard field with no entities placed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            field: FieldSize::STANDARD,
            tanks: Vec::new(),
            buildings: Vec::new(),
            explosions: Vec::new(),
            active_player: PlayerId::One,
            winner: None,
            next_building_id: 0,
        }
    }

    fn reset_entities(&mut self) {
        self.tanks.clear();
        self.buildings.clear();
        self.explosions.clear();
        self.active_player = PlayerId::One;
        self.winner = None;
        self.next_building_id = 0;
    }

    fn tank(&self, player: PlayerId) -> Option<&Tank> {
        self.tanks.iter().find(|tank| tank.player == player)
    }

    fn allocate_building_id(&mut self) -> BuildingId {
        let id = BuildingId::new(self.next_building_id);
        self.next_building_id = self.next_building_id.saturating_add(1);
        id
    }

    fn validate_building(&self, center_x: i32, width: i32, height: i32) -> Option<PlacementError> {
        if width <= 0 || height <= 0 {
            return Some(PlacementError::NonPositiveSize);
        }
        if center_x - width / 2 < 0 || center_x + width / 2 > self.field.width() {
            return Some(PlacementError::OutOfBounds);
        }
        if height > self.field.height() {
            return Some(PlacementError::OutOfBounds);
        }
        None
    }

    fn validate_emplacement(&self, player: PlayerId, position: Point) -> Option<PlacementError> {
        if self.tank(player).is_some() {
            return Some(PlacementError::SlotOccupied);
        }
        if position.x() < 0
            || position.x() > self.field.width()
            || position.y() < 0
            || position.y() > self.field.height()
        {
            return Some(PlacementError::OutOfBounds);
        }
        None
    }

    fn fire_error(&self, player: PlayerId, force: i32) -> Option<FireError> {
        if self.winner.is_some() {
            return Some(FireError::MatchOver);
        }
        if player != self.active_player {
            return Some(FireError::OutOfTurn);
        }
        if self.tank(player).is_none() {
            return Some(FireError::TankMissing);
        }
        if force <= 0 {
            return Some(FireError::NonPositiveForce);
        }
        None
    }

    fn leaves_field(&self, sample: Point) -> bool {
        sample.x() < 0 || sample.x() >= self.field.width() || sample.y() < 0
    }

    fn collects_in_path(&self, sample: Point) -> bool {
        sample.x() > 0
            && sample.x() < self.field.width()
            && sample.y() > 0
            && sample.y() < self.field.height()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureField { size } => {
            if size.width() <= 0 || size.height() <= 0 {
                out_events.push(Event::FieldRejected {
                    size,
                    reason: PlacementError::NonPositiveSize,
                });
                return;
            }

            world.field = size;
            world.reset_entities();
            out_events.push(Event::FieldConfigured { size });
        }
        Command::PlaceBuilding {
            center_x,
            width,
            height,
        } => {
            if let Some(reason) = world.validate_building(center_x, width, height) {
                out_events.push(Event::BuildingRejected { center_x, reason });
                return;
            }

            let building = world.allocate_building_id();
            world.buildings.push(Building {
                id: building,
                center_x,
                width,
                height,
                health: BUILDING_MAX_HEALTH,
                struck_from: None,
            });
            out_events.push(Event::BuildingPlaced {
                building,
                center_x,
                width,
                height,
            });
        }
        Command::DeployTank { player, position } => {
            if let Some(reason) = world.validate_emplacement(player, position) {
                out_events.push(Event::TankRejected { player, reason });
                return;
            }

            let direction = Direction::for_column(position.x());
            world.tanks.push(Tank {
                player,
                position,
                direction,
            });
            out_events.push(Event::TankDeployed {
                player,
                position,
                direction,
            });
        }
        Command::Fire {
            player,
            angle_degrees,
            force,
        } => fire(world, player, angle_degrees, force, out_events),
    }
}

fn fire(
    world: &mut World,
    player: PlayerId,
    angle_degrees: i32,
    force: i32,
    out_events: &mut Vec<Event>,
) {
    if let Some(reason) = world.fire_error(player, force) {
        out_events.push(Event::ShotRejected { player, reason });
        return;
    }

    let Some(tank) = world.tank(player).copied() else {
        out_events.push(Event::ShotRejected {
            player,
            reason: FireError::TankMissing,
        });
        return;
    };

    let trajectory = match Trajectory::new(
        tank.position,
        tank.direction,
        angle_degrees,
        muzzle_velocity(force),
    ) {
        Ok(trajectory) => trajectory,
        Err(error) => {
            let reason = match error {
                TrajectoryError::NonPositiveVelocity => FireError::NonPositiveForce,
                TrajectoryError::VerticalAngle => FireError::VerticalShot,
            };
            out_events.push(Event::ShotRejected { player, reason });
            return;
        }
    };

    out_events.push(Event::ShotFired {
        player,
        angle_degrees,
        force,
    });

    let mut path: Vec<Point> = Vec::new();
    let mut last = tank.position;
    let mut outcome = None;

    for sample in trajectory {
        let pixel = Point::new(sample.x as i32, sample.y as i32);
        last = pixel;
        if world.collects_in_path(pixel) {
            path.push(pixel);
        }

        match resolve_sample(pixel, &world.tanks, &world.explosions, &world.buildings) {
            SampleHit::Tank(victim) => {
                world.winner = Some(player);
                out_events.push(Event::TankDestroyed { player: victim });
                outcome = Some(ShotOutcome::TankHit { victim, at: pixel });
                break;
            }
            SampleHit::Building(index) => {
                let direction = tank.direction;
                let building = &mut world.buildings[index];
                building.register_hit(direction);
                out_events.push(Event::BuildingDamaged {
                    building: building.id,
                    remaining_health: building.health,
                    struck_from: direction,
                });

                world.explosions.push(Explosion {
                    circle: Circle::new(pixel, BLAST_RADIUS),
                });
                out_events.push(Event::ExplosionSpawned {
                    center: pixel,
                    radius: BLAST_RADIUS,
                });

                outcome = Some(ShotOutcome::BuildingHit {
                    building: world.buildings[index].id,
                    at: pixel,
                });
                break;
            }
            // A shielded sample scores no hit but the projectile flies on,
            // so it terminates on the field bounds exactly like a clear one.
            SampleHit::Shielded | SampleHit::Clear => {
                if world.leaves_field(pixel) {
                    outcome = Some(ShotOutcome::Miss { last: pixel });
                    break;
                }
            }
        }
    }

    let outcome = outcome.unwrap_or(ShotOutcome::Miss { last });
    out_events.push(Event::ShotResolved {
        player,
        outcome,
        path,
    });

    match outcome {
        ShotOutcome::TankHit { .. } => {
            out_events.push(Event::MatchEnded { winner: player });
        }
        ShotOutcome::BuildingHit { .. } | ShotOutcome::Miss { .. } => {
            world.active_player = world.active_player.opponent();
            out_events.push(Event::TurnPassed {
                next: world.active_player,
            });
        }
    }
}

/// Classification of a single projectile sample against the entity set.
///
/// Evaluated in fixed precedence order: tanks win over craters so a player
/// standing inside one can still be eliminated, and craters win over
/// buildings so an already demolished spot cannot absorb further damage.
fn resolve_sample(
    sample: Point,
    tanks: &[Tank],
    explosions: &[Explosion],
    buildings: &[Building],
) -> SampleHit {
    for tank in tanks {
        if tank.is_hit(sample) {
            return SampleHit::Tank(tank.player);
        }
    }

    for explosion in explosions {
        if explosion.is_hit(sample) {
            return SampleHit::Shielded;
        }
    }

    for (index, building) in buildings.iter().enumerate() {
        if building.is_hit(sample) {
            return SampleHit::Building(index);
        }
    }

    SampleHit::Clear
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SampleHit {
    Tank(PlayerId),
    Shielded,
    Building(usize),
    Clear,
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{demolition_slabs, World, TANK_BODY_HALF_EXTENT, TANK_TURRET_RADIUS};
    use cannonade_core::{
        BuildingId, Circle, Direction, FieldSize, PlayerId, Point, Rect, Shape,
        BUILDING_MAX_HEALTH,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Dimensions of the configured playing field.
    #[must_use]
    pub fn field(world: &World) -> FieldSize {
        world.field
    }

    /// Player whose turn it currently is.
    #[must_use]
    pub fn active_player(world: &World) -> PlayerId {
        world.active_player
    }

    /// Winner of the match, if a tank has been destroyed.
    #[must_use]
    pub fn winner(world: &World) -> Option<PlayerId> {
        world.winner
    }

    /// Reports whether the match has ended.
    #[must_use]
    pub fn match_over(world: &World) -> bool {
        world.winner.is_some()
    }

    /// Captures a read-only view of the emplaced tanks in player order.
    #[must_use]
    pub fn tank_view(world: &World) -> TankView {
        let mut snapshots: Vec<TankSnapshot> = world
            .tanks
            .iter()
            .map(|tank| TankSnapshot {
                player: tank.player,
                position: tank.position,
                direction: tank.direction,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.player);
        TankView { snapshots }
    }

    /// Captures a read-only view of the skyline in placement order.
    #[must_use]
    pub fn building_view(world: &World) -> BuildingView {
        let mut snapshots: Vec<BuildingSnapshot> = world
            .buildings
            .iter()
            .map(|building| BuildingSnapshot {
                id: building.id,
                center_x: building.center_x,
                width: building.width,
                height: building.height,
                health: building.health,
                struck_from: building.struck_from,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        BuildingView { snapshots }
    }

    /// Captures a read-only view of the craters in creation order.
    #[must_use]
    pub fn explosion_view(world: &World) -> ExplosionView {
        ExplosionView {
            snapshots: world
                .explosions
                .iter()
                .map(|explosion| ExplosionSnapshot {
                    center: explosion.circle.center(),
                    radius: explosion.circle.radius(),
                })
                .collect(),
        }
    }

    /// Read-only snapshot describing the emplaced tanks.
    #[derive(Clone, Debug, Default)]
    pub struct TankView {
        snapshots: Vec<TankSnapshot>,
    }

    impl TankView {
        /// Iterator over the captured tank snapshots in player order.
        pub fn iter(&self) -> impl Iterator<Item = &TankSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<TankSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single tank emplacement.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TankSnapshot {
        /// Player slot the tank belongs to.
        pub player: PlayerId,
        /// Fixed position the tank occupies.
        pub position: Point,
        /// Firing direction derived from the emplacement column.
        pub direction: Direction,
    }

    impl TankSnapshot {
        /// Renderable body and turret shapes for the tank.
        #[must_use]
        pub fn sprite(&self) -> Vec<Shape> {
            let x = self.position.x();
            let y = self.position.y();
            vec![
                Shape::Rectangle(Rect::from_corners(
                    Point::new(x - TANK_BODY_HALF_EXTENT, y + TANK_BODY_HALF_EXTENT),
                    Point::new(x + TANK_BODY_HALF_EXTENT, y - TANK_BODY_HALF_EXTENT),
                )),
                Shape::Circle(Circle::new(self.position, TANK_TURRET_RADIUS)),
            ]
        }
    }

    /// Read-only snapshot describing the skyline.
    #[derive(Clone, Debug, Default)]
    pub struct BuildingView {
        snapshots: Vec<BuildingSnapshot>,
    }

    impl BuildingView {
        /// Iterator over the captured building snapshots in placement order.
        pub fn iter(&self) -> impl Iterator<Item = &BuildingSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<BuildingSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single building.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct BuildingSnapshot {
        /// Identifier assigned by the world.
        pub id: BuildingId,
        /// Column of the building's horizontal center.
        pub center_x: i32,
        /// Full width of the building footprint.
        pub width: i32,
        /// Height of the building measured from the ground.
        pub height: i32,
        /// Hits the building can still absorb; zero means inert rubble.
        pub health: u8,
        /// Travel direction of the first projectile that struck the building.
        pub struck_from: Option<Direction>,
    }

    impl BuildingSnapshot {
        /// Leftmost column of the building footprint.
        #[must_use]
        pub fn left(&self) -> i32 {
            self.center_x - self.width / 2
        }

        /// Rightmost column of the building footprint.
        #[must_use]
        pub fn right(&self) -> i32 {
            self.center_x + self.width / 2
        }

        /// Renderable silhouette for the building's current demolition state.
        ///
        /// An untouched building is a single rectangle. After the first hit
        /// the silhouette becomes a stepped diagonal falling from the top of
        /// the struck face to the base of the far face; after the second hit
        /// the cut mirrors, leaving rubble leaning the other way.
        #[must_use]
        pub fn sprite(&self) -> Vec<Shape> {
            if self.health >= BUILDING_MAX_HEALTH {
                return vec![Shape::Rectangle(Rect::from_corners(
                    Point::new(self.left(), self.height),
                    Point::new(self.right(), 0),
                ))];
            }

            // A projectile travelling rightward strikes the left face.
            let struck_left_face = match self.struck_from.unwrap_or(Direction::Right) {
                Direction::Right => true,
                Direction::Left => false,
            };
            let tall_on_left = if self.health > 0 {
                struck_left_face
            } else {
                !struck_left_face
            };

            demolition_slabs(self.left(), self.right(), self.height, tall_on_left)
        }
    }

    /// Read-only snapshot describing the accumulated craters.
    #[derive(Clone, Debug, Default)]
    pub struct ExplosionView {
        snapshots: Vec<ExplosionSnapshot>,
    }

    impl ExplosionView {
        /// Iterator over the captured crater snapshots in creation order.
        pub fn iter(&self) -> impl Iterator<Item = &ExplosionSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<ExplosionSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single crater.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ExplosionSnapshot {
        /// Center of the shielding disc.
        pub center: Point,
        /// Radius of the shielding disc in pixels.
        pub radius: i32,
    }

    impl ExplosionSnapshot {
        /// Renderable shape for the crater.
        #[must_use]
        pub fn sprite(&self) -> Vec<Shape> {
            vec![Shape::Circle(Circle::new(self.center, self.radius))]
        }
    }
}

/// Builds the stepped slabs approximating a demolition diagonal.
fn demolition_slabs(left: i32, right: i32, height: i32, tall_on_left: bool) -> Vec<Shape> {
    let span = right - left;
    let mut slabs = Vec::with_capacity(DEMOLITION_STEPS as usize);
    for step in 0..DEMOLITION_STEPS {
        let start = left + span * step / DEMOLITION_STEPS;
        let end = left + span * (step + 1) / DEMOLITION_STEPS;
        let fall = if tall_on_left {
            step
        } else {
            DEMOLITION_STEPS - 1 - step
        };
        let slab_height = height * (DEMOLITION_STEPS - fall) / DEMOLITION_STEPS;
        slabs.push(Shape::Rectangle(Rect::from_corners(
            Point::new(start, slab_height),
            Point::new(end, 0),
        )));
    }
    slabs
}

#[derive(Clone, Copy, Debug)]
struct Tank {
    player: PlayerId,
    position: Point,
    direction: Direction,
}

impl Tank {
    fn is_hit(&self, sample: Point) -> bool {
        self.position.manhattan_distance(sample) < TANK_HIT_RADIUS as u32
    }
}

#[derive(Clone, Copy, Debug)]
struct Building {
    id: BuildingId,
    center_x: i32,
    width: i32,
    height: i32,
    health: u8,
    struck_from: Option<Direction>,
}

impl Building {
    fn is_hit(&self, sample: Point) -> bool {
        self.health > 0
            && sample.x() >= self.center_x - self.width / 2
            && sample.x() <= self.center_x + self.width / 2
            && sample.y() < self.height
    }

    fn register_hit(&mut self, struck_from: Direction) {
        self.health = self.health.saturating_sub(1);
        if self.struck_from.is_none() {
            self.struck_from = Some(struck_from);
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Explosion {
    circle: Circle,
}

impl Explosion {
    fn is_hit(&self, sample: Point) -> bool {
        self.circle.contains(sample)
    }
}
