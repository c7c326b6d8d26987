#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Cannonade engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Cannonade.";

/// Manhattan-distance threshold below which a sample strikes a tank.
pub const TANK_HIT_RADIUS: i32 = 10;

/// Radius of the shielding disc spawned when a building is demolished.
pub const BLAST_RADIUS: i32 = 20;

/// Tanks emplaced left of this column fire rightward; all others leftward.
pub const LEFT_EDGE_THRESHOLD: i32 = 10;

/// Number of non-shielded hits a fresh building absorbs before going inert.
pub const BUILDING_MAX_HEALTH: u8 = 2;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Configures the playing field using the provided dimensions.
    ConfigureField {
        /// Width and height of the field measured in pixels.
        size: FieldSize,
    },
    /// Requests placement of a destructible building on the skyline.
    PlaceBuilding {
        /// Column of the building's horizontal center.
        center_x: i32,
        /// Full width of the building footprint.
        width: i32,
        /// Height of the building measured from the ground.
        height: i32,
    },
    /// Requests that a player's tank be emplaced at the provided position.
    DeployTank {
        /// Player slot receiving the tank.
        player: PlayerId,
        /// Fixed position the tank occupies for the whole match.
        position: Point,
    },
    /// Requests that the active player's tank fire one shot.
    Fire {
        /// Player attempting the shot.
        player: PlayerId,
        /// Barrel elevation in degrees; sign and range are unconstrained.
        angle_degrees: i32,
        /// Firing force; scaled into muzzle velocity by the ballistics rules.
        force: i32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the playing field was configured.
    FieldConfigured {
        /// Dimensions the field now occupies.
        size: FieldSize,
    },
    /// Reports that a field configuration request was rejected.
    FieldRejected {
        /// Dimensions provided in the rejected request.
        size: FieldSize,
        /// Specific reason the configuration failed.
        reason: PlacementError,
    },
    /// Confirms that a building joined the skyline.
    BuildingPlaced {
        /// Identifier assigned to the building by the world.
        building: BuildingId,
        /// Column of the building's horizontal center.
        center_x: i32,
        /// Full width of the building footprint.
        width: i32,
        /// Height of the building measured from the ground.
        height: i32,
    },
    /// Reports that a building placement request was rejected.
    BuildingRejected {
        /// Column provided in the rejected request.
        center_x: i32,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a player's tank was emplaced.
    TankDeployed {
        /// Player slot that received the tank.
        player: PlayerId,
        /// Position the tank occupies.
        position: Point,
        /// Firing direction derived from the emplacement column.
        direction: Direction,
    },
    /// Reports that a tank emplacement request was rejected.
    TankRejected {
        /// Player slot provided in the rejected request.
        player: PlayerId,
        /// Specific reason the emplacement failed.
        reason: PlacementError,
    },
    /// Confirms that a shot left the barrel and began simulating.
    ShotFired {
        /// Player whose tank fired.
        player: PlayerId,
        /// Barrel elevation in degrees as commanded.
        angle_degrees: i32,
        /// Firing force as commanded.
        force: i32,
    },
    /// Confirms that a building absorbed a non-shielded hit.
    BuildingDamaged {
        /// Identifier of the damaged building.
        building: BuildingId,
        /// Hits the building can still absorb before going inert.
        remaining_health: u8,
        /// Horizontal travel direction of the striking projectile.
        struck_from: Direction,
    },
    /// Confirms that a demolition spawned a permanent shielding disc.
    ExplosionSpawned {
        /// Center of the disc, equal to the impact sample.
        center: Point,
        /// Radius of the disc in pixels.
        radius: i32,
    },
    /// Confirms that a tank was struck and its player eliminated.
    TankDestroyed {
        /// Player whose tank was destroyed.
        player: PlayerId,
    },
    /// Summarises a terminated shot for presentation.
    ShotResolved {
        /// Player whose tank fired the shot.
        player: PlayerId,
        /// Why the shot terminated.
        outcome: ShotOutcome,
        /// In-field samples the projectile visited, in flight order.
        path: Vec<Point>,
    },
    /// Announces that the turn moved to the other player.
    TurnPassed {
        /// Player who now holds the turn.
        next: PlayerId,
    },
    /// Announces that the match ended with a winner.
    MatchEnded {
        /// Player whose tank survived.
        winner: PlayerId,
    },
    /// Reports that a fire request was rejected.
    ShotRejected {
        /// Player provided in the rejected request.
        player: PlayerId,
        /// Specific reason the shot was refused.
        reason: FireError,
    },
}

/// Terminal classification of a single shot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotOutcome {
    /// The projectile entered a tank's hit footprint, ending the match.
    TankHit {
        /// Player whose tank was struck.
        victim: PlayerId,
        /// Integer sample at which the strike registered.
        at: Point,
    },
    /// The projectile struck a live building and demolished one level.
    BuildingHit {
        /// Identifier of the struck building.
        building: BuildingId,
        /// Integer sample at which the strike registered.
        at: Point,
    },
    /// The projectile left the field or exhausted its flight without a hit.
    Miss {
        /// Last sample evaluated before the shot terminated.
        last: Point,
    },
}

/// Player slots participating in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    /// The player who opens the match.
    One,
    /// The player who answers.
    Two,
}

impl PlayerId {
    /// Returns the opposing player slot.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// One-based number used when addressing the player in prompts.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

/// Horizontal firing orientation fixed per tank at emplacement time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Fires toward increasing x; sign +1.
    Right,
    /// Fires toward decreasing x; sign -1.
    Left,
}

impl Direction {
    /// Signed unit factor applied to horizontal travel.
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Self::Right => 1,
            Self::Left => -1,
        }
    }

    /// Derives the firing direction from an emplacement column.
    ///
    /// Columns left of [`LEFT_EDGE_THRESHOLD`] face rightward into the field;
    /// every other column faces leftward.
    #[must_use]
    pub const fn for_column(x: i32) -> Self {
        if x < LEFT_EDGE_THRESHOLD {
            Self::Right
        } else {
            Self::Left
        }
    }
}

/// Unique identifier assigned to a building.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildingId(u32);

impl BuildingId {
    /// Creates a new building identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Integer pixel coordinate on the playing field, y growing upward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    x: i32,
    y: i32,
}

impl Point {
    /// Creates a new point from pixel coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal component of the point.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical component of the point, measured up from the ground.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Computes the Manhattan distance between two points.
    #[must_use]
    pub fn manhattan_distance(self, other: Point) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Computes the straight-line distance between two points.
    #[must_use]
    pub fn euclidean_distance(self, other: Point) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned rectangle expressed through two corner points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    top_left: Point,
    bottom_right: Point,
}

impl Rect {
    /// Constructs a rectangle from its upper-left and lower-right corners.
    #[must_use]
    pub const fn from_corners(top_left: Point, bottom_right: Point) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Upper-left corner of the rectangle (minimum x, maximum y).
    #[must_use]
    pub const fn top_left(&self) -> Point {
        self.top_left
    }

    /// Lower-right corner of the rectangle (maximum x, minimum y).
    #[must_use]
    pub const fn bottom_right(&self) -> Point {
        self.bottom_right
    }

    /// Reports whether the point lies within the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x() >= self.top_left.x()
            && point.x() <= self.bottom_right.x()
            && point.y() <= self.top_left.y()
            && point.y() >= self.bottom_right.y()
    }
}

/// Circle expressed through a center point and pixel radius.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Circle {
    center: Point,
    radius: i32,
}

impl Circle {
    /// Creates a new circle from its center and radius.
    #[must_use]
    pub const fn new(center: Point, radius: i32) -> Self {
        Self { center, radius }
    }

    /// Center of the circle.
    #[must_use]
    pub const fn center(&self) -> Point {
        self.center
    }

    /// Radius of the circle in pixels.
    #[must_use]
    pub const fn radius(&self) -> i32 {
        self.radius
    }

    /// Reports whether the point lies strictly inside the circle.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.center.euclidean_distance(point) < f64::from(self.radius)
    }
}

/// Renderable primitive emitted by entity sprites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    /// Axis-aligned rectangle drawn through `draw_rectangle`.
    Rectangle(Rect),
    /// Circle drawn through `draw_circle`.
    Circle(Circle),
}

/// Dimensions of the playing field measured in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldSize {
    width: i32,
    height: i32,
}

impl FieldSize {
    /// Field dimensions used by the stock two-player experience.
    pub const STANDARD: FieldSize = FieldSize::new(595, 375);

    /// Creates a new field size descriptor.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Width of the field in pixels.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height of the field in pixels.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }
}

/// Reasons a placement or configuration request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested geometry extends beyond the configured field.
    OutOfBounds,
    /// A width, height or field dimension was zero or negative.
    NonPositiveSize,
    /// The targeted player slot already holds a tank.
    SlotOccupied,
}

/// Reasons a fire request may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FireError {
    /// The match already ended; no further shots are accepted.
    MatchOver,
    /// The requesting player does not hold the turn.
    OutOfTurn,
    /// The requesting player has no emplaced tank.
    TankMissing,
    /// Force must be strictly positive to produce a trajectory.
    NonPositiveForce,
    /// The barrel elevation is vertical, which the trajectory model rejects.
    VerticalShot,
}
