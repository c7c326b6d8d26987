#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn-keeping system that converts player aiming orders into fire
//! commands.
//!
//! The session loop owns raw input; gunnery owns whose turn it is and
//! whether an order is worth sending to the world at all. Orders that
//! would be rejected anyway are refused synchronously so the prompt can
//! re-ask without a world round trip.

use std::error::Error;
use std::fmt;

use cannonade_core::{Command, Event, PlayerId};

/// Match phase as reconstructed from the world's event stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// A player holds the turn and may submit one aiming order.
    AwaitingOrders(PlayerId),
    /// A tank has fallen; no further orders are accepted.
    MatchOver(PlayerId),
}

/// Pure system tracking turn ownership and validating aiming orders.
#[derive(Debug)]
pub struct Gunnery {
    phase: Phase,
}

impl Default for Gunnery {
    fn default() -> Self {
        Self::new()
    }
}

impl Gunnery {
    /// Creates a gunnery system expecting the opening player's order.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: Phase::AwaitingOrders(PlayerId::One),
        }
    }

    /// Current phase of the match.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Consumes world events to keep the phase current.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::FieldConfigured { .. } => {
                    self.phase = Phase::AwaitingOrders(PlayerId::One);
                }
                Event::TurnPassed { next } => {
                    self.phase = Phase::AwaitingOrders(*next);
                }
                Event::MatchEnded { winner } => {
                    self.phase = Phase::MatchOver(*winner);
                }
                _ => {}
            }
        }
    }

    /// Validates an aiming order and shapes it into a fire command for the
    /// player currently holding the turn.
    pub fn fire_order(&self, angle_degrees: i32, force: i32) -> Result<Command, OrderError> {
        let player = match self.phase {
            Phase::AwaitingOrders(player) => player,
            Phase::MatchOver(winner) => return Err(OrderError::MatchOver { winner }),
        };

        if force <= 0 {
            return Err(OrderError::NonPositiveForce { force });
        }
        if angle_degrees.rem_euclid(180) == 90 {
            return Err(OrderError::VerticalAngle { angle_degrees });
        }

        Ok(Command::Fire {
            player,
            angle_degrees,
            force,
        })
    }
}

/// Reasons an aiming order is refused before reaching the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderError {
    /// The match has already been decided.
    MatchOver {
        /// Player who won the finished match.
        winner: PlayerId,
    },
    /// Force must be strictly positive to leave the barrel.
    NonPositiveForce {
        /// Force supplied by the order.
        force: i32,
    },
    /// A vertical barrel has no horizontal solution.
    VerticalAngle {
        /// Elevation supplied by the order.
        angle_degrees: i32,
    },
}

impl fmt::Display for OrderError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MatchOver { winner } => write!(
                formatter,
                "the match is over; player {} already won",
                winner.number()
            ),
            Self::NonPositiveForce { force } => {
                write!(formatter, "force must be positive, got {force}")
            }
            Self::VerticalAngle { angle_degrees } => {
                write!(formatter, "cannot fire straight up at {angle_degrees} degrees")
            }
        }
    }
}

impl Error for OrderError {}
