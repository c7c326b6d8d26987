#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Closed-form projectile trajectory generator.
//!
//! The generator is a pure step function: every sample is evaluated directly
//! from the launch parameters, so a trajectory can be restarted or replayed by
//! constructing it again with the same inputs. Samples are parameterized by
//! horizontal step index rather than elapsed time, which keeps the flight
//! deterministic and monotonic along the firing direction.

use std::{error::Error, fmt};

use cannonade_core::{Direction, Point};
use glam::DVec2;

/// Gravitational constant applied to the projectile drop, in source units.
pub const GRAVITY: f64 = 9.81;

/// Upper bound on the number of horizontal steps a shot may take.
pub const STEP_CAP: u32 = 1_000;

/// First step index sampled after launch.
///
/// Matches [`cannonade_core::TANK_HIT_RADIUS`] so the opening sample can never
/// land inside the firing tank's own hit footprint.
pub const LAUNCH_OFFSET: u32 = 10;

/// Muzzle velocity gained per unit of commanded force.
pub const FORCE_VELOCITY_FACTOR: f64 = 10.0;

/// Converts a commanded force into the muzzle velocity fed to the generator.
#[must_use]
pub fn muzzle_velocity(force: i32) -> f64 {
    f64::from(force) * FORCE_VELOCITY_FACTOR
}

/// Finite iterator over the real-valued samples of one projectile flight.
#[derive(Clone, Debug)]
pub struct Trajectory {
    origin_x: f64,
    origin_y: f64,
    direction_sign: f64,
    slope: f64,
    drop: f64,
    step: u32,
}

impl Trajectory {
    /// Prepares a trajectory for the provided launch parameters.
    ///
    /// The barrel elevation is interpreted relative to the firing
    /// [`Direction`]: the horizontal component always advances along that
    /// direction while the vertical profile follows the signed angle.
    pub fn new(
        origin: Point,
        direction: Direction,
        angle_degrees: i32,
        velocity: f64,
    ) -> Result<Self, TrajectoryError> {
        if !velocity.is_finite() || velocity <= 0.0 {
            return Err(TrajectoryError::NonPositiveVelocity);
        }
        if angle_degrees.rem_euclid(180) == 90 {
            return Err(TrajectoryError::VerticalAngle);
        }

        let direction_sign = f64::from(direction.sign());
        let theta = direction_sign * f64::from(angle_degrees).to_radians();
        let cosine = theta.cos();
        let slope = (theta * direction_sign).tan();
        let drop = GRAVITY / (2.0 * velocity * velocity * cosine * cosine);

        Ok(Self {
            origin_x: f64::from(origin.x()),
            origin_y: f64::from(origin.y()),
            direction_sign,
            slope,
            drop,
            step: LAUNCH_OFFSET,
        })
    }
}

impl Iterator for Trajectory {
    type Item = DVec2;

    fn next(&mut self) -> Option<DVec2> {
        if self.step >= STEP_CAP {
            return None;
        }

        let i = f64::from(self.step);
        let x = self.direction_sign * i + self.origin_x;
        let y = self.origin_y + i * self.slope - self.drop * i * i;
        self.step += 1;
        Some(DVec2::new(x, y))
    }
}

/// Launch parameters the trajectory model refuses to evaluate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrajectoryError {
    /// Velocity was zero, negative or non-finite.
    NonPositiveVelocity,
    /// The barrel elevation is vertical, which divides the drop term by zero.
    VerticalAngle,
}

impl fmt::Display for TrajectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveVelocity => {
                write!(f, "muzzle velocity must be finite and strictly positive")
            }
            Self::VerticalAngle => write!(f, "vertical barrel elevations are not supported"),
        }
    }
}

impl Error for TrajectoryError {}

#[cfg(test)]
mod tests {
    use super::*;
    use cannonade_core::TANK_HIT_RADIUS;

    fn sample_flight(direction: Direction, angle_degrees: i32, velocity: f64) -> Vec<DVec2> {
        Trajectory::new(Point::new(5, 0), direction, angle_degrees, velocity)
            .expect("launch parameters are valid")
            .collect()
    }

    #[test]
    fn rejects_vertical_elevations() {
        for angle in [90, 270, -90, 450] {
            let result = Trajectory::new(Point::new(5, 0), Direction::Right, angle, 100.0);
            assert_eq!(result.err(), Some(TrajectoryError::VerticalAngle));
        }
    }

    #[test]
    fn rejects_non_positive_velocities() {
        for velocity in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let result = Trajectory::new(Point::new(5, 0), Direction::Right, 45, velocity);
            assert_eq!(result.err(), Some(TrajectoryError::NonPositiveVelocity));
        }
    }

    #[test]
    fn flight_is_bounded_by_the_step_cap() {
        let samples = sample_flight(Direction::Right, 45, 100.0);
        assert_eq!(samples.len() as u32, STEP_CAP - LAUNCH_OFFSET);
    }

    #[test]
    fn opening_sample_clears_the_firing_tanks_footprint() {
        let samples = sample_flight(Direction::Right, 45, 100.0);
        let first = samples.first().expect("flight yields samples");
        let origin = Point::new(5, 0);
        let sample = Point::new(first.x as i32, first.y as i32);
        assert!(origin.manhattan_distance(sample) >= TANK_HIT_RADIUS as u32);
    }

    #[test]
    fn vertical_profile_is_strictly_concave() {
        let samples = sample_flight(Direction::Right, 30, 80.0);
        for window in samples.windows(3) {
            let second_difference = window[2].y - 2.0 * window[1].y + window[0].y;
            assert!(second_difference < 0.0, "profile must bend downward");
        }
    }

    #[test]
    fn horizontal_travel_follows_the_firing_direction() {
        let rightward = sample_flight(Direction::Right, 45, 100.0);
        for window in rightward.windows(2) {
            assert!(window[1].x > window[0].x);
        }

        let leftward = sample_flight(Direction::Left, 45, 100.0);
        for window in leftward.windows(2) {
            assert!(window[1].x < window[0].x);
        }
    }

    #[test]
    fn mirrored_directions_share_the_vertical_profile() {
        let rightward = sample_flight(Direction::Right, 37, 80.0);
        let leftward = sample_flight(Direction::Left, 37, 80.0);
        assert_eq!(rightward.len(), leftward.len());
        for (right, left) in rightward.iter().zip(leftward.iter()) {
            assert!((right.y - left.y).abs() < 1e-9);
            assert!((right.x - 5.0 + (left.x - 5.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn replayed_flights_are_identical() {
        let first = sample_flight(Direction::Right, 50, 160.0);
        let second = sample_flight(Direction::Right, 50, 160.0);
        assert_eq!(first, second);
    }

    #[test]
    fn muzzle_velocity_scales_force_by_ten() {
        assert!((muzzle_velocity(16) - 160.0).abs() < f64::EPSILON);
        assert!((muzzle_velocity(1) - 10.0).abs() < f64::EPSILON);
    }
}
