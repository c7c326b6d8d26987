#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic layout system responsible for raising the opening skyline
//! and emplacing both tanks whenever a field is configured.

use cannonade_core::{Command, Event, FieldSize, PlayerId, Point};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Fixed footprint width shared by every generated building.
pub const BUILDING_WIDTH: i32 = 30;

/// Shortest building the generator will raise.
pub const MIN_BUILDING_HEIGHT: i32 = 10;

/// Distance between a tank emplacement and its field edge.
pub const TANK_EDGE_MARGIN: i32 = 5;

/// Configuration parameters required to construct the layout system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    building_count: u32,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided skyline size and seed.
    #[must_use]
    pub const fn new(building_count: u32, rng_seed: u64) -> Self {
        Self {
            building_count,
            rng_seed,
        }
    }
}

/// Pure system that deterministically plans the opening board.
///
/// The plan reacts to [`Event::FieldConfigured`], so reconfiguring the field
/// rolls a fresh skyline from the continuing random stream.
#[derive(Debug)]
pub struct Layout {
    building_count: u32,
    rng: ChaCha8Rng,
}

impl Layout {
    /// Creates a new layout system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            building_count: config.building_count,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events to emit placement and emplacement commands.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            if let Event::FieldConfigured { size } = event {
                self.plan(*size, out);
            }
        }
    }

    fn plan(&mut self, size: FieldSize, out: &mut Vec<Command>) {
        let skyline = self.raise_skyline(size, out);

        let left_column = TANK_EDGE_MARGIN;
        let right_column = size.width() - TANK_EDGE_MARGIN;
        out.push(Command::DeployTank {
            player: PlayerId::One,
            position: Point::new(
                left_column,
                rooftop(&skyline, |center_x| {
                    center_x - BUILDING_WIDTH < left_column
                }),
            ),
        });
        out.push(Command::DeployTank {
            player: PlayerId::Two,
            position: Point::new(
                right_column,
                rooftop(&skyline, |center_x| {
                    center_x + BUILDING_WIDTH > right_column
                }),
            ),
        });
    }

    fn raise_skyline(&mut self, size: FieldSize, out: &mut Vec<Command>) -> Vec<(i32, i32)> {
        let half_width = BUILDING_WIDTH / 2;
        if size.width() < BUILDING_WIDTH || size.height() < MIN_BUILDING_HEIGHT {
            return Vec::new();
        }

        let mut skyline = Vec::with_capacity(self.building_count as usize);
        for _ in 0..self.building_count {
            // Rolled across the full field, then pulled in so the footprint
            // never overhangs an edge.
            let rolled = self.rng.gen_range(0..=size.width());
            let center_x = rolled.clamp(half_width, size.width() - half_width);
            let height = self.rng.gen_range(MIN_BUILDING_HEIGHT..=size.height());
            skyline.push((center_x, height));
            out.push(Command::PlaceBuilding {
                center_x,
                width: BUILDING_WIDTH,
                height,
            });
        }
        skyline
    }
}

/// Tallest rooftop among buildings whose span reaches the filtered edge,
/// or the ground when the edge is clear.
fn rooftop<F>(skyline: &[(i32, i32)], near_edge: F) -> i32
where
    F: Fn(i32) -> bool,
{
    skyline
        .iter()
        .filter(|(center_x, _)| near_edge(*center_x))
        .map(|(_, height)| *height)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_with_seed(seed: u64) -> Vec<Command> {
        let mut layout = Layout::new(Config::new(3, seed));
        let mut commands = Vec::new();
        layout.handle(
            &[Event::FieldConfigured {
                size: FieldSize::STANDARD,
            }],
            &mut commands,
        );
        commands
    }

    #[test]
    fn identical_seeds_produce_identical_plans() {
        assert_eq!(plan_with_seed(7), plan_with_seed(7));
    }

    #[test]
    fn different_seeds_produce_different_skylines() {
        assert_ne!(plan_with_seed(1), plan_with_seed(2));
    }

    #[test]
    fn plans_three_buildings_then_both_emplacements() {
        let commands = plan_with_seed(0);
        assert_eq!(commands.len(), 5);
        assert!(commands[..3]
            .iter()
            .all(|command| matches!(command, Command::PlaceBuilding { .. })));
        assert!(matches!(
            commands[3],
            Command::DeployTank {
                player: PlayerId::One,
                ..
            }
        ));
        assert!(matches!(
            commands[4],
            Command::DeployTank {
                player: PlayerId::Two,
                ..
            }
        ));
    }

    #[test]
    fn skylines_always_fit_the_field() {
        for seed in 0..64 {
            for command in plan_with_seed(seed) {
                if let Command::PlaceBuilding {
                    center_x,
                    width,
                    height,
                } = command
                {
                    assert_eq!(width, BUILDING_WIDTH);
                    assert!(center_x - width / 2 >= 0, "seed {seed} overhangs left");
                    assert!(
                        center_x + width / 2 <= FieldSize::STANDARD.width(),
                        "seed {seed} overhangs right"
                    );
                    assert!((MIN_BUILDING_HEIGHT..=FieldSize::STANDARD.height())
                        .contains(&height));
                }
            }
        }
    }

    #[test]
    fn emplacements_hug_the_field_edges() {
        for command in plan_with_seed(11) {
            match command {
                Command::DeployTank {
                    player: PlayerId::One,
                    position,
                } => assert_eq!(position.x(), TANK_EDGE_MARGIN),
                Command::DeployTank {
                    player: PlayerId::Two,
                    position,
                } => assert_eq!(
                    position.x(),
                    FieldSize::STANDARD.width() - TANK_EDGE_MARGIN
                ),
                Command::PlaceBuilding { .. } | Command::ConfigureField { .. } => {}
                Command::Fire { .. } => panic!("layout never fires"),
            }
        }
    }

    #[test]
    fn narrow_fields_get_no_buildings() {
        let mut layout = Layout::new(Config::new(3, 0));
        let mut commands = Vec::new();
        layout.handle(
            &[Event::FieldConfigured {
                size: FieldSize::new(20, 375),
            }],
            &mut commands,
        );
        assert_eq!(commands.len(), 2);
        assert!(commands
            .iter()
            .all(|command| matches!(command, Command::DeployTank { .. })));
    }

    #[test]
    fn rooftop_prefers_the_tallest_reaching_building() {
        let skyline = [(20, 40), (25, 90), (300, 200)];
        let left = rooftop(&skyline, |center_x| center_x - BUILDING_WIDTH < 5);
        assert_eq!(left, 90);

        let clear = rooftop(&skyline, |center_x| center_x + BUILDING_WIDTH > 590);
        assert_eq!(clear, 0);
    }
}
