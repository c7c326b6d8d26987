use cannonade_core::{Command, Event, FieldSize, PlayerId};
use cannonade_system_layout::{Config, Layout, BUILDING_WIDTH, TANK_EDGE_MARGIN};
use cannonade_world::{self as world, query, World};

#[test]
fn planned_board_survives_world_validation() {
    for seed in [0, 1, 42, 1337] {
        let duel = set_up_board(seed);

        let buildings = query::building_view(&duel).into_vec();
        assert_eq!(buildings.len(), 3, "seed {seed} lost a building");

        let tanks = query::tank_view(&duel).into_vec();
        assert_eq!(tanks.len(), 2, "seed {seed} lost an emplacement");
    }
}

#[test]
fn tanks_sit_on_the_tallest_rooftop_reaching_their_edge() {
    for seed in [3, 9, 27] {
        let duel = set_up_board(seed);
        let field = query::field(&duel);
        let buildings = query::building_view(&duel).into_vec();

        for tank in query::tank_view(&duel).into_vec() {
            let expected = match tank.player {
                PlayerId::One => buildings
                    .iter()
                    .filter(|building| building.center_x - BUILDING_WIDTH < TANK_EDGE_MARGIN)
                    .map(|building| building.height)
                    .max()
                    .unwrap_or(0),
                PlayerId::Two => buildings
                    .iter()
                    .filter(|building| {
                        building.center_x + BUILDING_WIDTH > field.width() - TANK_EDGE_MARGIN
                    })
                    .map(|building| building.height)
                    .max()
                    .unwrap_or(0),
            };
            assert_eq!(tank.position.y(), expected, "seed {seed}");
        }
    }
}

fn set_up_board(seed: u64) -> World {
    let mut duel = World::new();
    let mut layout = Layout::new(Config::new(3, seed));

    let mut events = Vec::new();
    world::apply(
        &mut duel,
        Command::ConfigureField {
            size: FieldSize::STANDARD,
        },
        &mut events,
    );

    let mut commands = Vec::new();
    layout.handle(&events, &mut commands);
    for command in commands {
        let mut generated = Vec::new();
        world::apply(&mut duel, command, &mut generated);
        assert!(
            !generated
                .iter()
                .any(|event| matches!(
                    event,
                    Event::BuildingRejected { .. } | Event::TankRejected { .. }
                )),
            "seed {seed} produced a rejected plan: {generated:?}"
        );
    }

    duel
}
