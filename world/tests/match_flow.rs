use cannonade_core::{Command, Event, FieldSize, FireError, PlayerId, Point, ShotOutcome};
use cannonade_world::{self as world, query, World};

#[test]
fn duel_plays_out_over_alternating_turns_until_a_tank_falls() {
    let mut duel = World::new();
    let setup = run(&mut duel, setup_commands());
    assert_eq!(
        setup
            .iter()
            .filter(|event| matches!(event, Event::TankDeployed { .. }))
            .count(),
        2
    );
    assert_eq!(query::active_player(&duel), PlayerId::One);

    // Opening exchange falls short on both sides.
    let opening = fire(&mut duel, PlayerId::One, 45, 5);
    assert_eq!(
        outcome(&opening),
        ShotOutcome::Miss {
            last: Point::new(261, -1),
        }
    );
    assert_eq!(query::active_player(&duel), PlayerId::Two);

    let answer = fire(&mut duel, PlayerId::Two, 30, 7);
    assert_eq!(
        outcome(&answer),
        ShotOutcome::Miss {
            last: Point::new(200, -1),
        }
    );
    assert_eq!(query::active_player(&duel), PlayerId::One);

    // Corrected elevation lands inside the opposing hit footprint.
    let kill = fire(&mut duel, PlayerId::One, 37, 8);
    assert_eq!(
        outcome(&kill),
        ShotOutcome::TankHit {
            victim: PlayerId::Two,
            at: Point::new(629, 2),
        }
    );
    assert!(kill.contains(&Event::TankDestroyed {
        player: PlayerId::Two,
    }));
    assert!(kill.contains(&Event::MatchEnded {
        winner: PlayerId::One,
    }));
    assert!(query::match_over(&duel));
    assert_eq!(query::winner(&duel), Some(PlayerId::One));

    // The fallen player cannot answer any more.
    let refused = fire(&mut duel, PlayerId::Two, 45, 5);
    assert_eq!(
        refused,
        vec![Event::ShotRejected {
            player: PlayerId::Two,
            reason: FireError::MatchOver,
        }]
    );
}

#[test]
fn boundary_sample_is_not_a_hit() {
    let mut duel = World::new();
    let _ = run(&mut duel, setup_commands());

    // One sample before impact the projectile sits exactly on the hit
    // boundary, which the strict Manhattan test must let fly on.
    let shot = fire(&mut duel, PlayerId::One, 37, 8);
    let path = shot
        .iter()
        .find_map(|event| match event {
            Event::ShotResolved { path, .. } => Some(path.clone()),
            _ => None,
        })
        .expect("shot must resolve");
    assert!(path.contains(&Point::new(628, 3)));
    assert_eq!(path.last(), Some(&Point::new(629, 2)));
}

#[test]
fn identical_command_logs_produce_identical_event_logs() {
    let volleys = [(45, 5), (30, 7), (37, 8)];

    let mut first_world = World::new();
    let mut first_log = run(&mut first_world, setup_commands());
    let mut second_world = World::new();
    let mut second_log = run(&mut second_world, setup_commands());

    let mut shooter = PlayerId::One;
    for (angle_degrees, force) in volleys {
        first_log.extend(fire(&mut first_world, shooter, angle_degrees, force));
        second_log.extend(fire(&mut second_world, shooter, angle_degrees, force));
        shooter = shooter.opponent();
    }

    assert_eq!(first_log, second_log, "replay diverged between runs");
    assert_eq!(query::winner(&first_world), query::winner(&second_world));
}

fn setup_commands() -> Vec<Command> {
    vec![
        Command::ConfigureField {
            size: FieldSize::new(640, 400),
        },
        Command::DeployTank {
            player: PlayerId::One,
            position: Point::new(5, 0),
        },
        Command::DeployTank {
            player: PlayerId::Two,
            position: Point::new(635, 0),
        },
    ]
}

fn run(duel: &mut World, commands: Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(duel, command, &mut events);
    }
    events
}

fn fire(duel: &mut World, player: PlayerId, angle_degrees: i32, force: i32) -> Vec<Event> {
    run(
        duel,
        vec![Command::Fire {
            player,
            angle_degrees,
            force,
        }],
    )
}

fn outcome(events: &[Event]) -> ShotOutcome {
    events
        .iter()
        .find_map(|event| match event {
            Event::ShotResolved { outcome, .. } => Some(*outcome),
            _ => None,
        })
        .expect("a fired shot must resolve")
}
