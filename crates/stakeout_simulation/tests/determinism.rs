//! Determinism test: одинаковый сценарий дважды — побайтно одинаковый мир.

use std::time::Duration;

use bevy::prelude::*;

use stakeout_simulation::{
    camera_bundle, create_headless_app, guard_bundle, player_bundle, world_snapshot, Alertness,
    AlertnessTuning, BoxCollider, Facing, GuardArchetype, GuardConfig, GuardState, LevelGeometry,
    SecurityCamera, SoundEmitted, Surface, VisionConfig,
};

const TICK: Duration = Duration::from_nanos(1_000_000_000 / 60);

fn build_scenario() -> App {
    let mut app = create_headless_app();

    app.world_mut().insert_resource(LevelGeometry {
        colliders: vec![
            BoxCollider::new(Vec2::new(0.0, 4.0), Vec2::new(12.0, 0.5), Surface::Wall),
            BoxCollider::new(Vec2::new(2.0, 0.0), Vec2::new(0.5, 0.5), Surface::Cover),
        ],
    });

    let patrol = guard_bundle(
        Vec2::new(-6.0, 0.0),
        GuardArchetype::Patrol,
        GuardConfig::default(),
        VisionConfig::with_facing(Facing::Right),
    )
    .unwrap();
    app.world_mut().spawn(patrol);

    let watcher = guard_bundle(
        Vec2::new(4.0, -3.0),
        GuardArchetype::Guard,
        GuardConfig::default(),
        VisionConfig::with_facing(Facing::Up),
    )
    .unwrap();
    app.world_mut().spawn(watcher);

    let camera = camera_bundle(
        Vec2::new(8.0, 3.0),
        SecurityCamera::default(),
        VisionConfig::with_facing(Facing::Down),
    )
    .unwrap();
    app.world_mut().spawn(camera);

    app.world_mut()
        .spawn(player_bundle(Vec2::new(6.0, -2.0), AlertnessTuning::default()));

    app
}

fn run_scenario(app: &mut App, ticks: u32) {
    for tick in 0..ticks {
        // Звук посреди прогона — проверяем и событийный путь
        if tick == 100 {
            app.world_mut().send_event(SoundEmitted {
                position: Vec2::new(-2.0, 0.0),
            });
        }
        app.world_mut()
            .resource_mut::<Time<Fixed>>()
            .advance_by(TICK);
        app.world_mut().run_schedule(FixedUpdate);
    }
}

fn full_snapshot(app: &mut App) -> Vec<u8> {
    let world = app.world_mut();
    let mut snapshot = world_snapshot::<Transform>(world);
    snapshot.extend(world_snapshot::<GuardState>(world));
    snapshot.extend(world_snapshot::<Alertness>(world));
    snapshot
}

#[test]
fn test_identical_runs_produce_identical_snapshots() {
    let mut first = build_scenario();
    let mut second = build_scenario();

    run_scenario(&mut first, 600);
    run_scenario(&mut second, 600);

    let snapshot_a = full_snapshot(&mut first);
    let snapshot_b = full_snapshot(&mut second);

    assert!(!snapshot_a.is_empty());
    assert_eq!(snapshot_a, snapshot_b, "simulation diverged between runs");
}

#[test]
fn test_snapshot_changes_when_world_changes() {
    let mut first = build_scenario();
    let mut second = build_scenario();

    run_scenario(&mut first, 600);
    // Второй прогон короче — миры обязаны отличаться
    run_scenario(&mut second, 300);

    assert_ne!(full_snapshot(&mut first), full_snapshot(&mut second));
}
