//! Headless симуляция STAKEOUT
//!
//! Запускает Bevy App без рендера: патрульный охранник, камера и игрок,
//! который шумит и поднимает тревогу.

use std::time::Duration;

use bevy::prelude::*;

use stakeout_simulation::{
    camera_bundle, create_headless_app, guard_bundle, player_bundle, AlertnessTuning, BoxCollider,
    Facing, GuardArchetype, GuardConfig, LevelGeometry, SecurityCamera, SoundEmitted, Surface,
    VisionConfig,
};

const TICK: Duration = Duration::from_nanos(1_000_000_000 / 60);

fn main() {
    println!("Starting STAKEOUT headless simulation");

    let mut app = create_headless_app();

    // Коридор: стена сверху, cover-ящик посередине
    app.world_mut().insert_resource(LevelGeometry {
        colliders: vec![
            BoxCollider::new(Vec2::new(0.0, 4.0), Vec2::new(12.0, 0.5), Surface::Wall),
            BoxCollider::new(Vec2::new(2.0, 0.0), Vec2::new(0.5, 0.5), Surface::Cover),
        ],
    });

    let guard = guard_bundle(
        Vec2::new(-6.0, 0.0),
        GuardArchetype::Patrol,
        GuardConfig::default(),
        VisionConfig::with_facing(Facing::Right),
    )
    .expect("valid guard config");
    app.world_mut().spawn(guard);

    let camera = camera_bundle(
        Vec2::new(8.0, 3.0),
        SecurityCamera::default(),
        VisionConfig::with_facing(Facing::Down),
    )
    .expect("valid camera config");
    app.world_mut().spawn(camera);

    app.world_mut()
        .spawn(player_bundle(Vec2::new(6.0, -2.0), AlertnessTuning::default()));

    // 1000 тиков симуляции; на тике 300 игрок роняет предмет
    for tick in 0..1000u32 {
        if tick == 300 {
            app.world_mut().send_event(SoundEmitted {
                position: Vec2::new(-2.0, 0.0),
            });
        }

        app.world_mut()
            .resource_mut::<Time<Fixed>>()
            .advance_by(TICK);
        app.world_mut().run_schedule(FixedUpdate);

        if tick % 100 == 0 {
            let entity_count = app.world().entities().len();
            println!("Tick {}: {} entities", tick, entity_count);
        }
    }

    println!("Simulation complete!");
}
