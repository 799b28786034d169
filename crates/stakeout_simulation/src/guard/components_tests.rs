//! Tests for guard components and spawn validation.

use bevy::prelude::*;

use crate::vision::{Facing, VisionConfig};

use super::components::{
    guard_bundle, Guard, GuardArchetype, GuardConfig, GuardSpawnError, GuardState, PatrolLeg,
};

fn guard(archetype: GuardArchetype, config: GuardConfig) -> Guard {
    Guard {
        archetype,
        origin: Vec2::ZERO,
        config,
    }
}

#[test]
fn test_default_state_per_archetype() {
    let stationary = guard(GuardArchetype::Stationary, GuardConfig::default());
    assert_eq!(
        stationary.default_state(),
        GuardState::Stationary { idle_timer: 0.0 }
    );

    let patrol = guard(GuardArchetype::Patrol, GuardConfig::default());
    assert_eq!(
        patrol.default_state(),
        GuardState::Patrol {
            leg: PatrolLeg::Outbound,
            pause_timer: None,
        }
    );

    let watcher = guard(GuardArchetype::Guard, GuardConfig::default());
    assert!(matches!(
        watcher.default_state(),
        GuardState::LookAround { index: 0, .. }
    ));
}

#[test]
fn test_empty_look_directions_degrades_to_stationary() {
    // Кривой look-around список — стоим, а не крашимся
    let config = GuardConfig {
        look_directions: vec![],
        ..GuardConfig::default()
    };
    let watcher = guard(GuardArchetype::Guard, config);
    assert_eq!(
        watcher.default_state(),
        GuardState::Stationary { idle_timer: 0.0 }
    );
}

#[test]
fn test_patrol_geometry() {
    let horizontal = guard(GuardArchetype::Patrol, GuardConfig::default());
    assert_eq!(horizontal.patrol_end(), Vec2::new(5.0, 0.0));
    assert_eq!(horizontal.patrol_facing(PatrolLeg::Outbound), Facing::Right);
    assert_eq!(horizontal.patrol_facing(PatrolLeg::Inbound), Facing::Left);

    let vertical = guard(
        GuardArchetype::Patrol,
        GuardConfig {
            patrol_vertical: true,
            patrol_length: 3.0,
            ..GuardConfig::default()
        },
    );
    assert_eq!(vertical.patrol_end(), Vec2::new(0.0, 3.0));
    assert_eq!(vertical.patrol_facing(PatrolLeg::Outbound), Facing::Up);
    assert_eq!(vertical.patrol_facing(PatrolLeg::Inbound), Facing::Down);
}

#[test]
fn test_patrol_leg_flip() {
    assert_eq!(PatrolLeg::Outbound.flip(), PatrolLeg::Inbound);
    assert_eq!(PatrolLeg::Inbound.flip(), PatrolLeg::Outbound);
}

#[test]
fn test_guard_bundle_rejects_bad_config() {
    let bad_speed = GuardConfig {
        speed: 0.0,
        ..GuardConfig::default()
    };
    assert!(matches!(
        guard_bundle(
            Vec2::ZERO,
            GuardArchetype::Patrol,
            bad_speed,
            VisionConfig::default(),
        ),
        Err(GuardSpawnError::InvalidSpeed(_))
    ));

    let bad_vision = VisionConfig {
        ray_count: 3,
        ..VisionConfig::default()
    };
    assert!(matches!(
        guard_bundle(
            Vec2::ZERO,
            GuardArchetype::Stationary,
            GuardConfig::default(),
            bad_vision,
        ),
        Err(GuardSpawnError::Vision(_))
    ));
}

#[test]
fn test_guard_bundle_spawns_at_position() {
    let position = Vec2::new(4.0, -2.0);
    let (guard, state, sensor, transform) = guard_bundle(
        position,
        GuardArchetype::Guard,
        GuardConfig::default(),
        VisionConfig::with_facing(Facing::Left),
    )
    .unwrap();

    assert_eq!(guard.origin, position);
    assert_eq!(transform.translation.truncate(), position);
    assert_eq!(sensor.facing(), Facing::Left);
    assert!(matches!(state, GuardState::LookAround { .. }));
}
