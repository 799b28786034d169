//! Guard module: архетипы охранников, FSM и движение.
//!
//! Одна рутина на охранника в каждый момент: GuardState — enum, переход
//! заменяет состояние целиком. Переходы (Decide) идут после стимулов тика,
//! движение (Act) — после переходов.

use bevy::prelude::*;

pub mod components;
pub mod systems;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod components_tests;

// Re-export основных типов
pub use components::{
    guard_bundle, Guard, GuardArchetype, GuardConfig, GuardSpawnError, GuardState, PatrolLeg,
    ALIGNMENT_EPSILON, STATIONARY_IDLE_TIMEOUT,
};
pub use systems::{guard_fsm_transitions, guard_movement, validate_guard_wiring};

use crate::SimulationSet;

/// Guard Plugin: регистрирует FSM и движение в FixedUpdate
pub struct GuardPlugin;

impl Plugin for GuardPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<GuardState>().add_systems(
            FixedUpdate,
            (
                (systems::validate_guard_wiring, systems::guard_fsm_transitions)
                    .chain()
                    .in_set(SimulationSet::Decide),
                systems::guard_movement.in_set(SimulationSet::Act),
            ),
        );
    }
}
