//! Guard FSM: стимулы (зрение, слух) и переходы между рутинами.

use bevy::prelude::*;

use crate::components::{Alertness, Player};
use crate::logger;
use crate::vision::{Facing, VisionSensor};

use super::super::components::{
    Guard, GuardArchetype, GuardState, ALIGNMENT_EPSILON, STATIONARY_IDLE_TIMEOUT,
};

/// Потолок alertness от одного только proximity-слуха: слух сам по себе
/// не "ловит" игрока, добивает до поимки только зрение
const HEARING_ALERTNESS_CAP: f32 = 80.0;

/// Усиление слухового стимула относительно базового rate
const HEARING_GAIN: f32 = 2.0;

/// Система: валидация wiring охранника при спавне
///
/// Охранник без VisionSensor бесполезен и ломает инварианты FSM, поэтому
/// деспавним сразу и громко. Через guard_bundle такой не собрать, система
/// ловит ручной спавн по кускам.
pub fn validate_guard_wiring(
    mut commands: Commands,
    guards: Query<(Entity, Option<&VisionSensor>), Added<Guard>>,
) {
    for (entity, sensor) in guards.iter() {
        if sensor.is_none() {
            logger::log_error(&format!(
                "Guard {entity:?} spawned without VisionSensor, despawning"
            ));
            commands.entity(entity).despawn();
        }
    }
}

/// Вход в Alerted: Medium-банда и игрок не присел
///
/// Гистерезис: порог входа (>33) выше порога выхода (<33 в should_stand_down),
/// High-банда входа не даёт — туда попадают только мгновенным захватом,
/// который и так терминален.
pub fn should_enter_alerted(alertness: f32, player_crouching: bool) -> bool {
    alertness > 33.0 && alertness <= 66.0 && !player_crouching
}

/// Выход из Alerted обратно в дефолтную рутину
pub fn should_stand_down(alertness: f32) -> bool {
    alertness < 33.0
}

/// Система: стимулы и переходы guard FSM
///
/// Порядок внутри тика закреплён: сперва визуальный/слуховой стимул
/// поднимает alertness, затем по свежему значению решаются переходы,
/// затем тикают таймеры текущей рутины. Spatial движение — отдельная
/// система (SimulationSet::Act).
pub fn guard_fsm_transitions(
    time: Res<Time<Fixed>>,
    mut guards: Query<(&Guard, &mut GuardState, &mut VisionSensor, &Transform), Without<Player>>,
    mut player: Query<(&Player, &mut Alertness, &Transform), Without<Guard>>,
) {
    let dt = time.delta_secs();
    let mut player = player.single_mut().ok();

    for (guard, mut state, mut sensor, transform) in guards.iter_mut() {
        let guard_pos = transform.translation.truncate();

        // --- Стимулы ---
        let mut player_crouching = false;
        if let Some((player, alertness, player_tf)) = player.as_mut() {
            player_crouching = player.is_crouching;
            let delta = player_tf.translation.truncate() - guard_pos;

            if sensor.target_visible {
                apply_visual_stimulus(guard, sensor.as_mut(), player, alertness.as_mut(), delta, dt);
            } else {
                apply_hearing_stimulus(guard, sensor.as_mut(), player, alertness.as_mut(), delta, dt);
            }
        }

        let alertness_value = player
            .as_ref()
            .map_or(0.0, |(_, alertness, _)| alertness.value());

        // --- Переходы ---
        let alerted = matches!(*state, GuardState::Alerted);
        if !alerted && should_enter_alerted(alertness_value, player_crouching) {
            logger::log_info(&format!(
                "⚠️ Guard at ({:.1}, {:.1}) alerted",
                guard_pos.x, guard_pos.y
            ));
            *state = GuardState::Alerted;
            continue;
        }
        if alerted && should_stand_down(alertness_value) {
            sensor.reset_facing();
            *state = guard.default_state();
            continue;
        }

        // --- Таймеры текущей рутины ---
        match &mut *state {
            GuardState::Alerted => {
                // Непрерывный трекинг: доворачиваемся на игрока каждый тик.
                // Присевшего не доворачиваем, но Alerted держим до спада <33.
                if let Some((player, _, player_tf)) = player.as_ref() {
                    if !player.is_crouching {
                        let delta = player_tf.translation.truncate() - guard_pos;
                        sensor.set_facing(Facing::from_vector(delta));
                    }
                }
            }
            GuardState::LookAround { index, pause_timer } => {
                let directions = &guard.config.look_directions;
                if directions.is_empty() {
                    // Список опустел быть не может при спавне через default_state,
                    // но ручная сборка состояния обязана деградировать так же
                    logger::log_warning("Guard: no directions specified for LookAround, idling");
                    *state = GuardState::Stationary { idle_timer: 0.0 };
                    continue;
                }
                sensor.set_facing(directions[*index % directions.len()]);
                *pause_timer -= dt;
                if *pause_timer <= 0.0 {
                    *index = (*index + 1) % directions.len();
                    *pause_timer = guard.config.pause_duration;
                }
            }
            GuardState::Stationary { idle_timer } => {
                *idle_timer += dt;
                if *idle_timer >= STATIONARY_IDLE_TIMEOUT {
                    sensor.reset_facing();
                    if guard.archetype == GuardArchetype::Stationary {
                        *idle_timer = 0.0;
                    } else {
                        *state = guard.default_state();
                    }
                }
            }
            // Patrol и InvestigateSound двигаются в guard_movement
            GuardState::Patrol { .. } | GuardState::InvestigateSound { .. } => {}
        }
    }
}

/// Визуальный стимул: мгновенный захват при кардинальном выравнивании,
/// иначе накачка обратно пропорционально дистанции
fn apply_visual_stimulus(
    guard: &Guard,
    sensor: &mut VisionSensor,
    player: &Player,
    alertness: &mut Alertness,
    delta: Vec2,
    dt: f32,
) {
    let aligned =
        delta.x.abs() < ALIGNMENT_EPSILON || delta.y.abs() < ALIGNMENT_EPSILON;

    if aligned && !player.disguise_on {
        // Увидел в упор по коридору — немедленный максимум
        logger::log_info("👁️ Guard spotted the player dead ahead");
        alertness.set(alertness.tuning().max);
    } else {
        let distance = delta.length();
        let mut stimulus = guard.config.alert_rate / distance.max(1.0) * dt;
        if player.is_crouching {
            stimulus *= 0.5;
        }
        alertness.increase_scaled(stimulus, player.sensitivity());
    }

    // Подозрение выше Low — начинаем довороты на игрока; присевшего
    // не трекаем, подозрение остаётся "размытым"
    if alertness.value() > 33.0 && !player.is_crouching {
        sensor.set_facing(Facing::from_vector(delta));
    }
}

/// Proximity hearing: некрауч-движение без маскировки рядом с охранником
///
/// Накачка растёт к центру радиуса и капится на HEARING_ALERTNESS_CAP:
/// слух не умеет "ловить", только насторожить.
fn apply_hearing_stimulus(
    guard: &Guard,
    sensor: &mut VisionSensor,
    player: &Player,
    alertness: &mut Alertness,
    delta: Vec2,
    dt: f32,
) {
    let radius = guard.config.hearing_radius;
    if delta.length_squared() > radius * radius {
        return;
    }
    if !player.is_moving || player.is_crouching || player.disguise_on {
        return;
    }

    let distance = delta.length();
    let gain = guard.config.alert_rate * (radius - distance).max(1.0) * dt * HEARING_GAIN;
    let capped = (alertness.value() + gain).min(HEARING_ALERTNESS_CAP);
    if capped > alertness.value() {
        alertness.set(capped);
    }

    if alertness.value() > 33.0 {
        sensor.set_facing(Facing::from_vector(delta));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alerted_hysteresis_thresholds() {
        // Вход строго выше 33, выход строго ниже 33
        assert!(!should_enter_alerted(32.9, false));
        assert!(!should_enter_alerted(33.0, false));
        assert!(should_enter_alerted(33.1, false));
        assert!(should_enter_alerted(66.0, false));
        assert!(!should_enter_alerted(66.1, false));

        assert!(should_stand_down(32.9));
        assert!(!should_stand_down(33.0));
        assert!(!should_stand_down(50.0));
    }

    #[test]
    fn test_crouching_blocks_alerted_entry() {
        assert!(!should_enter_alerted(50.0, true));
        assert!(should_enter_alerted(50.0, false));
    }
}
