//! Spatial движение охранников: патрульные плечи и investigate-походка.

use bevy::prelude::*;

use crate::components::{LevelGeometry, Player, Surface};
use crate::logger;
use crate::vision::{detect_wall, Facing, VisionSensor};

use super::super::components::{Guard, GuardState, PatrolLeg};

/// Порог прибытия на конец патрульного плеча
const PATROL_ARRIVE_DISTANCE_SQ: f32 = 0.01;

/// Порог прибытия к точке звука (квадрат дистанции)
const INVESTIGATE_ARRIVE_DISTANCE_SQ: f32 = 2.0;

/// Wall по курсу ближе этой дистанции — расследование обрывается
const WALL_STOP_DISTANCE: f32 = 1.0;

/// Cover по курсу ближе этой дистанции — обходим перпендикуляром
const COVER_SWAP_DISTANCE: f32 = 0.5;

/// Окно сброса счётчика разворотов (секунды)
const REVERSAL_WINDOW: f32 = 2.0;

/// Разворотов за окно до принудительной остановки (stuck-agent safeguard)
const MAX_REVERSALS: u32 = 4;

/// Минимальный прогресс за тик; меньше — агент застрял
const PROGRESS_EPSILON_SQ: f32 = 1.0e-8;

/// Шаг к цели, не перелетая её
fn step_towards(from: Vec2, to: Vec2, max_step: f32) -> Vec2 {
    let delta = to - from;
    let distance = delta.length();
    if distance <= max_step || distance < f32::EPSILON {
        to
    } else {
        from + delta / distance * max_step
    }
}

/// Система: движение Patrol- и InvestigateSound-рутин
///
/// Работает после переходов FSM (SimulationSet::Act): если тик перевёл
/// охранника в Alerted, шаг этого тика уже не делается.
pub fn guard_movement(
    time: Res<Time<Fixed>>,
    geometry: Res<LevelGeometry>,
    mut guards: Query<
        (&Guard, &mut GuardState, &mut VisionSensor, &mut Transform),
        Without<Player>,
    >,
) {
    let dt = time.delta_secs();

    for (guard, mut state, mut sensor, mut transform) in guards.iter_mut() {
        let position = transform.translation.truncate();

        let replacement = match &mut *state {
            GuardState::Patrol { leg, pause_timer } => {
                if let Some(timer) = pause_timer {
                    *timer -= dt;
                    if *timer <= 0.0 {
                        *leg = leg.flip();
                        *pause_timer = None;
                    }
                } else {
                    let destination = match leg {
                        PatrolLeg::Outbound => guard.patrol_end(),
                        PatrolLeg::Inbound => guard.origin,
                    };
                    sensor.set_facing(guard.patrol_facing(*leg));

                    let next = step_towards(position, destination, guard.config.speed * dt);
                    transform.translation = next.extend(transform.translation.z);

                    if next.distance_squared(destination) < PATROL_ARRIVE_DISTANCE_SQ {
                        *pause_timer = Some(guard.config.pause_duration);
                    }
                }
                None
            }
            GuardState::InvestigateSound {
                target,
                last_facing,
                reversals,
                window_timer,
                last_position,
            } => investigate_step(
                guard,
                sensor.as_mut(),
                &mut transform,
                &geometry,
                position,
                *target,
                last_facing,
                reversals,
                window_timer,
                last_position,
                dt,
            ),
            // Остальные рутины не двигаются
            _ => None,
        };

        if let Some(new_state) = replacement {
            *state = new_state;
        }
    }
}

/// Один шаг investigate-походки: кардинальный шаг к цели с обходом cover
/// и safeguard'ами на стены, осцилляцию и отсутствие прогресса
#[allow(clippy::too_many_arguments)]
fn investigate_step(
    guard: &Guard,
    sensor: &mut VisionSensor,
    transform: &mut Transform,
    geometry: &LevelGeometry,
    position: Vec2,
    target: Vec2,
    last_facing: &mut Option<Facing>,
    reversals: &mut u32,
    window_timer: &mut f32,
    last_position: &mut Option<Vec2>,
    dt: f32,
) -> Option<GuardState> {
    let to_target = target - position;
    if to_target.length_squared() <= INVESTIGATE_ARRIVE_DISTANCE_SQ {
        logger::log(&format!(
            "Guard reached sound origin ({:.1}, {:.1})",
            target.x, target.y
        ));
        return Some(GuardState::Stationary { idle_timer: 0.0 });
    }

    let mut facing = Facing::from_vector(to_target);

    // Локальная проба препятствий по курсу
    if let Some((surface, distance)) = detect_wall(
        sensor,
        geometry,
        position,
        facing.unit(),
        guard.config.hearing_radius,
    ) {
        match surface {
            Surface::Wall if distance < WALL_STOP_DISTANCE => {
                logger::log("Guard investigation blocked by wall, giving up");
                return Some(GuardState::Stationary { idle_timer: 0.0 });
            }
            Surface::Cover if distance < COVER_SWAP_DISTANCE => {
                facing = facing.perpendicular_toward(to_target);
            }
            _ => {}
        }
    }

    // Счётчик разворотов в скользящем окне
    *window_timer += dt;
    if *window_timer >= REVERSAL_WINDOW {
        *window_timer = 0.0;
        *reversals = 0;
    }
    if *last_facing == Some(facing.opposite()) {
        *reversals += 1;
        if *reversals >= MAX_REVERSALS {
            logger::log_warning("Guard oscillating during investigation, stopping");
            return Some(GuardState::Stationary { idle_timer: 0.0 });
        }
    }
    *last_facing = Some(facing);

    // Контроль прогресса: шаг был, а позиция не сдвинулась
    if let Some(previous) = *last_position {
        if position.distance_squared(previous) < PROGRESS_EPSILON_SQ {
            logger::log_warning("Guard stuck during investigation, stopping");
            return Some(GuardState::Stationary { idle_timer: 0.0 });
        }
    }
    *last_position = Some(position);

    sensor.set_facing(facing);
    let next = position + facing.unit() * guard.config.speed * dt;
    transform.translation = next.extend(transform.translation.z);

    None
}
