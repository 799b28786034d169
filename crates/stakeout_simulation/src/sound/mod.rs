//! Sound propagation: мгновенная рассылка звуковых событий охранникам.
//!
//! Звук — одноразовое событие с точкой, без затухания по времени: все
//! охранники в радиусе реагируют в том же тике (SimulationSet::React,
//! после зрения и до переходов FSM).

use bevy::prelude::*;

use crate::guard::{Guard, GuardState};
use crate::logger;
use crate::vision::{Facing, VisionSensor};
use crate::SimulationSet;

/// Радиус оповещения (включительно), не зависит от vision range охранников
pub const SOUND_NOTIFY_RADIUS: f32 = 8.0;

/// Квадрат радиуса "только посмотреть": звук настолько близко, что идти
/// к нему незачем, достаточно повернуться
const JUST_LOOK_RADIUS_SQ: f32 = 16.0;

/// Событие: в точке прозвучал звук (бросок предмета, шаги по стеклу)
#[derive(Event, Debug, Clone, Copy)]
pub struct SoundEmitted {
    pub position: Vec2,
}

/// Система: раздача звуковых событий охранникам в радиусе
///
/// Звук прерывает любую текущую рутину, включая Alerted: если alertness
/// всё ещё в Medium-банде, гистерезис вернёт охранника в Alerted на том же
/// тике. Близкий звук — поворот на источник и немедленное продолжение
/// дефолтной рутины, дальний — переход в InvestigateSound. Ноль слышавших —
/// валидный no-op, звук просто затухает.
pub fn sound_propagation(
    mut events: EventReader<SoundEmitted>,
    mut guards: Query<(&Guard, &mut GuardState, &mut VisionSensor, &Transform)>,
) {
    for event in events.read() {
        let mut hearers = 0usize;

        for (guard, mut state, mut sensor, transform) in guards.iter_mut() {
            let position = transform.translation.truncate();
            let to_sound = event.position - position;
            let distance_sq = to_sound.length_squared();
            if distance_sq > SOUND_NOTIFY_RADIUS * SOUND_NOTIFY_RADIUS {
                continue;
            }
            hearers += 1;

            if distance_sq <= JUST_LOOK_RADIUS_SQ {
                // Близко — достаточно обернуться, идти незачем
                sensor.set_facing(Facing::from_vector(to_sound));
                *state = guard.default_state();
            } else {
                *state = GuardState::investigate(event.position);
            }
        }

        if hearers == 0 {
            logger::log(&format!(
                "🔊 Sound at ({:.1}, {:.1}) faded unheard",
                event.position.x, event.position.y
            ));
        } else {
            logger::log(&format!(
                "🔊 Sound at ({:.1}, {:.1}) heard by {} guard(s)",
                event.position.x, event.position.y, hearers
            ));
        }
    }
}

/// Sound Plugin: событие + рассылка в React-фазе
pub struct SoundPlugin;

impl Plugin for SoundPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SoundEmitted>().add_systems(
            FixedUpdate,
            sound_propagation.in_set(SimulationSet::React),
        );
    }
}
