//! Security cameras: стационарные сенсоры с временным отключением.
//!
//! Камера — это VisionSensor без FSM: она не двигается и не переходит
//! между рутинами, только качает alertness при видимом игроке. Игрок может
//! отключить камеру на фиксированное время, после чего она сама оживает.

use bevy::prelude::*;

use crate::components::{Alertness, Player};
use crate::logger;
use crate::vision::{VisionConfig, VisionConfigError, VisionSensor};
use crate::SimulationSet;

/// Камера наблюдения
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct SecurityCamera {
    /// Базовая скорость накачки alertness при визуальном контакте
    pub alert_rate: f32,
    /// Длительность отключения (секунды)
    pub disable_duration: f32,
    /// Some = камера отключена, досчитываем до включения
    disabled_timer: Option<f32>,
}

impl Default for SecurityCamera {
    fn default() -> Self {
        Self {
            alert_rate: 15.0,
            disable_duration: 10.0,
            disabled_timer: None,
        }
    }
}

impl SecurityCamera {
    pub fn is_disabled(&self) -> bool {
        self.disabled_timer.is_some()
    }

    /// Отключает камеру на disable_duration; сенсор гаснет немедленно
    pub fn disable(&mut self, sensor: &mut VisionSensor) {
        self.disabled_timer = Some(self.disable_duration);
        sensor.enabled = false;
        sensor.target_visible = false;
        logger::log_info(&format!(
            "📷 Camera disabled for {:.0}s",
            self.disable_duration
        ));
    }

    /// Досрочное ручное включение (таймер при этом сбрасывается)
    pub fn enable(&mut self, sensor: &mut VisionSensor) {
        self.disabled_timer = None;
        sensor.enabled = true;
    }
}

/// Собирает валидированный bundle камеры
pub fn camera_bundle(
    position: Vec2,
    camera: SecurityCamera,
    vision: VisionConfig,
) -> Result<(SecurityCamera, VisionSensor, Transform), VisionConfigError> {
    let sensor = VisionSensor::new(vision)?;
    Ok((
        camera,
        sensor,
        Transform::from_translation(position.extend(0.0)),
    ))
}

/// Система: отсчёт отключения и автоматическое включение
///
/// Идёт до vision_detection в том же тике: камера, ожившая в этом тике,
/// уже детектирует.
pub fn camera_tick_disable(
    time: Res<Time<Fixed>>,
    mut cameras: Query<(&mut SecurityCamera, &mut VisionSensor)>,
) {
    let dt = time.delta_secs();

    for (mut camera, mut sensor) in cameras.iter_mut() {
        let Some(mut timer) = camera.disabled_timer else {
            continue;
        };
        timer -= dt;
        if timer <= 0.0 {
            camera.disabled_timer = None;
            sensor.enabled = true;
            logger::log_info("📷 Camera back online");
        } else {
            camera.disabled_timer = Some(timer);
        }
    }
}

/// Система: накачка alertness камерами, видящими игрока
///
/// Камера не различает "в упор по коридору": мгновенного захвата нет,
/// только накачка обратно пропорционально квадрату дистанции.
pub fn camera_detection(
    time: Res<Time<Fixed>>,
    cameras: Query<(&SecurityCamera, &VisionSensor, &Transform)>,
    mut player: Query<(&Player, &mut Alertness, &Transform), Without<SecurityCamera>>,
) {
    let dt = time.delta_secs();
    let Ok((player, mut alertness, player_tf)) = player.single_mut() else {
        return;
    };
    let player_pos = player_tf.translation.truncate();

    for (camera, sensor, transform) in cameras.iter() {
        if !sensor.target_visible {
            continue;
        }
        let distance_sq = (player_pos - transform.translation.truncate()).length_squared();
        let stimulus = camera.alert_rate / distance_sq.max(1.0) * dt;
        alertness.increase_scaled(stimulus, player.sensitivity());
    }
}

/// Camera Plugin: тик отключения до детекции, накачка после guard FSM
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<SecurityCamera>().add_systems(
            FixedUpdate,
            (
                camera_tick_disable
                    .in_set(SimulationSet::Sense)
                    .before(crate::vision::systems::vision_detection),
                camera_detection
                    .in_set(SimulationSet::Decide)
                    .after(crate::guard::systems::guard_fsm_transitions),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::Facing;

    #[test]
    fn test_disable_kills_sensor_immediately() {
        let mut camera = SecurityCamera::default();
        let mut sensor = VisionSensor::new(VisionConfig::with_facing(Facing::Down)).unwrap();
        sensor.target_visible = true;

        camera.disable(&mut sensor);

        assert!(camera.is_disabled());
        assert!(!sensor.enabled);
        assert!(!sensor.target_visible);
    }

    #[test]
    fn test_camera_bundle_propagates_vision_errors() {
        let bad = VisionConfig {
            range: -1.0,
            ..VisionConfig::default()
        };
        assert!(camera_bundle(Vec2::ZERO, SecurityCamera::default(), bad).is_err());
    }
}
