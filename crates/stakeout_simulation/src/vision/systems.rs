//! Vision detection systems: ray fan, wall probe, контур конуса.

use bevy::prelude::*;

use crate::components::{LevelGeometry, Player, Surface, PLAYER_COLLIDER_RADIUS};

use super::components::{rotate_vec, VisionSensor};
use super::raycast::{cast_ray, HitKind, TargetCircle};

/// Угол боковых проб detect_wall (градусы)
const WALL_PROBE_ANGLE: f32 = 5.0;

/// Система: детекция цели всеми сенсорами (охранники и камеры)
///
/// Первая фаза тика (SimulationSet::Sense): выставляет target_visible,
/// который дальше читают guard FSM и камеры. Нет игрока — ноль raycast'ов.
pub fn vision_detection(
    mut sensors: Query<(&mut VisionSensor, &Transform), Without<Player>>,
    player: Query<&Transform, With<Player>>,
    geometry: Res<LevelGeometry>,
) {
    let target = player.single().ok().map(|tf| tf.translation.truncate());

    for (mut sensor, transform) in sensors.iter_mut() {
        sensor.target_visible = false;
        if !sensor.enabled {
            continue;
        }
        let Some(target) = target else {
            continue;
        };

        sensor.target_visible =
            detect_target(&sensor, transform.translation.truncate(), target, &geometry);
    }
}

/// Один тик детекции: угловой гейт, дистанционный гейт, ray fan
///
/// Центральный луч первым (ранний выход в коридорном случае), дальше веер
/// чередует левый/правый луч от внутреннего угла наружу. Каждый луч решается
/// первым попаданием: Wall/Cover глушит, Player — детекция всего тика.
pub fn detect_target(
    sensor: &VisionSensor,
    position: Vec2,
    target: Vec2,
    geometry: &LevelGeometry,
) -> bool {
    let base = sensor.base_direction();
    // Сенсорная точка чуть позади оси — чтобы не упереться в собственный коллайдер
    let origin = position - base * sensor.view_offset;

    let to_target = target - origin;
    if to_target.length_squared() >= sensor.range * sensor.range {
        return false;
    }

    let Some(dir_to_target) = to_target.try_normalize() else {
        // Цель стоит ровно в сенсорной точке
        return true;
    };
    let cos_angle = base.dot(dir_to_target).clamp(-1.0, 1.0);
    if cos_angle.acos().to_degrees() > sensor.fov_angle / 2.0 {
        return false;
    }

    let circle = TargetCircle {
        center: target,
        radius: PLAYER_COLLIDER_RADIUS,
    };
    let mask = sensor.obstruction_mask | sensor.target_mask;

    if ray_reaches_target(geometry, circle, origin, base, sensor.range, mask) {
        return true;
    }

    let half = sensor.ray_count / 2;
    let dirs = sensor.ray_directions();
    for i in 0..half {
        if ray_reaches_target(geometry, circle, origin, dirs[i], sensor.range, mask) {
            return true;
        }
        if ray_reaches_target(geometry, circle, origin, dirs[half + i], sensor.range, mask) {
            return true;
        }
    }

    false
}

fn ray_reaches_target(
    geometry: &LevelGeometry,
    circle: TargetCircle,
    origin: Vec2,
    dir: Vec2,
    range: f32,
    mask: crate::components::Layer,
) -> bool {
    matches!(
        cast_ray(geometry, Some(circle), origin, dir, range, mask),
        Some(hit) if hit.kind == HitKind::Player
    )
}

/// Локальная проба препятствий по курсу движения
///
/// Три коротких луча (прямо и ±5°) по obstruction-маске без ignore-слоёв.
/// Возвращает классификацию и дистанцию ближайшего попадания. Используется
/// только investigate-походкой, не детекцией игрока.
pub fn detect_wall(
    sensor: &VisionSensor,
    geometry: &LevelGeometry,
    origin: Vec2,
    move_direction: Vec2,
    radius: f32,
) -> Option<(Surface, f32)> {
    let mask = sensor.obstruction_mask & !sensor.ignore_mask;
    let probes = [
        move_direction,
        rotate_vec(move_direction, (-WALL_PROBE_ANGLE).to_radians()),
        rotate_vec(move_direction, WALL_PROBE_ANGLE.to_radians()),
    ];

    let mut nearest: Option<(Surface, f32)> = None;
    for dir in probes {
        let Some(hit) = cast_ray(geometry, None, origin, dir, radius, mask) else {
            continue;
        };
        let surface = match hit.kind {
            HitKind::Wall => Surface::Wall,
            HitKind::Cover => Surface::Cover,
            HitKind::Player => continue,
        };
        if nearest.is_none_or(|(_, d)| hit.distance < d) {
            nearest = Some((surface, hit.distance));
        }
    }
    nearest
}

/// Контур конуса зрения, обрезанный по obstruction-геометрии
///
/// Чистая геометрия для presentation-слоя (рендер конуса — не наша забота):
/// замкнутый полигон из сенсорной точки и ray_count+1 обрезанных лучей.
pub fn cone_outline(sensor: &VisionSensor, position: Vec2, geometry: &LevelGeometry) -> Vec<Vec2> {
    let base = sensor.base_direction();
    let origin = position - base * sensor.view_offset;

    let mut points = Vec::with_capacity(sensor.ray_count + 3);
    points.push(origin);

    let step = sensor.fov_angle / sensor.ray_count as f32;
    for i in 0..=sensor.ray_count {
        let angle = -sensor.fov_angle / 2.0 + i as f32 * step;
        let dir = sensor.dir_from_angle(angle);
        let distance = cast_ray(
            geometry,
            None,
            origin,
            dir,
            sensor.range,
            sensor.obstruction_mask,
        )
        .map_or(sensor.range, |hit| hit.distance);
        points.push(origin + dir * distance);
    }

    // Замыкаем полигон обратно на сенсорную точку
    points.push(origin);
    points
}
