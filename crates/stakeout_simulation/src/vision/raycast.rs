//! Аналитические raycast'ы по статической геометрии.
//!
//! Strategic layer не таскает физический движок: все запросы детекции — это
//! луч против горстки AABB (slab test) плюс круг коллайдера игрока.
//! Возвращается только первое попадание — классификацию делает вызывающий.

use bevy::prelude::*;

use crate::components::{Layer, LevelGeometry, Surface};

/// Классификация первого попадания луча
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    Wall,
    Cover,
    Player,
}

impl From<Surface> for HitKind {
    fn from(surface: Surface) -> Self {
        match surface {
            Surface::Wall => HitKind::Wall,
            Surface::Cover => HitKind::Cover,
        }
    }
}

/// Результат raycast'а: что и на каком расстоянии
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub kind: HitKind,
    pub distance: f32,
}

/// Круглый коллайдер цели (игрока)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetCircle {
    pub center: Vec2,
    pub radius: f32,
}

/// Луч против AABB (slab method)
///
/// `dir` — единичный. Возвращает расстояние до входа; луч, стартующий
/// внутри бокса, попадает на расстоянии 0.
pub fn ray_aabb(origin: Vec2, dir: Vec2, min: Vec2, max: Vec2) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..2 {
        let (o, d, lo, hi) = if axis == 0 {
            (origin.x, dir.x, min.x, max.x)
        } else {
            (origin.y, dir.y, min.y, max.y)
        };

        if d.abs() < 1e-8 {
            // Луч параллелен слэбу: либо внутри по этой оси, либо мимо
            if o < lo || o > hi {
                return None;
            }
        } else {
            let t1 = (lo - o) / d;
            let t2 = (hi - o) / d;
            let (t1, t2) = if t1 > t2 { (t2, t1) } else { (t1, t2) };
            t_near = t_near.max(t1);
            t_far = t_far.min(t2);
            if t_near > t_far {
                return None;
            }
        }
    }

    if t_far < 0.0 {
        None
    } else {
        Some(t_near.max(0.0))
    }
}

/// Луч против круга
///
/// `dir` — единичный. Луч изнутри круга попадает на расстоянии 0.
pub fn ray_circle(origin: Vec2, dir: Vec2, center: Vec2, radius: f32) -> Option<f32> {
    let to_center = center - origin;
    let proj = to_center.dot(dir);
    let closest_sq = to_center.length_squared() - proj * proj;
    let radius_sq = radius * radius;

    if closest_sq > radius_sq {
        return None;
    }

    let half_chord = (radius_sq - closest_sq).sqrt();
    let t_exit = proj + half_chord;
    if t_exit < 0.0 {
        // Круг целиком позади
        return None;
    }
    Some((proj - half_chord).max(0.0))
}

/// Каст одного луча по маске слоёв, first-hit-only
///
/// Перебирает коллайдеры геометрии, чей слой пересекается с маской, плюс
/// коллайдер цели если маска содержит PLAYER. Возвращает ближайшее
/// попадание в пределах `max_distance`.
pub fn cast_ray(
    geometry: &LevelGeometry,
    target: Option<TargetCircle>,
    origin: Vec2,
    dir: Vec2,
    max_distance: f32,
    mask: Layer,
) -> Option<RayHit> {
    let mut nearest: Option<RayHit> = None;

    for collider in &geometry.colliders {
        if !mask.intersects(collider.surface.layer()) {
            continue;
        }
        if let Some(distance) = ray_aabb(origin, dir, collider.min, collider.max) {
            if distance <= max_distance && nearest.is_none_or(|hit| distance < hit.distance) {
                nearest = Some(RayHit {
                    kind: collider.surface.into(),
                    distance,
                });
            }
        }
    }

    if mask.contains(Layer::PLAYER) {
        if let Some(circle) = target {
            if let Some(distance) = ray_circle(origin, dir, circle.center, circle.radius) {
                if distance <= max_distance && nearest.is_none_or(|hit| distance < hit.distance) {
                    nearest = Some(RayHit {
                        kind: HitKind::Player,
                        distance,
                    });
                }
            }
        }
    }

    nearest
}
