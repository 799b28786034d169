//! Vision module: угловой/радиальный ray-fan детектор.
//!
//! Порядок в тике: детекция — первая фаза (Sense), её выход
//! (VisionSensor::target_visible) потребляют guard FSM и камеры в Decide.

use bevy::prelude::*;

pub mod components;
pub mod raycast;
pub mod systems;


// Re-export основных типов
pub use components::{Facing, VisionConfig, VisionConfigError, VisionSensor};
pub use raycast::{cast_ray, ray_aabb, ray_circle, HitKind, RayHit, TargetCircle};
pub use systems::{cone_outline, detect_target, detect_wall, vision_detection};

use crate::SimulationSet;

/// Vision Plugin: регистрирует детекцию в Sense-фазе FixedUpdate
pub struct VisionPlugin;

impl Plugin for VisionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            systems::vision_detection.in_set(SimulationSet::Sense),
        );
    }
}
