//! Статическая геометрия уровня: коллайдеры, слои, классификация поверхностей.
//!
//! Физического движка в strategic layer нет — raycast'ы считаются аналитически
//! по небольшому набору AABB (см. vision::raycast). Tactical/presentation слой
//! владеет настоящей физикой, сюда попадает только то, что нужно детекции.

use bevy::prelude::*;
use bitflags::bitflags;

/// Радиус коллайдера игрока (круг) для target raycast'ов
pub const PLAYER_COLLIDER_RADIUS: f32 = 0.3;

bitflags! {
    /// Слои коллизий для raycast масок
    ///
    /// Сенсор кастует лучи по union'у obstruction|target и классифицирует
    /// первое попадание; ignore-маска вычитается в detect_wall.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Layer: u32 {
        const WALL = 1 << 0;
        const COVER = 1 << 1;
        const PLAYER = 1 << 2;
    }
}

/// Классификация статической поверхности
///
/// Wall глушит лучи и останавливает investigate-походку;
/// Cover глушит лучи, но обходится по перпендикулярной оси.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum Surface {
    Wall,
    Cover,
}

impl Surface {
    pub fn layer(self) -> Layer {
        match self {
            Surface::Wall => Layer::WALL,
            Surface::Cover => Layer::COVER,
        }
    }
}

/// Axis-aligned коллайдер статической геометрии
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCollider {
    pub min: Vec2,
    pub max: Vec2,
    pub surface: Surface,
}

impl BoxCollider {
    pub fn new(center: Vec2, half_extents: Vec2, surface: Surface) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
            surface,
        }
    }

    /// Коллайдер по углам (удобно для стен уровня)
    pub fn from_corners(min: Vec2, max: Vec2, surface: Surface) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
            surface,
        }
    }
}

/// Resource: статическая геометрия уровня
///
/// Заполняется один раз при загрузке сцены внешним слоем; симуляция
/// только читает. Пустая геометрия валидна (открытое поле).
#[derive(Resource, Debug, Clone, Default)]
pub struct LevelGeometry {
    pub colliders: Vec<BoxCollider>,
}

impl LevelGeometry {
    pub fn with_colliders(colliders: Vec<BoxCollider>) -> Self {
        Self { colliders }
    }

    pub fn push(&mut self, collider: BoxCollider) {
        self.colliders.push(collider);
    }
}
