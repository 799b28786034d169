//! Vision sensor components: кардинальное направление взгляда + ray fan.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::Layer;

/// Кардинальное направление взгляда сенсора
///
/// Потребителям нужны ровно 4 дискретные оси — свободного угла здесь
/// намеренно нет. Непрерывная ориентация агента (если есть) проецирует
/// эти 4 оси через поворот, см. VisionSensor::base_direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

impl Facing {
    /// Единичный вектор оси
    pub const fn unit(self) -> Vec2 {
        match self {
            Facing::Up => Vec2::new(0.0, 1.0),
            Facing::Down => Vec2::new(0.0, -1.0),
            Facing::Left => Vec2::new(-1.0, 0.0),
            Facing::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// Квантование произвольного вектора в ближайшую кардинальную ось
    ///
    /// Доминирует компонента с большим модулем; при равенстве — вертикаль
    /// (так же решал исходный порт поведения).
    pub fn from_vector(v: Vec2) -> Self {
        if v.x.abs() > v.y.abs() {
            if v.x > 0.0 {
                Facing::Right
            } else {
                Facing::Left
            }
        } else if v.y > 0.0 {
            Facing::Up
        } else {
            Facing::Down
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Facing::Up => Facing::Down,
            Facing::Down => Facing::Up,
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    pub const fn is_horizontal(self) -> bool {
        matches!(self, Facing::Left | Facing::Right)
    }

    /// Перпендикулярная ось, повёрнутая в сторону `toward`
    ///
    /// Используется investigate-походкой для обхода cover: идём вертикально —
    /// сворачиваем в горизонталь (по знаку x цели), и наоборот.
    pub fn perpendicular_toward(self, toward: Vec2) -> Self {
        if self.is_horizontal() {
            if toward.y > 0.0 {
                Facing::Up
            } else {
                Facing::Down
            }
        } else if toward.x > 0.0 {
            Facing::Right
        } else {
            Facing::Left
        }
    }
}

/// Поворот вектора на угол (радианы), против часовой
pub(crate) fn rotate_vec(v: Vec2, radians: f32) -> Vec2 {
    let (sin, cos) = radians.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Ошибки конфигурации сенсора — ловятся при спавне, не в рантайме
#[derive(Debug, Error, PartialEq)]
pub enum VisionConfigError {
    #[error("ray count must be even and positive, got {0}")]
    InvalidRayCount(usize),
    #[error("field of view angle must be in (0, 360], got {0}")]
    InvalidFovAngle(f32),
    #[error("detection range must be positive, got {0}")]
    InvalidRange(f32),
}

/// Static configuration сенсора (задаётся при спавне)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisionConfig {
    /// Направление взгляда по умолчанию
    pub facing: Facing,
    /// Полный угол конуса (градусы)
    pub fov_angle: f32,
    /// Дальность детекции
    pub range: f32,
    /// Число лучей веера (чётное, делится поровну влево/вправо от оси)
    pub ray_count: usize,
    /// Смещение сенсорной точки назад от оси взгляда
    pub view_offset: f32,
    /// Непрерывная ориентация агента (радианы); 0 = оси без поворота
    pub orientation: f32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            facing: Facing::Up,
            fov_angle: 90.0,
            range: 10.0,
            ray_count: 50,
            view_offset: 0.1,
            orientation: 0.0,
        }
    }
}

impl VisionConfig {
    pub fn with_facing(facing: Facing) -> Self {
        Self {
            facing,
            ..Self::default()
        }
    }
}

/// Vision sensor: угловой/радиальный ray-fan детектор
///
/// Направления лучей кэшируются и пересчитываются лениво — только при смене
/// facing или ориентации, не каждый тик. Инвариант: веер симметричен
/// относительно текущей оси взгляда.
#[derive(Component, Debug, Clone)]
pub struct VisionSensor {
    facing: Facing,
    default_facing: Facing,
    orientation: f32,
    pub fov_angle: f32,
    pub range: f32,
    pub ray_count: usize,
    pub view_offset: f32,
    /// Что глушит лучи
    pub obstruction_mask: Layer,
    /// Что считается детектируемой целью
    pub target_mask: Layer,
    /// Вычитается из obstruction в detect_wall
    pub ignore_mask: Layer,
    /// false = сенсор выключен (disabled камера), детекция пропускается
    pub enabled: bool,
    /// Выход последнего тика детекции
    pub target_visible: bool,
    ray_directions: Vec<Vec2>,
}

impl VisionSensor {
    pub fn new(config: VisionConfig) -> Result<Self, VisionConfigError> {
        if config.ray_count == 0 || config.ray_count % 2 != 0 {
            return Err(VisionConfigError::InvalidRayCount(config.ray_count));
        }
        if !(config.fov_angle > 0.0 && config.fov_angle <= 360.0) {
            return Err(VisionConfigError::InvalidFovAngle(config.fov_angle));
        }
        if !(config.range > 0.0) {
            return Err(VisionConfigError::InvalidRange(config.range));
        }

        let mut sensor = Self {
            facing: config.facing,
            default_facing: config.facing,
            orientation: config.orientation,
            fov_angle: config.fov_angle,
            range: config.range,
            ray_count: config.ray_count,
            view_offset: config.view_offset,
            obstruction_mask: Layer::WALL | Layer::COVER,
            target_mask: Layer::PLAYER,
            ignore_mask: Layer::empty(),
            enabled: true,
            target_visible: false,
            ray_directions: Vec::new(),
        };
        sensor.cache_ray_directions();
        Ok(sensor)
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn default_facing(&self) -> Facing {
        self.default_facing
    }

    /// Смена направления взгляда; кэш лучей пересчитывается только при
    /// реальной смене
    pub fn set_facing(&mut self, facing: Facing) {
        if self.facing != facing {
            self.facing = facing;
            self.cache_ray_directions();
        }
    }

    pub fn reset_facing(&mut self) {
        self.set_facing(self.default_facing);
    }

    pub fn set_orientation(&mut self, orientation: f32) {
        if self.orientation != orientation {
            self.orientation = orientation;
            self.cache_ray_directions();
        }
    }

    /// Ось взгляда: кардинальный unit, спроецированный через ориентацию
    pub fn base_direction(&self) -> Vec2 {
        if self.orientation == 0.0 {
            self.facing.unit()
        } else {
            rotate_vec(self.facing.unit(), self.orientation).normalize()
        }
    }

    /// Направление луча под углом (градусы) от оси взгляда
    pub fn dir_from_angle(&self, angle_degrees: f32) -> Vec2 {
        rotate_vec(self.base_direction(), angle_degrees.to_radians()).normalize()
    }

    /// Кэш веера: [0..half) — левые лучи от внутреннего угла наружу,
    /// [half..) — правые, зеркально
    pub fn ray_directions(&self) -> &[Vec2] {
        &self.ray_directions
    }

    fn cache_ray_directions(&mut self) {
        let half = self.ray_count / 2;
        let step = (self.fov_angle / 2.0) / half as f32;

        self.ray_directions.clear();
        self.ray_directions.reserve(self.ray_count);
        for i in 0..half {
            let angle = (i as f32 + 1.0) * step;
            self.ray_directions.push(self.dir_from_angle(-angle));
        }
        for i in 0..half {
            let angle = (i as f32 + 1.0) * step;
            self.ray_directions.push(self.dir_from_angle(angle));
        }
    }
}
