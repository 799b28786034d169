//! Guard components: архетип, конфиг, state machine.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logger;
use crate::vision::{Facing, VisionConfig, VisionConfigError, VisionSensor};

/// Idle-таймаут Stationary: после него сенсор возвращается к default facing
/// и охранник уходит в дефолтную рутину архетипа
pub const STATIONARY_IDLE_TIMEOUT: f32 = 5.0;

/// Эпсилон кардинального выравнивания для direct-capture shortcut
/// ("увидел в упор в коридоре")
pub const ALIGNMENT_EPSILON: f32 = 0.5;

/// Архетип охранника — фиксируется при спавне, выбирает дефолтную рутину
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Reflect)]
pub enum GuardArchetype {
    /// Стоит на месте, держит default facing
    Stationary,
    /// Стоит, но циклически осматривается по списку направлений
    Guard,
    /// Ходит между точкой спавна и origin+offset по оси
    Patrol,
}

/// Static configuration охранника (задаётся один раз при спавне)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Скорость ходьбы (м/с)
    pub speed: f32,
    /// Пауза на концах патруля и между look-around направлениями (секунды)
    pub pause_duration: f32,
    /// Ось патруля: вертикаль (Up) или горизонталь (Right)
    pub patrol_vertical: bool,
    /// Длина плеча патруля от origin
    pub patrol_length: f32,
    /// Базовая скорость накачки alertness при визуальном контакте
    pub alert_rate: f32,
    /// Радиус слуха (proximity hearing + detect_wall проба)
    pub hearing_radius: f32,
    /// Упорядоченный цикл направлений для LookAround
    pub look_directions: Vec<Facing>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            speed: 2.0,
            pause_duration: 2.0,
            patrol_vertical: false,
            patrol_length: 5.0,
            alert_rate: 10.0,
            hearing_radius: 5.0,
            look_directions: vec![Facing::Up, Facing::Right, Facing::Down, Facing::Left],
        }
    }
}

/// Плечо патруля: от origin к концу или обратно
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum PatrolLeg {
    Outbound,
    Inbound,
}

impl PatrolLeg {
    pub const fn flip(self) -> Self {
        match self {
            PatrolLeg::Outbound => PatrolLeg::Inbound,
            PatrolLeg::Inbound => PatrolLeg::Outbound,
        }
    }
}

/// Guard FSM: ровно одна живая рутина на охранника
///
/// Enum-состояние и есть рутина: каждый переход заменяет его целиком,
/// так что "остановить предыдущую рутину" происходит автоматически.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub enum GuardState {
    /// Ходьба origin ↔ origin+offset с паузами на концах
    Patrol {
        leg: PatrolLeg,
        /// Some = стоим на конце плеча, досчитываем паузу
        pause_timer: Option<f32>,
    },
    /// Циклический осмотр по списку направлений
    LookAround { index: usize, pause_timer: f32 },
    /// Стоим; после idle-таймаута сенсор сбрасывается на default facing
    Stationary { idle_timer: f32 },
    /// Алертный трекинг: каждый тик доворачиваем сенсор на игрока
    Alerted,
    /// Идём к точке звука кардинальными шагами
    InvestigateSound {
        /// Точка звука (фиксированная на всё расследование)
        target: Vec2,
        /// Последнее направление шага — для счётчика разворотов
        last_facing: Option<Facing>,
        /// Развороты в текущем окне (stuck-agent safeguard)
        reversals: u32,
        /// Таймер окна сброса счётчика
        window_timer: f32,
        /// Позиция прошлого тика — контроль прогресса
        last_position: Option<Vec2>,
    },
}

impl Default for GuardState {
    fn default() -> Self {
        GuardState::Stationary { idle_timer: 0.0 }
    }
}

impl GuardState {
    /// Свежее investigate-состояние для точки звука
    pub fn investigate(target: Vec2) -> Self {
        GuardState::InvestigateSound {
            target,
            last_facing: None,
            reversals: 0,
            window_timer: 0.0,
            last_position: None,
        }
    }
}

/// Охранник: архетип + конфиг + точка спавна
#[derive(Component, Debug, Clone)]
pub struct Guard {
    pub archetype: GuardArchetype,
    /// Позиция спавна — начало патрульного плеча
    pub origin: Vec2,
    pub config: GuardConfig,
}

impl Guard {
    /// Единичный вектор оси патруля
    pub fn patrol_axis(&self) -> Vec2 {
        if self.config.patrol_vertical {
            Vec2::Y
        } else {
            Vec2::X
        }
    }

    pub fn patrol_end(&self) -> Vec2 {
        self.origin + self.patrol_axis() * self.config.patrol_length
    }

    /// Направление взгляда по ходу движения на плече
    pub fn patrol_facing(&self, leg: PatrolLeg) -> Facing {
        match (self.config.patrol_vertical, leg) {
            (true, PatrolLeg::Outbound) => Facing::Up,
            (true, PatrolLeg::Inbound) => Facing::Down,
            (false, PatrolLeg::Outbound) => Facing::Right,
            (false, PatrolLeg::Inbound) => Facing::Left,
        }
    }

    /// Дефолтная рутина архетипа
    ///
    /// Пустой look-around список — LogicalNoOp: логируем и стоим вместо
    /// входа в LookAround, без краша.
    pub fn default_state(&self) -> GuardState {
        match self.archetype {
            GuardArchetype::Stationary => GuardState::Stationary { idle_timer: 0.0 },
            GuardArchetype::Guard => {
                if self.config.look_directions.is_empty() {
                    logger::log_warning("Guard: no directions specified for LookAround, idling");
                    GuardState::Stationary { idle_timer: 0.0 }
                } else {
                    GuardState::LookAround {
                        index: 0,
                        pause_timer: self.config.pause_duration,
                    }
                }
            }
            GuardArchetype::Patrol => GuardState::Patrol {
                leg: PatrolLeg::Outbound,
                pause_timer: None,
            },
        }
    }
}

/// Ошибки конфигурации охранника при спавне
///
/// ConfigurationError ловится громко на инициализации: охранник с кривой
/// конфигурацией не спавнится вовсе, вместо тихого no-op в рантайме.
#[derive(Debug, Error)]
pub enum GuardSpawnError {
    #[error("guard speed must be positive, got {0}")]
    InvalidSpeed(f32),
    #[error("guard hearing radius must be positive, got {0}")]
    InvalidHearingRadius(f32),
    #[error("invalid vision sensor config: {0}")]
    Vision(#[from] VisionConfigError),
}

/// Собирает валидированный bundle охранника
///
/// Сенсор обязателен by construction — guard без vision wiring не собрать.
pub fn guard_bundle(
    position: Vec2,
    archetype: GuardArchetype,
    config: GuardConfig,
    vision: VisionConfig,
) -> Result<(Guard, GuardState, VisionSensor, Transform), GuardSpawnError> {
    if !(config.speed > 0.0) {
        return Err(GuardSpawnError::InvalidSpeed(config.speed));
    }
    if !(config.hearing_radius > 0.0) {
        return Err(GuardSpawnError::InvalidHearingRadius(config.hearing_radius));
    }

    let sensor = VisionSensor::new(vision)?;
    let guard = Guard {
        archetype,
        origin: position,
        config,
    };
    let state = guard.default_state();

    Ok((
        guard,
        state,
        sensor,
        Transform::from_translation(position.extend(0.0)),
    ))
}
