//! Компоненты игрока: флаги состояния + alertness tracker.
//!
//! Alertness — единственный общий скаляр угрозы: его поднимают все охранники
//! и камеры, спадает он сам после grace-паузы. Guards читают уровень (банды
//! Low/Medium/High) для своих переходов, UI — для индикатора.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Маркер + внешние флаги игрока, которые читают сенсоры и охранники
///
/// Флаги выставляет внешний слой управления (input/inventory); симуляция
/// их только читает.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Player {
    /// Скорость движения (м/с), внешний слой двигает Transform сам
    pub move_speed: f32,
    /// Присел: вдвое режет чувствительность и силу стимулов от охранников
    pub is_crouching: bool,
    /// Маскировка: ещё раз вдвое режет чувствительность
    pub disguise_on: bool,
    /// Двигается ли игрок в этом тике (для proximity hearing)
    pub is_moving: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            is_crouching: false,
            disguise_on: false,
            is_moving: false,
        }
    }
}

impl Player {
    /// Множитель чувствительности alertness: crouch ×0.5, disguise ×0.5
    pub fn sensitivity(&self) -> f32 {
        let mut sensitivity = 1.0;
        if self.is_crouching {
            sensitivity *= 0.5;
        }
        if self.disguise_on {
            sensitivity *= 0.5;
        }
        sensitivity
    }
}

/// Tuning констант alertness (static configuration, задаётся один раз)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub struct AlertnessTuning {
    /// Потолок шкалы (терминальный "caught" при достижении)
    pub max: f32,
    /// Базовый прирост за единичный стимул
    pub base_increase: f32,
    /// Линейный множитель прироста
    pub multiplier: f32,
    /// Показатель степени стимула (суперлинейный ответ)
    pub exponent: f32,
    /// Скорость спада (единиц в секунду)
    pub decay_rate: f32,
    /// Grace-пауза после последнего стимула до начала спада (секунды)
    pub grace_delay: f32,
}

impl Default for AlertnessTuning {
    fn default() -> Self {
        Self {
            max: 100.0,
            base_increase: 10.0,
            multiplier: 1.0,
            exponent: 2.0,
            decay_rate: 1.0,
            grace_delay: 0.2,
        }
    }
}

/// Банды alertness, которые читают охранники и UI
///
/// Low [0,33], Medium (33,66], High (66,100]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AlertnessLevel {
    Low,
    Medium,
    High,
}

/// Alertness tracker на entity игрока
///
/// Инвариант: 0 ≤ value ≤ tuning.max. Спад запускается только после
/// grace_delay без новых стимулов; стимул посреди grace сбрасывает таймер
/// без "накопленного" частичного спада.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Alertness {
    value: f32,
    tuning: AlertnessTuning,
    just_stimulated: bool,
    time_since_stimulus: f32,
}

impl Alertness {
    pub fn new(tuning: AlertnessTuning) -> Self {
        Self {
            value: 0.0,
            tuning,
            just_stimulated: false,
            time_since_stimulus: 0.0,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn tuning(&self) -> &AlertnessTuning {
        &self.tuning
    }

    pub fn level(&self) -> AlertnessLevel {
        if self.value <= 33.0 {
            AlertnessLevel::Low
        } else if self.value <= 66.0 {
            AlertnessLevel::Medium
        } else {
            AlertnessLevel::High
        }
    }

    pub fn is_maxed(&self) -> bool {
        self.value >= self.tuning.max
    }

    /// Мгновенный захват значения (например "spotted dead ahead")
    pub fn set(&mut self, value: f32) {
        self.value = value.clamp(0.0, self.tuning.max);
        self.mark_stimulated();
    }

    /// Прирост от стимула: delta = base * multiplier * stimulus^exponent
    ///
    /// Вызывающие сами складывают dt в стимул (как и частоту/силу источника).
    pub fn increase(&mut self, stimulus: f32) {
        self.increase_scaled(stimulus, 1.0);
    }

    /// То же, но с множителем чувствительности (Player::sensitivity)
    pub fn increase_scaled(&mut self, stimulus: f32, sensitivity: f32) {
        let delta = self.tuning.base_increase
            * self.tuning.multiplier
            * sensitivity
            * stimulus.powf(self.tuning.exponent);
        self.value = (self.value + delta.max(0.0)).clamp(0.0, self.tuning.max);
        self.mark_stimulated();
    }

    /// Один шаг пассивного спада за тик
    ///
    /// Вызывается ровно один раз на тик, после того как все стимулы тика
    /// уже применены (порядок закреплён в SimulationSet::Resolve).
    pub fn tick_decay(&mut self, dt: f32) {
        if self.just_stimulated {
            self.time_since_stimulus += dt;
        }

        if self.time_since_stimulus >= self.tuning.grace_delay {
            self.value = (self.value - self.tuning.decay_rate * dt).clamp(0.0, self.tuning.max);
            self.just_stimulated = false;
        }
    }

    fn mark_stimulated(&mut self) {
        self.just_stimulated = true;
        self.time_since_stimulus = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: f32 = 1.0 / 60.0;

    #[test]
    fn test_increase_formula() {
        // base=10, multiplier=1, exponent=2, stimulus=1.0 → 10·1·1² = 10
        let mut alertness = Alertness::default();
        alertness.increase(1.0);
        assert_eq!(alertness.value(), 10.0);
    }

    #[test]
    fn test_increase_is_superlinear() {
        let mut weak = Alertness::default();
        let mut strong = Alertness::default();
        weak.increase(1.0);
        strong.increase(2.0);
        // stimulus ×2 → delta ×4 при exponent=2
        assert_eq!(strong.value(), 4.0 * weak.value());
    }

    #[test]
    fn test_increase_never_decreases_and_clamps() {
        let mut alertness = Alertness::default();
        alertness.set(95.0);
        alertness.increase(3.0); // delta = 90 → клампится на max
        assert_eq!(alertness.value(), 100.0);

        alertness.increase(0.0);
        assert_eq!(alertness.value(), 100.0);
    }

    #[test]
    fn test_set_clamps_both_ends() {
        let mut alertness = Alertness::default();
        alertness.set(250.0);
        assert_eq!(alertness.value(), 100.0);
        alertness.set(-10.0);
        assert_eq!(alertness.value(), 0.0);
    }

    #[test]
    fn test_decay_waits_for_grace_delay() {
        let mut alertness = Alertness::default();
        alertness.set(50.0);

        // 0.2s grace: 11 тиков по 1/60 ≈ 0.183s — спада ещё нет
        for _ in 0..11 {
            alertness.tick_decay(TICK);
        }
        assert_eq!(alertness.value(), 50.0);

        // Дальше спад 1.0/s
        for _ in 0..60 {
            alertness.tick_decay(TICK);
        }
        assert!(alertness.value() < 50.0);
        assert!((alertness.value() - 49.0).abs() < 0.1);
    }

    #[test]
    fn test_stimulus_mid_grace_resets_timer() {
        let mut alertness = Alertness::default();
        alertness.set(50.0);

        for _ in 0..100 {
            // Стимул каждый тик → grace всегда сброшен, спад не стартует
            alertness.increase(0.0);
            alertness.tick_decay(TICK);
        }
        assert_eq!(alertness.value(), 50.0);
    }

    #[test]
    fn test_decay_clamps_at_zero() {
        let mut alertness = Alertness::default();
        alertness.set(0.5);
        for _ in 0..120 {
            alertness.tick_decay(TICK);
        }
        assert_eq!(alertness.value(), 0.0);
    }

    #[test]
    fn test_level_bands() {
        let mut alertness = Alertness::default();
        assert_eq!(alertness.level(), AlertnessLevel::Low);
        alertness.set(33.0);
        assert_eq!(alertness.level(), AlertnessLevel::Low);
        alertness.set(33.1);
        assert_eq!(alertness.level(), AlertnessLevel::Medium);
        alertness.set(66.0);
        assert_eq!(alertness.level(), AlertnessLevel::Medium);
        alertness.set(66.1);
        assert_eq!(alertness.level(), AlertnessLevel::High);
    }

    #[test]
    fn test_sensitivity_modifiers() {
        let mut player = Player::default();
        assert_eq!(player.sensitivity(), 1.0);
        player.is_crouching = true;
        assert_eq!(player.sensitivity(), 0.5);
        player.disguise_on = true;
        assert_eq!(player.sensitivity(), 0.25);
    }
}
