//! STAKEOUT Simulation Core
//!
//! Headless stealth-симуляция на Bevy 0.16: конусы зрения, шкала alertness,
//! guard FSM и распространение звука. Рендер, ввод и физика — забота
//! встраивающего слоя; симуляция детерминирована на fixed timestep 60Hz.

use bevy::prelude::*;

// Публичные модули
pub mod camera;
pub mod components;
pub mod guard;
pub mod logger;
pub mod player;
pub mod sound;
pub mod vision;

// Re-export базовых типов для удобства
pub use camera::{camera_bundle, CameraPlugin, SecurityCamera};
pub use components::*;
pub use guard::{
    guard_bundle, Guard, GuardArchetype, GuardConfig, GuardPlugin, GuardSpawnError, GuardState,
    PatrolLeg,
};
pub use player::{player_bundle, PlayerCaught, PlayerPlugin};
pub use sound::{SoundEmitted, SoundPlugin, SOUND_NOTIFY_RADIUS};
pub use vision::{Facing, VisionConfig, VisionConfigError, VisionPlugin, VisionSensor};

/// Фазы симуляционного тика (FixedUpdate), строго последовательные
///
/// Sense — сенсоры (камерный тик отключения, ray fan детекция).
/// React — мгновенная рассылка звуковых событий.
/// Decide — стимулы alertness и переходы guard FSM.
/// Act — spatial движение рутин.
/// Resolve — единственный decay-шаг alertness и событие поимки.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Sense,
    React,
    Decide,
    Act,
    Resolve,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .init_resource::<LevelGeometry>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Sense,
                    SimulationSet::React,
                    SimulationSet::Decide,
                    SimulationSet::Act,
                    SimulationSet::Resolve,
                )
                    .chain(),
            )
            // Подсистемы
            .add_plugins((VisionPlugin, SoundPlugin, GuardPlugin, CameraPlugin, PlayerPlugin));
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app() -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins).add_plugins(SimulationPlugin);

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
