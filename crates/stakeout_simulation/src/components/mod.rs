//! ECS Components, общие для всей симуляции
//!
//! Организация по доменам:
//! - player: флаги игрока + alertness tracker
//! - world: статическая геометрия уровня (коллайдеры, слои)
//!
//! Компоненты сенсоров/охранников/камер живут в своих модулях
//! (vision, guard, camera) рядом со своими системами.

pub mod player;
pub mod world;

// Re-exports для удобного импорта
pub use player::*;
pub use world::*;
