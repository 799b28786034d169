//! Player module: decay-шаг alertness и терминальное событие поимки.
//!
//! Флаги игрока (crouch, disguise, движение) выставляет внешний слой
//! управления; здесь только пассивная динамика шкалы.

use bevy::prelude::*;

use crate::components::{Alertness, AlertnessTuning, Player};
use crate::logger;
use crate::SimulationSet;

/// Событие: alertness достигла потолка, игрок пойман
///
/// Кидается один раз на фронте достижения максимума, не каждый тик.
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerCaught;

/// Собирает bundle игрока
pub fn player_bundle(
    position: Vec2,
    tuning: AlertnessTuning,
) -> (Player, Alertness, Transform) {
    (
        Player::default(),
        Alertness::new(tuning),
        Transform::from_translation(position.extend(0.0)),
    )
}

/// Система: единственный decay-шаг alertness за тик + детект поимки
///
/// Стоит в SimulationSet::Resolve: все стимулы тика (зрение охранников,
/// камеры, слух) уже применены, decay считается ровно один раз.
pub fn update_alertness(
    time: Res<Time<Fixed>>,
    mut player: Query<&mut Alertness, With<Player>>,
    mut caught: EventWriter<PlayerCaught>,
    mut was_maxed: Local<bool>,
) {
    let Ok(mut alertness) = player.single_mut() else {
        return;
    };

    alertness.tick_decay(time.delta_secs());

    let maxed = alertness.is_maxed();
    if maxed && !*was_maxed {
        logger::log_info("🚨 Player caught: alertness maxed out");
        caught.write(PlayerCaught);
    }
    *was_maxed = maxed;
}

/// Player Plugin: decay и событие поимки в Resolve-фазе
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlayerCaught>().add_systems(
            FixedUpdate,
            update_alertness.in_set(SimulationSet::Resolve),
        );
    }
}
