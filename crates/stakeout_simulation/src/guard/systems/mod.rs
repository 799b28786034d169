//! Guard systems: FSM-переходы и движение.

pub mod fsm;
pub mod movement;

pub use fsm::{guard_fsm_transitions, should_enter_alerted, should_stand_down, validate_guard_wiring};
pub use movement::guard_movement;
