//! Fixed timestep simulation tick
//!
//! Per-frame driver that advances a session deterministically.

use glam::Vec2;

use super::cascade;
use super::effects::{advance_falling, advance_popping};
use super::projectile::TrajectoryPhase;
use super::state::{GameEvent, GamePhase, GameState};
use crate::aim_angle_from_pointer;
use crate::consts::AIM_UP;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Raw aim angle, applied as given
    pub aim_angle: Option<f32>,
    /// Pointer/touch position, mapped to a clamped aim angle
    pub pointer: Option<Vec2>,
    /// Fire the loaded bubble (click/tap/space)
    pub shoot: bool,
    /// Start over after a win or loss
    pub restart: bool,
    /// Idle/demo mode - aims and fires on its own
    pub autoplay: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.restart && state.phase.is_over() {
        state.restart();
        return;
    }

    state.time_ticks += 1;

    // Animations keep running after the session ends
    advance_popping(&mut state.popping);
    advance_falling(&mut state.falling, &state.config);

    if state.phase.is_over() {
        return;
    }

    if let Some(pointer) = input.pointer {
        state.aim_angle = aim_angle_from_pointer(state.shooter_position(), pointer);
    } else if let Some(angle) = input.aim_angle {
        state.aim_angle = angle;
    }

    let mut shoot = input.shoot;
    if input.autoplay && state.shot.as_ref().is_some_and(|s| s.is_idle()) {
        state.aim_angle = autoplay_angle(state);
        shoot = true;
    }

    cascade::advance(state);
    if state.phase.is_over() {
        return;
    }

    if shoot {
        fire(state);
    }

    let outcome = match state.shot.as_mut() {
        Some(shot) => shot.advance(&state.grid, &state.config),
        None => None,
    };
    match outcome {
        Some(TrajectoryPhase::Resolved { collision }) => cascade::settle_shot(state, collision),
        Some(TrajectoryPhase::Lost) => {
            log::debug!("Shot left the playfield at tick {}", state.time_ticks);
            state.finish(GamePhase::Lost);
        }
        _ => {}
    }
}

/// Launch the loaded bubble along the current aim; no-op while a shot flies
fn fire(state: &mut GameState) {
    let angle = state.aim_angle;
    let speed = state.config.projectile_speed;
    let Some(shot) = state.shot.as_mut() else {
        return;
    };
    if shot.launch(angle, speed) {
        let color = shot.bubble.color;
        log::trace!("Shot {} fired at {:.3} rad", shot.bubble.id, angle);
        state.events.push(GameEvent::ShotFired { color, angle });
    }
}

/// Demo aim: the lowest settled bubble matching the loaded color, else the
/// lowest bubble, else straight up.
pub fn autoplay_angle(state: &GameState) -> f32 {
    let Some(color) = state.loaded_color() else {
        return AIM_UP;
    };
    let lowest = |matching: bool| {
        state
            .grid
            .iter()
            .filter(|b| !matching || b.color == color)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|b| b.pos)
    };
    lowest(true)
        .or_else(|| lowest(false))
        .map(|target| aim_angle_from_pointer(state.shooter_position(), target))
        .unwrap_or(AIM_UP)
}
