//! What happens after a shot lands
//!
//! Snap, match, drop, then the terminal checks, in that order. Grid occupancy
//! already reflects the popped bubbles when the drop check runs, so it runs
//! right away. A second drop check is scheduled for when the pop animation
//! ends, to line the falling cascade up with the visuals.

use super::connectivity::drop_disconnected;
use super::matcher::pop_matches;
use super::snap;
use super::state::{BubbleId, GameEvent, GamePhase, GameState};
use crate::consts::POP_DURATION_MS;

/// Timing gate between pop animations and the deferred drop check
#[derive(Debug, Clone, Default)]
pub struct CascadeSequencer {
    /// Ticks left until the deferred check runs
    pending_ticks: Option<u32>,
}

impl CascadeSequencer {
    /// Run the deferred check after `ticks` ticks (replaces any pending one)
    pub fn schedule(&mut self, ticks: u32) {
        self.pending_ticks = Some(ticks);
    }

    pub fn cancel_pending(&mut self) {
        self.pending_ticks = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending_ticks.is_some()
    }

    /// Count down one tick; true when the deferred check is due now
    fn step(&mut self) -> bool {
        match self.pending_ticks {
            Some(ticks) if ticks <= 1 => {
                self.pending_ticks = None;
                true
            }
            Some(ticks) => {
                self.pending_ticks = Some(ticks - 1);
                false
            }
            None => false,
        }
    }
}

/// Commit the resolved shot and run the post-snap checks.
pub fn settle_shot(state: &mut GameState, collision: Option<BubbleId>) {
    let Some(shot) = state.shot.take() else {
        return;
    };
    if let Some(with) = collision {
        state.events.push(GameEvent::Collision { with });
    }

    let placement = snap::resolve(&state.grid, &state.config, shot.bubble.pos, collision);
    let id = snap::commit(&mut state.grid, shot.bubble, placement);
    state.events.push(GameEvent::Snapped {
        id,
        cell: placement.cell,
    });

    let popped = pop_matches(state, id);
    drop_disconnected(state);
    if popped > 0 {
        let ticks = state.config.ticks_for_ms(POP_DURATION_MS);
        state.cascade.schedule(ticks);
    }

    if state.grid.is_empty() {
        state.finish(GamePhase::Won);
        return;
    }

    if state
        .grid
        .lowest_y()
        .is_some_and(|y| y > state.config.danger_line())
    {
        state.finish(GamePhase::Lost);
        return;
    }

    state.arm_next_shot();
}

/// Advance the timing gate; runs the deferred drop check when it is due.
pub fn advance(state: &mut GameState) {
    if state.phase.is_over() || !state.cascade.step() {
        return;
    }
    log::trace!("Deferred drop check at tick {}", state.time_ticks);
    drop_disconnected(state);
    if state.grid.is_empty() {
        state.finish(GamePhase::Won);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::GameConfig;
    use crate::sim::geometry::HexCoord;
    use crate::sim::projectile::TrajectoryPhase;
    use crate::sim::state::BubbleState;

    /// Put the loaded shot at `pos` as if it had just stopped there
    fn stop_shot_at(state: &mut GameState, pos: Vec2, color: u8) {
        let shot = state.shot.as_mut().unwrap();
        shot.bubble.pos = pos;
        shot.bubble.color = color;
        shot.bubble.state = BubbleState::InFlight;
        shot.phase = TrajectoryPhase::Resolved { collision: None };
    }

    #[test]
    fn test_step_counts_down() {
        let mut seq = CascadeSequencer::default();
        assert!(!seq.step());
        seq.schedule(3);
        assert!(!seq.step());
        assert!(!seq.step());
        assert!(seq.step());
        assert!(!seq.is_pending());
    }

    #[test]
    fn test_plain_snap_arms_next_shot() {
        let mut state = GameState::empty(GameConfig::default(), 2);
        state.place(HexCoord::new(0, 0), 0);
        let preview = state.next_color;
        let pos = state.geometry.to_plane(HexCoord::new(0, 1));
        stop_shot_at(&mut state, pos, 1);

        settle_shot(&mut state, None);
        assert_eq!(state.grid.len(), 2);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.loaded_color(), Some(preview));
        assert!(state.shot.as_ref().unwrap().is_idle());
        assert!(!state.cascade.is_pending());
    }

    #[test]
    fn test_match_schedules_deferred_check() {
        let mut state = GameState::empty(GameConfig::default(), 2);
        state.place(HexCoord::new(0, 0), 0);
        state.place(HexCoord::new(0, 1), 0);
        state.place(HexCoord::new(0, 5), 1);
        let pos = state.geometry.to_plane(HexCoord::new(0, 2));
        stop_shot_at(&mut state, pos, 0);

        settle_shot(&mut state, None);
        assert_eq!(state.score, 30);
        assert_eq!(state.grid.len(), 1);
        assert!(state.cascade.is_pending());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_clearing_the_grid_wins() {
        let mut state = GameState::empty(GameConfig::default(), 2);
        state.place(HexCoord::new(0, 0), 3);
        state.place(HexCoord::new(0, 1), 3);
        let pos = state.geometry.to_plane(HexCoord::new(0, 2));
        stop_shot_at(&mut state, pos, 3);

        settle_shot(&mut state, None);
        assert_eq!(state.phase, GamePhase::Won);
        assert!(state.shot.is_none());
        assert!(state.events.contains(&GameEvent::Won { score: 30 }));
    }

    #[test]
    fn test_reaching_danger_line_loses() {
        let config = GameConfig {
            height: 300.0,
            ..GameConfig::default()
        };
        let mut state = GameState::empty(config, 2);
        // Column 0 down to row 4 (y ~ 198); danger line at 200
        for row in 0..5 {
            state.place(HexCoord::new(row, 0), (row % 2) as u8 + 1);
        }
        let pos = state.geometry.to_plane(HexCoord::new(5, 0));
        stop_shot_at(&mut state, pos, 0);

        settle_shot(&mut state, None);
        assert_eq!(state.phase, GamePhase::Lost);
        assert_eq!(state.score, 0);
    }
}
