//! The shot: a single trajectory state machine
//!
//! `Idle -> Flying -> (Resolved | Lost)`. The shot moves in a straight line at
//! constant speed (no gravity), bounces elastically off the side walls, and
//! stops on the ceiling or on the first settled bubble it touches.

use serde::{Deserialize, Serialize};

use super::grid::GridIndex;
use super::state::{Bubble, BubbleId, BubbleState};
use crate::{GameConfig, angle_to_direction};

/// Where the shot is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrajectoryPhase {
    /// Loaded, waiting for a shoot command
    Idle,
    Flying,
    /// Stopped; `collision` is the settled bubble it touched (None = ceiling)
    Resolved { collision: Option<BubbleId> },
    /// Passed the bottom of the playfield without touching anything
    Lost,
}

/// The shooter bubble and its motion
#[derive(Debug, Clone)]
pub struct Trajectory {
    pub bubble: Bubble,
    pub phase: TrajectoryPhase,
}

impl Trajectory {
    pub fn idle(bubble: Bubble) -> Self {
        Self {
            bubble,
            phase: TrajectoryPhase::Idle,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.phase == TrajectoryPhase::Idle
    }

    /// Fire along `angle` at `speed`. Ignored unless idle.
    pub fn launch(&mut self, angle: f32, speed: f32) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.bubble.vel = angle_to_direction(angle) * speed;
        self.bubble.state = BubbleState::InFlight;
        self.phase = TrajectoryPhase::Flying;
        true
    }

    /// Advance one tick. Returns the new phase when the shot resolves or is
    /// lost on this tick.
    pub fn advance(&mut self, grid: &GridIndex, config: &GameConfig) -> Option<TrajectoryPhase> {
        if self.phase != TrajectoryPhase::Flying {
            return None;
        }
        let radius = config.radius;
        let ball = &mut self.bubble;

        ball.pos += ball.vel;

        // Side walls: reflect and push back inside
        if ball.pos.x - radius < 0.0 || ball.pos.x + radius > config.width {
            ball.vel.x = -ball.vel.x;
            ball.pos.x = ball.pos.x.clamp(radius, config.width - radius);
        }

        // Ceiling
        if ball.pos.y - radius < 0.0 {
            ball.pos.y = radius;
            self.phase = TrajectoryPhase::Resolved { collision: None };
            return Some(self.phase);
        }

        if let Some(hit) = grid.nearest_within(ball.pos, config.spacing()) {
            log::trace!("Shot {} touched bubble {} at {}", ball.id, hit.id, ball.pos);
            self.phase = TrajectoryPhase::Resolved {
                collision: Some(hit.id),
            };
            return Some(self.phase);
        }

        if ball.pos.y > config.height {
            self.phase = TrajectoryPhase::Lost;
            return Some(self.phase);
        }

        None
    }
}
