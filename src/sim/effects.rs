//! Time-bounded bubble effects: pop animations and falling bubbles.
//!
//! Neither ever returns to the grid. Pops retire after a fixed number of
//! ticks, falling bubbles once they drop past the bottom margin.

use serde::{Deserialize, Serialize};

use super::state::{Bubble, BubbleState};
use crate::GameConfig;
use crate::consts::{POP_GROW_FRACTION, POP_PEAK_SCALE};

/// A matched bubble playing its pop animation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopEffect {
    pub bubble: Bubble,
    pub elapsed_ticks: u32,
    pub duration_ticks: u32,
}

impl PopEffect {
    pub fn new(mut bubble: Bubble, duration_ticks: u32) -> Self {
        bubble.state = BubbleState::Popping;
        bubble.cell = None;
        Self {
            bubble,
            elapsed_ticks: 0,
            duration_ticks: duration_ticks.max(1),
        }
    }

    /// Animation progress in [0, 1]
    pub fn progress(&self) -> f32 {
        (self.elapsed_ticks as f32 / self.duration_ticks as f32).min(1.0)
    }

    /// Grow to the peak scale, then shrink to nothing
    pub fn scale(&self) -> f32 {
        let p = self.progress();
        if p < POP_GROW_FRACTION {
            1.0 + (p / POP_GROW_FRACTION) * (POP_PEAK_SCALE - 1.0)
        } else {
            POP_PEAK_SCALE * (1.0 - self.shrink_progress())
        }
    }

    /// Fully opaque while growing, fades out while shrinking
    pub fn alpha(&self) -> f32 {
        1.0 - self.shrink_progress()
    }

    fn shrink_progress(&self) -> f32 {
        let p = self.progress();
        if p < POP_GROW_FRACTION {
            0.0
        } else {
            (p - POP_GROW_FRACTION) / (1.0 - POP_GROW_FRACTION)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ticks >= self.duration_ticks
    }
}

/// Advance pop animations one tick and drop the finished ones
pub fn advance_popping(popping: &mut Vec<PopEffect>) {
    for pop in popping.iter_mut() {
        pop.elapsed_ticks += 1;
    }
    popping.retain(|p| !p.is_finished());
}

/// Integrate falling bubbles one tick: gravity, then motion, then walls.
/// Bubbles past `height + fall_margin` are discarded.
pub fn advance_falling(falling: &mut Vec<Bubble>, config: &GameConfig) {
    let radius = config.radius;
    for bubble in falling.iter_mut() {
        bubble.vel.y += config.gravity;
        bubble.pos += bubble.vel;

        // Inelastic wall contact
        if bubble.pos.x - radius < 0.0 || bubble.pos.x + radius > config.width {
            bubble.vel.x *= -config.wall_bounce;
            bubble.pos.x = bubble.pos.x.clamp(radius, config.width - radius);
        }
    }
    let floor = config.height + config.fall_margin;
    falling.retain(|b| b.pos.y <= floor);
}
