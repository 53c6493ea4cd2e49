//! Bubble Pop - a hex-grid bubble shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, projectile, matching, cascades)
//! - `config`: Session configuration, fixed for the lifetime of a session
//!
//! Rendering, audio playback and input wiring live outside this crate. They
//! read [`sim::Snapshot`] and drain [`sim::GameEvent`]s.

pub mod config;
pub mod sim;

pub use config::{ConfigError, GameConfig};

use glam::Vec2;

/// Gameplay constants shared by every session
pub mod consts {
    /// Two settled bubbles closer than `spacing * OVERLAP_FACTOR` overlap
    pub const OVERLAP_FACTOR: f32 = 0.9;
    /// Bubbles closer than `radius * ADJACENCY_FACTOR` are neighbors
    pub const ADJACENCY_FACTOR: f32 = 2.1;

    /// Smallest same-color cluster that pops
    pub const MIN_CLUSTER_SIZE: usize = 3;
    /// Points per popped bubble
    pub const MATCH_POINTS: u64 = 10;
    /// Points per dropped bubble
    pub const DROP_POINTS: u64 = 5;

    /// Pop animation length (ms)
    pub const POP_DURATION_MS: f32 = 200.0;
    /// Fraction of the pop spent growing
    pub const POP_GROW_FRACTION: f32 = 0.3;
    /// Peak scale reached at the end of the grow phase
    pub const POP_PEAK_SCALE: f32 = 1.5;

    /// Aim limits: the shot always travels into the upper half-plane
    pub const AIM_MIN: f32 = -std::f32::consts::PI + 0.1;
    pub const AIM_MAX: f32 = -0.1;
    /// Straight up (screen y grows downward)
    pub const AIM_UP: f32 = -std::f32::consts::FRAC_PI_2;
}

/// Clamp an aim angle to the upper half-plane
#[inline]
pub fn clamp_aim(angle: f32) -> f32 {
    angle.clamp(consts::AIM_MIN, consts::AIM_MAX)
}

/// Aim angle from the shooter toward a pointer position, clamped.
///
/// A pointer at or below the shooter snaps to the limit on its own side.
pub fn aim_angle_from_pointer(shooter: Vec2, pointer: Vec2) -> f32 {
    let delta = pointer - shooter;
    if delta.y >= 0.0 {
        return if delta.x < 0.0 {
            consts::AIM_MIN
        } else {
            consts::AIM_MAX
        };
    }
    clamp_aim(delta.y.atan2(delta.x))
}

/// Unit direction for an angle (radians, screen coordinates)
#[inline]
pub fn angle_to_direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
