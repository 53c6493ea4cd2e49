//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by bubble ID)
//! - No rendering or platform dependencies

pub mod cascade;
pub mod connectivity;
pub mod effects;
pub mod geometry;
pub mod grid;
pub mod matcher;
pub mod projectile;
pub mod snap;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use cascade::CascadeSequencer;
pub use connectivity::{drop_disconnected, find_disconnected};
pub use effects::PopEffect;
pub use geometry::{Geometry, HexCoord};
pub use grid::GridIndex;
pub use matcher::{find_cluster, pop_matches};
pub use projectile::{Trajectory, TrajectoryPhase};
pub use snap::{Placement, SnapSource};
pub use snapshot::{BubbleView, Snapshot};
pub use state::{
    Bubble, BubbleId, BubbleState, GameEvent, GamePhase, GameState, SoundCue,
};
pub use tick::{TickInput, autoplay_angle, tick};
