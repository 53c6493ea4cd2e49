//! Read-only view of a session for renderers and UI
//!
//! Plain data, serializable, detached from the live state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Bubble, BubbleState, GamePhase, GameState};

/// What a renderer needs to draw one bubble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubbleView {
    pub pos: Vec2,
    /// Palette index
    pub color: u8,
    /// Palette entry (CSS hex)
    pub color_name: String,
    pub radius: f32,
    pub scale: f32,
    pub alpha: f32,
    pub state: BubbleState,
}

/// Frame snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub settled: Vec<BubbleView>,
    pub falling: Vec<BubbleView>,
    pub popping: Vec<BubbleView>,
    /// Loaded or flying shot
    pub shooter: Option<BubbleView>,
    pub next_color: u8,
    pub aim_angle: f32,
    pub score: u64,
    pub level: u32,
    pub phase: GamePhase,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let view = |bubble: &Bubble, scale: f32, alpha: f32| BubbleView {
            pos: bubble.pos,
            color: bubble.color,
            color_name: state.config.color_name(bubble.color).to_string(),
            radius: state.config.radius,
            scale,
            alpha,
            state: bubble.state,
        };

        Self {
            settled: state.grid.iter().map(|b| view(b, 1.0, 1.0)).collect(),
            falling: state.falling.iter().map(|b| view(b, 1.0, 1.0)).collect(),
            popping: state
                .popping
                .iter()
                .map(|p| view(&p.bubble, p.scale(), p.alpha()))
                .collect(),
            shooter: state.shot.as_ref().map(|s| view(&s.bubble, 1.0, 1.0)),
            next_color: state.next_color,
            aim_angle: state.aim_angle,
            score: state.score,
            level: state.level,
            phase: state.phase,
        }
    }

    /// The terminal outcome, if the session has ended
    pub fn outcome(&self) -> Option<GamePhase> {
        self.phase.is_over().then_some(self.phase)
    }
}
