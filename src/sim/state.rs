//! Game state and core simulation types
//!
//! Everything a session needs to advance deterministically lives in
//! [`GameState`]: the settled grid, the shot, the animation collections, the
//! cascade gate and the seeded RNG.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::cascade::CascadeSequencer;
use super::effects::PopEffect;
use super::geometry::{Geometry, HexCoord};
use super::grid::GridIndex;
use super::projectile::Trajectory;
use crate::GameConfig;
use crate::consts::AIM_UP;

/// Stable bubble identity, allocated in increasing order
pub type BubbleId = u32;

/// Lifecycle tag of a bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BubbleState {
    /// Sitting in the shooter, not yet fired
    Loaded,
    /// The active shot
    InFlight,
    /// Fixed on a lattice cell, owned by the grid
    Settled,
    /// Detached from the ceiling, falling under gravity
    Falling,
    /// Matched, playing the pop animation
    Popping,
}

/// A bubble entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub id: BubbleId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Palette index
    pub color: u8,
    /// Lattice cell while settled
    pub cell: Option<HexCoord>,
    pub state: BubbleState,
}

impl Bubble {
    /// A settled bubble at a cell center
    pub fn settled(id: BubbleId, color: u8, cell: HexCoord, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            color,
            cell: Some(cell),
            state: BubbleState::Settled,
        }
    }

    /// A bubble waiting in the shooter
    pub fn loaded(id: BubbleId, color: u8, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            color,
            cell: None,
            state: BubbleState::Loaded,
        }
    }
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Shots are accepted
    Playing,
    /// Grid cleared
    Won,
    /// Shot escaped the playfield or the stack reached the danger line
    Lost,
}

impl GamePhase {
    pub fn is_over(&self) -> bool {
        !matches!(self, GamePhase::Playing)
    }
}

/// Audio cues for the sound collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    /// Shot touched a settled bubble
    Collision,
    /// A cluster popped
    Match(usize),
    /// Disconnected bubbles started falling
    Fall(usize),
}

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired { color: u8, angle: f32 },
    /// Shot touched a settled bubble
    Collision { with: BubbleId },
    /// Shot committed to the grid
    Snapped { id: BubbleId, cell: HexCoord },
    /// A cluster popped
    Matched { count: usize, color: u8 },
    /// Disconnected bubbles detached
    Dropped { count: usize },
    Won { score: u64 },
    Lost { score: u64 },
}

impl GameEvent {
    pub fn sound_cue(&self) -> Option<SoundCue> {
        match self {
            GameEvent::Collision { .. } => Some(SoundCue::Collision),
            GameEvent::Matched { count, .. } => Some(SoundCue::Match(*count)),
            GameEvent::Dropped { count } => Some(SoundCue::Fall(*count)),
            _ => None,
        }
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub geometry: Geometry,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Score (match + drop points)
    pub score: u64,
    /// Level shown to the player
    pub level: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Current aim (radians, screen coordinates)
    pub aim_angle: f32,
    /// Settled bubbles
    pub grid: GridIndex,
    /// Loaded or flying shot; `None` once the session ended
    pub shot: Option<Trajectory>,
    /// Preview color for the shot after this one
    pub next_color: u8,
    /// Bubbles playing the pop animation
    pub popping: Vec<PopEffect>,
    /// Detached bubbles falling off the playfield
    pub falling: Vec<Bubble>,
    pub cascade: CascadeSequencer,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    next_id: BubbleId,
}

impl GameState {
    /// Start a session with the configured initial fill
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut state = Self::empty(config, seed);
        state.fill_initial_grid();
        log::info!(
            "Session started: seed={} bubbles={} colors={}",
            seed,
            state.grid.len(),
            state.config.color_count()
        );
        state
    }

    /// Start a session with no settled bubbles (callers place their own)
    pub fn empty(config: GameConfig, seed: u64) -> Self {
        let geometry = Geometry::new(&config);
        let mut state = Self {
            geometry,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            level: 1,
            time_ticks: 0,
            phase: GamePhase::Playing,
            aim_angle: AIM_UP,
            grid: GridIndex::new(geometry),
            shot: None,
            next_color: 0,
            popping: Vec::new(),
            falling: Vec::new(),
            cascade: CascadeSequencer::default(),
            events: Vec::new(),
            next_id: 1,
            config,
        };
        let loaded = state.random_color();
        state.next_color = state.random_color();
        state.shot = Some(state.new_trajectory(loaded));
        state
    }

    /// Full reset after a terminal outcome: new grid, zero score
    pub fn restart(&mut self) {
        let seed = self.rng.random::<u64>();
        *self = Self::new(self.config.clone(), seed);
    }

    /// Allocate a new bubble id
    pub fn next_bubble_id(&mut self) -> BubbleId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Uniform palette draw
    pub fn random_color(&mut self) -> u8 {
        self.rng.random_range(0..self.config.color_count()) as u8
    }

    /// Small random horizontal kick for a detached bubble
    pub fn random_drift(&mut self) -> f32 {
        (self.rng.random::<f32>() - 0.5) * 2.0
    }

    /// Where the shooter holds its loaded bubble
    pub fn shooter_position(&self) -> Vec2 {
        Vec2::new(
            self.config.width / 2.0,
            self.config.height - self.config.shooter_offset,
        )
    }

    /// Place a settled bubble directly on a cell (level setup and tests)
    pub fn place(&mut self, cell: HexCoord, color: u8) -> BubbleId {
        let id = self.next_bubble_id();
        let pos = self.geometry.to_plane(cell);
        self.grid.add(Bubble::settled(id, color, cell, pos));
        id
    }

    /// Replace the loaded shot's color (scripted setups and tests)
    pub fn load_color(&mut self, color: u8) {
        if let Some(shot) = self.shot.as_mut() {
            shot.bubble.color = color;
        }
    }

    /// Color of the bubble currently in the shooter
    pub fn loaded_color(&self) -> Option<u8> {
        self.shot.as_ref().map(|s| s.bubble.color)
    }

    /// Arm a fresh idle shot: next -> loaded, draw a new next
    pub fn arm_next_shot(&mut self) {
        let loaded = self.next_color;
        self.next_color = self.random_color();
        self.shot = Some(self.new_trajectory(loaded));
    }

    fn new_trajectory(&mut self, color: u8) -> Trajectory {
        let id = self.next_bubble_id();
        Trajectory::idle(Bubble::loaded(id, color, self.shooter_position()))
    }

    /// Fill `rows x columns` from row 0, skipping cells past the right wall
    fn fill_initial_grid(&mut self) {
        for row in 0..self.config.rows as i32 {
            for col in 0..self.config.columns as i32 {
                let cell = HexCoord::new(row, col);
                let pos = self.geometry.to_plane(cell);
                if pos.x + self.config.radius > self.config.width {
                    continue;
                }
                let color = self.random_color();
                self.place(cell, color);
            }
        }
    }

    /// End the session
    pub fn finish(&mut self, phase: GamePhase) {
        debug_assert!(phase.is_over());
        if self.phase.is_over() {
            return;
        }
        self.phase = phase;
        self.shot = None;
        self.cascade.cancel_pending();
        let event = match phase {
            GamePhase::Won => GameEvent::Won { score: self.score },
            _ => GameEvent::Lost { score: self.score },
        };
        log::info!("Session over: {:?} with score {}", phase, self.score);
        self.events.push(event);
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Bubbles currently in flight (0 or 1)
    pub fn in_flight_count(&self) -> usize {
        self.shot
            .iter()
            .filter(|s| s.bubble.state == BubbleState::InFlight)
            .count()
    }
}
