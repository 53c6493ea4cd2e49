//! Session configuration
//!
//! Built once when a session starts and never mutated afterwards: the grid
//! invariants depend on radius, spacing and playfield bounds staying fixed.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Immutable per-session game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Grid ===
    /// Bubble radius (px)
    pub radius: f32,
    /// Rows in the initial fill
    pub rows: u32,
    /// Columns in the initial fill
    pub columns: u32,
    /// Color palette, CSS hex strings. Bubbles store an index into it.
    pub palette: Vec<String>,

    // === Physics (per tick) ===
    /// Downward acceleration applied to falling bubbles (px/tick²)
    pub gravity: f32,
    /// Projectile speed (px/tick)
    pub projectile_speed: f32,
    /// Velocity kept by a falling bubble on wall contact
    pub wall_bounce: f32,

    // === Playfield ===
    pub width: f32,
    pub height: f32,
    /// Y of row 0 centers
    pub grid_top: f32,
    /// Distance of the shooter above the bottom edge
    pub shooter_offset: f32,
    /// Settled bubbles with y below this seed the ceiling flood-fill
    pub ceiling_band: f32,
    /// Loss once the lowest settled bubble passes `height - danger_margin`
    pub danger_margin: f32,
    /// Falling bubbles are discarded past `height + fall_margin`
    pub fall_margin: f32,

    // === Snapping ===
    /// Rows scanned by the bounded snap search
    pub snap_row_limit: u32,

    // === Timing ===
    /// Length of one simulation tick (ms)
    pub tick_ms: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            radius: 20.0,
            rows: 10,
            columns: 12,
            palette: [
                "#00ffff", "#d946ef", "#8a2be2", "#00ff00", "#fde047", "#ff0000",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),

            gravity: 0.3,
            projectile_speed: 8.0,
            wall_bounce: 0.8,

            width: 500.0,
            height: 700.0,
            grid_top: 60.0,
            shooter_offset: 50.0,
            ceiling_band: 100.0,
            danger_margin: 100.0,
            fall_margin: 100.0,

            snap_row_limit: 20,

            tick_ms: 1000.0 / 60.0,
        }
    }
}

impl GameConfig {
    /// Distance between neighboring bubble centers
    #[inline]
    pub fn spacing(&self) -> f32 {
        self.radius * 2.0
    }

    /// Number of palette colors
    pub fn color_count(&self) -> usize {
        self.palette.len()
    }

    /// Palette entry for a color index
    pub fn color_name(&self, color: u8) -> &str {
        self.palette
            .get(color as usize)
            .map(String::as_str)
            .unwrap_or("#ffffff")
    }

    /// Whole ticks covering a duration in ms (at least one)
    pub fn ticks_for_ms(&self, ms: f32) -> u32 {
        // Tolerance keeps 200ms at 60 Hz from rounding up to 13 ticks
        ((ms / self.tick_ms - 1e-3).ceil() as u32).max(1)
    }

    /// Lowest y a settled bubble may reach before the session is lost
    pub fn danger_line(&self) -> f32 {
        self.height - self.danger_margin
    }

    /// Check the values the grid invariants rely on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "radius must be positive, got {}",
                self.radius
            )));
        }
        if self.palette.is_empty() {
            return Err(ConfigError::Invalid("palette is empty".into()));
        }
        if self.palette.len() > u8::MAX as usize {
            return Err(ConfigError::Invalid(format!(
                "palette has {} colors, at most {} supported",
                self.palette.len(),
                u8::MAX
            )));
        }
        if !(self.projectile_speed > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "projectile_speed must be positive, got {}",
                self.projectile_speed
            )));
        }
        // A faster shot could tunnel through a bubble between ticks
        if self.projectile_speed >= self.spacing() {
            return Err(ConfigError::Invalid(format!(
                "projectile_speed {} must be below bubble spacing {}",
                self.projectile_speed,
                self.spacing()
            )));
        }
        if !(0.0..1.0).contains(&self.wall_bounce) {
            return Err(ConfigError::Invalid(format!(
                "wall_bounce must be in [0, 1), got {}",
                self.wall_bounce
            )));
        }
        if self.width < self.spacing() * 1.5 {
            return Err(ConfigError::Invalid(format!(
                "playfield width {} fits no bubble row",
                self.width
            )));
        }
        if self.height <= self.grid_top {
            return Err(ConfigError::Invalid(format!(
                "playfield height {} is above the grid top {}",
                self.height, self.grid_top
            )));
        }
        if !(self.tick_ms > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "tick_ms must be positive, got {}",
                self.tick_ms
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
