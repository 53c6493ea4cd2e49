//! Hexagonal close-packing geometry
//!
//! Rows run top to bottom; odd rows are shifted right by one radius ("odd-r"
//! offset layout). Neighboring centers sit one spacing (two radii) apart and
//! rows are `spacing * sqrt(3) / 2` apart, so every interior bubble touches six
//! others.
//!
//! Screen coordinates: x grows right, y grows down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::GameConfig;

/// sqrt(3) / 2
pub const ROW_HEIGHT_FACTOR: f32 = 0.866_025_4;

/// A lattice cell in offset coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCoord {
    /// Row (grows downward). Field order gives row-major ordering.
    pub row: i32,
    /// Column (grows right)
    pub col: i32,
}

impl HexCoord {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The 6 neighboring cells in fixed angular order: E, NE, NW, W, SW, SE.
    pub fn neighbors(&self) -> [HexCoord; 6] {
        neighbor_offsets(self.row).map(|(dr, dc)| HexCoord::new(self.row + dr, self.col + dc))
    }
}

impl std::fmt::Display for HexCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(r{}, c{})", self.row, self.col)
    }
}

/// (row, col) deltas to the 6 neighbors of a cell in `row`.
///
/// Diagonal neighbors depend on row parity: odd rows are shifted right, so
/// their diagonals reach one column further right than an even row's.
pub const fn neighbor_offsets(row: i32) -> [(i32, i32); 6] {
    if row % 2 != 0 {
        [(0, 1), (-1, 1), (-1, 0), (0, -1), (1, 0), (1, 1)]
    } else {
        [(0, 1), (-1, 0), (-1, -1), (0, -1), (1, -1), (1, 0)]
    }
}

/// Converts between lattice cells and plane positions for one session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub radius: f32,
    pub spacing: f32,
    pub row_height: f32,
    /// Y of row 0
    pub top: f32,
    /// Playfield width
    pub width: f32,
}

impl Geometry {
    pub fn new(config: &GameConfig) -> Self {
        let spacing = config.spacing();
        Self {
            radius: config.radius,
            spacing,
            row_height: spacing * ROW_HEIGHT_FACTOR,
            top: config.grid_top,
            width: config.width,
        }
    }

    /// Horizontal shift of a row
    #[inline]
    fn row_offset(&self, row: i32) -> f32 {
        if row % 2 != 0 { self.radius } else { 0.0 }
    }

    /// Plane position of a cell center
    pub fn to_plane(&self, cell: HexCoord) -> Vec2 {
        let x = self.row_offset(cell.row) + cell.col as f32 * self.spacing + self.radius;
        let y = self.top + cell.row as f32 * self.row_height;
        Vec2::new(x, y)
    }

    /// Columns that fit inside the playfield on a row
    pub fn columns_in_row(&self, row: i32) -> i32 {
        ((self.width - self.row_offset(row)) / self.spacing).floor() as i32
    }

    /// Whether a center x keeps the whole bubble inside the side walls
    #[inline]
    pub fn within_walls(&self, x: f32) -> bool {
        x >= self.radius && x <= self.width - self.radius
    }

    /// The lattice cell whose center is nearest to `point` (unbounded).
    ///
    /// Rounds to the nearest row, then compares the best column on that row
    /// with the best columns on the rows above and below, since near a row
    /// boundary the closest center can sit on a neighboring row.
    pub fn nearest_cell(&self, point: Vec2) -> HexCoord {
        let base_row = ((point.y - self.top) / self.row_height).round() as i32;

        let mut best = HexCoord::new(base_row, 0);
        let mut best_dist = f32::INFINITY;
        for row in [base_row - 1, base_row, base_row + 1] {
            let col =
                ((point.x - self.radius - self.row_offset(row)) / self.spacing).round() as i32;
            let cell = HexCoord::new(row, col);
            let dist = self.to_plane(cell).distance(point);
            if dist < best_dist {
                best_dist = dist;
                best = cell;
            }
        }
        best
    }

    /// Row index containing a y coordinate, rounded down
    #[inline]
    pub fn row_floor(&self, y: f32) -> i32 {
        ((y - self.top) / self.row_height).floor() as i32
    }
}
