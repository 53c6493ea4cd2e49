//! The index of settled bubbles.
//!
//! Bubbles are stored by id (stable iteration order) with a second map from
//! lattice cell to id. Every settled bubble sits exactly on its cell center,
//! so proximity queries only need to look at the cells covering the query
//! circle instead of scanning the whole grid.

use std::collections::{BTreeMap, HashMap};

use glam::Vec2;

use super::geometry::{Geometry, HexCoord};
use super::state::{Bubble, BubbleId, BubbleState};
use crate::consts::OVERLAP_FACTOR;

/// All settled bubbles of a session
#[derive(Debug, Clone)]
pub struct GridIndex {
    geometry: Geometry,
    bubbles: BTreeMap<BubbleId, Bubble>,
    cells: HashMap<HexCoord, BubbleId>,
}

impl GridIndex {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            bubbles: BTreeMap::new(),
            cells: HashMap::new(),
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Insert a settled bubble.
    ///
    /// The caller guarantees the bubble is on its cell and overlaps nothing;
    /// both are checked in debug builds only.
    pub fn add(&mut self, bubble: Bubble) {
        let cell = bubble
            .cell
            .unwrap_or_else(|| self.geometry.nearest_cell(bubble.pos));
        debug_assert_eq!(bubble.state, BubbleState::Settled);
        debug_assert!(
            self.geometry.to_plane(cell).distance(bubble.pos) < 1e-3,
            "bubble {} at {} is off its cell {}",
            bubble.id,
            bubble.pos,
            cell
        );
        debug_assert!(
            !self.overlaps(bubble.pos),
            "bubble {} at {} overlaps a settled bubble",
            bubble.id,
            bubble.pos
        );

        self.cells.insert(cell, bubble.id);
        self.bubbles.insert(bubble.id, Bubble { cell: Some(cell), ..bubble });
    }

    /// Remove a bubble, returning it if it was settled here
    pub fn remove(&mut self, id: BubbleId) -> Option<Bubble> {
        let bubble = self.bubbles.remove(&id)?;
        if let Some(cell) = bubble.cell {
            self.cells.remove(&cell);
        }
        Some(bubble)
    }

    pub fn get(&self, id: BubbleId) -> Option<&Bubble> {
        self.bubbles.get(&id)
    }

    /// Bubble occupying a cell, if any
    pub fn at(&self, cell: HexCoord) -> Option<&Bubble> {
        self.cells.get(&cell).and_then(|id| self.bubbles.get(id))
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    /// No settled bubbles left: the win condition
    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    /// Settled bubbles in id order
    pub fn iter(&self) -> impl Iterator<Item = &Bubble> {
        self.bubbles.values()
    }

    /// All settled bubbles strictly closer than `radius` to `point`, in id order.
    pub fn neighbors_within(&self, point: Vec2, radius: f32) -> Vec<&Bubble> {
        let geo = &self.geometry;
        let row_min = geo.row_floor(point.y - radius) - 1;
        let row_max = geo.row_floor(point.y + radius) + 1;
        let col_min = ((point.x - radius - geo.spacing) / geo.spacing).floor() as i32 - 1;
        let col_max = ((point.x + radius) / geo.spacing).ceil() as i32 + 1;

        let window = (row_max - row_min + 1) as usize * (col_max - col_min + 1) as usize;
        let mut found: Vec<&Bubble> = if window > self.bubbles.len() {
            // Query circle covers more cells than there are bubbles
            self.bubbles
                .values()
                .filter(|b| b.pos.distance(point) < radius)
                .collect()
        } else {
            (row_min..=row_max)
                .flat_map(|row| (col_min..=col_max).map(move |col| HexCoord::new(row, col)))
                .filter_map(|cell| self.at(cell))
                .filter(|b| b.pos.distance(point) < radius)
                .collect()
        };
        found.sort_by_key(|b| b.id);
        found
    }

    /// Nearest settled bubble strictly within `radius` (ties: lowest id)
    pub fn nearest_within(&self, point: Vec2, radius: f32) -> Option<&Bubble> {
        self.neighbors_within(point, radius)
            .into_iter()
            .min_by(|a, b| {
                a.pos
                    .distance(point)
                    .total_cmp(&b.pos.distance(point))
                    .then(a.id.cmp(&b.id))
            })
    }

    /// Whether a bubble centered at `point` would overlap a settled one
    pub fn overlaps(&self, point: Vec2) -> bool {
        !self
            .neighbors_within(point, self.geometry.spacing * OVERLAP_FACTOR)
            .is_empty()
    }

    /// Largest y among settled bubbles (the lowest on screen)
    pub fn lowest_y(&self) -> Option<f32> {
        self.bubbles.values().map(|b| b.pos.y).reduce(f32::max)
    }

    /// Deepest occupied row
    pub fn lowest_row(&self) -> Option<i32> {
        self.cells.keys().map(|c| c.row).max()
    }
}
