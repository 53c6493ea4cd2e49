//! Snapping an arrived shot onto the lattice
//!
//! The search is a bounded brute-force scan: every cell in the first
//! `snap_row_limit` rows that fits between the walls and overlaps no settled
//! bubble is a candidate, and the one nearest the shot wins (O(rows x cols)
//! per shot). When the shot hit a bubble and the best candidate is more than
//! one spacing away, the search narrows to the free cells around the bubble
//! that was hit so the shot lands next to it.

use glam::Vec2;

use super::geometry::{Geometry, HexCoord};
use super::grid::GridIndex;
use super::state::{Bubble, BubbleId, BubbleState};
use crate::GameConfig;

/// How a placement was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapSource {
    /// Nearest free cell inside the row limit
    Nearest,
    /// Free cell adjacent to the bubble that was hit
    Adjacent,
    /// Row limit exhausted; searched deeper rows
    Fallback,
}

/// Where an arriving bubble will settle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub cell: HexCoord,
    pub pos: Vec2,
    pub source: SnapSource,
}

/// A cell is legal when it is inside the walls and overlaps nothing settled
fn is_free(grid: &GridIndex, geo: &Geometry, cell: HexCoord) -> bool {
    cell.row >= 0 && geo.within_walls(geo.to_plane(cell).x) && !grid.overlaps(geo.to_plane(cell))
}

/// Nearest free cell over `rows`, first one wins on ties (row-major order)
fn nearest_free(
    grid: &GridIndex,
    geo: &Geometry,
    rows: std::ops::Range<i32>,
    from: Vec2,
) -> Option<(HexCoord, f32)> {
    let mut best: Option<(HexCoord, f32)> = None;
    for row in rows {
        for col in 0..geo.columns_in_row(row) {
            let cell = HexCoord::new(row, col);
            if !is_free(grid, geo, cell) {
                continue;
            }
            let dist = geo.to_plane(cell).distance(from);
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((cell, dist));
            }
        }
    }
    best
}

/// Pick the cell for a bubble that stopped at `pos`.
///
/// Never fails: if the bounded scan finds nothing, deeper rows are searched
/// until a free cell turns up (a row below every settled bubble is always
/// free).
pub fn resolve(
    grid: &GridIndex,
    config: &GameConfig,
    pos: Vec2,
    collision: Option<BubbleId>,
) -> Placement {
    let geo = *grid.geometry();
    let row_limit = config.snap_row_limit as i32;

    let nearest = nearest_free(grid, &geo, 0..row_limit, pos);

    let hit = collision.and_then(|id| grid.get(id));

    // Too far from anything sensible (or nothing found): try next to the hit
    let far = nearest.is_none_or(|(_, dist)| dist > geo.spacing);
    if let Some(cell) = hit
        .filter(|_| far)
        .and_then(|hit| adjacent_free(grid, &geo, hit, pos))
    {
        return Placement {
            cell,
            pos: geo.to_plane(cell),
            source: SnapSource::Adjacent,
        };
    }

    if let Some((cell, _)) = nearest {
        return Placement {
            cell,
            pos: geo.to_plane(cell),
            source: SnapSource::Nearest,
        };
    }

    let deepest = grid.lowest_row().unwrap_or(0).max(row_limit) + 2;
    log::warn!(
        "No free cell within {} rows for shot at {}; searching to row {}",
        row_limit,
        pos,
        deepest
    );
    let cell = nearest_free(grid, &geo, row_limit..deepest + 1, pos)
        .map(|(cell, _)| cell)
        .unwrap_or_else(|| HexCoord::new(deepest, 0));
    Placement {
        cell,
        pos: geo.to_plane(cell),
        source: SnapSource::Fallback,
    }
}

/// Nearest free cell among the six around the bubble that was hit
fn adjacent_free(grid: &GridIndex, geo: &Geometry, hit: &Bubble, from: Vec2) -> Option<HexCoord> {
    let center = hit.cell.unwrap_or_else(|| geo.nearest_cell(hit.pos));
    center
        .neighbors()
        .into_iter()
        .filter(|&cell| is_free(grid, geo, cell))
        .map(|cell| (cell, geo.to_plane(cell).distance(from)))
        .fold(None, |best: Option<(HexCoord, f32)>, (cell, dist)| match best {
            Some((_, d)) if d <= dist => best,
            _ => Some((cell, dist)),
        })
        .map(|(cell, _)| cell)
}

/// Settle `bubble` at `placement`. The only way into the grid.
pub fn commit(grid: &mut GridIndex, mut bubble: Bubble, placement: Placement) -> BubbleId {
    bubble.pos = placement.pos;
    bubble.vel = Vec2::ZERO;
    bubble.cell = Some(placement.cell);
    bubble.state = BubbleState::Settled;
    let id = bubble.id;
    log::debug!(
        "Bubble {} snapped to {} ({:?})",
        id,
        placement.cell,
        placement.source
    );
    grid.add(bubble);
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(config: &GameConfig, cells: &[HexCoord]) -> GridIndex {
        let geo = Geometry::new(config);
        let mut grid = GridIndex::new(geo);
        for (i, &cell) in cells.iter().enumerate() {
            grid.add(Bubble::settled(i as BubbleId + 1, 0, cell, geo.to_plane(cell)));
        }
        grid
    }

    #[test]
    fn test_empty_cell_snaps_to_itself() {
        let config = GameConfig::default();
        let grid = grid_with(&config, &[HexCoord::new(0, 0), HexCoord::new(0, 1)]);
        let geo = *grid.geometry();
        let target = HexCoord::new(1, 0);
        let pos = geo.to_plane(target);

        let placement = resolve(&grid, &config, pos, None);
        assert_eq!(placement.cell, target);
        assert_eq!(placement.cell, geo.nearest_cell(pos));
        assert_eq!(placement.source, SnapSource::Nearest);
    }

    #[test]
    fn test_never_lands_on_occupied_cell() {
        let config = GameConfig::default();
        let grid = grid_with(&config, &[HexCoord::new(0, 3)]);
        let geo = *grid.geometry();
        // Shot stopped right on top of the settled bubble
        let pos = geo.to_plane(HexCoord::new(0, 3)) + Vec2::new(1.0, 2.0);
        let placement = resolve(&grid, &config, pos, Some(1));
        assert_ne!(placement.cell, HexCoord::new(0, 3));
        assert!(placement.pos.distance(geo.to_plane(HexCoord::new(0, 3))) >= geo.spacing * 0.9);
    }

    #[test]
    fn test_far_candidate_prefers_neighbor_of_hit() {
        // Rows 0..2 full except one far corner cell; the shot touches a
        // bubble on row 1 from below the row limit.
        let config = GameConfig {
            snap_row_limit: 2,
            ..GameConfig::default()
        };
        let geo = Geometry::new(&config);
        let mut cells = Vec::new();
        for row in 0..2 {
            for col in 0..geo.columns_in_row(row) {
                if (row, col) != (0, 0) {
                    cells.push(HexCoord::new(row, col));
                }
            }
        }
        let grid = grid_with(&config, &cells);
        let hit = grid.at(HexCoord::new(1, 6)).unwrap().id;
        let pos = geo.to_plane(HexCoord::new(1, 6)) + Vec2::new(0.0, 38.0);

        let placement = resolve(&grid, &config, pos, Some(hit));
        assert_eq!(placement.source, SnapSource::Adjacent);
        assert_eq!(placement.cell.row, 2);
        assert!(placement.pos.distance(geo.to_plane(HexCoord::new(1, 6))) < geo.spacing * 1.01);
    }

    #[test]
    fn test_exhausted_rows_fall_back() {
        let config = GameConfig {
            snap_row_limit: 1,
            ..GameConfig::default()
        };
        let geo = Geometry::new(&config);
        let cells: Vec<HexCoord> = (0..geo.columns_in_row(0)).map(|c| HexCoord::new(0, c)).collect();
        let grid = grid_with(&config, &cells);
        let pos = geo.to_plane(HexCoord::new(2, 4));

        let placement = resolve(&grid, &config, pos, None);
        assert_eq!(placement.source, SnapSource::Fallback);
        assert_eq!(placement.cell, HexCoord::new(2, 4));
    }

    #[test]
    fn test_commit_settles() {
        let config = GameConfig::default();
        let mut grid = grid_with(&config, &[]);
        let geo = *grid.geometry();
        let mut shot = Bubble::loaded(9, 2, Vec2::new(105.0, 100.0));
        shot.state = BubbleState::InFlight;
        let placement = resolve(&grid, &config, shot.pos, None);
        let id = commit(&mut grid, shot, placement);

        let settled = grid.get(id).unwrap();
        assert_eq!(settled.state, BubbleState::Settled);
        assert_eq!(settled.pos, geo.to_plane(settled.cell.unwrap()));
        assert_eq!(settled.cell, Some(HexCoord::new(1, 2)));
        assert_eq!(settled.cell, Some(geo.nearest_cell(Vec2::new(105.0, 100.0))));
    }
}
