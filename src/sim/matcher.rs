//! Cluster detection - finding and popping matching bubbles.
//!
//! Breadth-first flood fill over settled bubbles of the seed's color. Two
//! bubbles are connected when their centers are closer than
//! `radius * ADJACENCY_FACTOR`. When the cluster reaches `MIN_CLUSTER_SIZE`
//! every member leaves the grid and starts its pop animation.

use std::collections::{HashSet, VecDeque};

use super::effects::PopEffect;
use super::grid::GridIndex;
use super::state::{BubbleId, GameEvent, GameState};
use crate::consts::{ADJACENCY_FACTOR, MATCH_POINTS, MIN_CLUSTER_SIZE, POP_DURATION_MS};

/// Same-color bubbles connected to `seed`, in visit order (seed first).
///
/// Each bubble is visited at most once. Returns an empty list if `seed` is
/// not settled.
pub fn find_cluster(grid: &GridIndex, seed: BubbleId, adjacency: f32) -> Vec<BubbleId> {
    let Some(start) = grid.get(seed) else {
        return Vec::new();
    };
    let color = start.color;

    let mut visited = HashSet::from([seed]);
    let mut queue = VecDeque::from([seed]);
    let mut cluster = Vec::new();

    while let Some(id) = queue.pop_front() {
        cluster.push(id);
        let Some(current) = grid.get(id) else {
            continue;
        };
        for neighbor in grid.neighbors_within(current.pos, adjacency) {
            if neighbor.color == color && visited.insert(neighbor.id) {
                queue.push_back(neighbor.id);
            }
        }
    }

    cluster
}

/// Pop the cluster around a freshly settled bubble.
///
/// Returns the number of bubbles popped (0 when the cluster is too small,
/// in which case the grid is untouched).
pub fn pop_matches(state: &mut GameState, seed: BubbleId) -> usize {
    let adjacency = state.config.radius * ADJACENCY_FACTOR;
    let cluster = find_cluster(&state.grid, seed, adjacency);
    if cluster.len() < MIN_CLUSTER_SIZE {
        return 0;
    }

    let duration = state.config.ticks_for_ms(POP_DURATION_MS);
    let mut color = 0;
    for id in &cluster {
        if let Some(bubble) = state.grid.remove(*id) {
            color = bubble.color;
            state.popping.push(PopEffect::new(bubble, duration));
        }
    }

    let count = cluster.len();
    state.score += MATCH_POINTS * count as u64;
    state.events.push(GameEvent::Matched { count, color });
    log::debug!("Popped {} bubbles of color {}", count, color);
    count
}
