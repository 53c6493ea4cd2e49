//! Floating bubble detection
//!
//! A color-blind flood fill seeded from every settled bubble inside the
//! ceiling band. Whatever it cannot reach has nothing holding it up and
//! starts to fall.

use std::collections::{HashSet, VecDeque};

use glam::Vec2;

use super::grid::GridIndex;
use super::state::{BubbleId, BubbleState, GameEvent, GameState};
use crate::consts::{ADJACENCY_FACTOR, DROP_POINTS};

/// Settled bubbles not reachable from the ceiling band, in id order.
///
/// With no bubble inside the band every settled bubble is disconnected.
pub fn find_disconnected(grid: &GridIndex, ceiling_band: f32, adjacency: f32) -> Vec<BubbleId> {
    let mut connected: HashSet<BubbleId> = HashSet::with_capacity(grid.len());
    let mut queue: VecDeque<BubbleId> = grid
        .iter()
        .filter(|b| b.pos.y < ceiling_band)
        .map(|b| b.id)
        .collect();
    connected.extend(queue.iter().copied());

    while let Some(id) = queue.pop_front() {
        let Some(current) = grid.get(id) else {
            continue;
        };
        for neighbor in grid.neighbors_within(current.pos, adjacency) {
            if connected.insert(neighbor.id) {
                queue.push_back(neighbor.id);
            }
        }
    }

    grid.iter()
        .filter(|b| !connected.contains(&b.id))
        .map(|b| b.id)
        .collect()
}

/// Detach every unsupported bubble and hand it to the falling set.
///
/// Returns the number of bubbles dropped.
pub fn drop_disconnected(state: &mut GameState) -> usize {
    if state.grid.is_empty() {
        return 0;
    }
    let adjacency = state.config.radius * ADJACENCY_FACTOR;
    let disconnected = find_disconnected(&state.grid, state.config.ceiling_band, adjacency);
    if disconnected.is_empty() {
        return 0;
    }

    for id in &disconnected {
        let Some(mut bubble) = state.grid.remove(*id) else {
            continue;
        };
        bubble.state = BubbleState::Falling;
        bubble.cell = None;
        bubble.vel = Vec2::new(state.random_drift(), 0.0);
        state.falling.push(bubble);
        state.score += DROP_POINTS;
    }

    let count = disconnected.len();
    state.events.push(GameEvent::Dropped { count });
    log::debug!("Dropped {} disconnected bubbles", count);
    count
}
