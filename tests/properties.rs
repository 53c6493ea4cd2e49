//! Property-based tests using proptest
//!
//! Invariants that must hold for any seed, shot sequence or board:
//! - Packing: settled bubbles never overlap and sit on their cell centers
//! - Matcher: clusters are single-colored, duplicate-free and closed
//! - Connectivity: nothing reachable from the ceiling is ever dropped
//! - Determinism: same seed + same inputs -> same snapshot

use std::collections::HashSet;

use bubble_pop::GameConfig;
use bubble_pop::consts::{ADJACENCY_FACTOR, AIM_MAX, AIM_MIN, OVERLAP_FACTOR};
use bubble_pop::sim::{
    BubbleId, GameState, HexCoord, Snapshot, TickInput, find_cluster, find_disconnected, tick,
};
use proptest::prelude::*;

/// Fire one shot at `angle` and tick until it settles or the game ends
fn fire_and_settle(state: &mut GameState, angle: f32) {
    let input = TickInput {
        aim_angle: Some(angle),
        shoot: true,
        ..Default::default()
    };
    tick(state, &input);
    for _ in 0..1_000 {
        if state.phase.is_over() || state.in_flight_count() == 0 {
            return;
        }
        tick(state, &TickInput::default());
    }
}

/// Empty session with `cells` placed where they fit (duplicates skipped)
fn board(seed: u64, cells: &[(i32, i32, u8)]) -> GameState {
    let mut state = GameState::empty(GameConfig::default(), seed);
    for &(row, col, color) in cells {
        let cell = HexCoord::new(row, col);
        if col >= state.geometry.columns_in_row(row) || state.grid.at(cell).is_some() {
            continue;
        }
        state.place(cell, color);
    }
    state
}

fn cells_strategy() -> impl Strategy<Value = Vec<(i32, i32, u8)>> {
    prop::collection::vec((0i32..8, 0i32..12, 0u8..3), 0..60)
}

// ============================================================
// Packing
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_settled_bubbles_never_overlap(
        seed in any::<u64>(),
        angles in prop::collection::vec(AIM_MIN..AIM_MAX, 1..12),
    ) {
        let mut state = GameState::new(GameConfig::default(), seed);
        for angle in angles {
            fire_and_settle(&mut state, angle);
            prop_assert!(state.in_flight_count() <= 1);
            if state.phase.is_over() {
                break;
            }
        }

        let min_gap = state.config.spacing() * OVERLAP_FACTOR;
        let settled: Vec<_> = state.grid.iter().collect();
        for (i, a) in settled.iter().enumerate() {
            let cell = a.cell.expect("settled bubble without a cell");
            prop_assert_eq!(a.pos, state.geometry.to_plane(cell));
            prop_assert!(cell.row >= 0);
            for b in &settled[i + 1..] {
                prop_assert!(
                    a.pos.distance(b.pos) >= min_gap,
                    "bubbles {} and {} overlap", a.id, b.id
                );
            }
        }
    }
}

// ============================================================
// Matcher and connectivity
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_cluster_is_closed_and_single_colored(
        cells in cells_strategy(),
        pick in any::<prop::sample::Index>(),
    ) {
        let state = board(1, &cells);
        prop_assume!(!state.grid.is_empty());
        let ids: Vec<BubbleId> = state.grid.iter().map(|b| b.id).collect();
        let seed = ids[pick.index(ids.len())];
        let adjacency = state.config.radius * ADJACENCY_FACTOR;

        let cluster = find_cluster(&state.grid, seed, adjacency);
        let members: HashSet<BubbleId> = cluster.iter().copied().collect();
        prop_assert_eq!(members.len(), cluster.len());
        prop_assert_eq!(cluster[0], seed);

        let color = state.grid.get(seed).map(|b| b.color);
        for id in &cluster {
            let bubble = state.grid.get(*id).expect("cluster member missing");
            prop_assert_eq!(Some(bubble.color), color);
            for neighbor in state.grid.neighbors_within(bubble.pos, adjacency) {
                if Some(neighbor.color) == color {
                    prop_assert!(members.contains(&neighbor.id));
                }
            }
        }
    }

    #[test]
    fn prop_disconnected_set_is_exact(cells in cells_strategy()) {
        let state = board(2, &cells);
        let adjacency = state.config.radius * ADJACENCY_FACTOR;
        let band = state.config.ceiling_band;

        let dropped: HashSet<BubbleId> = find_disconnected(&state.grid, band, adjacency)
            .into_iter()
            .collect();

        for bubble in state.grid.iter() {
            if dropped.contains(&bubble.id) {
                prop_assert!(bubble.pos.y >= band);
                // Nothing kept may touch a dropped bubble
                for neighbor in state.grid.neighbors_within(bubble.pos, adjacency) {
                    prop_assert!(dropped.contains(&neighbor.id));
                }
            }
        }
    }
}

// ============================================================
// Determinism
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_same_seed_same_session(
        seed in any::<u64>(),
        angles in prop::collection::vec(AIM_MIN..AIM_MAX, 1..8),
    ) {
        let mut a = GameState::new(GameConfig::default(), seed);
        let mut b = GameState::new(GameConfig::default(), seed);
        for angle in angles {
            fire_and_settle(&mut a, angle);
            fire_and_settle(&mut b, angle);
        }
        for _ in 0..60 {
            tick(&mut a, &TickInput::default());
            tick(&mut b, &TickInput::default());
        }

        let json_a = serde_json::to_string(&Snapshot::capture(&a)).unwrap();
        let json_b = serde_json::to_string(&Snapshot::capture(&b)).unwrap();
        prop_assert_eq!(json_a, json_b);
        prop_assert_eq!(a.drain_events(), b.drain_events());
    }
}
