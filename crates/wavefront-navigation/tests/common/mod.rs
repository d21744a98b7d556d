//! Brute-force shortest paths used to check the planner.

#![allow(dead_code)]

use std::f64::consts::SQRT_2;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wavefront_navigation::{DiagonalRule, Grid, GridCell, UNREACHED_COST};

pub const EPSILON: f64 = 1e-9;

/// O(V^2) Dijkstra over the free cells of `grid`, with the same step rules as the planner.
pub fn reference_costs(grid: &Grid, goal: GridCell, rule: DiagonalRule) -> Vec<f64> {
    let size = grid.size();
    let index = |c: GridCell| c.y * size + c.x;
    let mut dist = vec![UNREACHED_COST; size * size];
    let mut done = vec![false; size * size];
    if grid.is_occupied(goal) {
        return dist;
    }
    dist[index(goal)] = 0.0;

    loop {
        let mut best: Option<GridCell> = None;
        for y in 0..size {
            for x in 0..size {
                let c = GridCell::new(x, y);
                let i = index(c);
                if done[i] || dist[i] == UNREACHED_COST {
                    continue;
                }
                if best.is_none_or(|b| dist[i] < dist[index(b)]) {
                    best = Some(c);
                }
            }
        }
        let Some(u) = best else { break };
        done[index(u)] = true;

        for dx in -1isize..=1 {
            for dy in -1isize..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let Some(v) = u.offset(dx, dy) else { continue };
                if !grid.contains(v) || grid.is_occupied(v) {
                    continue;
                }
                let diagonal = dx != 0 && dy != 0;
                if diagonal
                    && rule == DiagonalRule::AvoidCorners
                    && (grid.is_occupied(GridCell::new(u.x, v.y))
                        || grid.is_occupied(GridCell::new(v.x, u.y)))
                {
                    continue;
                }
                let weight = if diagonal { SQRT_2 } else { 1.0 };
                let candidate = dist[index(u)] + weight;
                if candidate < dist[index(v)] {
                    dist[index(v)] = candidate;
                }
            }
        }
    }
    dist
}

/// Asserts that the cost field of `grid` matches the reference for every cell.
pub fn assert_matches_reference(grid: &Grid, goal: GridCell, rule: DiagonalRule) {
    let expected = reference_costs(grid, goal, rule);
    let size = grid.size();
    for y in 0..size {
        for x in 0..size {
            let cell = GridCell::new(x, y);
            let want = expected[y * size + x];
            let got = grid.cost_of(cell);
            if want == UNREACHED_COST {
                assert_eq!(
                    got, UNREACHED_COST,
                    "cell {cell} should be unreached\n{grid}"
                );
            } else {
                assert!(
                    (got - want).abs() < EPSILON,
                    "cell {cell}: planner {got}, reference {want}\n{grid}"
                );
            }
        }
    }
}

/// Random interior obstacles with density `p`, never on `goal`.
pub fn random_layout(size: usize, goal: GridCell, p: f64, seed: u64) -> Vec<GridCell> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut cells = Vec::new();
    for y in 1..size - 1 {
        for x in 1..size - 1 {
            let cell = GridCell::new(x, y);
            if cell != goal && rng.random_bool(p) {
                cells.push(cell);
            }
        }
    }
    cells
}

/// A random interior cell.
pub fn random_interior(size: usize, seed: u64) -> GridCell {
    let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);
    GridCell::new(rng.random_range(1..size - 1), rng.random_range(1..size - 1))
}
