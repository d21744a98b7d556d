//! Map-related functionality for navigation.
//!
//! This module provides the occupancy grid with its cost field, the obstacle
//! registry fed by sensing, and the text map bootstrap.

pub mod grid;
pub mod loader;
pub mod obstacles;

pub use grid::{
    Grid, GridCell, GridParts, MIN_GRID_SIZE, NEIGHBOR_OFFSETS, UNREACHED_COST, step_cost,
};
pub use loader::{MapLayout, load_map, parse_map};
pub use obstacles::{ObstacleList, ObstaclePoint};

/// A batch of occupancy changes: each cell with its new occupied flag.
pub type OccupancyUpdate = Vec<(GridCell, bool)>;
