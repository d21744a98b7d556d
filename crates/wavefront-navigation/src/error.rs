//! This module defines the error types used by the `wavefront-navigation` crate.

use std::path::PathBuf;

use thiserror::Error;
use wavefront_kinematics::KinematicsError;

use crate::map::GridCell;

/// Error type for navigation operations.
///
/// Out-of-range cell access inside the planner is prevented by construction
/// (the border ring is never expanded past), so `InvalidCell` is only produced
/// at the public boundary where cells come from configuration, map files or
/// occupancy updates.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// A queue node was requested while the free list was empty.
    /// The pool holds one node per grid cell, so this indicates a broken
    /// scheduling invariant rather than a recoverable condition.
    #[error("node pool exhausted: all {capacity} queue nodes are checked out")]
    PoolExhausted {
        /// Number of nodes owned by the pool.
        capacity: usize,
    },
    /// The requested grid has no interior cells or would overflow.
    #[error("invalid grid dimensions: {0}")]
    InvalidDimensions(&'static str),
    /// A cell lies outside the grid, or on the border where it is not allowed.
    #[error("cell {0} is outside the usable grid")]
    InvalidCell(GridCell),
    /// The goal cell is marked occupied, so no plan can be seeded from it.
    #[error("goal cell {0} is occupied")]
    GoalOccupied(GridCell),
    /// The map bootstrap file could not be read.
    #[error("failed to read map file {}", .path.display())]
    MapLoad {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The map bootstrap file was read but its contents are inconsistent.
    #[error("malformed map: {0}")]
    MapFormat(String),
    /// The motion integrator rejected its configuration or a heading.
    #[error(transparent)]
    Kinematics(#[from] KinematicsError),
}
