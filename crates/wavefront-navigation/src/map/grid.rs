//! Square occupancy grid carrying the wavefront cost field.
//!
//! Every cell holds three pieces of state: whether it is occupied, its current
//! path cost to the goal, and whether it has already been placed on the open
//! list during the current planning pass. The outermost ring of cells is a
//! permanent wall: it is occupied and scheduled from construction onward, which
//! is what lets the planner look at all eight neighbors of any cell it expands
//! without bounds checks.

#![warn(missing_docs)]

use std::f64::consts::SQRT_2;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::NavigationError;

/// Cost of a cell the wavefront has not reached (or can never reach).
pub const UNREACHED_COST: f64 = f64::INFINITY;

/// Smallest grid that still has one interior cell.
pub const MIN_GRID_SIZE: usize = 3;

/// Offsets of the eight neighbors, column-major: `dx` outer, `dy` inner.
///
/// The heading selector's tie-break depends on this scan order.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A cell address. `x` is the column (growing east), `y` the row (growing north).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridCell {
    /// Column index.
    pub x: usize,
    /// Row index.
    pub y: usize,
}

impl GridCell {
    /// Creates a cell address.
    pub const fn new(x: usize, y: usize) -> Self {
        GridCell { x, y }
    }

    /// Returns the cell displaced by `(dx, dy)`, or `None` if a coordinate would go negative.
    pub fn offset(self, dx: isize, dy: isize) -> Option<GridCell> {
        Some(GridCell {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }

    /// True when `other` touches this cell corner to corner.
    pub fn is_diagonal_to(&self, other: &GridCell) -> bool {
        self.x != other.x && self.y != other.y
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Traversal cost of a single step between neighboring cells.
///
/// Axial steps cost one cell; diagonal steps cost `sqrt(2)`.
pub fn step_cost(from: GridCell, to: GridCell) -> f64 {
    if from.is_diagonal_to(&to) { SQRT_2 } else { 1.0 }
}

/// `size × size` occupancy grid with a permanently blocked border.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "GridParts"))]
pub struct Grid {
    size: usize,
    occupied: Vec<bool>,
    cost: Vec<f64>,
    scheduled: Vec<bool>,
}

/// Unchecked per-cell state of a [`Grid`], validated by [`Grid::from_parts`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct GridParts {
    /// Cells along each side.
    pub size: usize,
    /// Row-major occupancy flags.
    pub occupied: Vec<bool>,
    /// Row-major path costs.
    pub cost: Vec<f64>,
    /// Row-major scheduled flags.
    pub scheduled: Vec<bool>,
}

impl TryFrom<GridParts> for Grid {
    type Error = NavigationError;

    fn try_from(parts: GridParts) -> Result<Self, Self::Error> {
        Grid::from_parts(parts)
    }
}

impl Grid {
    /// Creates a grid with every interior cell free and unreached.
    ///
    /// # Arguments
    /// * `size` - Number of cells along each side, border included
    ///
    /// # Errors
    /// Returns `NavigationError::InvalidDimensions` if `size` leaves no interior
    /// cell or if `size * size` overflows.
    pub fn new(size: usize) -> Result<Self, NavigationError> {
        if size < MIN_GRID_SIZE {
            return Err(NavigationError::InvalidDimensions(
                "Grid needs at least one interior cell (size >= 3)",
            ));
        }
        let capacity = size.checked_mul(size).ok_or(NavigationError::InvalidDimensions(
            "Grid dimensions too large, would cause overflow",
        ))?;

        let mut grid = Grid {
            size,
            occupied: vec![false; capacity],
            cost: vec![UNREACHED_COST; capacity],
            scheduled: vec![false; capacity],
        };
        grid.reset();
        Ok(grid)
    }

    /// Rebuilds a grid from raw per-cell state, e.g. a saved snapshot.
    ///
    /// # Errors
    /// Returns `NavigationError::InvalidDimensions` if a vector does not hold
    /// `size * size` entries or a border cell is not blocked.
    pub fn from_parts(parts: GridParts) -> Result<Self, NavigationError> {
        let capacity = Grid::new(parts.size)?.capacity();
        if parts.occupied.len() != capacity
            || parts.cost.len() != capacity
            || parts.scheduled.len() != capacity
        {
            return Err(NavigationError::InvalidDimensions(
                "Cell vectors must hold size * size entries",
            ));
        }

        let grid = Grid {
            size: parts.size,
            occupied: parts.occupied,
            cost: parts.cost,
            scheduled: parts.scheduled,
        };
        let open_border = (0..capacity)
            .map(|i| GridCell::new(i % grid.size, i / grid.size))
            .filter(|&c| grid.is_border(c))
            .any(|c| !grid.is_occupied(c) || !grid.is_scheduled(c));
        if open_border {
            return Err(NavigationError::InvalidDimensions(
                "Border cells must stay occupied and scheduled",
            ));
        }
        Ok(grid)
    }

    /// Number of cells along each side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells.
    pub fn capacity(&self) -> usize {
        self.cost.len()
    }

    fn index(&self, cell: GridCell) -> usize {
        cell.y * self.size + cell.x
    }

    /// True if `cell` addresses a cell of this grid.
    pub fn contains(&self, cell: GridCell) -> bool {
        cell.x < self.size && cell.y < self.size
    }

    /// True if `cell` lies on the outermost ring.
    pub fn is_border(&self, cell: GridCell) -> bool {
        cell.x == 0 || cell.y == 0 || cell.x == self.size - 1 || cell.y == self.size - 1
    }

    /// True if `cell` is inside the grid and off the border.
    pub fn is_interior(&self, cell: GridCell) -> bool {
        self.contains(cell) && !self.is_border(cell)
    }

    /// Iterates over all interior cells, row by row from the south.
    pub fn interior_cells(&self) -> impl Iterator<Item = GridCell> + use<> {
        let last = self.size - 1;
        (1..last).flat_map(move |y| (1..last).map(move |x| GridCell::new(x, y)))
    }

    /// Restores the initial state: border occupied and scheduled, interior free,
    /// every cost unreached.
    pub fn reset(&mut self) {
        self.cost.fill(UNREACHED_COST);
        for y in 0..self.size {
            for x in 0..self.size {
                let cell = GridCell::new(x, y);
                let border = self.is_border(cell);
                let index = self.index(cell);
                self.occupied[index] = border;
                self.scheduled[index] = border;
            }
        }
    }

    /// Forgets the previous cost field while keeping occupancy.
    ///
    /// Interior cells become unreached and unscheduled; the border stays scheduled.
    pub fn clear_plan(&mut self) {
        self.cost.fill(UNREACHED_COST);
        for y in 1..self.size - 1 {
            for x in 1..self.size - 1 {
                let index = self.index(GridCell::new(x, y));
                self.scheduled[index] = false;
            }
        }
    }

    /// Marks `cell` as occupied.
    pub fn mark_occupied(&mut self, cell: GridCell) {
        let index = self.index(cell);
        self.occupied[index] = true;
    }

    /// Sets the occupancy of an interior cell and reports whether it changed.
    ///
    /// Border cells always stay occupied; requests to free them are ignored.
    pub fn set_occupied(&mut self, cell: GridCell, occupied: bool) -> bool {
        if self.is_border(cell) {
            return false;
        }
        let index = self.index(cell);
        let changed = self.occupied[index] != occupied;
        self.occupied[index] = occupied;
        changed
    }

    /// True if `cell` is blocked.
    pub fn is_occupied(&self, cell: GridCell) -> bool {
        self.occupied[self.index(cell)]
    }

    /// Current path cost of `cell` to the goal.
    pub fn cost_of(&self, cell: GridCell) -> f64 {
        self.cost[self.index(cell)]
    }

    pub(crate) fn set_cost(&mut self, cell: GridCell, cost: f64) {
        let index = self.index(cell);
        self.cost[index] = cost;
    }

    /// True if `cell` has been placed on the open list during the current pass.
    pub fn is_scheduled(&self, cell: GridCell) -> bool {
        self.scheduled[self.index(cell)]
    }

    pub(crate) fn set_scheduled(&mut self, cell: GridCell, scheduled: bool) {
        let index = self.index(cell);
        self.scheduled[index] = scheduled;
    }

    /// Number of cells with a finite cost.
    pub fn reached_count(&self) -> usize {
        self.cost.iter().filter(|c| c.is_finite()).count()
    }

    /// Number of occupied interior cells.
    pub fn obstacle_count(&self) -> usize {
        self.interior_cells()
            .filter(|&c| self.is_occupied(c))
            .count()
    }

    /// Neighbors of `cell` that lie inside the grid, paired with their step cost.
    pub fn neighbors(&self, cell: GridCell) -> impl Iterator<Item = (GridCell, f64)> + '_ {
        NEIGHBOR_OFFSETS.iter().filter_map(move |&(dx, dy)| {
            let neighbor = cell.offset(dx, dy)?;
            self.contains(neighbor)
                .then(|| (neighbor, step_cost(cell, neighbor)))
        })
    }
}

impl fmt::Display for Grid {
    /// Prints the cost field with north at the top.
    /// Occupied cells print as `###`, unreached free cells as `inf`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.size).rev() {
            for x in 0..self.size {
                let cell = GridCell::new(x, y);
                if self.is_occupied(cell) {
                    write!(f, "  ###")?;
                } else if self.cost_of(cell) == UNREACHED_COST {
                    write!(f, "  inf")?;
                } else {
                    write!(f, "{:5.1}", self.cost_of(cell))?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
