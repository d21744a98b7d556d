//! Wavefront cost propagation.
//!
//! The planner floods the grid outward from the goal, writing into every
//! reachable free cell its shortest 8-connected distance to the goal (axial
//! step 1, diagonal step `sqrt(2)`). The cost field is both the working state
//! and the result; there is no separate distance array.
//!
//! Each cell enters the open list at most once per pass. A cell's cost is
//! evaluated from all of its already-reached neighbors the first time one of
//! them is expanded, and because cells are expanded in non-decreasing cost
//! order that first evaluation is already final.

use tracing::{debug, trace};

use crate::error::NavigationError;
use crate::heading::{self, Heading};
use crate::map::{Grid, GridCell, NEIGHBOR_OFFSETS, UNREACHED_COST, step_cost};
use crate::queue::OpenList;

/// Which diagonal steps the wavefront may take.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DiagonalRule {
    /// A diagonal step is taken only when both orthogonal cells it passes
    /// between are free, so paths never clip an obstacle corner.
    #[default]
    AvoidCorners,
    /// Every diagonal step between free cells is allowed.
    CutCorners,
}

/// Externally visible planner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerState {
    /// No pass in progress; the open list is empty.
    Idle,
    /// Inside [`Planner::replan`].
    Planning,
}

/// Counters for one planning pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanStats {
    /// Cells popped from the open list.
    pub expansions: usize,
    /// Calls to [`Planner::cell_cost`].
    pub cost_evaluations: usize,
    /// Cells holding a finite cost when the pass ended.
    pub reached: usize,
}

/// Owns the grid, the open list and the goal.
#[derive(Debug, Clone)]
pub struct Planner {
    grid: Grid,
    open: OpenList,
    goal: GridCell,
    rule: DiagonalRule,
    state: PlannerState,
    stats: PlanStats,
}

impl Planner {
    /// Builds a planner over an empty `size × size` grid.
    ///
    /// # Errors
    /// * `NavigationError::InvalidDimensions` if the grid cannot be built.
    /// * `NavigationError::InvalidCell` if `goal` is not an interior cell.
    pub fn new(size: usize, goal: GridCell) -> Result<Self, NavigationError> {
        let grid = Grid::new(size)?;
        if !grid.is_interior(goal) {
            return Err(NavigationError::InvalidCell(goal));
        }
        let open = OpenList::new(grid.capacity());
        Ok(Planner {
            grid,
            open,
            goal,
            rule: DiagonalRule::default(),
            state: PlannerState::Idle,
            stats: PlanStats::default(),
        })
    }

    /// Replaces the diagonal rule.
    pub fn with_diagonal_rule(mut self, rule: DiagonalRule) -> Self {
        self.rule = rule;
        self
    }

    /// The grid and its cost field.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access for occupancy edits.
    ///
    /// Changing occupancy does not touch the cost field; call
    /// [`replan_from_scratch`](Self::replan_from_scratch) afterwards.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Current goal cell.
    pub fn goal(&self) -> GridCell {
        self.goal
    }

    /// Active diagonal rule.
    pub fn diagonal_rule(&self) -> DiagonalRule {
        self.rule
    }

    /// Current state.
    pub fn state(&self) -> PlannerState {
        self.state
    }

    /// Counters of the last completed pass.
    pub fn last_stats(&self) -> PlanStats {
        self.stats
    }

    /// The open list, empty whenever the planner is idle.
    pub fn open_list(&self) -> &OpenList {
        &self.open
    }

    /// Moves the goal and discards the current plan.
    ///
    /// # Errors
    /// Returns `NavigationError::InvalidCell` if `goal` is not an interior cell.
    pub fn set_goal(&mut self, goal: GridCell) -> Result<(), NavigationError> {
        if !self.grid.is_interior(goal) {
            return Err(NavigationError::InvalidCell(goal));
        }
        self.goal = goal;
        self.grid.clear_plan();
        self.open.clear();
        Ok(())
    }

    /// True if a step between the neighboring cells `from` and `to` is allowed
    /// under the active diagonal rule. Occupancy of the endpoints is not checked.
    pub fn step_allowed(&self, from: GridCell, to: GridCell) -> bool {
        match self.rule {
            DiagonalRule::CutCorners => true,
            DiagonalRule::AvoidCorners => {
                !from.is_diagonal_to(&to)
                    || (!self.grid.is_occupied(GridCell::new(from.x, to.y))
                        && !self.grid.is_occupied(GridCell::new(to.x, from.y)))
            }
        }
    }

    /// Recomputes the cost of `cell` from its neighbors and reports whether it changed.
    ///
    /// Occupied cells are reset to [`UNREACHED_COST`] and the goal to `0`; both
    /// report no change. Any other cell takes the minimum of its stored cost and
    /// every allowed neighbor's cost plus the step weight.
    pub fn cell_cost(&mut self, cell: GridCell) -> bool {
        self.stats.cost_evaluations += 1;

        if self.grid.is_occupied(cell) {
            self.grid.set_cost(cell, UNREACHED_COST);
            return false;
        }
        if cell == self.goal {
            self.grid.set_cost(cell, 0.0);
            return false;
        }

        let current = self.grid.cost_of(cell);
        let lowest = self
            .grid
            .neighbors(cell)
            .filter(|&(neighbor, _)| self.step_allowed(cell, neighbor))
            .map(|(neighbor, weight)| self.grid.cost_of(neighbor) + weight)
            .fold(current, f64::min);

        if lowest < current {
            self.grid.set_cost(cell, lowest);
            true
        } else {
            false
        }
    }

    /// Evaluates every free, unreached neighbor of `cell` and schedules the ones
    /// whose cost changed.
    ///
    /// # Errors
    /// Returns `NavigationError::PoolExhausted` if the open list runs out of nodes.
    pub fn expand(&mut self, cell: GridCell) -> Result<(), NavigationError> {
        for &(dx, dy) in NEIGHBOR_OFFSETS.iter() {
            let Some(neighbor) = cell.offset(dx, dy) else {
                continue;
            };
            if !self.grid.contains(neighbor)
                || self.grid.is_occupied(neighbor)
                || self.grid.cost_of(neighbor) != UNREACHED_COST
                || !self.step_allowed(cell, neighbor)
            {
                continue;
            }
            if self.cell_cost(neighbor) {
                let key = self.grid.cost_of(neighbor);
                trace!(%cell, %neighbor, key, step = step_cost(cell, neighbor), "Scheduling cell");
                self.open.insert(&mut self.grid, neighbor, key)?;
            }
        }
        Ok(())
    }

    /// Propagates cost outward from the goal until the open list is empty.
    ///
    /// Cells already expanded earlier without an intervening
    /// [`Grid::clear_plan`] stay scheduled and are not revisited, so calling
    /// this twice in a row leaves the field unchanged.
    ///
    /// # Errors
    /// * `NavigationError::GoalOccupied` if the goal is blocked; the field is untouched.
    /// * `NavigationError::PoolExhausted` if the open list runs out of nodes.
    pub fn replan(&mut self) -> Result<PlanStats, NavigationError> {
        if self.grid.is_occupied(self.goal) {
            return Err(NavigationError::GoalOccupied(self.goal));
        }

        self.stats = PlanStats::default();
        self.state = PlannerState::Planning;
        let result = self.propagate();
        self.state = PlannerState::Idle;
        if let Err(e) = result {
            self.open.clear();
            return Err(e);
        }

        self.stats.reached = self.grid.reached_count();
        debug!(
            goal = %self.goal,
            expansions = self.stats.expansions,
            cost_evaluations = self.stats.cost_evaluations,
            reached = self.stats.reached,
            "Wavefront pass complete"
        );
        Ok(self.stats)
    }

    fn propagate(&mut self) -> Result<(), NavigationError> {
        let goal = self.goal;
        self.cell_cost(goal);
        self.open.insert(&mut self.grid, goal, 0.0)?;
        while let Some((cell, _key)) = self.open.pop_min() {
            self.stats.expansions += 1;
            self.expand(cell)?;
        }
        Ok(())
    }

    /// Forgets the current field and plans again against the current occupancy.
    ///
    /// # Errors
    /// Same as [`replan`](Self::replan).
    pub fn replan_from_scratch(&mut self) -> Result<PlanStats, NavigationError> {
        self.grid.clear_plan();
        self.open.clear();
        self.replan()
    }

    /// Heading (radians) the robot should take from `cell`.
    pub fn check_plan(&self, cell: GridCell) -> f64 {
        heading::check_plan(&self.grid, cell)
    }

    /// Heading from `cell` with the rule that produced it.
    pub fn select_heading(&self, cell: GridCell) -> Heading {
        heading::select_heading(&self.grid, cell)
    }
}
