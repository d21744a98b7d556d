//! One robot, one grid, one goal: the sense-plan-steer cycle.
//!
//! Each [`Navigator::tick`] applies the occupancy observed since the last
//! tick, re-plans if anything changed, reads a heading at the robot's cell and
//! advances the robot along it.

use std::path::Path;

use tracing::{debug, info, warn};
use wavefront_kinematics::{ChassisVelocity, MotionIntegrator, Pose};

use crate::error::NavigationError;
use crate::heading::{Heading, HeadingSource};
use crate::map::{GridCell, MapLayout, ObstacleList, UNREACHED_COST, load_map};
use crate::planner::{DiagonalRule, PlanStats, Planner};

/// Construction parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavigatorConfig {
    /// Cells per side, border included.
    pub grid_size: usize,
    /// Goal cell.
    pub goal: GridCell,
    /// Starting robot pose, in cell units.
    pub start: Pose,
    /// Distance travelled per tick, in cells.
    pub speed: f64,
    /// Diagonal rule of the planner.
    pub diagonal_rule: DiagonalRule,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        NavigatorConfig {
            grid_size: 12,
            goal: GridCell::new(9, 9),
            start: Pose::new(2.0, 2.0, 0.0),
            speed: 1.0,
            diagonal_rule: DiagonalRule::default(),
        }
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickReport {
    /// Tick counter, starting at 1.
    pub tick: u64,
    /// Heading read at the robot's cell before moving.
    pub heading: Heading,
    /// Command handed to the drive.
    pub velocity: ChassisVelocity,
    /// Pose after the move.
    pub pose: Pose,
    /// Cell the robot occupies after the move.
    pub cell: GridCell,
    /// Path cost of that cell.
    pub cost: f64,
    /// Counters of the pass, if this tick re-planned.
    pub plan: Option<PlanStats>,
    /// True once the robot stands on the goal cell.
    pub reached_goal: bool,
}

/// Planner, integrator and robot state for one robot.
#[derive(Debug, Clone)]
pub struct Navigator {
    planner: Planner,
    integrator: MotionIntegrator,
    obstacles: ObstacleList,
    pose: Pose,
    plan_valid: bool,
    tick: u64,
}

impl Navigator {
    /// Builds a navigator with an empty interior.
    ///
    /// # Errors
    /// Propagates grid, goal and speed validation failures.
    pub fn new(config: NavigatorConfig) -> Result<Self, NavigationError> {
        let planner =
            Planner::new(config.grid_size, config.goal)?.with_diagonal_rule(config.diagonal_rule);
        let integrator = MotionIntegrator::new(config.speed)?;
        info!(
            size = config.grid_size,
            goal = %config.goal,
            start = %config.start,
            speed = config.speed,
            "Navigator initialized"
        );
        Ok(Navigator {
            planner,
            integrator,
            obstacles: ObstacleList::new(),
            pose: config.start,
            plan_valid: false,
            tick: 0,
        })
    }

    /// Loads a map file and applies it.
    ///
    /// Obstacles are marked on the grid; a robot or goal in the map replaces the
    /// configured one. On failure the warning is logged, the navigator is left
    /// as it was and the error is returned for the caller to report.
    ///
    /// # Errors
    /// `MapLoad`, `MapFormat`, or `InvalidCell` for a goal on the border.
    pub fn bootstrap(&mut self, path: impl AsRef<Path>) -> Result<MapLayout, NavigationError> {
        let path = path.as_ref();
        let result = load_map(path, self.planner.grid().size())
            .and_then(|layout| self.apply_layout(&layout).map(|()| layout));
        match result {
            Ok(layout) => {
                info!(
                    path = %path.display(),
                    obstacles = layout.obstacles.len(),
                    goal = %self.planner.goal(),
                    robot = %self.pose,
                    "Map loaded"
                );
                Ok(layout)
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Map bootstrap failed, keeping current occupancy"
                );
                Err(e)
            }
        }
    }

    fn apply_layout(&mut self, layout: &MapLayout) -> Result<(), NavigationError> {
        if let Some(goal) = layout.goal {
            self.planner.set_goal(goal)?;
        }
        let changed = layout.apply(self.planner.grid_mut());
        for cell in &layout.obstacles {
            self.obstacles.add(cell.x as i32, cell.y as i32);
        }
        if let Some(robot) = layout.robot {
            self.pose = Pose::new(robot.x as f64, robot.y as f64, self.pose.theta);
        }
        debug!(changed, "Map layout applied");
        self.plan_valid = false;
        Ok(())
    }

    /// Applies `(cell, occupied)` pairs and reports whether occupancy changed.
    ///
    /// Every cell is validated before anything is written. Border cells are
    /// accepted but stay occupied.
    ///
    /// # Errors
    /// Returns `NavigationError::InvalidCell` for a cell outside the grid.
    pub fn apply_update(&mut self, update: &[(GridCell, bool)]) -> Result<bool, NavigationError> {
        let grid = self.planner.grid();
        if let Some(&(cell, _)) = update.iter().find(|(cell, _)| !grid.contains(*cell)) {
            return Err(NavigationError::InvalidCell(cell));
        }

        let mut changed = false;
        for &(cell, occupied) in update {
            if !self.planner.grid_mut().set_occupied(cell, occupied) {
                continue;
            }
            changed = true;
            let (x, y) = (cell.x as i32, cell.y as i32);
            if occupied {
                self.obstacles.add(x, y);
            } else {
                while self.obstacles.remove(x, y) {}
            }
        }

        if changed {
            debug!(cells = update.len(), "Occupancy changed");
            self.plan_valid = false;
        }
        Ok(changed)
    }

    /// Runs one control-loop tick.
    ///
    /// A rejected update leaves the navigator untouched, tick counter included.
    ///
    /// # Errors
    /// Returns update validation failures, `GoalOccupied` when an update blocks
    /// the goal, and `PoolExhausted` from the planner.
    pub fn tick(
        &mut self,
        update: Option<&[(GridCell, bool)]>,
    ) -> Result<TickReport, NavigationError> {
        if let Some(update) = update {
            self.apply_update(update)?;
        }
        self.tick += 1;

        let plan = if self.plan_valid {
            None
        } else {
            let stats = self.planner.replan_from_scratch()?;
            self.plan_valid = true;
            Some(stats)
        };

        let start = self.robot_cell();
        let heading = self.planner.select_heading(start);
        if self.planner.grid().cost_of(start) == UNREACHED_COST {
            warn!(cell = %start, "Robot cell is not connected to the goal");
        }

        let velocity = if start == self.planner.goal() {
            ChassisVelocity::default()
        } else {
            let velocity = self.integrator.velocity_for(heading.radians)?;
            self.pose = self.integrator.move_robot(self.pose, heading.radians)?;
            velocity
        };

        let cell = self.robot_cell();
        let report = TickReport {
            tick: self.tick,
            heading,
            velocity,
            pose: self.pose,
            cell,
            cost: self.planner.grid().cost_of(cell),
            plan,
            reached_goal: cell == self.planner.goal(),
        };
        debug!(
            tick = report.tick,
            heading = report.heading.radians,
            avoiding = report.heading.source == HeadingSource::ObstacleAvoidance,
            x = report.pose.x,
            y = report.pose.y,
            cost = report.cost,
            "Tick"
        );
        Ok(report)
    }

    /// The interior cell nearest to the robot.
    pub fn robot_cell(&self) -> GridCell {
        let last = (self.planner.grid().size() - 2) as f64;
        let snap = |v: f64| v.round().clamp(1.0, last) as usize;
        GridCell::new(snap(self.pose.x), snap(self.pose.y))
    }

    /// Goal cell.
    pub fn goal(&self) -> GridCell {
        self.planner.goal()
    }

    /// Current robot pose.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// The planner and its cost field.
    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    /// Obstacles reported so far.
    pub fn obstacles(&self) -> &ObstacleList {
        &self.obstacles
    }

    /// Mutable access to the obstacle registry, e.g. to record sensor points
    /// before rasterizing them with [`ObstacleList::to_occupancy_update`].
    pub fn obstacles_mut(&mut self) -> &mut ObstacleList {
        &mut self.obstacles
    }
}
