//! Wavefront path planning on a square occupancy grid.
//!
//! The planner floods path cost outward from a goal cell across free cells
//! (8-connected, diagonal steps weigh `sqrt(2)`), and the heading selector
//! reads a steering direction off that cost field at the robot's cell. The
//! [`Navigator`] ties both to a motion integrator to run the full
//! sense-plan-steer cycle one tick at a time.
//!
//! ```
//! use wavefront_navigation::{GridCell, Planner};
//!
//! let mut planner = Planner::new(12, GridCell::new(9, 9))?;
//! planner.grid_mut().set_occupied(GridCell::new(5, 5), true);
//! planner.replan()?;
//! let heading = planner.check_plan(GridCell::new(2, 2));
//! assert!(heading > 0.0 && heading < std::f64::consts::FRAC_PI_2);
//! # Ok::<(), wavefront_navigation::NavigationError>(())
//! ```

pub mod error;
pub mod heading;
pub mod map;
pub mod navigator;
pub mod planner;
pub mod queue;

pub use error::NavigationError;
pub use heading::{Heading, HeadingSource, check_plan, select_heading};
pub use map::{
    Grid, GridCell, GridParts, MapLayout, ObstacleList, OccupancyUpdate, UNREACHED_COST, load_map,
    parse_map,
};
pub use navigator::{Navigator, NavigatorConfig, TickReport};
pub use planner::{DiagonalRule, PlanStats, Planner, PlannerState};
