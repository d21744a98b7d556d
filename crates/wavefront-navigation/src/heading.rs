//! Reads a steering heading off the cost field.
//!
//! In open space the heading follows the cost gradient across the 3×3 window
//! around the robot. Next to an obstacle or an unreached region the gradient
//! is meaningless, so the robot instead heads straight for the cheapest cell
//! in the window.

use std::f64::consts::FRAC_PI_2;

use nalgebra::Vector2;

use crate::map::{Grid, GridCell, UNREACHED_COST};

/// How a heading was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeadingSource {
    /// Cost gradient over the full window.
    Gradient,
    /// Direct step toward the cheapest window cell.
    ObstacleAvoidance,
}

/// A steering decision.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Heading {
    /// Direction in radians, `0` east, `PI / 2` north.
    pub radians: f64,
    /// Rule that produced it.
    pub source: HeadingSource,
}

/// Heading used when the window offers no cheaper cell.
pub const DEFAULT_HEADING: f64 = FRAC_PI_2;

/// Costs of the 3×3 window, indexed `[dx + 1][dy + 1]`.
type Window = [[f64; 3]; 3];

fn window(grid: &Grid, cell: GridCell) -> Window {
    let mut costs = [[UNREACHED_COST; 3]; 3];
    for (i, column) in costs.iter_mut().enumerate() {
        for (j, cost) in column.iter_mut().enumerate() {
            *cost = grid.cost_of(GridCell::new(cell.x + i - 1, cell.y + j - 1));
        }
    }
    costs
}

/// Heading from the interior cell `cell`, in radians.
pub fn check_plan(grid: &Grid, cell: GridCell) -> f64 {
    select_heading(grid, cell).radians
}

/// Heading from the interior cell `cell`, together with the rule that chose it.
///
/// `cell` must not lie on the border: the whole 3×3 window is read.
pub fn select_heading(grid: &Grid, cell: GridCell) -> Heading {
    let costs = window(grid, cell);
    let here = costs[1][1];

    let blocked = costs.iter().flatten().any(|&c| c == UNREACHED_COST);
    if blocked {
        let direction = cheapest_direction(&costs, here);
        return Heading {
            radians: direction.y.atan2(direction.x),
            source: HeadingSource::ObstacleAvoidance,
        };
    }

    // West column minus east column, south row minus north row.
    let [west_column, _, east_column] = &costs;
    let x_part: f64 = west_column
        .iter()
        .zip(east_column)
        .map(|(w, e)| w - e)
        .sum();
    let y_part: f64 = costs.iter().map(|column| column[0] - column[2]).sum();
    let mut gradient = Vector2::new(x_part, y_part);

    // Plateau: compare against the one-step neighbor directly.
    let south = costs[1][0];
    if gradient.y == 0.0 && here > south {
        gradient.y = 2.0 * (south - here);
    }
    let west = costs[0][1];
    if gradient.x == 0.0 && here > west {
        gradient.x = 2.0 * (west - here);
    }

    Heading {
        radians: gradient.y.atan2(gradient.x),
        source: HeadingSource::Gradient,
    }
}

/// Offset of the first window cell strictly cheaper than everything before it,
/// scanning `dx` outer and `dy` inner. Due north ([`DEFAULT_HEADING`]) when nothing beats `here`.
fn cheapest_direction(costs: &Window, here: f64) -> Vector2<f64> {
    let mut lowest = here;
    let mut direction = Vector2::new(0.0, 1.0);
    for (i, column) in costs.iter().enumerate() {
        for (j, &cost) in column.iter().enumerate() {
            if cost < lowest {
                lowest = cost;
                direction = Vector2::new(i as f64 - 1.0, j as f64 - 1.0);
            }
        }
    }
    direction
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_4, PI};

    const EPSILON: f64 = 1e-9;

    /// 5×5 grid whose 3×3 interior holds `rows`, listed north row first.
    fn grid_with(rows: [[f64; 3]; 3]) -> Grid {
        let mut grid = Grid::new(5).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (x, &cost) in row.iter().enumerate() {
                grid.set_cost(GridCell::new(x + 1, 3 - r), cost);
            }
        }
        grid
    }

    #[test]
    fn test_gradient_points_downhill() {
        #[rustfmt::skip]
        let grid = grid_with([
            [3.0, 2.0, 1.0],
            [3.0, 2.0, 1.0],
            [3.0, 2.0, 1.0],
        ]);
        let heading = select_heading(&grid, GridCell::new(2, 2));
        assert_eq!(heading.source, HeadingSource::Gradient);
        assert!(
            heading.radians.abs() < EPSILON,
            "east, got {}",
            heading.radians
        );

        #[rustfmt::skip]
        let grid = grid_with([
            [1.0, 1.0, 1.0],
            [2.0, 2.0, 2.0],
            [3.0, 3.0, 3.0],
        ]);
        let radians = check_plan(&grid, GridCell::new(2, 2));
        assert!((radians - FRAC_PI_2).abs() < EPSILON);
    }

    #[test]
    fn test_gradient_blends_diagonal() {
        #[rustfmt::skip]
        let grid = grid_with([
            [2.0, 1.0, 0.0],
            [3.0, 2.0, 1.0],
            [4.0, 3.0, 2.0],
        ]);
        let radians = check_plan(&grid, GridCell::new(2, 2));
        assert!((radians - FRAC_PI_4).abs() < EPSILON);
    }

    #[test]
    fn test_plateau_correction() {
        // Rows sum equal so the raw y difference vanishes; the southern
        // neighbor is cheaper than the robot's cell.
        #[rustfmt::skip]
        let grid = grid_with([
            [2.0, 3.0, 2.0],
            [2.5, 2.0, 2.5],
            [3.0, 1.0, 3.0],
        ]);
        let heading = select_heading(&grid, GridCell::new(2, 2));
        assert_eq!(heading.source, HeadingSource::Gradient);
        assert!((heading.radians - (-FRAC_PI_2)).abs() < EPSILON);
    }

    #[test]
    fn test_obstacle_override_targets_cheapest_cell() {
        let inf = UNREACHED_COST;
        #[rustfmt::skip]
        let grid = grid_with([
            [inf, 4.0, 3.0],
            [4.0, 3.5, 2.0],
            [4.5, 3.0, 2.5],
        ]);
        let heading = select_heading(&grid, GridCell::new(2, 2));
        assert_eq!(heading.source, HeadingSource::ObstacleAvoidance);
        assert!(
            heading.radians.abs() < EPSILON,
            "toward (3, 2), got {}",
            heading.radians
        );
    }

    #[test]
    fn test_obstacle_override_first_minimum_wins() {
        let inf = UNREACHED_COST;
        #[rustfmt::skip]
        let grid = grid_with([
            [1.0, inf, 1.0],
            [3.0, 3.0, 3.0],
            [3.0, 3.0, 3.0],
        ]);
        // (1, 3) is scanned before (3, 3).
        let radians = check_plan(&grid, GridCell::new(2, 2));
        assert!((radians - 3.0 * FRAC_PI_4).abs() < EPSILON);
    }

    #[test]
    fn test_no_cheaper_cell_defaults_north() {
        let inf = UNREACHED_COST;
        let grid = grid_with([[inf; 3]; 3]);
        let heading = select_heading(&grid, GridCell::new(2, 2));
        assert_eq!(heading.source, HeadingSource::ObstacleAvoidance);
        assert!((heading.radians - DEFAULT_HEADING).abs() < EPSILON);

        #[rustfmt::skip]
        let grid = grid_with([
            [inf, 5.0, 5.0],
            [5.0, 1.0, 5.0],
            [5.0, 5.0, 5.0],
        ]);
        let radians = check_plan(&grid, GridCell::new(2, 2));
        assert!((radians - FRAC_PI_2).abs() < EPSILON);
    }

    #[test]
    fn test_heading_west() {
        #[rustfmt::skip]
        let grid = grid_with([
            [1.0, 2.0, 3.0],
            [0.0, 1.0, 2.0],
            [1.0, 2.0, 3.0],
        ]);
        let radians = check_plan(&grid, GridCell::new(2, 2));
        assert!((radians.abs() - PI).abs() < EPSILON);
    }
}
