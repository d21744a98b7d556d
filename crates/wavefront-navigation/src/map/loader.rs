//! Text map bootstrap.
//!
//! A map file is a block of text, one line per grid row with the northernmost
//! row first. Character `j` of line `i` describes cell `(j, size - 1 - i)`:
//!
//! * `O` - obstacle
//! * `R` - robot start
//! * `G` - goal
//!
//! Anything else (spaces, dots, the border drawing) is free space.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::NavigationError;
use crate::map::{Grid, GridCell, OccupancyUpdate};

/// Everything a map file describes.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapLayout {
    /// Cells marked `O`.
    pub obstacles: Vec<GridCell>,
    /// Cell marked `R`, if any.
    pub robot: Option<GridCell>,
    /// Cell marked `G`, if any.
    pub goal: Option<GridCell>,
}

impl MapLayout {
    /// Marks every obstacle of the layout on `grid` and returns how many cells changed.
    pub fn apply(&self, grid: &mut Grid) -> usize {
        self.obstacles
            .iter()
            .filter(|&&cell| grid.set_occupied(cell, true))
            .count()
    }

    /// The obstacles of the layout as an occupancy update.
    pub fn to_occupancy_update(&self) -> OccupancyUpdate {
        self.obstacles.iter().map(|&cell| (cell, true)).collect()
    }
}

/// Parses map text for a `size × size` grid.
///
/// # Errors
/// Returns `NavigationError::MapFormat` if a marked cell falls outside the grid
/// or if the robot or goal appears more than once.
pub fn parse_map(text: &str, size: usize) -> Result<MapLayout, NavigationError> {
    let mut layout = MapLayout::default();

    for (line_no, line) in text.lines().enumerate() {
        for (column, ch) in line.chars().enumerate() {
            if !matches!(ch, 'O' | 'R' | 'G') {
                continue;
            }
            if line_no >= size || column >= size {
                return Err(NavigationError::MapFormat(format!(
                    "'{ch}' at line {}, column {} lies outside the {size}x{size} grid",
                    line_no + 1,
                    column + 1
                )));
            }
            let cell = GridCell::new(column, size - 1 - line_no);
            match ch {
                'O' => layout.obstacles.push(cell),
                'R' => place_once(&mut layout.robot, cell, "robot")?,
                _ => place_once(&mut layout.goal, cell, "goal")?,
            }
        }
    }

    Ok(layout)
}

fn place_once(
    slot: &mut Option<GridCell>,
    cell: GridCell,
    what: &str,
) -> Result<(), NavigationError> {
    if let Some(previous) = slot {
        return Err(NavigationError::MapFormat(format!(
            "{what} marked twice, at {previous} and {cell}"
        )));
    }
    *slot = Some(cell);
    Ok(())
}

/// Reads and parses the map file at `path`.
///
/// # Errors
/// Returns `NavigationError::MapLoad` if the file cannot be read, or the
/// errors of [`parse_map`].
pub fn load_map(path: impl AsRef<Path>, size: usize) -> Result<MapLayout, NavigationError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| NavigationError::MapLoad {
        path: path.to_path_buf(),
        source,
    })?;
    let layout = parse_map(&text, size)?;
    debug!(
        path = %path.display(),
        obstacles = layout.obstacles.len(),
        robot = ?layout.robot,
        goal = ?layout.goal,
        "Parsed map file"
    );
    Ok(layout)
}
