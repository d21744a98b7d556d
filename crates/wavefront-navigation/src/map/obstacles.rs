//! Registry of obstacles reported by sensing, kept apart from the grid so that
//! points can be queried and retracted before they are rasterized.

use crate::map::{Grid, GridCell, OccupancyUpdate};

/// A reported obstacle position in cell coordinates.
///
/// Coordinates are signed because sensors can report points off the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObstaclePoint {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl ObstaclePoint {
    /// Creates a point.
    pub const fn new(x: i32, y: i32) -> Self {
        ObstaclePoint { x, y }
    }

    /// The grid cell this point falls in, if it lies on `grid`.
    pub fn to_cell(&self, grid: &Grid) -> Option<GridCell> {
        let cell = GridCell::new(usize::try_from(self.x).ok()?, usize::try_from(self.y).ok()?);
        grid.contains(cell).then_some(cell)
    }
}

/// Unordered collection of obstacle points. Duplicates are allowed.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObstacleList {
    points: Vec<ObstaclePoint>,
}

impl ObstacleList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an obstacle at `(x, y)`.
    pub fn add(&mut self, x: i32, y: i32) {
        self.points.push(ObstaclePoint::new(x, y));
    }

    /// Removes the first obstacle recorded at exactly `(x, y)`.
    /// Returns `false` if none was found.
    pub fn remove(&mut self, x: i32, y: i32) -> bool {
        match self.points.iter().position(|p| p.x == x && p.y == y) {
            Some(index) => {
                self.points.remove(index);
                true
            }
            None => false,
        }
    }

    /// True if any obstacle lies within the square of half-width `range` around `(x, y)`.
    pub fn nearby(&self, x: i32, y: i32, range: u32) -> bool {
        let range = i64::from(range);
        self.points.iter().any(|p| {
            (i64::from(p.x) - i64::from(x)).abs() <= range
                && (i64::from(p.y) - i64::from(y)).abs() <= range
        })
    }

    /// True if an obstacle is recorded at exactly `(x, y)`.
    pub fn is_obstacle(&self, x: i32, y: i32) -> bool {
        self.nearby(x, y, 0)
    }

    /// Iterates over the recorded points in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ObstaclePoint> {
        self.points.iter()
    }

    /// Number of recorded points, duplicates included.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Forgets every point.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Converts the points that fall on `grid` into an occupancy update.
    /// Points off the grid are dropped.
    pub fn to_occupancy_update(&self, grid: &Grid) -> OccupancyUpdate {
        self.points
            .iter()
            .filter_map(|p| p.to_cell(grid))
            .map(|cell| (cell, true))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_remove() {
        let mut list = ObstacleList::new();
        assert!(list.is_empty());
        list.add(3, 4);
        list.add(3, 4);
        list.add(7, 1);
        assert_eq!(list.len(), 3);

        assert!(list.remove(3, 4));
        assert_eq!(list.len(), 2);
        assert!(
            list.is_obstacle(3, 4),
            "duplicate survives a single removal"
        );
        assert!(list.remove(3, 4));
        assert!(!list.remove(3, 4));
        assert!(!list.is_obstacle(3, 4));

        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn test_nearby_is_inclusive_square() {
        let mut list = ObstacleList::new();
        list.add(5, 5);
        assert!(list.nearby(7, 7, 2));
        assert!(list.nearby(3, 6, 2));
        assert!(!list.nearby(8, 5, 2));
        assert!(list.nearby(5, 5, 0));
        assert!(!ObstacleList::new().nearby(0, 0, 100));
    }

    #[test]
    fn test_to_occupancy_update_drops_off_grid_points() {
        let grid = Grid::new(6).unwrap();
        let mut list = ObstacleList::new();
        list.add(2, 3);
        list.add(-1, 3);
        list.add(6, 0);
        list.add(4, 4);
        let update = list.to_occupancy_update(&grid);
        assert_eq!(
            update,
            vec![(GridCell::new(2, 3), true), (GridCell::new(4, 4), true)]
        );
        assert_eq!(list.iter().count(), 4);
    }
}
