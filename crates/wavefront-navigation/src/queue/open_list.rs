//! Priority-ordered open list of the wavefront.
//!
//! A singly linked chain of pool nodes kept sorted by ascending key. Insertion
//! walks the chain (linear in its length); removing the minimum is constant
//! time. Equal keys are served in insertion order.

use std::iter;

use crate::error::NavigationError;
use crate::map::{Grid, GridCell};
use crate::queue::pool::{NodeIndex, NodePool};

/// Sorted open list backed by a [`NodePool`].
#[derive(Debug, Clone)]
pub struct OpenList {
    pool: NodePool,
    head: Option<NodeIndex>,
    len: usize,
}

impl OpenList {
    /// Creates an empty list able to hold `capacity` cells at once.
    pub fn new(capacity: usize) -> Self {
        OpenList {
            pool: NodePool::new(capacity),
            head: None,
            len: 0,
        }
    }

    /// Schedules `cell` with priority `key`.
    ///
    /// Does nothing and returns `Ok(false)` if the cell is already scheduled on
    /// `grid`. Otherwise the cell is linked in front of the first node with a
    /// strictly greater key, flagged as scheduled, and `Ok(true)` is returned.
    ///
    /// # Errors
    /// Returns `NavigationError::PoolExhausted` if no node is left.
    pub fn insert(
        &mut self,
        grid: &mut Grid,
        cell: GridCell,
        key: f64,
    ) -> Result<bool, NavigationError> {
        if grid.is_scheduled(cell) {
            return Ok(false);
        }
        let index = self.pool.checkout()?;

        let mut previous = None;
        let mut current = self.head;
        while let Some(at) = current {
            let node = self.pool.node(at);
            if node.key > key {
                break;
            }
            previous = current;
            current = node.next;
        }

        let node = self.pool.node_mut(index);
        node.cell = cell;
        node.key = key;
        node.next = current;
        match previous {
            Some(at) => self.pool.node_mut(at).next = Some(index),
            None => self.head = Some(index),
        }

        grid.set_scheduled(cell, true);
        self.len += 1;
        Ok(true)
    }

    /// Removes and returns the lowest-key cell with its key.
    ///
    /// The cell's scheduled flag is left set, so it cannot re-enter the list
    /// during the same planning pass.
    pub fn pop_min(&mut self) -> Option<(GridCell, f64)> {
        let index = self.head?;
        let node = *self.pool.node(index);
        self.head = node.next;
        self.pool.release(index);
        self.len -= 1;
        Some((node.cell, node.key))
    }

    /// Key of the lowest entry without removing it.
    pub fn peek_key(&self) -> Option<f64> {
        self.head.map(|index| self.pool.node(index).key)
    }

    /// Keys in list order.
    pub fn keys(&self) -> impl Iterator<Item = f64> + '_ {
        self.chain().map(|index| self.pool.node(index).key)
    }

    /// Cells in list order.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        self.chain().map(|index| self.pool.node(index).cell)
    }

    fn chain(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        iter::successors(self.head, |&index| self.pool.node(index).next)
    }

    /// Number of scheduled entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Drops every entry and returns all nodes to the pool.
    /// Scheduled flags on the grid are not touched.
    pub fn clear(&mut self) {
        self.pool.reset();
        self.head = None;
        self.len = 0;
    }

    /// The backing pool.
    pub fn pool(&self) -> &NodePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(x: usize, y: usize) -> GridCell {
        GridCell::new(x, y)
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut grid = Grid::new(6).unwrap();
        let mut open = OpenList::new(grid.capacity());
        for (c, key) in [
            (cell(1, 1), 3.0),
            (cell(2, 1), 1.0),
            (cell(3, 1), 2.0),
            (cell(4, 1), 0.5),
        ] {
            assert!(open.insert(&mut grid, c, key).unwrap());
        }
        assert_eq!(open.keys().collect::<Vec<_>>(), vec![0.5, 1.0, 2.0, 3.0]);
        assert_eq!(open.len(), 4);
        assert_eq!(open.peek_key(), Some(0.5));
        assert!(grid.is_scheduled(cell(3, 1)));
    }

    #[test]
    fn test_equal_keys_are_fifo() {
        let mut grid = Grid::new(6).unwrap();
        let mut open = OpenList::new(grid.capacity());
        open.insert(&mut grid, cell(1, 1), 1.0).unwrap();
        open.insert(&mut grid, cell(2, 2), 2.0).unwrap();
        open.insert(&mut grid, cell(3, 3), 1.0).unwrap();
        assert_eq!(
            open.cells().collect::<Vec<_>>(),
            vec![cell(1, 1), cell(3, 3), cell(2, 2)]
        );
    }

    #[test]
    fn test_scheduled_cell_is_ignored() {
        let mut grid = Grid::new(5).unwrap();
        let mut open = OpenList::new(grid.capacity());
        assert!(open.insert(&mut grid, cell(2, 2), 4.0).unwrap());
        assert!(!open.insert(&mut grid, cell(2, 2), 1.0).unwrap());
        // Border cells are scheduled from construction.
        assert!(!open.insert(&mut grid, cell(0, 3), 0.0).unwrap());
        assert_eq!(open.len(), 1);
        assert_eq!(open.pool().checked_out(), 1);
    }

    #[test]
    fn test_pop_min_keeps_scheduled_flag() {
        let mut grid = Grid::new(5).unwrap();
        let mut open = OpenList::new(grid.capacity());
        open.insert(&mut grid, cell(1, 2), 2.0).unwrap();
        open.insert(&mut grid, cell(2, 2), 1.0).unwrap();

        assert_eq!(open.pop_min(), Some((cell(2, 2), 1.0)));
        assert!(grid.is_scheduled(cell(2, 2)));
        assert!(!open.insert(&mut grid, cell(2, 2), 0.0).unwrap());

        assert_eq!(open.pop_min(), Some((cell(1, 2), 2.0)));
        assert_eq!(open.pop_min(), None);
        assert!(open.is_empty());
        assert_eq!(open.pool().checked_out(), 0);
    }

    #[test]
    fn test_exhaustion_surfaces_as_error() {
        let mut grid = Grid::new(5).unwrap();
        let mut open = OpenList::new(2);
        open.insert(&mut grid, cell(1, 1), 1.0).unwrap();
        open.insert(&mut grid, cell(1, 2), 1.0).unwrap();
        assert!(matches!(
            open.insert(&mut grid, cell(1, 3), 1.0),
            Err(NavigationError::PoolExhausted { capacity: 2 })
        ));
        assert!(!grid.is_scheduled(cell(1, 3)));
    }

    #[test]
    fn test_clear() {
        let mut grid = Grid::new(5).unwrap();
        let mut open = OpenList::new(grid.capacity());
        open.insert(&mut grid, cell(1, 1), 1.0).unwrap();
        open.clear();
        assert!(open.is_empty());
        assert_eq!(open.len(), 0);
        assert_eq!(open.pool().available(), 25);
    }
}
