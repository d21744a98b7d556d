//! Fixed-capacity arena of queue nodes.
//!
//! All nodes are allocated once, when the planner is built, and recycled
//! through an intrusive free list. Planning never touches the allocator.

use crate::error::NavigationError;
use crate::map::GridCell;

/// Index of a node inside a [`NodePool`].
pub type NodeIndex = usize;

/// One open-list entry: a cell, its priority key, and the link to the next node
/// (in the open list while checked out, in the free list otherwise).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueNode {
    /// Scheduled cell.
    pub cell: GridCell,
    /// Priority key, the cell's cost when it was scheduled.
    pub key: f64,
    /// Next node in whichever chain this node belongs to.
    pub next: Option<NodeIndex>,
}

impl Default for QueueNode {
    fn default() -> Self {
        QueueNode {
            cell: GridCell::default(),
            key: 0.0,
            next: None,
        }
    }
}

/// Arena plus free list.
#[derive(Debug, Clone)]
pub struct NodePool {
    nodes: Vec<QueueNode>,
    free_head: Option<NodeIndex>,
    available: usize,
}

impl NodePool {
    /// Creates a pool with `capacity` free nodes.
    pub fn new(capacity: usize) -> Self {
        let mut pool = NodePool {
            nodes: vec![QueueNode::default(); capacity],
            free_head: None,
            available: 0,
        };
        pool.reset();
        pool
    }

    /// Returns every node to the free list, chained in index order.
    pub fn reset(&mut self) {
        let capacity = self.nodes.len();
        for (index, node) in self.nodes.iter_mut().enumerate() {
            *node = QueueNode {
                next: (index + 1 < capacity).then_some(index + 1),
                ..QueueNode::default()
            };
        }
        self.free_head = (capacity > 0).then_some(0);
        self.available = capacity;
    }

    /// Takes a node off the free list.
    ///
    /// # Errors
    /// Returns `NavigationError::PoolExhausted` if every node is checked out.
    pub fn checkout(&mut self) -> Result<NodeIndex, NavigationError> {
        let index = self.free_head.ok_or(NavigationError::PoolExhausted {
            capacity: self.nodes.len(),
        })?;
        self.free_head = self.nodes[index].next.take();
        self.available -= 1;
        Ok(index)
    }

    /// Puts a checked-out node back at the head of the free list.
    pub fn release(&mut self, index: NodeIndex) {
        debug_assert!(
            self.available < self.nodes.len(),
            "released more nodes than owned"
        );
        self.nodes[index].next = self.free_head;
        self.free_head = Some(index);
        self.available += 1;
    }

    /// Borrows a node.
    pub fn node(&self, index: NodeIndex) -> &QueueNode {
        &self.nodes[index]
    }

    /// Mutably borrows a node.
    pub fn node_mut(&mut self, index: NodeIndex) -> &mut QueueNode {
        &mut self.nodes[index]
    }

    /// Total number of nodes.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes on the free list.
    pub fn available(&self) -> usize {
        self.available
    }

    /// Nodes currently checked out.
    pub fn checked_out(&self) -> usize {
        self.nodes.len() - self.available
    }
}
