//! Open list of the wavefront and the node pool it draws from.

pub mod open_list;
pub mod pool;

pub use open_list::OpenList;
pub use pool::{NodeIndex, NodePool, QueueNode};
