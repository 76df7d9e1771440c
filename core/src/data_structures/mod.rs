//! Graph and matching state containers

pub mod assignment;
pub mod graph;

pub use self::assignment::AssignmentStore;
pub use self::graph::BipartiteGraph;
