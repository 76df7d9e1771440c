//! Assignment resolver algorithm framework
//!
//! Typed indices, the `Algorithm` trait, and the bipartite matching
//! algorithms built on them.

pub mod traits;
pub mod graph;

pub use self::traits::*;
pub use self::graph::*;
