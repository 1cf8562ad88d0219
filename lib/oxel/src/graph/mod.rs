//! Graphs and relations backing the classifier status and its results.

mod bidirectional;
mod hierarchy;
mod relation;
mod subsumer;

pub use bidirectional::BidirectionalGraph;
pub use hierarchy::HierarchicalGraph;
pub use relation::{BinaryRelation, RelationMap};
pub use subsumer::{SubsumerGraph, Subsumers};
