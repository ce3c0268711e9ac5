//! Source nodes
//!
//! Nodes that feed data into the graph.

mod data_set;

pub use data_set::DataSetNode;
