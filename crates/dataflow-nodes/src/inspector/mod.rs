//! Inspector nodes
//!
//! Nodes that summarize data.

mod min_max;

pub use min_max::MinMaxNode;
