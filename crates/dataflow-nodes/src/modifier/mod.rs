//! Modifier nodes
//!
//! Nodes that transform data.

mod data_shifter;

pub use data_shifter::DataShifterNode;
