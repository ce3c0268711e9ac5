//! Tool nodes
//!
//! Terminal nodes that hand their inputs to the renderer.

mod view_1d;
mod view_2d;

pub use view_1d::View1dNode;
pub use view_2d::View2dNode;
