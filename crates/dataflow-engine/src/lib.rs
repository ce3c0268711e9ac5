//! Dataflow Engine - push-based node graphs with manual execution
//!
//! This crate provides the core of a small visual dataflow editor: nodes
//! with ordered input, static and output attributes, links from outputs to
//! inputs, and a graph that executes one node at a time. It supports:
//!
//! - Fan-out links (an output feeds any number of inputs, an input has at
//!   most one parent)
//! - One-hop propagation: executing a node delivers its results to directly
//!   linked inputs and nothing further
//! - Live re-wiring (link, unlink, node removal, reset) with fault isolation
//! - Template registration via `inventory` and a palette catalog
//!
//! # Architecture
//!
//! - `Graph`: arena owning every node and attribute; sole authority over links
//! - `NodeRegistry`: template id + payload -> fresh `Node`
//! - `Palette`: catalog of `(label, template_id, payload)` entries
//! - `EventSink`: generic event streaming to whatever renders the graph
//!
//! # Example
//!
//! ```ignore
//! use dataflow_engine::{Graph, NodeRegistry};
//!
//! let registry = NodeRegistry::with_builtins();
//! let mut graph = Graph::new();
//!
//! let data = graph.add_node(registry.create("data-set", serde_json::json!([1.0, 2.0]))?);
//! let min_max = graph.add_node(registry.create("min-max", serde_json::Value::Null)?);
//!
//! let out = graph.node(data).unwrap().output_id(0)?;
//! let input = graph.node(min_max).unwrap().input_id(0)?;
//! graph.link(out, input)?;
//!
//! graph.execute(data)?;
//! graph.execute(min_max)?;
//! ```

pub mod attribute;
pub mod builder;
pub mod descriptor;
pub mod error;
pub mod events;
pub mod graph;
pub mod node;
pub mod palette;
pub mod registry;
pub mod types;
pub mod view;

// Re-export key types
pub use attribute::{InputAttribute, OutputAttribute, StaticAttribute};
pub use builder::{BuiltGraph, GraphBuilder};
pub use descriptor::{
    PayloadShape, PortMetadata, StaticMetadata, TemplateDescriptor, TemplateFn, TemplateMetadata,
};
pub use error::{EngineError, ErrorKind, Result};
pub use events::{DisplayUpdate, EventError, EventSink, GraphEvent, NullEventSink, VecEventSink};
pub use graph::{ExecutionReport, Graph};
pub use node::{ComputeContext, Node, NodeBehavior};
pub use palette::{Palette, PaletteEntry, PaletteSection};
pub use registry::{NodeFactory, NodeRegistry};
pub use types::{AttributeId, AttributeKind, Link, NodeId, TemplateCategory, Value};
pub use view::{AttributeView, NodeView, NOT_CALCULATED};
