//! Fluent builder for dataflow graphs
//!
//! Declares nodes by alias and links them by position; everything is
//! resolved against a [`NodeRegistry`] when [`GraphBuilder::build`] runs.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{EngineError, Result};
use crate::events::EventSink;
use crate::graph::Graph;
use crate::registry::NodeRegistry;
use crate::types::{NodeId, Value};

struct PendingNode {
    alias: String,
    template_id: String,
    label: Option<String>,
    payload: Value,
    statics: Vec<(usize, Value)>,
}

struct PendingLink {
    from: String,
    output: usize,
    to: String,
    input: usize,
}

/// Fluent builder for constructing graphs
///
/// # Example
///
/// ```ignore
/// let built = GraphBuilder::new(&registry)
///     .add_node("data", "data-set")
///     .with_payload(serde_json::json!([1.0, 2.0, 3.0]))
///     .add_node("shift", "data-shifter")
///     .with_static(0, serde_json::json!(10))
///     .link("data", 0, "shift", 0)
///     .build()?;
///
/// let mut graph = built.graph;
/// ```
pub struct GraphBuilder<'r> {
    registry: &'r NodeRegistry,
    nodes: Vec<PendingNode>,
    links: Vec<PendingLink>,
    events: Option<Arc<dyn EventSink>>,
}

/// A built graph with its alias table
pub struct BuiltGraph {
    pub graph: Graph,
    aliases: HashMap<String, NodeId>,
}

impl BuiltGraph {
    /// Node registered under `alias`
    pub fn id(&self, alias: &str) -> Result<NodeId> {
        self.aliases
            .get(alias)
            .copied()
            .ok_or_else(|| EngineError::UnknownAlias(alias.to_string()))
    }

    pub fn into_parts(self) -> (Graph, HashMap<String, NodeId>) {
        (self.graph, self.aliases)
    }
}

impl<'r> GraphBuilder<'r> {
    pub fn new(registry: &'r NodeRegistry) -> Self {
        Self {
            registry,
            nodes: Vec::new(),
            links: Vec::new(),
            events: None,
        }
    }

    /// Report the built graph's events to `events`
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    /// Declare a node with a null payload
    pub fn add_node(mut self, alias: impl Into<String>, template_id: impl Into<String>) -> Self {
        self.nodes.push(PendingNode {
            alias: alias.into(),
            template_id: template_id.into(),
            label: None,
            payload: Value::Null,
            statics: Vec::new(),
        });
        self
    }

    /// Set the payload of the most recently declared node
    pub fn with_payload(mut self, payload: Value) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.payload = payload;
        }
        self
    }

    /// Override the label of the most recently declared node
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.label = Some(label.into());
        }
        self
    }

    /// Set a static of the most recently declared node
    pub fn with_static(mut self, index: usize, value: Value) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.statics.push((index, value));
        }
        self
    }

    /// Link output `output` of `from` to input `input` of `to`
    pub fn link(
        mut self,
        from: impl Into<String>,
        output: usize,
        to: impl Into<String>,
        input: usize,
    ) -> Self {
        self.links.push(PendingLink {
            from: from.into(),
            output,
            to: to.into(),
            input,
        });
        self
    }

    /// Create, register and link everything declared
    pub fn build(self) -> Result<BuiltGraph> {
        let mut graph = match self.events {
            Some(events) => Graph::with_event_sink(events),
            None => Graph::new(),
        };
        let mut aliases = HashMap::new();

        for pending in self.nodes {
            if aliases.contains_key(&pending.alias) {
                return Err(EngineError::DuplicateAlias(pending.alias));
            }
            let node = match pending.label {
                Some(label) => {
                    self.registry
                        .create_labeled(&pending.template_id, label, pending.payload)?
                }
                None => self.registry.create(&pending.template_id, pending.payload)?,
            };
            let statics = pending
                .statics
                .iter()
                .map(|(index, value)| Ok((node.static_id(*index)?, value.clone())))
                .collect::<Result<Vec<_>>>()?;

            let id = graph.add_node(node);
            for (attribute, value) in statics {
                graph.set_static(attribute, value)?;
            }
            aliases.insert(pending.alias, id);
        }

        for link in self.links {
            let from = resolve(&aliases, &link.from)?;
            let to = resolve(&aliases, &link.to)?;
            let output = graph
                .node(from)
                .ok_or(EngineError::UnknownNode(from))?
                .output_id(link.output)?;
            let input = graph
                .node(to)
                .ok_or(EngineError::UnknownNode(to))?
                .input_id(link.input)?;
            graph.link(output, input)?;
        }

        Ok(BuiltGraph { graph, aliases })
    }
}

fn resolve(aliases: &HashMap<String, NodeId>, alias: &str) -> Result<NodeId> {
    aliases
        .get(alias)
        .copied()
        .ok_or_else(|| EngineError::UnknownAlias(alias.to_string()))
}
