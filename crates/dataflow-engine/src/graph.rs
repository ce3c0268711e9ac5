//! The editor graph: node registration, links and manual execution
//!
//! The [`Graph`] owns every node (and through them every attribute) in an
//! insertion-ordered arena. Links are stored on the attributes themselves
//! (child ids on outputs, parent id on inputs); the graph is the only code
//! that creates or removes them, so both sides always agree.
//!
//! # Execution
//!
//! Execution is manual and one hop deep. [`Graph::execute`] runs a single
//! node's computation, stores each produced value on its output and
//! delivers it to every linked input, output by output and child by child
//! in link-creation order. Downstream nodes are not executed; they keep
//! whatever their inputs hold until triggered themselves.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{EngineError, Result};
use crate::events::{EventSink, GraphEvent, NullEventSink};
use crate::node::Node;
use crate::types::{AttributeId, AttributeKind, Link, NodeId, Value};
use crate::view::NodeView;

/// Where an attribute lives
#[derive(Debug, Clone, Copy)]
struct AttributeSlot {
    node: NodeId,
    kind: AttributeKind,
    index: usize,
}

/// Outcome of a successful [`Graph::execute`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    pub node_id: NodeId,
    /// Number of outputs that received a value
    pub outputs_produced: usize,
    /// Number of input attributes that received a value
    pub deliveries: usize,
}

/// Mutable collection of nodes and links for one canvas
pub struct Graph {
    nodes: Vec<Node>,
    node_index: HashMap<NodeId, usize>,
    attributes: HashMap<AttributeId, AttributeSlot>,
    events: Arc<dyn EventSink>,
}

impl Graph {
    /// Create an empty graph that discards its events
    pub fn new() -> Self {
        Self::with_event_sink(Arc::new(NullEventSink))
    }

    /// Create an empty graph reporting to `events`
    pub fn with_event_sink(events: Arc<dyn EventSink>) -> Self {
        Self {
            nodes: Vec::new(),
            node_index: HashMap::new(),
            attributes: HashMap::new(),
            events,
        }
    }

    /// Replace the event sink
    pub fn set_event_sink(&mut self, events: Arc<dyn EventSink>) {
        self.events = events;
    }

    /// Register a constructed node; creates no links
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let node_id = node.id();
        for (attribute, kind, index) in node.attribute_slots() {
            self.attributes.insert(
                attribute,
                AttributeSlot {
                    node: node_id,
                    kind,
                    index,
                },
            );
        }

        log::debug!(
            "Graph: added node '{}' ({}) as {}",
            node.label(),
            node.template_id(),
            node_id
        );
        let event = GraphEvent::NodeAdded {
            node_id,
            label: node.label().to_string(),
            template_id: node.template_id().to_string(),
        };

        self.node_index.insert(node_id, self.nodes.len());
        self.nodes.push(node);
        self.emit(event);
        node_id
    }

    /// Link an output attribute to an input attribute
    ///
    /// Both handles must belong to nodes registered in this graph. Fails with
    /// `InputAlreadyLinked` if the input already has a parent; the graph is
    /// left unchanged on every error.
    pub fn link(&mut self, output: AttributeId, input: AttributeId) -> Result<()> {
        let out_slot = self.slot_of_kind(output, AttributeKind::Output)?;
        let in_slot = self.slot_of_kind(input, AttributeKind::Input)?;
        let out_pos = self.position(out_slot.node)?;
        let in_pos = self.position(in_slot.node)?;

        if out_pos == in_pos {
            let (out_attr, in_attr) = self.nodes[out_pos]
                .output_and_input_mut(out_slot.index, in_slot.index)
                .ok_or(EngineError::UnknownAttribute(output))?;
            out_attr.attach(in_attr)?;
        } else {
            let (out_node, in_node) = pair_mut(&mut self.nodes, out_pos, in_pos);
            let out_attr = out_node
                .output_mut(out_slot.index)
                .ok_or(EngineError::UnknownAttribute(output))?;
            let in_attr = in_node
                .input_mut(in_slot.index)
                .ok_or(EngineError::UnknownAttribute(input))?;
            out_attr.attach(in_attr)?;
        }

        log::debug!("Graph: linked {} -> {}", output, input);
        self.emit(GraphEvent::LinkCreated { output, input });
        Ok(())
    }

    /// Remove the incoming link of `input`, returning the former parent
    ///
    /// The input keeps its last delivered value.
    pub fn unlink(&mut self, input: AttributeId) -> Result<AttributeId> {
        let in_slot = self.slot_of_kind(input, AttributeKind::Input)?;
        let in_pos = self.position(in_slot.node)?;
        let parent = self.nodes[in_pos]
            .inputs()
            .get(in_slot.index)
            .and_then(|attr| attr.parent())
            .ok_or(EngineError::NotLinked(input))?;

        self.detach_child(parent, input);
        if let Some(attr) = self.nodes[in_pos].input_mut(in_slot.index) {
            attr.clear_parent();
        }

        log::debug!("Graph: unlinked {} -> {}", parent, input);
        self.emit(GraphEvent::LinkRemoved {
            output: parent,
            input,
        });
        Ok(parent)
    }

    /// Remove a node, detaching every link that touches it
    pub fn remove_node(&mut self, node_id: NodeId) -> Result<Node> {
        let pos = self.position(node_id)?;

        let incoming: Vec<(AttributeId, AttributeId)> = self.nodes[pos]
            .inputs()
            .iter()
            .filter_map(|input| input.parent().map(|parent| (input.id(), parent)))
            .collect();
        let outgoing: Vec<(AttributeId, AttributeId)> = self.nodes[pos]
            .outputs()
            .iter()
            .flat_map(|output| {
                output
                    .children()
                    .iter()
                    .map(move |child| (output.id(), *child))
            })
            .collect();

        let mut removed_links = Vec::new();
        for (input, parent) in incoming {
            self.detach_child(parent, input);
            removed_links.push(Link::new(parent, input));
        }
        for (output, child) in outgoing {
            let Some(slot) = self.attributes.get(&child).copied() else {
                continue;
            };
            // Self-links were already handled as incoming links
            if slot.node == node_id {
                continue;
            }
            if let Some(child_pos) = self.node_index.get(&slot.node).copied() {
                if let Some(attr) = self.nodes[child_pos].input_mut(slot.index) {
                    attr.clear_parent();
                }
            }
            removed_links.push(Link::new(output, child));
        }

        let mut node = self.nodes.remove(pos);
        for (attribute, _, _) in node.attribute_slots() {
            self.attributes.remove(&attribute);
        }
        clear_links(&mut node);
        self.rebuild_node_index();

        for link in removed_links {
            self.emit(GraphEvent::LinkRemoved {
                output: link.output,
                input: link.input,
            });
        }
        log::debug!("Graph: removed node '{}' ({})", node.label(), node_id);
        self.emit(GraphEvent::NodeRemoved { node_id });
        Ok(node)
    }

    /// Discard every node, attribute and link
    pub fn reset(&mut self) {
        let count = self.nodes.len();
        self.nodes.clear();
        self.node_index.clear();
        self.attributes.clear();
        log::info!("Graph: reset ({} nodes discarded)", count);
        self.emit(GraphEvent::GraphReset);
    }

    /// Run one node and push its results one hop downstream
    ///
    /// Returns `UnknownNode` for handles not registered here, including
    /// every node discarded by [`Graph::reset`]. A computation fault is
    /// returned as-is and leaves every attribute in the graph untouched.
    pub fn execute(&mut self, node_id: NodeId) -> Result<ExecutionReport> {
        let pos = self.position(node_id)?;

        let values = match self.nodes[pos].compute(self.events.as_ref()) {
            Ok(values) => values,
            Err(e) => {
                log::warn!("Node '{}' failed: {}", self.nodes[pos].label(), e);
                self.emit(GraphEvent::NodeFailed {
                    node_id,
                    error: e.to_string(),
                });
                return Err(e);
            }
        };

        let outputs_produced = values.len();
        let mut deliveries = 0;
        for (index, value) in values.into_iter().enumerate() {
            let (output, children) = match self.nodes[pos].output_mut(index) {
                Some(output) => (output.id(), output.produce(value.clone()).to_vec()),
                None => continue,
            };
            deliveries += self.deliver_all(output, &children, &value);
        }

        let node = &mut self.nodes[pos];
        node.mark_executed();
        log::debug!(
            "Node '{}' executed: {} outputs, {} deliveries",
            node.label(),
            outputs_produced,
            deliveries
        );

        self.emit(GraphEvent::NodeExecuted {
            node_id,
            outputs_produced,
            deliveries,
        });
        Ok(ExecutionReport {
            node_id,
            outputs_produced,
            deliveries,
        })
    }

    /// Store `value` on an output and deliver it to its children
    ///
    /// Returns the number of inputs that received the value.
    pub fn produce(&mut self, output: AttributeId, value: Value) -> Result<usize> {
        let slot = self.slot_of_kind(output, AttributeKind::Output)?;
        let pos = self.position(slot.node)?;
        let children = self.nodes[pos]
            .output_mut(slot.index)
            .ok_or(EngineError::UnknownAttribute(output))?
            .produce(value.clone())
            .to_vec();
        Ok(self.deliver_all(output, &children, &value))
    }

    /// Current value of any attribute; `Ok(None)` when absent
    pub fn value(&self, attribute: AttributeId) -> Result<Option<&Value>> {
        let slot = self.slot(attribute)?;
        let node = self.node(slot.node).ok_or(EngineError::UnknownNode(slot.node))?;
        let value = match slot.kind {
            AttributeKind::Input => node.inputs().get(slot.index).and_then(|a| a.value()),
            AttributeKind::Static => node.statics().get(slot.index).map(|a| a.value()),
            AttributeKind::Output => node.outputs().get(slot.index).and_then(|a| a.value()),
        };
        Ok(value)
    }

    /// Write a static configuration value
    pub fn set_static(&mut self, attribute: AttributeId, value: Value) -> Result<()> {
        let slot = self.slot_of_kind(attribute, AttributeKind::Static)?;
        let pos = self.position(slot.node)?;
        let attr = self.nodes[pos]
            .static_mut(slot.index)
            .ok_or(EngineError::UnknownAttribute(attribute))?;
        log::debug!("Graph: static '{}' set to {}", attr.label(), value);
        attr.set(value);
        Ok(())
    }

    /// Kind of a registered attribute
    pub fn attribute_kind(&self, attribute: AttributeId) -> Result<AttributeKind> {
        self.slot(attribute).map(|slot| slot.kind)
    }

    /// Node owning a registered attribute
    pub fn owner(&self, attribute: AttributeId) -> Result<NodeId> {
        self.slot(attribute).map(|slot| slot.node)
    }

    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.node_index.get(&node_id).map(|pos| &self.nodes[*pos])
    }

    /// Node at an insertion position
    pub fn node_at(&self, position: usize) -> Option<&Node> {
        self.nodes.get(position)
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_node(&self, node_id: NodeId) -> bool {
        self.node_index.contains_key(&node_id)
    }

    /// Every link, by output insertion order then child order
    pub fn links(&self) -> Vec<Link> {
        self.nodes
            .iter()
            .flat_map(|node| node.outputs())
            .flat_map(|output| {
                output
                    .children()
                    .iter()
                    .map(move |child| Link::new(output.id(), *child))
            })
            .collect()
    }

    /// Snapshot of every node for the canvas
    pub fn views(&self) -> Vec<NodeView> {
        self.nodes.iter().map(Node::view).collect()
    }

    fn slot(&self, attribute: AttributeId) -> Result<AttributeSlot> {
        self.attributes
            .get(&attribute)
            .copied()
            .ok_or(EngineError::UnknownAttribute(attribute))
    }

    fn slot_of_kind(&self, attribute: AttributeId, expected: AttributeKind) -> Result<AttributeSlot> {
        let slot = self.slot(attribute)?;
        if slot.kind != expected {
            return Err(EngineError::WrongAttributeKind {
                id: attribute,
                expected,
                actual: slot.kind,
            });
        }
        Ok(slot)
    }

    fn position(&self, node_id: NodeId) -> Result<usize> {
        self.node_index
            .get(&node_id)
            .copied()
            .ok_or(EngineError::UnknownNode(node_id))
    }

    fn deliver_all(
        &mut self,
        output: AttributeId,
        children: &[AttributeId],
        value: &Value,
    ) -> usize {
        let mut delivered = 0;
        for child in children {
            let Some(slot) = self.attributes.get(child).copied() else {
                log::warn!("Graph: dangling child {} skipped", child);
                continue;
            };
            let Some(pos) = self.node_index.get(&slot.node).copied() else {
                continue;
            };
            if let Some(input) = self.nodes[pos].input_mut(slot.index) {
                input.deliver(value.clone());
                delivered += 1;
                self.emit(GraphEvent::ValueDelivered {
                    output,
                    input: *child,
                });
            }
        }
        delivered
    }

    fn detach_child(&mut self, output: AttributeId, input: AttributeId) {
        let Some(slot) = self.attributes.get(&output).copied() else {
            return;
        };
        if let Some(pos) = self.node_index.get(&slot.node).copied() {
            if let Some(attr) = self.nodes[pos].output_mut(slot.index) {
                attr.detach(input);
            }
        }
    }

    fn rebuild_node_index(&mut self) {
        self.node_index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(pos, node)| (node.id(), pos))
            .collect();
    }

    fn emit(&self, event: GraphEvent) {
        if let Err(e) = self.events.send(event) {
            log::warn!("Graph: event dropped: {}", e);
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrow two distinct elements mutably
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

/// Drop link state from a node that has left the graph
fn clear_links(node: &mut Node) {
    for index in 0..node.inputs().len() {
        if let Some(input) = node.input_mut(index) {
            input.clear_parent();
        }
    }
    for index in 0..node.outputs().len() {
        if let Some(output) = node.output_mut(index) {
            let children = output.children().to_vec();
            for child in children {
                output.detach(child);
            }
        }
    }
}
