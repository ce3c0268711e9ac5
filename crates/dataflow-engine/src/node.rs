//! Nodes and the compute interface
//!
//! A [`Node`] owns its attributes in three positional sequences and a boxed
//! [`NodeBehavior`] that performs the node-specific computation. Behaviors
//! never touch attributes directly: they read through a [`ComputeContext`]
//! and return one value per output, which the graph then propagates.

use std::fmt;

use crate::attribute::{InputAttribute, OutputAttribute, StaticAttribute};
use crate::error::{EngineError, Result};
use crate::events::{DisplayUpdate, EventSink, GraphEvent};
use crate::types::{AttributeId, AttributeKind, NodeId, Value};
use crate::view::{AttributeView, NodeView};

/// Node-specific computation
///
/// Implementations must return exactly one value per output attribute, in
/// output order. Returning an error leaves every attribute untouched.
pub trait NodeBehavior: Send + Sync {
    fn compute(&self, ctx: &ComputeContext<'_>) -> Result<Vec<Value>>;
}

/// Read-only view of a node handed to its behavior during execution
pub struct ComputeContext<'a> {
    node_id: NodeId,
    label: &'a str,
    payload: &'a Value,
    inputs: &'a [InputAttribute],
    statics: &'a [StaticAttribute],
    events: &'a dyn EventSink,
}

impl<'a> ComputeContext<'a> {
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn label(&self) -> &str {
        self.label
    }

    /// Payload captured when the node was created
    pub fn payload(&self) -> &Value {
        self.payload
    }

    /// Current value of the input at `index`; `None` when absent or out of range
    pub fn input(&self, index: usize) -> Option<&Value> {
        self.inputs.get(index).and_then(|input| input.value())
    }

    /// Label of the input at `index`
    pub fn input_label(&self, index: usize) -> &str {
        self.inputs
            .get(index)
            .map(|input| input.label())
            .unwrap_or("?")
    }

    /// Current value of the input at `index`, or a `MissingInput` fault
    pub fn require_input(&self, index: usize) -> Result<&Value> {
        self.input(index).ok_or_else(|| EngineError::MissingInput {
            node: self.label.to_string(),
            port: self.input_label(index).to_string(),
        })
    }

    /// Configuration value of the static at `index`
    pub fn static_value(&self, index: usize) -> Option<&Value> {
        self.statics.get(index).map(|s| s.value())
    }

    /// Label of the static at `index`
    pub fn static_label(&self, index: usize) -> &str {
        self.statics.get(index).map(|s| s.label()).unwrap_or("?")
    }

    /// Hand values to the rendering collaborator
    pub fn display(&self, update: DisplayUpdate) {
        let event = GraphEvent::Display {
            node_id: self.node_id,
            update,
        };
        if let Err(e) = self.events.send(event) {
            log::warn!("Node '{}': display update dropped: {}", self.label, e);
        }
    }
}

/// An addressable unit of computation with ordered attributes
pub struct Node {
    id: NodeId,
    label: String,
    template_id: String,
    payload: Value,
    inputs: Vec<InputAttribute>,
    statics: Vec<StaticAttribute>,
    outputs: Vec<OutputAttribute>,
    behavior: Box<dyn NodeBehavior>,
    executed: bool,
}

impl Node {
    /// Create a node with no attributes
    pub fn new(
        label: impl Into<String>,
        template_id: impl Into<String>,
        payload: Value,
        behavior: Box<dyn NodeBehavior>,
    ) -> Self {
        Self {
            id: NodeId::new(),
            label: label.into(),
            template_id: template_id.into(),
            payload,
            inputs: Vec::new(),
            statics: Vec::new(),
            outputs: Vec::new(),
            behavior,
            executed: false,
        }
    }

    /// Append an input attribute
    pub fn add_input(&mut self, label: impl Into<String>) -> AttributeId {
        let attribute = InputAttribute::new(label);
        let id = attribute.id();
        self.inputs.push(attribute);
        id
    }

    /// Append a static attribute holding `default`
    pub fn add_static(&mut self, label: impl Into<String>, default: Value) -> AttributeId {
        let attribute = StaticAttribute::new(label, default);
        let id = attribute.id();
        self.statics.push(attribute);
        id
    }

    /// Append an output attribute
    pub fn add_output(&mut self, label: impl Into<String>) -> AttributeId {
        let attribute = OutputAttribute::new(label);
        let id = attribute.id();
        self.outputs.push(attribute);
        id
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn inputs(&self) -> &[InputAttribute] {
        &self.inputs
    }

    pub fn statics(&self) -> &[StaticAttribute] {
        &self.statics
    }

    pub fn outputs(&self) -> &[OutputAttribute] {
        &self.outputs
    }

    /// Whether the node has completed at least one execution
    pub fn is_executed(&self) -> bool {
        self.executed
    }

    /// Handle of the attribute at a position
    pub fn attribute_id(&self, kind: AttributeKind, index: usize) -> Result<AttributeId> {
        let id = match kind {
            AttributeKind::Input => self.inputs.get(index).map(|a| a.id()),
            AttributeKind::Static => self.statics.get(index).map(|a| a.id()),
            AttributeKind::Output => self.outputs.get(index).map(|a| a.id()),
        };
        id.ok_or_else(|| EngineError::NoSuchPort {
            node: self.label.clone(),
            kind,
            index,
        })
    }

    pub fn input_id(&self, index: usize) -> Result<AttributeId> {
        self.attribute_id(AttributeKind::Input, index)
    }

    pub fn static_id(&self, index: usize) -> Result<AttributeId> {
        self.attribute_id(AttributeKind::Static, index)
    }

    pub fn output_id(&self, index: usize) -> Result<AttributeId> {
        self.attribute_id(AttributeKind::Output, index)
    }

    /// Every attribute handle with its kind and position
    pub fn attribute_slots(&self) -> impl Iterator<Item = (AttributeId, AttributeKind, usize)> + '_ {
        let inputs = self
            .inputs
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id(), AttributeKind::Input, i));
        let statics = self
            .statics
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id(), AttributeKind::Static, i));
        let outputs = self
            .outputs
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id(), AttributeKind::Output, i));
        inputs.chain(statics).chain(outputs)
    }

    /// Run the behavior and check that it produced one value per output
    pub(crate) fn compute(&self, events: &dyn EventSink) -> Result<Vec<Value>> {
        let ctx = ComputeContext {
            node_id: self.id,
            label: &self.label,
            payload: &self.payload,
            inputs: &self.inputs,
            statics: &self.statics,
            events,
        };
        let values = self.behavior.compute(&ctx)?;
        if values.len() != self.outputs.len() {
            return Err(EngineError::OutputArity {
                node: self.label.clone(),
                expected: self.outputs.len(),
                actual: values.len(),
            });
        }
        Ok(values)
    }

    pub(crate) fn mark_executed(&mut self) {
        self.executed = true;
    }

    pub(crate) fn input_mut(&mut self, index: usize) -> Option<&mut InputAttribute> {
        self.inputs.get_mut(index)
    }

    pub(crate) fn static_mut(&mut self, index: usize) -> Option<&mut StaticAttribute> {
        self.statics.get_mut(index)
    }

    pub(crate) fn output_mut(&mut self, index: usize) -> Option<&mut OutputAttribute> {
        self.outputs.get_mut(index)
    }

    /// Borrow one output and one input of this node at the same time
    pub(crate) fn output_and_input_mut(
        &mut self,
        output: usize,
        input: usize,
    ) -> Option<(&mut OutputAttribute, &mut InputAttribute)> {
        let output = self.outputs.get_mut(output)?;
        let input = self.inputs.get_mut(input)?;
        Some((output, input))
    }

    /// Snapshot for the canvas
    pub fn view(&self) -> NodeView {
        let mut attributes = Vec::with_capacity(
            self.inputs.len() + self.statics.len() + self.outputs.len(),
        );
        attributes.extend(self.inputs.iter().map(|a| AttributeView {
            id: a.id(),
            label: a.label().to_string(),
            kind: AttributeKind::Input,
            value: a.value().cloned(),
            linked: a.parent().is_some(),
        }));
        attributes.extend(self.statics.iter().map(|a| AttributeView {
            id: a.id(),
            label: a.label().to_string(),
            kind: AttributeKind::Static,
            value: Some(a.value().clone()),
            linked: false,
        }));
        attributes.extend(self.outputs.iter().map(|a| AttributeView {
            id: a.id(),
            label: a.label().to_string(),
            kind: AttributeKind::Output,
            value: a.value().cloned(),
            linked: !a.children().is_empty(),
        }));

        NodeView {
            id: self.id,
            label: self.label.clone(),
            template_id: self.template_id.clone(),
            executed: self.executed,
            attributes,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("template_id", &self.template_id)
            .field("inputs", &self.inputs)
            .field("statics", &self.statics)
            .field("outputs", &self.outputs)
            .field("executed", &self.executed)
            .finish_non_exhaustive()
    }
}
