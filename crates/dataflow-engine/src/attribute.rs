//! Node attributes: the typed ports of a node
//!
//! An [`InputAttribute`] keeps a non-owning back-reference (an id) to the
//! output feeding it. An [`OutputAttribute`] owns the ordered list of child
//! input ids it broadcasts to. A [`StaticAttribute`] carries configuration
//! and never participates in links.
//!
//! Attributes never reach into each other; the [`Graph`](crate::Graph) owns
//! every attribute and performs the actual delivery after
//! [`OutputAttribute::produce`] hands back the child list.

use crate::error::{EngineError, Result};
use crate::types::{AttributeId, Value};

/// A port that receives values from at most one output
#[derive(Debug, Clone)]
pub struct InputAttribute {
    id: AttributeId,
    label: String,
    value: Option<Value>,
    parent: Option<AttributeId>,
}

impl InputAttribute {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: AttributeId::new(),
            label: label.into(),
            value: None,
            parent: None,
        }
    }

    pub fn id(&self) -> AttributeId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Last delivered value, `None` until the first delivery
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// The output feeding this input, if linked
    pub fn parent(&self) -> Option<AttributeId> {
        self.parent
    }

    /// Overwrite the held value (last write wins)
    pub fn deliver(&mut self, value: Value) {
        self.value = Some(value);
    }

    pub(crate) fn clear_parent(&mut self) -> Option<AttributeId> {
        self.parent.take()
    }
}

/// A port that broadcasts produced values to its children
#[derive(Debug, Clone)]
pub struct OutputAttribute {
    id: AttributeId,
    label: String,
    value: Option<Value>,
    children: Vec<AttributeId>,
}

impl OutputAttribute {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: AttributeId::new(),
            label: label.into(),
            value: None,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> AttributeId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Last produced value, `None` until the first production
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Linked inputs in link-creation order
    pub fn children(&self) -> &[AttributeId] {
        &self.children
    }

    /// Store `value` and return the children that must receive it, in order
    pub fn produce(&mut self, value: Value) -> &[AttributeId] {
        self.value = Some(value);
        &self.children
    }

    /// Link `input` as a child of this output
    ///
    /// Fails without touching either side if the input already has a parent.
    pub fn attach(&mut self, input: &mut InputAttribute) -> Result<()> {
        if let Some(parent) = input.parent {
            return Err(EngineError::InputAlreadyLinked {
                input: input.id,
                parent,
            });
        }
        self.children.push(input.id);
        input.parent = Some(self.id);
        Ok(())
    }

    /// Drop `input` from the child list; returns whether it was present
    pub fn detach(&mut self, input: AttributeId) -> bool {
        let before = self.children.len();
        self.children.retain(|child| *child != input);
        self.children.len() != before
    }
}

/// A configuration-only port
#[derive(Debug, Clone)]
pub struct StaticAttribute {
    id: AttributeId,
    label: String,
    value: Value,
}

impl StaticAttribute {
    pub fn new(label: impl Into<String>, default: Value) -> Self {
        Self {
            id: AttributeId::new(),
            label: label.into(),
            value: default,
        }
    }

    pub fn id(&self) -> AttributeId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Replace the configuration value
    pub fn set(&mut self, value: Value) {
        self.value = value;
    }
}
