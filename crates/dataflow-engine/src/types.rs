//! Core types for dataflow graphs
//!
//! Handles, attribute kinds and the link pair shared by every other module.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque payload carried by attributes and captured by nodes
///
/// The engine never looks inside; only node computations interpret it.
pub type Value = serde_json::Value;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Allocate a fresh handle
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// Unique identifier for an attribute (input, static or output port)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeId(Uuid);

impl AttributeId {
    /// Allocate a fresh handle
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AttributeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "attr-{}", self.0)
    }
}

/// Which capability an attribute has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    /// Receives values from at most one output
    Input,
    /// Node-local configuration, never linked
    Static,
    /// Broadcasts values to any number of inputs
    Output,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Input => "input",
            Self::Static => "static",
            Self::Output => "output",
        };
        f.write_str(name)
    }
}

/// Palette grouping of a node template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    /// Dataset entry points
    DataSet,
    /// Nodes that transform data
    Modifier,
    /// Nodes that summarize data
    Inspector,
    /// Terminal viewer nodes
    Tool,
}

impl TemplateCategory {
    /// All categories in palette order
    pub const ALL: [TemplateCategory; 4] = [
        TemplateCategory::DataSet,
        TemplateCategory::Modifier,
        TemplateCategory::Inspector,
        TemplateCategory::Tool,
    ];

    /// Title of the palette section listing this category
    pub fn section_title(&self) -> &'static str {
        match self {
            Self::DataSet => "Data Sets",
            Self::Modifier => "Modifiers",
            Self::Inspector => "Inspectors",
            Self::Tool => "Tools",
        }
    }
}

/// A directed connection from an output attribute to an input attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Producing side
    pub output: AttributeId,
    /// Consuming side
    pub input: AttributeId,
}

impl Link {
    pub fn new(output: AttributeId, input: AttributeId) -> Self {
        Self { output, input }
    }
}
