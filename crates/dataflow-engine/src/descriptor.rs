//! Template descriptor trait and metadata types
//!
//! A node template describes its fixed attribute shape (inputs, statics,
//! outputs in positional order) and the payload it expects. The registry
//! builds nodes from this metadata, so the template implementation is the
//! single source of truth for both behavior and shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::NodeBehavior;
use crate::types::{TemplateCategory, Value};

/// Trait for node templates that can describe their metadata
///
/// # Example
///
/// ```ignore
/// impl TemplateDescriptor for MyNode {
///     fn descriptor() -> TemplateMetadata {
///         TemplateMetadata {
///             template_id: "my-node".to_string(),
///             category: TemplateCategory::Modifier,
///             label: "My Node".to_string(),
///             description: "Does something useful".to_string(),
///             inputs: vec![PortMetadata::new("in", "In")],
///             statics: vec![],
///             outputs: vec![PortMetadata::new("out", "Out")],
///             payload: PayloadShape::Empty,
///         }
///     }
/// }
/// ```
pub trait TemplateDescriptor {
    /// Get the static metadata for this template
    fn descriptor() -> TemplateMetadata
    where
        Self: Sized;
}

/// What a template accepts as its construction payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadShape {
    /// Anything, including null
    Any,
    /// Must be null
    Empty,
    /// Must be a JSON array
    Sequence,
}

impl PayloadShape {
    /// Check whether `payload` has this shape
    pub fn accepts(&self, payload: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::Empty => payload.is_null(),
            Self::Sequence => payload.is_array(),
        }
    }
}

impl fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Any => "any value",
            Self::Empty => "null",
            Self::Sequence => "an array",
        };
        f.write_str(text)
    }
}

/// Complete metadata for a node template
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    /// Unique template identifier (e.g., "min-max")
    pub template_id: String,
    /// Palette grouping
    pub category: TemplateCategory,
    /// Default node label
    pub label: String,
    /// Description of what the node does
    pub description: String,
    /// Input ports, in positional order
    pub inputs: Vec<PortMetadata>,
    /// Static configuration ports, in positional order
    pub statics: Vec<StaticMetadata>,
    /// Output ports, in positional order
    pub outputs: Vec<PortMetadata>,
    /// Expected construction payload
    pub payload: PayloadShape,
}

/// Metadata for an input or output port
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMetadata {
    /// Port identifier
    pub id: String,
    /// Human-readable label
    pub label: String,
}

impl PortMetadata {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Metadata for a static configuration port
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticMetadata {
    /// Port identifier
    pub id: String,
    /// Human-readable label
    pub label: String,
    /// Value the static holds when the node is created
    pub default: Value,
}

impl StaticMetadata {
    pub fn new(id: impl Into<String>, label: impl Into<String>, default: Value) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            default,
        }
    }
}

/// Link-time registration of a template
///
/// Node crates submit one of these per template:
///
/// ```ignore
/// inventory::submit!(dataflow_engine::TemplateFn::of::<MinMaxNode>());
/// ```
///
/// and `NodeRegistry::with_builtins()` collects them all.
pub struct TemplateFn {
    pub descriptor: fn() -> TemplateMetadata,
    pub behavior: fn() -> Box<dyn NodeBehavior>,
}

impl TemplateFn {
    /// Registration for a template type with a default-constructible behavior
    pub const fn of<T>() -> Self
    where
        T: TemplateDescriptor + NodeBehavior + Default + 'static,
    {
        Self {
            descriptor: T::descriptor,
            behavior: boxed_behavior::<T>,
        }
    }
}

fn boxed_behavior<T: NodeBehavior + Default + 'static>() -> Box<dyn NodeBehavior> {
    Box::new(T::default())
}

inventory::collect!(TemplateFn);
