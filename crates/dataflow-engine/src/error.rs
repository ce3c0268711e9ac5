//! Error types for the dataflow engine

use thiserror::Error;

use crate::descriptor::PayloadShape;
use crate::types::{AttributeId, AttributeKind, NodeId};

/// Result type alias using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

/// Broad class of an [`EngineError`]
///
/// Hosts use this to decide how a failure is surfaced (dialog, log line,
/// inline marker on the node) without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The factory was asked for something it cannot build
    Configuration,
    /// A link could not be created or removed
    Link,
    /// A node handle did not resolve in the graph
    Graph,
    /// A node's computation could not proceed
    Computation,
}

/// Errors that can occur in the dataflow engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// No template registered under this identifier
    #[error("Unknown node template: {0}")]
    UnknownTemplate(String),

    /// Payload does not match the template's expected shape
    #[error("Payload for template '{template_id}' must be {expected}")]
    PayloadShape {
        template_id: String,
        expected: PayloadShape,
    },

    /// The palette has no entry with this label
    #[error("Unknown palette entry: {0}")]
    UnknownPaletteEntry(String),

    /// Target input already has an incoming link
    #[error("Input {input} is already linked to output {parent}")]
    InputAlreadyLinked {
        input: AttributeId,
        parent: AttributeId,
    },

    /// Attribute handle is not owned by any node of this graph
    #[error("Attribute {0} is not registered in this graph")]
    UnknownAttribute(AttributeId),

    /// Attribute exists but has the wrong kind for the operation
    #[error("Attribute {id} is {actual}, expected {expected}")]
    WrongAttributeKind {
        id: AttributeId,
        expected: AttributeKind,
        actual: AttributeKind,
    },

    /// Input has no incoming link to remove
    #[error("Input {0} is not linked")]
    NotLinked(AttributeId),

    /// Node handle is not registered in this graph
    #[error("Node {0} is not registered in this graph")]
    UnknownNode(NodeId),

    /// Node was given a positional address it does not have
    #[error("Node '{node}' has no {kind} attribute at position {index}")]
    NoSuchPort {
        node: String,
        kind: AttributeKind,
        index: usize,
    },

    /// Builder referenced an alias that was never declared
    #[error("Unknown node alias: {0}")]
    UnknownAlias(String),

    /// Builder declared the same alias twice
    #[error("Duplicate node alias: {0}")]
    DuplicateAlias(String),

    /// Required input has no value yet
    #[error("Missing input '{port}' on node '{node}'")]
    MissingInput { node: String, port: String },

    /// Input value is not of the type the computation needs
    #[error("Invalid input type for '{port}': expected {expected}")]
    InvalidInputType { port: String, expected: String },

    /// Computation needs at least one element
    #[error("Input '{port}' is an empty sequence")]
    EmptySequence { port: String },

    /// Computation returned the wrong number of output values
    #[error("Node '{node}' produced {actual} values for {expected} outputs")]
    OutputArity {
        node: String,
        expected: usize,
        actual: usize,
    },

    /// Any other computation failure
    #[error("Computation failed: {0}")]
    ComputationFailed(String),
}

impl EngineError {
    /// Create a generic computation failure with a message
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::ComputationFailed(msg.into())
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownTemplate(_)
            | Self::PayloadShape { .. }
            | Self::UnknownPaletteEntry(_)
            | Self::UnknownAlias(_)
            | Self::DuplicateAlias(_) => ErrorKind::Configuration,
            Self::InputAlreadyLinked { .. }
            | Self::UnknownAttribute(_)
            | Self::WrongAttributeKind { .. }
            | Self::NotLinked(_) => ErrorKind::Link,
            Self::UnknownNode(_) | Self::NoSuchPort { .. } => ErrorKind::Graph,
            Self::MissingInput { .. }
            | Self::InvalidInputType { .. }
            | Self::EmptySequence { .. }
            | Self::OutputArity { .. }
            | Self::ComputationFailed(_) => ErrorKind::Computation,
        }
    }

    /// Whether this is a computation fault raised by a node
    pub fn is_computation_fault(&self) -> bool {
        self.kind() == ErrorKind::Computation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_distinguishable() {
        assert_eq!(
            EngineError::UnknownTemplate("nope".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            EngineError::NotLinked(AttributeId::new()).kind(),
            ErrorKind::Link
        );
        assert_eq!(EngineError::UnknownNode(NodeId::new()).kind(), ErrorKind::Graph);
        assert!(EngineError::failed("boom").is_computation_fault());
    }

    #[test]
    fn test_display_messages() {
        let err = EngineError::PayloadShape {
            template_id: "min-max".into(),
            expected: PayloadShape::Empty,
        };
        assert_eq!(
            err.to_string(),
            "Payload for template 'min-max' must be null"
        );

        let err = EngineError::EmptySequence {
            port: "values".into(),
        };
        assert_eq!(err.to_string(), "Input 'values' is an empty sequence");
    }
}
