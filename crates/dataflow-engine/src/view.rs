//! Snapshots of graph state for the rendering collaborator

use serde::{Deserialize, Serialize};

use crate::types::{AttributeId, AttributeKind, NodeId, Value};

/// Text shown for an attribute that has not received a value yet
pub const NOT_CALCULATED: &str = "Not Calculated";

/// One attribute as the canvas sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeView {
    pub id: AttributeId,
    pub label: String,
    pub kind: AttributeKind,
    /// Current value; `None` before the first delivery
    pub value: Option<Value>,
    /// Whether the attribute takes part in at least one link
    pub linked: bool,
}

impl AttributeView {
    /// Value rendered as text, or `placeholder` when absent
    pub fn display_text(&self, placeholder: &str) -> String {
        match &self.value {
            Some(value) => value.to_string(),
            None => placeholder.to_string(),
        }
    }
}

/// One node as the canvas sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    pub id: NodeId,
    pub label: String,
    pub template_id: String,
    /// Completion marker, purely cosmetic
    pub executed: bool,
    /// Inputs, then statics, then outputs, each in positional order
    pub attributes: Vec<AttributeView>,
}

impl NodeView {
    /// Attributes of one kind, in positional order
    pub fn attributes_of(&self, kind: AttributeKind) -> impl Iterator<Item = &AttributeView> {
        self.attributes.iter().filter(move |a| a.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn view(value: Option<Value>) -> AttributeView {
        AttributeView {
            id: AttributeId::new(),
            label: "min".to_string(),
            kind: AttributeKind::Output,
            value,
            linked: false,
        }
    }

    #[test]
    fn test_display_text_placeholder() {
        assert_eq!(view(None).display_text(NOT_CALCULATED), "Not Calculated");
        assert_eq!(view(Some(json!(-5.0))).display_text(NOT_CALCULATED), "-5.0");
    }

    #[test]
    fn test_attributes_of() {
        let node = NodeView {
            id: NodeId::new(),
            label: "MinMax".to_string(),
            template_id: "min-max".to_string(),
            executed: false,
            attributes: vec![view(None), view(None)],
        };
        assert_eq!(node.attributes_of(AttributeKind::Output).count(), 2);
        assert_eq!(node.attributes_of(AttributeKind::Input).count(), 0);
    }
}
