//! Data Set Node
//!
//! Emits the sequence it was created with. Dropping a palette data set onto
//! the canvas creates one of these with the data set as payload.

use dataflow_engine::{
    ComputeContext, NodeBehavior, PayloadShape, PortMetadata, Result, TemplateCategory,
    TemplateDescriptor, TemplateFn, TemplateMetadata, Value,
};

/// Data Set Node
///
/// # Outputs
/// - `data` - the construction payload, unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct DataSetNode;

impl DataSetNode {
    pub const TEMPLATE_ID: &'static str = "data-set";
    /// Port ID for the data output
    pub const PORT_DATA: &'static str = "data";
}

impl TemplateDescriptor for DataSetNode {
    fn descriptor() -> TemplateMetadata {
        TemplateMetadata {
            template_id: Self::TEMPLATE_ID.to_string(),
            category: TemplateCategory::DataSet,
            label: "Data Set".to_string(),
            description: "Emits a fixed sequence of values".to_string(),
            inputs: vec![],
            statics: vec![],
            outputs: vec![PortMetadata::new(Self::PORT_DATA, "data")],
            payload: PayloadShape::Sequence,
        }
    }
}

inventory::submit!(TemplateFn::of::<DataSetNode>());

impl NodeBehavior for DataSetNode {
    fn compute(&self, ctx: &ComputeContext<'_>) -> Result<Vec<Value>> {
        log::debug!("DataSetNode '{}': emitting payload", ctx.label());
        Ok(vec![ctx.payload().clone()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataflow_engine::{Graph, NodeRegistry};
    use serde_json::json;

    fn registry() -> NodeRegistry {
        let mut registry = NodeRegistry::new();
        registry.register_template::<DataSetNode>();
        registry
    }

    #[test]
    fn test_emits_payload_unchanged() {
        let payload = json!([-5.0, 3, "not checked"]);
        let mut graph = Graph::new();
        let id = graph.add_node(registry().create("data-set", payload.clone()).unwrap());

        graph.execute(id).unwrap();
        let out = graph.node(id).unwrap().output_id(0).unwrap();
        assert_eq!(graph.value(out).unwrap(), Some(&payload));
    }

    #[test]
    fn test_rejects_non_sequence_payload() {
        assert!(registry().create("data-set", json!(5)).is_err());
        assert!(registry().create("data-set", Value::Null).is_err());
    }
}
