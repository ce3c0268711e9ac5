//! 1D Data View Node

use dataflow_engine::{
    ComputeContext, DisplayUpdate, NodeBehavior, PayloadShape, PortMetadata, Result,
    TemplateCategory, TemplateDescriptor, TemplateFn, TemplateMetadata, Value,
};

/// Plots a single series
///
/// # Inputs
/// - `input` (required) - the series to plot
#[derive(Debug, Clone, Copy, Default)]
pub struct View1dNode;

impl View1dNode {
    pub const TEMPLATE_ID: &'static str = "view-1d";
    pub const PORT_INPUT: &'static str = "input";
}

impl TemplateDescriptor for View1dNode {
    fn descriptor() -> TemplateMetadata {
        TemplateMetadata {
            template_id: Self::TEMPLATE_ID.to_string(),
            category: TemplateCategory::Tool,
            label: "1D Data View".to_string(),
            description: "Plots a sequence".to_string(),
            inputs: vec![PortMetadata::new(Self::PORT_INPUT, "input")],
            statics: vec![],
            outputs: vec![],
            payload: PayloadShape::Empty,
        }
    }
}

inventory::submit!(TemplateFn::of::<View1dNode>());

impl NodeBehavior for View1dNode {
    fn compute(&self, ctx: &ComputeContext<'_>) -> Result<Vec<Value>> {
        let values = ctx.require_input(0)?.clone();
        ctx.display(DisplayUpdate::Series { values });
        Ok(vec![])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataflow_engine::{EngineError, Graph, NodeRegistry, VecEventSink};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_hands_series_to_renderer() {
        let mut registry = NodeRegistry::new();
        registry.register_template::<View1dNode>();
        let sink = Arc::new(VecEventSink::new());
        let mut graph = Graph::with_event_sink(sink.clone());
        let id = graph.add_node(registry.create("view-1d", Value::Null).unwrap());

        assert!(matches!(
            graph.execute(id),
            Err(EngineError::MissingInput { .. })
        ));
        assert!(sink.displays().is_empty());

        let mut feed = dataflow_engine::Node::new(
            "feed",
            "feed",
            Value::Null,
            Box::new(crate::source::DataSetNode),
        );
        let out = feed.add_output("data");
        graph.add_node(feed);
        let input = graph.node(id).unwrap().input_id(0).unwrap();
        graph.link(out, input).unwrap();
        graph.produce(out, json!([1, 2, 3])).unwrap();

        let report = graph.execute(id).unwrap();
        assert_eq!(report.outputs_produced, 0);
        assert_eq!(
            sink.displays(),
            vec![(
                id,
                DisplayUpdate::Series {
                    values: json!([1, 2, 3])
                }
            )]
        );
    }
}
