//! MinMax Node
//!
//! Finds the smallest and largest element of a numeric sequence.

use std::cmp::Ordering;

use dataflow_engine::{
    ComputeContext, DisplayUpdate, EngineError, NodeBehavior, PayloadShape, PortMetadata,
    Result, TemplateCategory, TemplateDescriptor, TemplateFn, TemplateMetadata, Value,
};

use crate::numeric;

/// MinMax Node
///
/// Comparisons are strict, so ties keep the first element seen. The
/// extrema are the original elements, so integer inputs stay integers.
///
/// # Inputs
/// - `values` (required) - non-empty sequence of numbers
///
/// # Outputs
/// - `min` - smallest element
/// - `max` - largest element
#[derive(Debug, Clone, Copy, Default)]
pub struct MinMaxNode;

impl MinMaxNode {
    pub const TEMPLATE_ID: &'static str = "min-max";
    /// Port ID for values input
    pub const PORT_VALUES: &'static str = "values";
    /// Port ID for min output
    pub const PORT_MIN: &'static str = "min";
    /// Port ID for max output
    pub const PORT_MAX: &'static str = "max";
}

impl TemplateDescriptor for MinMaxNode {
    fn descriptor() -> TemplateMetadata {
        TemplateMetadata {
            template_id: Self::TEMPLATE_ID.to_string(),
            category: TemplateCategory::Inspector,
            label: "MinMax".to_string(),
            description: "Minimum and maximum of a sequence".to_string(),
            inputs: vec![PortMetadata::new(Self::PORT_VALUES, "values")],
            statics: vec![],
            outputs: vec![
                PortMetadata::new(Self::PORT_MIN, "min"),
                PortMetadata::new(Self::PORT_MAX, "max"),
            ],
            payload: PayloadShape::Empty,
        }
    }
}

inventory::submit!(TemplateFn::of::<MinMaxNode>());

impl NodeBehavior for MinMaxNode {
    fn compute(&self, ctx: &ComputeContext<'_>) -> Result<Vec<Value>> {
        let port = ctx.input_label(0);
        let values = numeric::sequence(ctx.require_input(0)?, port)?;

        let first = values.first().ok_or_else(|| EngineError::EmptySequence {
            port: port.to_string(),
        })?;
        numeric::number(first, port)?;
        let (mut min, mut max) = (first, first);

        for value in &values[1..] {
            if numeric::compare(value, max, port)? == Ordering::Greater {
                max = value;
            }
            if numeric::compare(value, min, port)? == Ordering::Less {
                min = value;
            }
        }

        let (min, max) = (min.clone(), max.clone());
        log::debug!("MinMaxNode '{}': min={} max={}", ctx.label(), min, max);
        ctx.display(DisplayUpdate::Extrema {
            min: min.clone(),
            max: max.clone(),
        });
        Ok(vec![min, max])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataflow_engine::{Graph, NodeId, NodeRegistry, VecEventSink};
    use serde_json::json;
    use std::sync::Arc;

    fn setup(values: Option<Value>) -> (Graph, NodeId, Arc<VecEventSink>) {
        let mut registry = NodeRegistry::new();
        registry.register_template::<MinMaxNode>();
        let sink = Arc::new(VecEventSink::new());
        let mut graph = Graph::with_event_sink(sink.clone());
        let id = graph.add_node(registry.create("min-max", Value::Null).unwrap());

        if let Some(values) = values {
            let mut source = dataflow_engine::Node::new(
                "feed",
                "feed",
                Value::Null,
                Box::new(crate::source::DataSetNode),
            );
            let out = source.add_output("data");
            graph.add_node(source);
            let input = graph.node(id).unwrap().input_id(0).unwrap();
            graph.link(out, input).unwrap();
            graph.produce(out, values).unwrap();
        }
        (graph, id, sink)
    }

    fn outputs(graph: &Graph, id: NodeId) -> (Value, Value) {
        let node = graph.node(id).unwrap();
        (
            node.outputs()[0].value().cloned().unwrap(),
            node.outputs()[1].value().cloned().unwrap(),
        )
    }

    #[test]
    fn test_extrema_of_test_data() {
        let data = json!([-5.0, -5.0, -3.0, -3.0, 0.0, 0.0, 3.0, 3.0, 5.0, 5.0]);
        let (mut graph, id, sink) = setup(Some(data));

        graph.execute(id).unwrap();
        assert_eq!(outputs(&graph, id), (json!(-5.0), json!(5.0)));

        let displays = sink.displays();
        assert_eq!(
            displays[0].1,
            DisplayUpdate::Extrema {
                min: json!(-5.0),
                max: json!(5.0)
            }
        );
    }

    #[test]
    fn test_single_element() {
        let (mut graph, id, _) = setup(Some(json!([7])));
        graph.execute(id).unwrap();
        assert_eq!(outputs(&graph, id), (json!(7), json!(7)));
    }

    #[test]
    fn test_ties_keep_first_seen() {
        let (mut graph, id, _) = setup(Some(json!([2, 2.0, 1, 1.0])));
        graph.execute(id).unwrap();
        assert_eq!(outputs(&graph, id), (json!(1), json!(2)));
    }

    #[test]
    fn test_large_integers_compare_exactly() {
        let data = json!([9_007_199_254_740_993u64, 9_007_199_254_740_992u64]);
        let (mut graph, id, _) = setup(Some(data));
        graph.execute(id).unwrap();
        assert_eq!(
            outputs(&graph, id),
            (json!(9_007_199_254_740_992u64), json!(9_007_199_254_740_993u64))
        );
    }

    #[test]
    fn test_faults() {
        let (mut graph, id, _) = setup(None);
        assert!(matches!(
            graph.execute(id),
            Err(EngineError::MissingInput { .. })
        ));

        let (mut graph, id, _) = setup(Some(json!([])));
        assert!(matches!(
            graph.execute(id),
            Err(EngineError::EmptySequence { ref port }) if port == "values"
        ));

        let (mut graph, id, _) = setup(Some(json!([1, "two"])));
        assert!(matches!(
            graph.execute(id),
            Err(EngineError::InvalidInputType { .. })
        ));
        assert!(graph.node(id).unwrap().outputs()[0].value().is_none());
    }
}
