//! End-to-end behavior of the built-in templates wired into a graph

use std::sync::Arc;

use dataflow_engine::{
    DisplayUpdate, EngineError, ErrorKind, Graph, GraphBuilder, GraphEvent, NodeId, Value,
    VecEventSink,
};
use dataflow_nodes::{builtin_registry, default_palette};
use serde_json::json;

fn output(graph: &Graph, node: NodeId, index: usize) -> Option<Value> {
    let attr = graph.node(node).unwrap().output_id(index).unwrap();
    graph.value(attr).unwrap().cloned()
}

fn input(graph: &Graph, node: NodeId, index: usize) -> Option<Value> {
    let attr = graph.node(node).unwrap().input_id(index).unwrap();
    graph.value(attr).unwrap().cloned()
}

#[test]
fn test_palette_pipeline_one_hop_at_a_time() {
    let registry = builtin_registry();
    let palette = default_palette();
    let sink = Arc::new(VecEventSink::new());
    let mut graph = Graph::with_event_sink(sink.clone());

    let data = palette.drop_onto("Test Data", &registry, &mut graph).unwrap();
    let shifter = palette.drop_onto("Data Shifter", &registry, &mut graph).unwrap();
    let min_max = palette.drop_onto("MinMax", &registry, &mut graph).unwrap();
    let view = palette.drop_onto("2D Data View", &registry, &mut graph).unwrap();

    let node = |id: NodeId| graph.node(id).unwrap();
    let data_out = node(data).output_id(0).unwrap();
    let shift_x = node(shifter).input_id(0).unwrap();
    let shift_y = node(shifter).input_id(1).unwrap();
    let x_shift = node(shifter).static_id(0).unwrap();
    let x_mod = node(shifter).output_id(0).unwrap();
    let y_mod = node(shifter).output_id(1).unwrap();
    let values = node(min_max).input_id(0).unwrap();
    let view_x = node(view).input_id(0).unwrap();
    let view_y = node(view).input_id(1).unwrap();

    graph.link(data_out, shift_x).unwrap();
    graph.link(data_out, shift_y).unwrap();
    graph.link(x_mod, values).unwrap();
    graph.link(x_mod, view_x).unwrap();
    graph.link(y_mod, view_y).unwrap();
    graph.set_static(x_shift, json!(10)).unwrap();

    // Downstream before its producer ran: absent inputs, a fault, no crash
    assert!(matches!(
        graph.execute(min_max),
        Err(EngineError::MissingInput { .. })
    ));
    assert!(output(&graph, min_max, 0).is_none());

    let report = graph.execute(data).unwrap();
    assert_eq!(report.deliveries, 2);
    assert!(input(&graph, min_max, 0).is_none());

    graph.execute(shifter).unwrap();
    assert_eq!(
        output(&graph, shifter, 0),
        Some(json!([5.0, 5.0, 7.0, 7.0, 10.0, 10.0, 13.0, 13.0, 15.0, 15.0]))
    );
    assert_eq!(
        output(&graph, shifter, 1),
        Some(json!([-5.0, -5.0, -3.0, -3.0, 0.0, 0.0, 3.0, 3.0, 5.0, 5.0]))
    );

    graph.execute(min_max).unwrap();
    assert_eq!(output(&graph, min_max, 0), Some(json!(5.0)));
    assert_eq!(output(&graph, min_max, 1), Some(json!(15.0)));

    graph.execute(view).unwrap();
    let displays = sink.displays();
    assert_eq!(displays.len(), 2);
    assert_eq!(
        displays[0],
        (
            min_max,
            DisplayUpdate::Extrema {
                min: json!(5.0),
                max: json!(15.0)
            }
        )
    );
    assert!(matches!(displays[1].1, DisplayUpdate::Line { .. }));
}

#[test]
fn test_extrema_of_default_data() {
    let registry = builtin_registry();
    let built = GraphBuilder::new(&registry)
        .add_node("data", "data-set")
        .with_payload(json!([-5.0, -5.0, -3.0, -3.0, 0.0, 0.0, 3.0, 3.0, 5.0, 5.0]))
        .add_node("single", "data-set")
        .with_payload(json!([7]))
        .add_node("mm", "min-max")
        .add_node("mm_single", "min-max")
        .link("data", 0, "mm", 0)
        .link("single", 0, "mm_single", 0)
        .build()
        .unwrap();

    let ids: Vec<_> = ["data", "single", "mm", "mm_single"]
        .iter()
        .map(|alias| built.id(alias).unwrap())
        .collect();
    let mut graph = built.graph;
    for id in &ids {
        graph.execute(*id).unwrap();
    }

    assert_eq!(output(&graph, ids[2], 0), Some(json!(-5.0)));
    assert_eq!(output(&graph, ids[2], 1), Some(json!(5.0)));
    assert_eq!(output(&graph, ids[3], 0), Some(json!(7)));
    assert_eq!(output(&graph, ids[3], 1), Some(json!(7)));
}

#[test]
fn test_integer_payloads_stay_exact() {
    let registry = builtin_registry();
    let built = GraphBuilder::new(&registry)
        .add_node("data", "data-set")
        .with_payload(json!([9_007_199_254_740_993u64, 9_007_199_254_740_992u64]))
        .add_node("wide", "data-set")
        .with_payload(json!([u64::MAX]))
        .add_node("mm", "min-max")
        .add_node("shift", "data-shifter")
        .link("data", 0, "mm", 0)
        .link("wide", 0, "shift", 0)
        .link("wide", 0, "shift", 1)
        .build()
        .unwrap();

    let ids: Vec<_> = ["data", "wide", "mm", "shift"]
        .iter()
        .map(|alias| built.id(alias).unwrap())
        .collect();
    let mut graph = built.graph;
    for id in &ids {
        graph.execute(*id).unwrap();
    }

    assert_eq!(output(&graph, ids[2], 0), Some(json!(9_007_199_254_740_992u64)));
    assert_eq!(output(&graph, ids[2], 1), Some(json!(9_007_199_254_740_993u64)));
    assert_eq!(output(&graph, ids[3], 0), Some(json!([u64::MAX])));
    assert_eq!(output(&graph, ids[3], 1), Some(json!([u64::MAX])));
}

#[test]
fn test_rewire_live() {
    let registry = builtin_registry();
    let palette = default_palette();
    let mut graph = Graph::new();

    let data = palette.drop_onto("Test Data", &registry, &mut graph).unwrap();
    let view = palette.drop_onto("1D Data View", &registry, &mut graph).unwrap();
    let shifter = palette.drop_onto("Data Shifter", &registry, &mut graph).unwrap();

    let data_out = graph.node(data).unwrap().output_id(0).unwrap();
    let view_in = graph.node(view).unwrap().input_id(0).unwrap();
    let x_mod = graph.node(shifter).unwrap().output_id(0).unwrap();

    graph.link(data_out, view_in).unwrap();
    let err = graph.link(x_mod, view_in).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Link);

    assert_eq!(graph.unlink(view_in).unwrap(), data_out);
    graph.link(x_mod, view_in).unwrap();

    graph.remove_node(shifter).unwrap();
    assert!(graph.links().is_empty());
    graph.link(data_out, view_in).unwrap();
    graph.execute(data).unwrap();
    graph.execute(view).unwrap();
}

#[test]
fn test_reset_then_execute_propagates_nothing() {
    let registry = builtin_registry();
    let sink = Arc::new(VecEventSink::new());
    let built = GraphBuilder::new(&registry)
        .with_event_sink(sink.clone())
        .add_node("data", "data-set")
        .with_payload(json!([1, 2, 3]))
        .add_node("view", "view-1d")
        .link("data", 0, "view", 0)
        .build()
        .unwrap();
    let data = built.id("data").unwrap();
    let mut graph = built.graph;

    graph.reset();
    sink.clear();

    let err = graph.execute(data).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Graph);
    assert!(sink
        .events()
        .iter()
        .all(|e| !matches!(e, GraphEvent::NodeExecuted { .. } | GraphEvent::Display { .. })));
}

#[test]
fn test_configuration_errors() {
    let registry = builtin_registry();
    assert_eq!(
        registry.create("nope", Value::Null).unwrap_err().kind(),
        ErrorKind::Configuration
    );
    assert_eq!(
        registry.create("min-max", json!([1])).unwrap_err().kind(),
        ErrorKind::Configuration
    );
    assert_eq!(
        registry.create("data-set", Value::Null).unwrap_err().kind(),
        ErrorKind::Configuration
    );
}
