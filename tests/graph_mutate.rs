//! Graph model editing, id allocation and text round trips.

#[allow(dead_code)]
mod helpers;

use serde_json::json;
use workflow_check::graph::Inputs;
use workflow_check::{Check, GraphError, GraphModel, InputValue, Link};

use helpers::*;

fn three_node_graph() -> GraphModel {
    let mut graph = GraphModel::new();
    let ckpt = graph.add_node(
        "CheckpointLoaderSimple",
        inputs(&[("ckpt_name", json!("v1-5-pruned.safetensors"))]),
        Some("Checkpoint"),
    );
    let load = graph.add_node("LoadImage", inputs(&[("image", json!("example.png"))]), None);
    let blur = graph.add_node(
        "ImageBlur",
        inputs(&[("blur_radius", json!(3)), ("sigma", json!(1.0))]),
        None,
    );
    assert!(graph.connect_nodes(&load, 0, &blur, "image"));
    assert_eq!((ckpt.as_str(), load.as_str(), blur.as_str()), ("1", "2", "3"));
    graph
}

// =============================================================================
// addNode / id allocation
// =============================================================================

#[test]
fn first_id_is_one() {
    let mut graph = GraphModel::new();
    assert_eq!(graph.next_id(), "1");
    assert_eq!(graph.add_node("LoadImage", Inputs::new(), None), "1");
}

#[test]
fn next_id_follows_largest_numeric_id() {
    let mut graph = GraphModel::parse(
        r#"{"1": {"class_type": "A", "inputs": {}},
            "2": {"class_type": "A", "inputs": {}},
            "5": {"class_type": "A", "inputs": {}}}"#,
    )
    .unwrap();
    assert_eq!(graph.add_node("B", Inputs::new(), None), "6");
}

#[test]
fn non_numeric_ids_are_ignored_for_allocation() {
    let mut graph = GraphModel::parse(
        r#"{"loader": {"class_type": "A", "inputs": {}},
            "12": {"class_type": "A", "inputs": {}},
            "7b": {"class_type": "A", "inputs": {}}}"#,
    )
    .unwrap();
    assert_eq!(graph.add_node("B", Inputs::new(), None), "13");

    let mut only_named = GraphModel::parse(r#"{"loader": {"class_type": "A", "inputs": {}}}"#).unwrap();
    let id = only_named.add_node("B", Inputs::new(), None);
    assert_eq!(id, "1");
    assert_eq!(only_named.len(), 2);
}

#[test]
fn allocation_past_u64_range_never_replaces_a_node() {
    let mut graph =
        GraphModel::parse(r#"{"18446744073709551615": {"class_type": "Old", "inputs": {}}}"#).unwrap();
    let id = graph.add_node("New", Inputs::new(), None);
    assert_eq!(id, "18446744073709551616");
    assert_eq!(graph.len(), 2);
    assert_eq!(graph.node("18446744073709551615").unwrap().class_type(), Some("Old"));
}

#[test]
fn leading_zeros_count_by_value() {
    let mut graph = GraphModel::parse(
        r#"{"0009": {"class_type": "A", "inputs": {}},
            "3": {"class_type": "A", "inputs": {}}}"#,
    )
    .unwrap();
    assert_eq!(graph.add_node("B", Inputs::new(), None), "10");
    assert_eq!(graph.add_node("B", Inputs::new(), None), "11");
    assert_eq!(graph.len(), 4);
}

#[test]
fn add_node_stores_inputs_verbatim_and_defaults_title() {
    let graph = three_node_graph();
    let ckpt = graph.node("1").unwrap();
    assert_eq!(ckpt.title(), Some("Checkpoint"));
    let load = graph.node("2").unwrap();
    assert_eq!(load.class_type(), Some("LoadImage"));
    assert_eq!(load.title(), Some("LoadImage"));
    assert_eq!(load.input("image"), Some(&InputValue::Literal(json!("example.png"))));
}

// =============================================================================
// removeNode
// =============================================================================

#[test]
fn remove_node_strips_links_to_it() {
    let mut graph = three_node_graph();
    assert!(graph.remove_node("2"));
    assert!(!graph.contains("2"));

    let blur = graph.node("3").unwrap();
    assert_eq!(blur.input("image"), None);
    assert_eq!(blur.input("blur_radius"), Some(&InputValue::Literal(json!(3))));
    for (_, node) in graph.nodes() {
        assert!(node.links().all(|(_, link)| link.source != "2"));
    }
}

#[test]
fn remove_node_twice_returns_false() {
    let mut graph = three_node_graph();
    assert!(graph.remove_node("3"));
    assert!(!graph.remove_node("3"));
    assert!(!graph.remove_node("42"));
    assert_eq!(graph.len(), 2);
}

// =============================================================================
// connectNodes / modifyInput
// =============================================================================

#[test]
fn connect_overwrites_previous_value() {
    let mut graph = three_node_graph();
    assert!(graph.connect_nodes("1", 0, "3", "image"));
    assert!(graph.connect_nodes("2", 0, "3", "image"));

    let blur = graph.node("3").unwrap();
    assert_eq!(blur.input("image"), Some(&InputValue::link("2", 0)));
    assert_eq!(blur.links().filter(|(name, _)| *name == "image").count(), 1);
}

#[test]
fn connect_does_not_check_source() {
    let mut graph = three_node_graph();
    assert!(graph.connect_nodes("99", 7, "3", "image"));
    assert_eq!(graph.node("3").unwrap().input("image"), Some(&InputValue::link("99", 7)));
}

#[test]
fn connect_fails_for_missing_target() {
    let mut graph = three_node_graph();
    assert!(!graph.connect_nodes("1", 0, "99", "image"));
}

#[test]
fn modify_input_sets_literals_and_links() {
    let mut graph = three_node_graph();
    assert!(graph.modify_input("3", "blur_radius", json!(9)));
    assert!(graph.modify_input("3", "image", Link::new("1", 0)));
    assert!(!graph.modify_input("9", "blur_radius", json!(1)));

    let blur = graph.node("3").unwrap();
    assert_eq!(blur.input("blur_radius"), Some(&InputValue::Literal(json!(9))));
    assert_eq!(blur.input("image"), Some(&InputValue::link("1", 0)));
}

#[test]
fn modify_input_creates_missing_inputs_map() {
    let mut graph = GraphModel::parse(r#"{"1": {"class_type": "LoadImage"}}"#).unwrap();
    assert!(graph.modify_input("1", "image", json!("example.png")));
    assert!(graph.self_check().0);
}

#[test]
fn nodes_of_type_in_insertion_order() {
    let mut graph = GraphModel::new();
    graph.add_node("LoadImage", Inputs::new(), None);
    graph.add_node("ImageBlur", Inputs::new(), None);
    graph.add_node("LoadImage", Inputs::new(), None);
    assert_eq!(graph.nodes_of_type("LoadImage"), vec!["1", "3"]);
    assert!(graph.nodes_of_type("SaveImage").is_empty());
}

// =============================================================================
// Text round trip
// =============================================================================

#[test]
fn text_round_trip_preserves_graph() {
    let mut graph = three_node_graph();
    graph.modify_input("3", "extra", json!({"nested": [1, 2, 3]}));
    let text = graph.to_text();

    let mut restored = GraphModel::new();
    restored.from_text(&text).unwrap();
    assert_eq!(restored, graph);
    assert_eq!(restored.ids().collect::<Vec<_>>(), vec!["1", "2", "3"]);
}

#[test]
fn link_shaped_literal_survives_round_trip() {
    let mut graph = three_node_graph();
    assert!(graph.modify_input("3", "size", InputValue::Literal(json!(["wide", 3]))));
    let extra = graph.add_node(
        "ImageBlur",
        [("image".to_string(), InputValue::Literal(json!([2, 0])))].into_iter().collect(),
        None,
    );

    assert_eq!(graph.node("3").unwrap().input("size"), Some(&InputValue::link("wide", 3)));
    assert_eq!(graph.node(&extra).unwrap().input("image"), Some(&InputValue::link("2", 0)));

    let mut restored = GraphModel::new();
    restored.from_text(&graph.to_text()).unwrap();
    assert_eq!(restored, graph);
}

#[test]
fn from_text_replaces_graph_and_allocation() {
    let mut graph = three_node_graph();
    graph
        .from_text(r#"{"40": {"class_type": "LoadImage", "inputs": {}}}"#)
        .unwrap();
    assert_eq!(graph.len(), 1);
    assert_eq!(graph.add_node("ImageBlur", Inputs::new(), None), "41");
}

#[test]
fn from_text_failure_leaves_graph_untouched() {
    let mut graph = three_node_graph();
    let before = graph.clone();

    assert!(matches!(graph.from_text("not json"), Err(GraphError::Parse(_))));
    assert!(matches!(graph.from_text("[1, 2]"), Err(GraphError::NotAWorkflow)));
    assert!(matches!(
        graph.from_text(r#"{"1": "LoadImage"}"#),
        Err(GraphError::NotAWorkflow)
    ));
    assert_eq!(graph, before);
}

#[test]
fn wire_format_uses_host_keys() {
    let graph = three_node_graph();
    let value: serde_json::Value = serde_json::from_str(&graph.to_text()).unwrap();
    assert_eq!(value["3"]["class_type"], json!("ImageBlur"));
    assert_eq!(value["3"]["inputs"]["image"], json!(["2", 0]));
    assert_eq!(value["1"]["_meta"]["title"], json!("Checkpoint"));
}

// =============================================================================
// selfCheck
// =============================================================================

#[test]
fn self_check_flags_structural_defects() {
    let graph = fixture_graph(include_str!("fixtures/missing_fields.json"));
    let (valid, issues) = graph.self_check();
    assert!(!valid);
    assert_eq!(
        checks(&issues),
        vec![
            Check::MissingClassType,
            Check::MissingInputs,
            Check::MissingClassType,
            Check::LinkValidity,
        ]
    );
    assert_eq!(issues[0].node_id, "1");
    assert_eq!(issues[1].node_id, "2");
    assert_eq!(issues[3].node_id, "4");
}

#[test]
fn self_check_ignores_slots_and_types() {
    let mut graph = three_node_graph();
    graph.connect_nodes("1", 12, "3", "image");
    assert_eq!(graph.self_check(), (true, vec![]));
}

#[test]
fn self_check_on_empty_graph_is_clean() {
    assert_eq!(GraphModel::new().self_check(), (true, vec![]));
}

// =============================================================================
// Dependency view
// =============================================================================

#[test]
fn execution_order_respects_links() {
    let graph = fixture_graph(include_str!("fixtures/blur_pipeline.json"));
    let order = graph.link_graph().execution_order().expect("acyclic");
    let pos = |id: &str| order.iter().position(|o| o == id).unwrap();
    assert_eq!(order.len(), 4);
    assert!(pos("2") < pos("3"));
    assert!(pos("3") < pos("4"));
}

#[test]
fn upstream_and_downstream_skip_dangling_links() {
    let mut graph = fixture_graph(include_str!("fixtures/blur_pipeline.json"));
    graph.connect_nodes("77", 0, "4", "extra");
    let links = graph.link_graph();
    assert_eq!(links.upstream("4"), vec!["3"]);
    assert_eq!(links.downstream("2"), vec!["3"]);
    assert!(links.downstream("4").is_empty());
    assert!(links.upstream("77").is_empty());
}

#[test]
fn cyclic_links_have_no_execution_order() {
    let mut graph = GraphModel::new();
    let a = graph.add_node("Reroute", Inputs::new(), None);
    let b = graph.add_node("Reroute", Inputs::new(), None);
    graph.connect_nodes(&a, 0, &b, "value");
    graph.connect_nodes(&b, 0, &a, "value");
    assert!(graph.link_graph().execution_order().is_none());
}
