use serde_json::{Value, json};
use workflow_check::graph::Inputs;
use workflow_check::{Check, GraphModel, InputValue, Issue, SchemaCatalog, ValidationReport};

// =============================================================================
// Catalog builders
// =============================================================================

pub fn object_info() -> Value {
    serde_json::from_str(include_str!("../fixtures/object_info.json")).expect("fixture parses")
}

/// Catalog loaded from `fixtures/object_info.json`.
pub fn fixture_catalog() -> SchemaCatalog {
    catalog_from(&object_info())
}

pub fn catalog_from(payload: &Value) -> SchemaCatalog {
    let catalog = SchemaCatalog::default();
    catalog.load_payload(payload).expect("payload loads");
    catalog
}

/// `LoadImage` (no inputs, one IMAGE output) and `Blur` (requires an IMAGE).
pub fn load_and_blur_payload() -> Value {
    json!({
        "LoadImage": {
            "input": {"required": {}},
            "output": ["IMAGE"],
            "output_name": ["IMAGE"],
            "category": "image"
        },
        "Blur": {
            "input": {"required": {"image": ["IMAGE"]}},
            "output": ["IMAGE"],
            "output_name": ["IMAGE"],
            "category": "image"
        }
    })
}

// =============================================================================
// Graph builders
// =============================================================================

pub fn inputs(pairs: &[(&str, Value)]) -> Inputs {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), InputValue::from(value.clone())))
        .collect()
}

pub fn fixture_graph(json: &str) -> GraphModel {
    GraphModel::parse(json).expect("workflow fixture parses")
}

/// Node "1" = LoadImage, node "2" = Blur with `image = ["1", slot]`.
pub fn load_and_blur_graph(slot: usize) -> GraphModel {
    let mut graph = GraphModel::new();
    let load = graph.add_node("LoadImage", Inputs::new(), None);
    let blur = graph.add_node("Blur", Inputs::new(), None);
    assert!(graph.connect_nodes(&load, slot, &blur, "image"));
    graph
}

// =============================================================================
// Assertions
// =============================================================================

pub fn checks(issues: &[Issue]) -> Vec<Check> {
    issues.iter().map(|i| i.check).collect()
}

pub fn assert_has_issue(report: &ValidationReport, check: Check, node_id: &str) {
    assert!(
        report
            .issues
            .iter()
            .any(|i| i.check == check && i.node_id == node_id),
        "Expected {} on node '{}', got: {:#?}",
        check,
        node_id,
        report.issues
    );
}

pub fn assert_no_issue(report: &ValidationReport, check: Check) {
    assert!(
        !report.issues.iter().any(|i| i.check == check),
        "Did not expect {}, but got: {:#?}",
        check,
        report.issues
    );
}
