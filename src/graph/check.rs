//! Structural rules that need no catalog.

use super::{GraphModel, NodeInstance};
use crate::diagnostic::{Check, Issue};

/// Run every structural rule, node by node.
pub fn structural_issues(graph: &GraphModel) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (id, node) in graph.nodes() {
        check_node(graph, id, node, &mut issues);
    }
    issues
}

fn check_node(graph: &GraphModel, id: &str, node: &NodeInstance, issues: &mut Vec<Issue>) {
    if node.class_type().is_none() {
        issues.push(Issue::error(
            Check::MissingClassType,
            id,
            format!("Node '{}' is missing 'class_type'", id),
        ));
    }

    if node.inputs.is_none() {
        issues.push(Issue::error(
            Check::MissingInputs,
            id,
            format!("Node '{}' is missing 'inputs'", id),
        ));
        return;
    }

    for (input, link) in node.links() {
        if !graph.contains(&link.source) {
            issues.push(Issue::error(
                Check::LinkValidity,
                id,
                format!(
                    "Node '{}' input '{}' links to non-existent node '{}'",
                    id, input, link.source
                ),
            ));
        }
    }
}
