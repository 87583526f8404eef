//! Per-node rules that compare a node against the catalog.
//!
//! Link validity is structural and reported by [`crate::graph::check`]; the
//! rules here skip links whose source is absent.

use serde_json::Value;

use crate::catalog::{CatalogSnapshot, InputSpec, NodeTypeSchema, WILDCARD_TAG};
use crate::diagnostic::{Check, Issue};
use crate::graph::{GraphModel, Link, NodeInstance};

/// How many fuzzy suggestions are considered for an unknown class type.
pub const SUGGESTION_LIMIT: usize = 3;

/// Run every catalog rule on one node. Returns all issues found.
pub fn validate_node(
    id: &str,
    node: &NodeInstance,
    graph: &GraphModel,
    catalog: &CatalogSnapshot,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    let Some(class_type) = node.class_type() else {
        return issues;
    };
    let schema = catalog.get(class_type);

    type_exists(id, class_type, catalog, &mut issues);
    if let Some(schema) = schema {
        required_inputs(id, node, schema, &mut issues);
    }
    slot_range(id, node, graph, catalog, &mut issues);
    if let Some(schema) = schema {
        type_compatibility(id, node, schema, graph, catalog, &mut issues);
        value_range(id, node, schema, &mut issues);
        enumerated_choice(id, node, schema, &mut issues);
    }

    issues
}

fn type_exists(id: &str, class_type: &str, catalog: &CatalogSnapshot, issues: &mut Vec<Issue>) {
    if catalog.exists(class_type) {
        return;
    }
    let suggestion = catalog
        .suggest_similar(class_type, SUGGESTION_LIMIT)
        .into_iter()
        .next();
    issues.push(
        Issue::error(
            Check::TypeExists,
            id,
            format!("Node '{}' uses unknown type '{}'", id, class_type),
        )
        .with_suggestion(suggestion),
    );
}

fn required_inputs(id: &str, node: &NodeInstance, schema: &NodeTypeSchema, issues: &mut Vec<Issue>) {
    for name in schema.required_inputs.keys() {
        if node.input(name).is_none() {
            issues.push(Issue::error(
                Check::RequiredInputs,
                id,
                format!(
                    "Node '{}' ({}) missing required input '{}'",
                    id, schema.class_type, name
                ),
            ));
        }
    }
}

/// The source node's class type, if the link resolves to a node that has one.
fn source_class<'g>(link: &Link, graph: &'g GraphModel) -> Option<&'g str> {
    graph.node(&link.source)?.class_type()
}

fn slot_range(
    id: &str,
    node: &NodeInstance,
    graph: &GraphModel,
    catalog: &CatalogSnapshot,
    issues: &mut Vec<Issue>,
) {
    for (input, link) in node.links() {
        let Some(source_type) = source_class(link, graph) else {
            continue;
        };
        let Some(source_schema) = catalog.get(source_type) else {
            continue;
        };
        let outputs = source_schema.output_count();
        if link.slot >= outputs {
            issues.push(Issue::error(
                Check::SlotRange,
                id,
                format!(
                    "Node '{}' input '{}' uses slot {} from node '{}' ({}), but it only has {} output(s)",
                    id, input, link.slot, link.source, source_type, outputs
                ),
            ));
        }
    }
}

fn type_compatibility(
    id: &str,
    node: &NodeInstance,
    schema: &NodeTypeSchema,
    graph: &GraphModel,
    catalog: &CatalogSnapshot,
    issues: &mut Vec<Issue>,
) {
    for (input, link) in node.links() {
        let Some(source_type) = source_class(link, graph) else {
            continue;
        };
        let Some(produced) = catalog.output_type_at(source_type, link.slot) else {
            continue;
        };
        let Some(spec) = schema.input(input) else {
            continue;
        };
        let expected = spec.kind.tag();

        // Advisory only.
        if spec.kind.is_wildcard() || produced == WILDCARD_TAG || produced == expected {
            continue;
        }
        issues.push(Issue::warning(
            Check::TypeCompatibility,
            id,
            format!(
                "Node '{}' input '{}' expects '{}' but receives '{}' from node '{}' slot {}",
                id, input, expected, produced, link.source, link.slot
            ),
        ));
    }
}

fn literal_inputs<'n>(
    node: &'n NodeInstance,
    schema: &'n NodeTypeSchema,
) -> impl Iterator<Item = (&'n InputSpec, &'n Value)> {
    node.inputs().filter_map(move |(name, value)| {
        let literal = value.as_literal()?;
        Some((schema.input(name)?, literal))
    })
}

fn value_range(id: &str, node: &NodeInstance, schema: &NodeTypeSchema, issues: &mut Vec<Issue>) {
    for (spec, literal) in literal_inputs(node, schema) {
        let Some(value) = literal.as_f64() else {
            continue;
        };
        if let Some(min) = spec.min.filter(|&min| value < min) {
            issues.push(Issue::warning(
                Check::ValueRange,
                id,
                format!(
                    "Node '{}' ({}) {}={}, minimum is {}",
                    id, schema.class_type, spec.name, literal, min
                ),
            ));
        }
        if let Some(max) = spec.max.filter(|&max| value > max) {
            issues.push(Issue::warning(
                Check::ValueRange,
                id,
                format!(
                    "Node '{}' ({}) {}={}, maximum is {}",
                    id, schema.class_type, spec.name, literal, max
                ),
            ));
        }
    }
}

/// Warns; file-backed option lists may lag behind the host.
fn enumerated_choice(id: &str, node: &NodeInstance, schema: &NodeTypeSchema, issues: &mut Vec<Issue>) {
    for (spec, literal) in literal_inputs(node, schema) {
        let (Some(options), Some(chosen)) = (spec.kind.options(), literal.as_str()) else {
            continue;
        };
        if options.is_empty() || options.iter().any(|o| o == chosen) {
            continue;
        }
        issues.push(Issue::warning(
            Check::EnumeratedChoice,
            id,
            format!(
                "Node '{}' ({}) {}='{}' not in allowed values",
                id, schema.class_type, spec.name, chosen
            ),
        ));
    }
}
