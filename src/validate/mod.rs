//! Workflow validation against the node schema catalog.
//!
//! Structural rules always run. The catalog-driven rules in [`node_rules`]
//! run only when the catalog holds at least one node type; otherwise the
//! report is marked as not checked against a catalog.

pub mod node_rules;
pub mod report;

pub use crate::diagnostic::{Check, Issue, Severity};
pub use report::ValidationReport;

use tracing::debug;

use crate::catalog::{CatalogSnapshot, SchemaCatalog};
use crate::graph::{GraphModel, check};

/// Validate against the catalog's current snapshot.
pub fn validate(graph: &GraphModel, catalog: &SchemaCatalog) -> ValidationReport {
    validate_snapshot(graph, &catalog.snapshot())
}

/// Validate against one fixed snapshot.
pub fn validate_snapshot(graph: &GraphModel, catalog: &CatalogSnapshot) -> ValidationReport {
    let mut report = ValidationReport {
        issues: Vec::new(),
        node_count: graph.len(),
        checked_against_catalog: catalog.is_loaded(),
    };

    if graph.is_empty() {
        report
            .issues
            .push(Issue::error(Check::EmptyWorkflow, "", "Workflow is empty"));
        return report;
    }

    report.issues.extend(check::structural_issues(graph));

    if report.checked_against_catalog {
        for (id, node) in graph.nodes() {
            report
                .issues
                .extend(node_rules::validate_node(id, node, graph, catalog));
        }
    }

    debug!(
        nodes = report.node_count,
        errors = report.errors().len(),
        warnings = report.warnings().len(),
        checked_against_catalog = report.checked_against_catalog,
        "workflow validated"
    );
    report
}
