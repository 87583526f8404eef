//! In-memory workflow graph, its text form, and structural checks.

pub mod check;
pub mod extract;
pub mod links;
pub mod mutate;
pub mod types;

pub use links::LinkGraph;
pub use types::*;

use indexmap::IndexMap;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::diagnostic::Issue;
use crate::error::GraphError;

/// A workflow: node id → node, in insertion order.
///
/// Fields are private; edits go through the operations in [`mutate`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphModel {
    nodes: IndexMap<NodeId, NodeInstance>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a workflow from its JSON text.
    pub fn parse(text: &str) -> Result<Self, GraphError> {
        serde_json::from_str::<GraphModel>(text).map_err(|e| {
            if serde_json::from_str::<IgnoredAny>(text).is_ok() {
                GraphError::NotAWorkflow
            } else {
                GraphError::Parse(e)
            }
        })
    }

    /// Pretty-printed JSON.
    pub fn to_text(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".into())
    }

    /// Replace the whole graph with the one in `text`. On error the current
    /// graph is left as it was.
    pub fn from_text(&mut self, text: &str) -> Result<(), GraphError> {
        *self = Self::parse(text)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&NodeInstance> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&str, &NodeInstance)> {
        self.nodes.iter().map(|(id, node)| (id.as_str(), node))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Catalog-independent structural check: missing class types, missing
    /// inputs maps and links to absent nodes.
    pub fn self_check(&self) -> (bool, Vec<Issue>) {
        let issues = check::structural_issues(self);
        (issues.is_empty(), issues)
    }

    /// Directed view of the resolvable links.
    pub fn link_graph(&self) -> LinkGraph {
        LinkGraph::build(self)
    }
}
