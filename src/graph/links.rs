//! petgraph view of a workflow's links, for dependency queries.
//!
//! Edges run from the source node to the node whose input consumes it.
//! Dangling links have no source vertex and are left out.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use super::{GraphModel, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEdge {
    pub slot: usize,
    pub input: String,
}

pub struct LinkGraph {
    pub graph: DiGraph<NodeId, LinkEdge>,
    pub node_indices: HashMap<NodeId, NodeIndex>,
}

impl LinkGraph {
    pub fn build(model: &GraphModel) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();

        for id in model.ids() {
            let idx = graph.add_node(id.to_string());
            node_indices.insert(id.to_string(), idx);
        }

        for (id, node) in model.nodes() {
            let target = node_indices[id];
            for (input, link) in node.links() {
                if let Some(&source) = node_indices.get(&link.source) {
                    graph.add_edge(
                        source,
                        target,
                        LinkEdge {
                            slot: link.slot,
                            input: input.to_string(),
                        },
                    );
                }
            }
        }

        LinkGraph {
            graph,
            node_indices,
        }
    }

    /// Node ids with every node after all of its sources, or `None` if the
    /// links form a cycle.
    pub fn execution_order(&self) -> Option<Vec<NodeId>> {
        toposort(&self.graph, None)
            .ok()
            .map(|order| order.into_iter().map(|idx| self.graph[idx].clone()).collect())
    }

    /// Nodes feeding `id` directly, without duplicates.
    pub fn upstream(&self, id: &str) -> Vec<&str> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Nodes consuming an output of `id` directly, without duplicates.
    pub fn downstream(&self, id: &str) -> Vec<&str> {
        self.neighbors(id, Direction::Outgoing)
    }

    fn neighbors(&self, id: &str, direction: Direction) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(id) else {
            return vec![];
        };
        let mut found: Vec<&str> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| self.graph[n].as_str())
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }
}
