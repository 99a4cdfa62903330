//! # Graph Store
//!
//! The canonical, append-only lineage graph.
//!
//! Nodes and edges live in insertion-ordered arenas (`Vec`) with a `BTreeMap`
//! index from id to slot. Nothing is ever removed, so slots never move and
//! a snapshot is simply the arenas in order.

use crate::{EdgeId, EdgeKind, GraphEdge, GraphNode, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// DELTA
// =============================================================================

/// What one `apply` actually changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delta {
    /// The node, if its id was not present before.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_node: Option<GraphNode>,
    /// The node after an in-place metadata refresh of an existing id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refreshed_node: Option<GraphNode>,
    /// Edges whose ids were not present before, in derivation order.
    #[serde(default)]
    pub new_edges: Vec<GraphEdge>,
}

impl Delta {
    /// Whether the apply changed nothing observable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.new_node.is_none() && self.refreshed_node.is_none() && self.new_edges.is_empty()
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Full node/edge state at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

// =============================================================================
// GRAPH STORE
// =============================================================================

/// Append-only store of all nodes and edges derived so far.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: Vec<GraphNode>,
    node_index: BTreeMap<NodeId, usize>,
    edges: Vec<GraphEdge>,
    edge_index: BTreeMap<EdgeId, usize>,
}

impl GraphStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. Returns `true` if the id was new.
    ///
    /// For an existing id only `label` and `tooltip` are refreshed; the
    /// stored `kind` is kept.
    pub fn add_node(&mut self, node: GraphNode) -> bool {
        match self.node_index.get(&node.id) {
            Some(&slot) => {
                let existing = &mut self.nodes[slot];
                existing.label = node.label;
                existing.tooltip = node.tooltip;
                false
            }
            None => {
                self.node_index.insert(node.id.clone(), self.nodes.len());
                self.nodes.push(node);
                true
            }
        }
    }

    /// Insert an edge. Returns `true` if the id was new; otherwise a no-op.
    pub fn add_edge(&mut self, edge: GraphEdge) -> bool {
        if self.edge_index.contains_key(&edge.id) {
            return false;
        }
        self.edge_index.insert(edge.id.clone(), self.edges.len());
        self.edges.push(edge);
        true
    }

    /// Apply one derivation and report exactly what changed.
    pub fn apply(&mut self, node: GraphNode, edges: Vec<GraphEdge>) -> Delta {
        let mut delta = Delta::default();

        // An existing node keeps its kind; only label and tooltip follow the new record.
        let existing_kind = self.node(&node.id).map(|existing| existing.kind);
        let node = match existing_kind {
            Some(kind) => node.with_kind(kind),
            None => node,
        };

        let stale = self.node(&node.id).map(|existing| existing.metadata_differs(&node));
        match stale {
            None => {
                self.add_node(node.clone());
                delta.new_node = Some(node);
            }
            Some(true) => {
                let id = node.id.clone();
                self.add_node(node);
                delta.refreshed_node = self.node(&id).cloned();
            }
            Some(false) => {}
        }

        for edge in edges {
            if self.add_edge(edge.clone()) {
                delta.new_edges.push(edge);
            }
        }

        delta
    }

    /// All nodes and edges in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.node_index.get(id).map(|&slot| &self.nodes[slot])
    }

    #[must_use]
    pub fn edge(&self, id: &EdgeId) -> Option<&GraphEdge> {
        self.edge_index.get(id).map(|&slot| &self.edges[slot])
    }

    #[must_use]
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node_index.contains_key(id)
    }

    #[must_use]
    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edge_index.contains_key(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of edges of one kind.
    #[must_use]
    pub fn edge_count_of(&self, kind: EdgeKind) -> usize {
        self.edges.iter().filter(|e| e.kind == kind).count()
    }
}

// =============================================================================
// TESTS
// =============================================================================
