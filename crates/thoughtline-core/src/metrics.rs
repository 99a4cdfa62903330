//! # Graph Metrics
//!
//! Read-only counters over the engine, used for status reporting.
//! Integer arithmetic only.

use crate::engine::ThoughtEngine;
use crate::{EdgeKind, NodeKind};
use serde::{Deserialize, Serialize};

/// Point-in-time counters of the lineage graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphMetrics {
    /// Distinct node ids.
    pub node_count: usize,
    /// Nodes per kind.
    pub main_nodes: usize,
    pub revision_nodes: usize,
    pub branch_nodes: usize,
    /// Total edges and edges per kind.
    pub edge_count: usize,
    pub linear_edges: usize,
    pub branch_edges: usize,
    pub revision_edges: usize,
    /// Distinct branch ids seen.
    pub branch_count: usize,
    /// Accepted records, including those that refreshed an existing node.
    pub history_length: usize,
    /// Currently registered observers.
    pub observer_count: usize,
}

impl GraphMetrics {
    /// Compute metrics from an engine.
    #[must_use]
    pub fn from_engine(engine: &ThoughtEngine) -> Self {
        let store = engine.store();
        let count_nodes = |kind: NodeKind| store.nodes().filter(|n| n.kind == kind).count();

        Self {
            node_count: store.node_count(),
            main_nodes: count_nodes(NodeKind::Main),
            revision_nodes: count_nodes(NodeKind::Revision),
            branch_nodes: count_nodes(NodeKind::Branch),
            edge_count: store.edge_count(),
            linear_edges: store.edge_count_of(EdgeKind::Linear),
            branch_edges: store.edge_count_of(EdgeKind::Branch),
            revision_edges: store.edge_count_of(EdgeKind::Revision),
            branch_count: engine.branches().len(),
            history_length: engine.history().len(),
            observer_count: engine.observer_count(),
        }
    }
}
