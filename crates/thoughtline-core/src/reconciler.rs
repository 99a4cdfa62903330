//! # Client Reconciler
//!
//! Per-observer mirror of the lineage graph.
//!
//! The mirror is rebuilt from an `init` and kept current by `delta`s.
//! Deltas are applied by id, so duplicate delivery is harmless. No sequence
//! numbers are exchanged: on reconnect the mirror is discarded and the
//! observer waits for a fresh `init`.
//!
//! ```text
//! Connected --init--> Synced --delta--> Live --disconnect--> Disconnected
//!     ^                                                           |
//!     +------------------------- reconnect -----------------------+
//! ```

use crate::graph::{Delta, Snapshot};
use crate::sync::SyncMessage;
use crate::{EdgeId, GraphEdge, GraphNode, NodeId};
use std::collections::BTreeMap;

/// Connection state of one observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverState {
    /// Connected, waiting for `init`.
    Connected,
    /// `init` applied, no delta yet.
    Synced,
    /// At least one delta applied since the last `init`.
    Live,
    /// Transport lost; mirror is stale.
    Disconnected,
}

/// Result of handing one message to the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The message changed the mirror (or replaced it).
    Changed,
    /// Every element was already present.
    Unchanged,
    /// A delta arrived without a preceding `init` and was dropped.
    Ignored,
}

/// Local mirror kept by one observer.
#[derive(Debug, Clone)]
pub struct ClientReconciler {
    state: ObserverState,
    nodes: Vec<GraphNode>,
    node_index: BTreeMap<NodeId, usize>,
    edges: Vec<GraphEdge>,
    edge_index: BTreeMap<EdgeId, usize>,
}

impl Default for ClientReconciler {
    fn default() -> Self {
        Self {
            state: ObserverState::Connected,
            nodes: Vec::new(),
            node_index: BTreeMap::new(),
            edges: Vec::new(),
            edge_index: BTreeMap::new(),
        }
    }
}

impl ClientReconciler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> ObserverState {
        self.state
    }

    /// Dispatch a decoded protocol message.
    pub fn handle(&mut self, message: SyncMessage) -> Applied {
        match message {
            SyncMessage::Init(snapshot) => self.apply_init(snapshot),
            SyncMessage::Delta(delta) => self.apply_delta(delta),
        }
    }

    /// Replace the mirror wholesale.
    pub fn apply_init(&mut self, snapshot: Snapshot) -> Applied {
        self.clear();
        for node in snapshot.nodes {
            self.insert_node(node);
        }
        for edge in snapshot.edges {
            self.insert_edge(edge);
        }
        self.state = ObserverState::Synced;
        Applied::Changed
    }

    /// Merge a delta by id. Ignored until an `init` has been applied.
    pub fn apply_delta(&mut self, delta: Delta) -> Applied {
        if matches!(
            self.state,
            ObserverState::Connected | ObserverState::Disconnected
        ) {
            return Applied::Ignored;
        }

        let mut changed = false;
        if let Some(node) = delta.new_node {
            changed |= self.insert_node(node);
        }
        if let Some(node) = delta.refreshed_node {
            changed |= self.refresh_node(node);
        }
        for edge in delta.new_edges {
            changed |= self.insert_edge(edge);
        }

        self.state = ObserverState::Live;
        if changed {
            Applied::Changed
        } else {
            Applied::Unchanged
        }
    }

    /// The transport dropped. The mirror is kept but no longer trusted.
    pub fn disconnect(&mut self) {
        self.state = ObserverState::Disconnected;
    }

    /// A new connection was established: discard the mirror and wait for `init`.
    pub fn reconnect(&mut self) {
        self.clear();
        self.state = ObserverState::Connected;
    }

    /// Mirror contents in arrival order.
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
    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edge_index.contains_key(id)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.node_index.clear();
        self.edges.clear();
        self.edge_index.clear();
    }

    fn insert_node(&mut self, node: GraphNode) -> bool {
        if self.node_index.contains_key(&node.id) {
            return false;
        }
        self.node_index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    fn refresh_node(&mut self, node: GraphNode) -> bool {
        match self.node_index.get(&node.id) {
            Some(&slot) if self.nodes[slot] != node => {
                self.nodes[slot] = node;
                true
            }
            Some(_) => false,
            None => self.insert_node(node),
        }
    }

    fn insert_edge(&mut self, edge: GraphEdge) -> bool {
        if self.edge_index.contains_key(&edge.id) {
            return false;
        }
        self.edge_index.insert(edge.id.clone(), self.edges.len());
        self.edges.push(edge);
        true
    }
}

// =============================================================================
// TESTS
// =============================================================================
