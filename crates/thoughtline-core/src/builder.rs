//! # Graph Builder
//!
//! Derives graph elements from one accepted record.
//!
//! Every record yields exactly one node and up to three edges:
//! - **linear**: previous thought on the same line -> this thought
//! - **branch**: fork origin -> this thought
//! - **revision**: this thought -> the thought it revises
//!
//! The builder is a pure function of the identity index and the record, so
//! recomputing a derivation later produces identical node and edge ids.

use crate::identity::IdentityResolver;
use crate::primitives::LINEAR_STEP;
use crate::{EdgeKind, GraphEdge, GraphNode, NodeId, ThoughtRecord};

/// The node and edges derived from one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation {
    pub node: GraphNode,
    pub edges: Vec<GraphEdge>,
}

/// Builds derivations. Stateless; reads the resolver only.
pub struct GraphBuilder;

impl GraphBuilder {
    /// Derive the node and edges for `record` against the history indexed in
    /// `resolver`. The record itself must not be indexed yet.
    ///
    /// Unresolvable references drop their edge and nothing else.
    #[must_use]
    pub fn derive(resolver: &IdentityResolver, record: &ThoughtRecord) -> Derivation {
        let node = GraphNode::from_record(record);
        let mut edges = Vec::with_capacity(3);

        if let Some(from) = Self::linear_source(resolver, record) {
            push_edge(&mut edges, from, node.id.clone(), EdgeKind::Linear);
        }

        if let Some(origin) = record.branch_from_thought
            && let Some(from) = resolver.resolve(origin)
        {
            push_edge(&mut edges, from.clone(), node.id.clone(), EdgeKind::Branch);
        }

        if record.is_revision()
            && let Some(target) = record.revises_thought
            && let Some(to) = resolver.resolve(target)
        {
            push_edge(&mut edges, node.id.clone(), to.clone(), EdgeKind::Revision);
        }

        Derivation { node, edges }
    }

    /// Same-context predecessor of a record that is not a branch origin.
    fn linear_source(resolver: &IdentityResolver, record: &ThoughtRecord) -> Option<NodeId> {
        if record.branch_from_thought.is_some() || record.thought_number <= LINEAR_STEP {
            return None;
        }
        resolver
            .resolve_in_context(&record.context(), record.thought_number - LINEAR_STEP)
            .cloned()
    }
}

/// Self-loops only arise when a duplicate id references itself; they are
/// treated like an unresolved reference.
fn push_edge(edges: &mut Vec<GraphEdge>, from: NodeId, to: NodeId, kind: EdgeKind) {
    if from != to {
        edges.push(GraphEdge::new(from, to, kind));
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn index(records: &[ThoughtRecord]) -> IdentityResolver {
        let mut resolver = IdentityResolver::new();
        for record in records {
            resolver.record(record);
        }
        resolver
    }

    fn edge_ids(derivation: &Derivation) -> Vec<&str> {
        derivation.edges.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn first_thought_has_no_edges() {
        let derivation = GraphBuilder::derive(&IdentityResolver::new(), &ThoughtRecord::new("a", 1, 3));
        assert_eq!(derivation.node.id.as_str(), "main-1");
        assert!(derivation.edges.is_empty());
    }

    #[test]
    fn linear_edge_to_same_line_predecessor() {
        let resolver = index(&[ThoughtRecord::new("a", 1, 3)]);
        let derivation = GraphBuilder::derive(&resolver, &ThoughtRecord::new("b", 2, 3));
        assert_eq!(edge_ids(&derivation), vec!["linear:main-1->main-2"]);
    }

    #[test]
    fn missing_predecessor_drops_linear_edge() {
        let resolver = index(&[ThoughtRecord::new("a", 1, 3)]);
        let derivation = GraphBuilder::derive(&resolver, &ThoughtRecord::new("c", 3, 3));
        assert!(derivation.edges.is_empty());
    }

    #[test]
    fn branch_origin_suppresses_linear_edge() {
        let resolver = index(&[
            ThoughtRecord::new("a", 1, 4),
            ThoughtRecord::new("b", 2, 4),
            ThoughtRecord::new("c", 3, 4),
        ]);
        let record = ThoughtRecord::new("d", 4, 4).branching(2, "B1");
        let derivation = GraphBuilder::derive(&resolver, &record);

        assert_eq!(derivation.node.id.as_str(), "B1-4");
        assert_eq!(edge_ids(&derivation), vec!["branch:main-2->B1-4"]);
    }

    #[test]
    fn revision_edge_points_at_revised_thought() {
        let resolver = index(&[
            ThoughtRecord::new("a", 1, 5),
            ThoughtRecord::new("b", 2, 5),
            ThoughtRecord::new("c", 3, 5),
            ThoughtRecord::new("d", 4, 5).branching(2, "B1"),
        ]);
        let record = ThoughtRecord::new("e", 5, 5).revising(3);
        let derivation = GraphBuilder::derive(&resolver, &record);

        assert_eq!(edge_ids(&derivation), vec!["revision:main-5->main-3"]);
    }

    #[test]
    fn unresolved_references_drop_only_their_edges() {
        let resolver = index(&[ThoughtRecord::new("a", 1, 3)]);
        let record = ThoughtRecord::new("b", 2, 3).revising(9);
        let derivation = GraphBuilder::derive(&resolver, &record);

        assert_eq!(derivation.node.id.as_str(), "main-2");
        assert_eq!(edge_ids(&derivation), vec!["linear:main-1->main-2"]);
    }

    #[test]
    fn revision_on_branch_gets_all_resolvable_edges() {
        let resolver = index(&[
            ThoughtRecord::new("a", 1, 4),
            ThoughtRecord::new("b", 2, 4).branching(1, "x"),
        ]);
        let record = ThoughtRecord::new("c", 3, 4).branching(1, "x").revising(2);
        let derivation = GraphBuilder::derive(&resolver, &record);

        assert_eq!(
            edge_ids(&derivation),
            vec!["branch:main-1->x-3", "revision:x-3->x-2"]
        );
    }

    #[test]
    fn self_reference_is_omitted() {
        let resolver = index(&[ThoughtRecord::new("a", 1, 1)]);
        let record = ThoughtRecord::new("again", 1, 1).revising(1);
        let derivation = GraphBuilder::derive(&resolver, &record);

        assert!(derivation.edges.is_empty());
    }

    #[test]
    fn derivation_is_deterministic() {
        let resolver = index(&[ThoughtRecord::new("a", 1, 2)]);
        let record = ThoughtRecord::new("b", 2, 2);
        assert_eq!(
            GraphBuilder::derive(&resolver, &record),
            GraphBuilder::derive(&resolver, &record)
        );
    }
}
