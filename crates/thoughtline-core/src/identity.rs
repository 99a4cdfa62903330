//! # Identity Resolver
//!
//! Stable node identity and reference resolution.
//!
//! A record's node id is its branch context plus its thought number. A
//! reference (`revisesThought`, `branchFromThought`) denotes the most recent
//! record carrying that number, on any line. Instead of scanning history
//! backward on every lookup, the resolver keeps two indexes that are updated
//! once per accepted record.

use crate::{BranchContext, NodeId, ThoughtRecord};
use std::collections::BTreeMap;

/// Incrementally maintained identity index over the accepted history.
#[derive(Debug, Clone, Default)]
pub struct IdentityResolver {
    /// `(context, thoughtNumber) -> node id`
    by_context: BTreeMap<(BranchContext, u32), NodeId>,
    /// `thoughtNumber -> id of the latest record with that number`
    latest_by_number: BTreeMap<u32, NodeId>,
    /// Number of records indexed so far.
    recorded: usize,
}

impl IdentityResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a referenced thought number to the node of the latest record
    /// carrying it. `None` if no such record has been indexed.
    #[must_use]
    pub fn resolve(&self, thought_number: u32) -> Option<&NodeId> {
        self.latest_by_number.get(&thought_number)
    }

    /// Look up the node for an exact `(context, thoughtNumber)` pair.
    #[must_use]
    pub fn resolve_in_context(
        &self,
        context: &BranchContext,
        thought_number: u32,
    ) -> Option<&NodeId> {
        // BTreeMap lookups need an owned key; contexts are short strings.
        self.by_context.get(&(context.clone(), thought_number))
    }

    /// Index an accepted record. Must be called after the record's edges have
    /// been derived so that a record never resolves to itself.
    pub fn record(&mut self, record: &ThoughtRecord) {
        let id = record.node_id();
        self.by_context
            .insert((record.context(), record.thought_number), id.clone());
        self.latest_by_number.insert(record.thought_number, id);
        self.recorded = self.recorded.saturating_add(1);
    }

    /// Number of records indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recorded
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recorded == 0
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_reference_is_none() {
        let resolver = IdentityResolver::new();
        assert!(resolver.resolve(1).is_none());
        assert!(resolver.is_empty());
    }

    #[test]
    fn resolves_latest_occurrence_across_lines() {
        let mut resolver = IdentityResolver::new();
        resolver.record(&ThoughtRecord::new("a", 1, 3));
        resolver.record(&ThoughtRecord::new("b", 2, 3));
        resolver.record(&ThoughtRecord::new("c", 2, 3).branching(1, "alt"));

        assert_eq!(resolver.resolve(2).map(NodeId::as_str), Some("alt-2"));
        assert_eq!(resolver.resolve(1).map(NodeId::as_str), Some("main-1"));
        assert_eq!(resolver.len(), 3);
    }

    #[test]
    fn context_lookup_is_exact() {
        let mut resolver = IdentityResolver::new();
        resolver.record(&ThoughtRecord::new("a", 4, 5).branching(2, "B1"));

        let branch = BranchContext::Branch("B1".into());
        assert_eq!(
            resolver.resolve_in_context(&branch, 4).map(NodeId::as_str),
            Some("B1-4")
        );
        assert!(resolver.resolve_in_context(&BranchContext::Main, 4).is_none());
    }

    #[test]
    fn later_record_shadows_earlier_one() {
        let mut resolver = IdentityResolver::new();
        resolver.record(&ThoughtRecord::new("a", 3, 3).branching(1, "x"));
        resolver.record(&ThoughtRecord::new("b", 3, 3));

        assert_eq!(resolver.resolve(3).map(NodeId::as_str), Some("main-3"));
    }
}
