//! # Property-Based Tests
//!
//! Invariants of the lineage engine over arbitrary record streams.

use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::mpsc;
use thoughtline_core::{
    BranchContext, ClientReconciler, EdgeKind, IdentityResolver, NodeId, SyncMessage,
    ThoughtEngine, ThoughtRecord,
};

// =============================================================================
// GENERATORS
// =============================================================================

/// A record drawn from a small number space so that numbers repeat across
/// lines and references often resolve.
fn record_strategy() -> impl Strategy<Value = ThoughtRecord> {
    (
        1u32..8,
        prop::option::of(1u32..8),
        prop::option::of((1u32..8, prop::sample::select(vec!["a", "b", "c"]))),
        "[a-z ]{1,12}",
    )
        .prop_map(|(n, revises, branch, text)| {
            let mut record = ThoughtRecord::new(text, n, 8);
            if let Some((origin, id)) = branch {
                record = record.branching(origin, id);
            }
            if let Some(target) = revises {
                record = record.revising(target);
            }
            record
        })
}

/// Node of the most recent record numbered `n`, found by walking history
/// backward.
fn scan_latest(history: &[ThoughtRecord], n: u32) -> Option<NodeId> {
    history
        .iter()
        .rev()
        .find(|r| r.thought_number == n)
        .map(ThoughtRecord::node_id)
}

/// Node of an earlier record on `context` numbered `n`, by scanning history.
fn scan_in_context(history: &[ThoughtRecord], context: &BranchContext, n: u32) -> Option<NodeId> {
    history
        .iter()
        .rev()
        .find(|r| r.thought_number == n && r.context() == *context)
        .map(ThoughtRecord::node_id)
}

/// Expected edge totals from a plain backward scan over each record's
/// predecessors. Shares no code with the resolver or the builder.
fn expected_totals(records: &[ThoughtRecord]) -> (usize, usize, usize) {
    let mut linear = BTreeSet::new();
    let mut branch = BTreeSet::new();
    let mut revision = BTreeSet::new();

    for (i, record) in records.iter().enumerate() {
        let history = &records[..i];
        let id = record.node_id();
        let n = record.thought_number;

        if record.branch_from_thought.is_none()
            && n > 1
            && let Some(from) = scan_in_context(history, &record.context(), n - 1)
            && from != id
        {
            linear.insert((from, id.clone()));
        }
        if let Some(origin) = record.branch_from_thought
            && let Some(from) = scan_latest(history, origin)
            && from != id
        {
            branch.insert((from, id.clone()));
        }
        if let Some(target) = record.revises_thought
            && let Some(to) = scan_latest(history, target)
            && to != id
        {
            revision.insert((id.clone(), to));
        }
    }

    (linear.len(), branch.len(), revision.len())
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Exactly one node per distinct composite id.
    #[test]
    fn one_node_per_composite_id(records in prop::collection::vec(record_strategy(), 1..40)) {
        let mut engine = ThoughtEngine::new();
        for record in &records {
            engine.ingest_record(record).expect("ingest");
        }

        let distinct: BTreeSet<_> = records.iter().map(ThoughtRecord::node_id).collect();
        prop_assert_eq!(engine.store().node_count(), distinct.len());
    }

    /// Edge totals per kind match the resolution rules.
    #[test]
    fn edge_totals_follow_resolution(records in prop::collection::vec(record_strategy(), 1..40)) {
        let mut engine = ThoughtEngine::new();
        for record in &records {
            engine.ingest_record(record).expect("ingest");
        }

        let (linear, branch, revision) = expected_totals(&records);
        prop_assert_eq!(engine.store().edge_count_of(EdgeKind::Linear), linear);
        prop_assert_eq!(engine.store().edge_count_of(EdgeKind::Branch), branch);
        prop_assert_eq!(engine.store().edge_count_of(EdgeKind::Revision), revision);
    }

    /// The incremental index agrees with a backward scan of history after
    /// every record, for every number and context.
    #[test]
    fn resolver_matches_backward_scan(records in prop::collection::vec(record_strategy(), 1..40)) {
        let mut resolver = IdentityResolver::new();
        let contexts = [
            BranchContext::Main,
            BranchContext::Branch("a".into()),
            BranchContext::Branch("b".into()),
            BranchContext::Branch("c".into()),
        ];

        for (i, record) in records.iter().enumerate() {
            resolver.record(record);
            let history = &records[..=i];
            for n in 1u32..8 {
                prop_assert_eq!(resolver.resolve(n).cloned(), scan_latest(history, n));
                for context in &contexts {
                    prop_assert_eq!(
                        resolver.resolve_in_context(context, n).cloned(),
                        scan_in_context(history, context, n)
                    );
                }
            }
        }
    }

    /// Replaying init-of-empty plus every delta reproduces the snapshot,
    /// even when every message is delivered twice.
    #[test]
    fn delta_stream_reconstructs_snapshot(
        records in prop::collection::vec(record_strategy(), 1..40),
        duplicate in any::<bool>()
    ) {
        let mut engine = ThoughtEngine::new();
        let (tx, rx) = mpsc::channel();
        engine.connect(Box::new(tx)).expect("connect");

        for record in &records {
            engine.ingest_record(record).expect("ingest");
        }

        let messages: Vec<SyncMessage> = rx.try_iter().collect();
        prop_assert_eq!(messages.len(), records.len() + 1);

        let mut mirror = ClientReconciler::new();
        for message in messages {
            if duplicate {
                mirror.handle(message.clone());
            }
            mirror.handle(message);
        }
        prop_assert_eq!(mirror.snapshot(), engine.snapshot());
    }

    /// An observer joining mid-stream converges to the same graph.
    #[test]
    fn late_join_converges(
        records in prop::collection::vec(record_strategy(), 2..40),
        split in 0usize..40
    ) {
        let split = split % records.len();
        let mut engine = ThoughtEngine::new();
        for record in &records[..split] {
            engine.ingest_record(record).expect("ingest");
        }

        let (tx, rx) = mpsc::channel();
        engine.connect(Box::new(tx)).expect("connect");
        for record in &records[split..] {
            engine.ingest_record(record).expect("ingest");
        }

        let mut mirror = ClientReconciler::new();
        for message in rx.try_iter() {
            mirror.handle(message);
        }
        prop_assert_eq!(mirror.snapshot(), engine.snapshot());
    }

    /// Ingesting the same stream twice yields identical graphs.
    #[test]
    fn ingestion_is_deterministic(records in prop::collection::vec(record_strategy(), 1..40)) {
        let mut first = ThoughtEngine::new();
        let mut second = ThoughtEngine::new();
        for record in &records {
            first.ingest_record(record).expect("ingest");
            second.ingest_record(record).expect("ingest");
        }
        prop_assert_eq!(first.snapshot(), second.snapshot());
    }
}
