//! # Thought Engine
//!
//! The sequential ingestion pipeline:
//!
//! ```text
//! raw record -> RecordValidator -> GraphBuilder -> GraphStore -> SyncBroadcaster
//!                                       ^
//!                               IdentityResolver
//! ```
//!
//! Each call validates, derives, appends and broadcasts before returning.
//! A rejected record leaves every component untouched.

use crate::builder::GraphBuilder;
use crate::graph::{Delta, GraphStore, Snapshot};
use crate::identity::IdentityResolver;
use crate::sync::{ObserverId, ObserverSink, SyncBroadcaster};
use crate::validator::RecordValidator;
use crate::{LineageError, ThoughtRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

// =============================================================================
// OUTCOME
// =============================================================================

/// Success payload returned to the ingestion caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSummary {
    pub thought_number: u32,
    pub total_thoughts: u32,
    pub next_thought_needed: bool,
    /// Known branch ids in first-seen order.
    pub branches: Vec<String>,
    pub thought_history_length: usize,
}

/// Everything one accepted ingestion produced.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    /// The normalized record as stored in history.
    pub record: ThoughtRecord,
    /// What changed in the graph (also what observers were sent).
    pub delta: Delta,
    /// Observers that accepted the delta.
    pub delivered: usize,
    pub summary: IngestSummary,
}

// =============================================================================
// ENGINE
// =============================================================================

/// Owns history, identity index, graph and observer registry.
#[derive(Debug, Default)]
pub struct ThoughtEngine {
    history: Vec<ThoughtRecord>,
    branch_order: Vec<String>,
    branch_seen: BTreeSet<String>,
    resolver: IdentityResolver,
    store: GraphStore,
    broadcaster: SyncBroadcaster,
}

impl ThoughtEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and ingest an untyped record.
    pub fn ingest(&mut self, input: &Value) -> Result<IngestOutcome, LineageError> {
        let record = RecordValidator::validate(input)?;
        Ok(self.commit(record))
    }

    /// Validate and ingest a typed record.
    pub fn ingest_record(&mut self, record: &ThoughtRecord) -> Result<IngestOutcome, LineageError> {
        let record = RecordValidator::validate_record(record)?;
        Ok(self.commit(record))
    }

    fn commit(&mut self, record: ThoughtRecord) -> IngestOutcome {
        // Derive against history *before* indexing the record itself.
        let derivation = GraphBuilder::derive(&self.resolver, &record);
        self.resolver.record(&record);
        let delta = self.store.apply(derivation.node, derivation.edges);

        if let Some(branch) = &record.branch_id
            && self.branch_seen.insert(branch.clone())
        {
            self.branch_order.push(branch.clone());
        }
        self.history.push(record.clone());

        let delivered = self.broadcaster.broadcast(&delta);
        let summary = self.summary(&record);

        IngestOutcome {
            record,
            delta,
            delivered,
            summary,
        }
    }

    fn summary(&self, record: &ThoughtRecord) -> IngestSummary {
        IngestSummary {
            thought_number: record.thought_number,
            total_thoughts: record.total_thoughts,
            next_thought_needed: record.next_thought_needed,
            branches: self.branch_order.clone(),
            thought_history_length: self.history.len(),
        }
    }

    /// Register an observer; it immediately receives `init`.
    pub fn connect(&mut self, sink: Box<dyn ObserverSink>) -> Result<ObserverId, LineageError> {
        self.broadcaster.connect(self.store.snapshot(), sink)
    }

    /// Unregister an observer.
    pub fn disconnect(&mut self, id: ObserverId) -> bool {
        self.broadcaster.disconnect(id)
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    #[must_use]
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    #[must_use]
    pub fn history(&self) -> &[ThoughtRecord] {
        &self.history
    }

    #[must_use]
    pub fn branches(&self) -> &[String] {
        &self.branch_order
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.broadcaster.observer_count()
    }
}

// =============================================================================
// TESTS
// =============================================================================
