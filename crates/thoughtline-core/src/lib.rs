//! # thoughtline-core
//!
//! The deterministic thought-lineage graph engine.
//!
//! This crate derives a directed graph from an append-only stream of thought
//! records and keeps remote observers synchronized with it through a
//! snapshot-plus-delta protocol.
//!
//! ## Pipeline
//!
//! ```text
//! record -> validator -> builder (+ identity) -> graph -> sync -> reconciler
//! ```
//!
//! ## Architectural Constraints
//!
//! - Single writer: ingestion is strictly sequential
//! - Append-only: nodes and edges are never removed
//! - Deterministic: ids are pure functions of record content, `BTreeMap` only
//! - No async, no network: transports live in the app crates

// =============================================================================
// MODULES
// =============================================================================

pub mod builder;
pub mod display;
pub mod engine;
pub mod graph;
pub mod identity;
pub mod metrics;
pub mod primitives;
pub mod reconciler;
pub mod sync;
pub mod types;
pub mod validator;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{
    BranchContext, EdgeId, EdgeKind, GraphEdge, GraphNode, LineageError, NodeId, NodeKind,
    ThoughtRecord,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use builder::{Derivation, GraphBuilder};
pub use engine::{IngestOutcome, IngestSummary, ThoughtEngine};
pub use graph::{Delta, GraphStore, Snapshot};
pub use identity::IdentityResolver;
pub use metrics::GraphMetrics;
pub use reconciler::{Applied, ClientReconciler, ObserverState};
pub use sync::{ObserverId, ObserverSink, SyncBroadcaster, SyncMessage};
pub use validator::RecordValidator;
