//! # Core Type Definitions
//!
//! This module contains all core types of the thought-lineage engine:
//! - Input records (`ThoughtRecord`)
//! - Identity (`BranchContext`, `NodeId`, `EdgeId`)
//! - Graph elements (`GraphNode`, `GraphEdge`, `NodeKind`, `EdgeKind`)
//! - Error types (`LineageError`)
//!
//! ## Determinism Guarantees
//!
//! All identifiers implement `Ord` so they can key `BTreeMap`/`BTreeSet`,
//! and every identifier is derived purely from record content.

use crate::primitives::{MAIN_LINE_MARKER, MAX_TOOLTIP_CHARS};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// THOUGHT RECORD
// =============================================================================

/// One validated step of a reasoning sequence.
///
/// Records are produced by the [`crate::validator::RecordValidator`] and are
/// immutable once accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtRecord {
    /// Content of the step.
    #[serde(rename = "thought")]
    pub text: String,
    /// Position of this step. Not globally unique: branches may reuse numbers.
    pub thought_number: u32,
    /// Current estimate of the total number of steps.
    pub total_thoughts: u32,
    /// Whether the caller intends to send another step.
    pub next_thought_needed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_revision: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revises_thought: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_from_thought: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub needs_more_thoughts: Option<bool>,
}

impl ThoughtRecord {
    /// Create a plain main-line record.
    #[must_use]
    pub fn new(text: impl Into<String>, thought_number: u32, total_thoughts: u32) -> Self {
        Self {
            text: text.into(),
            thought_number,
            total_thoughts,
            next_thought_needed: true,
            is_revision: None,
            revises_thought: None,
            branch_from_thought: None,
            branch_id: None,
            needs_more_thoughts: None,
        }
    }

    /// Mark this record as revising an earlier thought number.
    #[must_use]
    pub fn revising(mut self, thought_number: u32) -> Self {
        self.is_revision = Some(true);
        self.revises_thought = Some(thought_number);
        self
    }

    /// Mark this record as forking from an earlier thought number on the given branch.
    #[must_use]
    pub fn branching(mut self, from_thought: u32, branch_id: impl Into<String>) -> Self {
        self.branch_from_thought = Some(from_thought);
        self.branch_id = Some(branch_id.into());
        self
    }

    /// Whether the record is flagged as a revision.
    #[must_use]
    pub fn is_revision(&self) -> bool {
        self.is_revision.unwrap_or(false)
    }

    /// The lineage this record belongs to.
    #[must_use]
    pub fn context(&self) -> BranchContext {
        match &self.branch_id {
            Some(id) => BranchContext::Branch(id.clone()),
            None => BranchContext::Main,
        }
    }

    /// The composite identity of the node this record maps to.
    #[must_use]
    pub fn node_id(&self) -> NodeId {
        NodeId::new(&self.context(), self.thought_number)
    }
}

// =============================================================================
// IDENTITY
// =============================================================================

/// Branch context of a record: the main line or a named branch.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BranchContext {
    Main,
    Branch(String),
}

impl BranchContext {
    /// The prefix used in composite node ids.
    #[must_use]
    pub fn marker(&self) -> &str {
        match self {
            Self::Main => MAIN_LINE_MARKER,
            Self::Branch(id) => id,
        }
    }
}

/// Composite node identifier: `"<branchId|main>-<thoughtNumber>"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    #[must_use]
    pub fn new(context: &BranchContext, thought_number: u32) -> Self {
        Self(format!("{}-{}", context.marker(), thought_number))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Edge identifier, a pure function of `(from, to, kind)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl EdgeId {
    #[must_use]
    pub fn new(from: &NodeId, to: &NodeId, kind: EdgeKind) -> Self {
        Self(format!("{}:{}->{}", kind.as_str(), from, to))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// GRAPH ELEMENTS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Main,
    Revision,
    Branch,
}

impl NodeKind {
    /// Classify a record. Revision takes precedence over branch membership.
    #[must_use]
    pub fn of(record: &ThoughtRecord) -> Self {
        if record.is_revision() {
            Self::Revision
        } else if record.branch_from_thought.is_some() || record.branch_id.is_some() {
            Self::Branch
        } else {
            Self::Main
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Continues the previous step on the same line.
    Linear,
    /// Forks a line from an earlier thought.
    Branch,
    /// Points from a revision to the thought it supersedes.
    Revision,
}

impl EdgeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Branch => "branch",
            Self::Revision => "revision",
        }
    }
}

/// Label suffix of revision nodes.
const REVISION_SUFFIX: &str = " (rev)";

/// A node of the lineage graph. One per distinct [`NodeId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: NodeId,
    pub thought_number: u32,
    pub kind: NodeKind,
    pub label: String,
    pub tooltip: String,
}

impl GraphNode {
    /// Derive the node for a record, including its display metadata.
    #[must_use]
    pub fn from_record(record: &ThoughtRecord) -> Self {
        let kind = NodeKind::of(record);
        let mut label = match &record.branch_id {
            Some(branch) => format!("{}:{}", branch, record.thought_number),
            None => record.thought_number.to_string(),
        };
        if kind == NodeKind::Revision {
            label.push_str(REVISION_SUFFIX);
        }

        Self {
            id: record.node_id(),
            thought_number: record.thought_number,
            kind,
            label,
            tooltip: truncate_chars(&record.text, MAX_TOOLTIP_CHARS),
        }
    }

    /// Re-tag with `kind`, keeping the label suffix in step with it.
    ///
    /// A node's kind is fixed by the record that created it; later records
    /// with the same id only refresh label and tooltip.
    #[must_use]
    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        if let Some(base) = self.label.strip_suffix(REVISION_SUFFIX) {
            self.label = base.to_string();
        }
        if kind == NodeKind::Revision {
            self.label.push_str(REVISION_SUFFIX);
        }
        self.kind = kind;
        self
    }

    /// Whether `other` carries different display metadata for the same node.
    #[must_use]
    pub fn metadata_differs(&self, other: &Self) -> bool {
        self.label != other.label || self.tooltip != other.tooltip
    }
}

/// A directed edge of the lineage graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub kind: EdgeKind,
}

impl GraphEdge {
    #[must_use]
    pub fn new(from: NodeId, to: NodeId, kind: EdgeKind) -> Self {
        Self {
            id: EdgeId::new(&from, &to, kind),
            from,
            to,
            kind,
        }
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors produced by the lineage engine.
///
/// Every failure is local to a single call; nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum LineageError {
    /// The record is malformed or relationally inconsistent.
    #[error("Invalid thought record: {0}")]
    InvalidRecord(String),

    /// A sync message could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An observer's outbound channel is gone.
    #[error("Observer channel closed")]
    ObserverClosed,

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
