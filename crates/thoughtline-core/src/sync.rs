//! # Sync Broadcaster
//!
//! Snapshot-plus-delta protocol for remote observers.
//!
//! - A newly connected observer receives exactly one `init` with the full
//!   snapshot, then one `delta` per accepted record.
//! - Replaying `init` followed by every later `delta` reproduces the store's
//!   snapshot at that point.
//!
//! The broadcaster never blocks: each observer is an [`ObserverSink`] owned
//! by the transport (typically an unbounded channel drained by a socket task).

use crate::graph::{Delta, Snapshot};
use crate::LineageError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// WIRE MESSAGES
// =============================================================================

/// A message of the sync protocol, tagged by `type`.
///
/// ```text
/// { "type": "init",  "nodes": [...], "edges": [...] }
/// { "type": "delta", "newNode": {...}, "newEdges": [...] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SyncMessage {
    Init(Snapshot),
    Delta(Delta),
}

impl SyncMessage {
    /// Encode as a JSON text frame.
    pub fn encode(&self) -> Result<String, LineageError> {
        serde_json::to_string(self).map_err(|e| LineageError::SerializationError(e.to_string()))
    }

    /// Decode a JSON text frame.
    pub fn decode(text: &str) -> Result<Self, LineageError> {
        serde_json::from_str(text).map_err(|e| LineageError::SerializationError(e.to_string()))
    }
}

// =============================================================================
// OBSERVER SINK
// =============================================================================

/// Outbound channel of one observer.
///
/// Implementations must not block and must be shareable across threads.
/// Returning `ObserverClosed` removes the observer from the registry.
pub trait ObserverSink: Send + Sync {
    fn deliver(&self, message: &SyncMessage) -> Result<(), LineageError>;
}

impl ObserverSink for std::sync::mpsc::Sender<SyncMessage> {
    fn deliver(&self, message: &SyncMessage) -> Result<(), LineageError> {
        self.send(message.clone())
            .map_err(|_| LineageError::ObserverClosed)
    }
}

/// Registry handle of a connected observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObserverId(pub u64);

// =============================================================================
// BROADCASTER
// =============================================================================

/// Registry of connected observers.
#[derive(Default)]
pub struct SyncBroadcaster {
    observers: BTreeMap<ObserverId, Box<dyn ObserverSink>>,
    next_id: u64,
}

impl std::fmt::Debug for SyncBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncBroadcaster")
            .field("observers", &self.observers.keys().collect::<Vec<_>>())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl SyncBroadcaster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Send `init` with `snapshot` and register the observer.
    ///
    /// An observer whose sink is already closed is not registered.
    pub fn connect(
        &mut self,
        snapshot: Snapshot,
        sink: Box<dyn ObserverSink>,
    ) -> Result<ObserverId, LineageError> {
        sink.deliver(&SyncMessage::Init(snapshot))?;

        let id = ObserverId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.observers.insert(id, sink);
        Ok(id)
    }

    /// Send one `delta` to every observer. Returns the number of observers
    /// that accepted it; closed observers are dropped.
    pub fn broadcast(&mut self, delta: &Delta) -> usize {
        let message = SyncMessage::Delta(delta.clone());
        self.observers
            .retain(|_, sink| sink.deliver(&message).is_ok());
        self.observers.len()
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn disconnect(&mut self, id: ObserverId) -> bool {
        self.observers.remove(&id).is_some()
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn is_connected(&self, id: ObserverId) -> bool {
        self.observers.contains_key(&id)
    }
}

// =============================================================================
// TESTS
// =============================================================================
