//! # API Response Types
//!
//! JSON bodies owned by the HTTP layer. Graph, status and ingestion success
//! payloads are the core types serialized as-is.

use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// INGESTION FAILURE
// =============================================================================

/// Failure payload of `POST /thought`: `{ "error": ..., "status": "failed" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThoughtFailure {
    pub error: String,
    pub status: String,
}

impl ThoughtFailure {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status: "failed".to_string(),
        }
    }
}
