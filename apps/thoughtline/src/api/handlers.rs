//! # API Endpoint Handlers

use super::{
    AppState,
    types::{HealthResponse, ThoughtFailure},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use thoughtline_core::{GraphMetrics, SyncMessage, display};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STATUS HANDLER
// =============================================================================

/// Graph metrics.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.engine.read().await;
    (StatusCode::OK, Json(GraphMetrics::from_engine(&engine)))
}

// =============================================================================
// GRAPH HANDLER
// =============================================================================

/// Current snapshot, shaped like the `init` message an observer receives.
pub async fn graph_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.engine.read().await.snapshot();
    (StatusCode::OK, Json(SyncMessage::Init(snapshot)))
}

// =============================================================================
// THOUGHT HANDLER
// =============================================================================

/// Ingest one thought record.
///
/// 200 with the ingestion summary, or 400 with `{ error, status: "failed" }`.
/// The graph and observers are only touched on success. A body that is not
/// JSON, or lacks the JSON content type, gets the same failure payload.
pub async fn thought_handler(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let input = match body {
        Ok(Json(input)) => input,
        Err(rejection) => {
            tracing::warn!("Thought body rejected: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(ThoughtFailure::new(rejection.body_text())),
            )
                .into_response();
        }
    };

    let mut engine = state.engine.write().await;
    match engine.ingest(&input) {
        Ok(outcome) => {
            tracing::debug!(
                thought = outcome.record.thought_number,
                new_edges = outcome.delta.new_edges.len(),
                delivered = outcome.delivered,
                "thought accepted"
            );
            if state.display {
                eprintln!("{}", display::format_thought(&outcome.record));
            }
            (StatusCode::OK, Json(outcome.summary)).into_response()
        }
        Err(e) => {
            tracing::warn!("Thought rejected: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(ThoughtFailure::new(e.to_string())),
            )
                .into_response()
        }
    }
}
