//! # CLI Command Implementations

use serde_json::Value;
use std::path::{Path, PathBuf};
use thoughtline::api::{self, AppState};
use thoughtline::config::Config;
use thoughtline_core::{
    GraphMetrics, LineageError, RecordValidator, Snapshot, SyncMessage, ThoughtEngine,
    primitives::MAX_REPLAY_LENGTH,
};

// =============================================================================
// FILE INPUT
// =============================================================================

/// Maximum records file size (100 MB).
const MAX_RECORDS_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Canonicalize and check that `path` is a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, LineageError> {
    let canonical = path.canonicalize().map_err(|e| {
        LineageError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(LineageError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Read a JSON array of raw records.
fn read_records(path: &Path) -> Result<Vec<Value>, LineageError> {
    let path = validate_file_path(path)?;

    let metadata = std::fs::metadata(&path)
        .map_err(|e| LineageError::IoError(format!("Cannot read file metadata: {}", e)))?;
    if metadata.len() > MAX_RECORDS_FILE_SIZE {
        return Err(LineageError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_RECORDS_FILE_SIZE
        )));
    }

    let contents = std::fs::read_to_string(&path)
        .map_err(|e| LineageError::IoError(format!("Cannot read file: {}", e)))?;
    let parsed: Value = serde_json::from_str(&contents)
        .map_err(|e| LineageError::SerializationError(format!("Invalid JSON: {}", e)))?;

    let Value::Array(records) = parsed else {
        return Err(LineageError::SerializationError(
            "Expected a JSON array of thought records".to_string(),
        ));
    };
    if records.len() > MAX_REPLAY_LENGTH {
        return Err(LineageError::SerializationError(format!(
            "{} records exceeds maximum of {}",
            records.len(),
            MAX_REPLAY_LENGTH
        )));
    }

    Ok(records)
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP/WebSocket server.
pub async fn cmd_server(config: Config) -> Result<(), LineageError> {
    let addr = config.bind_addr();

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        display = config.display.enabled,
        "starting server"
    );
    eprintln!("Endpoints:");
    eprintln!("  POST /thought - Ingest a thought record");
    eprintln!("  GET  /graph   - Current graph snapshot");
    eprintln!("  GET  /ws      - Observer channel (init + deltas)");
    eprintln!("  GET  /status  - Graph metrics");
    eprintln!("  GET  /health  - Health check");
    eprintln!();

    let state = AppState::new(ThoughtEngine::new(), config.display.enabled);
    api::run_server(&addr, state).await
}

// =============================================================================
// REPLAY COMMAND
// =============================================================================

/// Result of replaying a record stream through a fresh engine.
#[derive(Debug)]
pub struct ReplayReport {
    /// One line per record, in input order.
    pub lines: Vec<String>,
    pub rejected: usize,
    pub snapshot: Snapshot,
    pub metrics: GraphMetrics,
}

/// Ingest `records` in order. Rejections are reported, never fatal.
pub fn replay_records(records: &[Value]) -> ReplayReport {
    let mut engine = ThoughtEngine::new();
    let mut lines = Vec::with_capacity(records.len());
    let mut rejected = 0;

    for (index, input) in records.iter().enumerate() {
        let position = index + 1;
        match engine.ingest(input) {
            Ok(outcome) => {
                let node = outcome.record.node_id();
                let status = if outcome.delta.new_node.is_some() {
                    "new"
                } else {
                    "refreshed"
                };
                lines.push(format!(
                    "  ✓ #{position} {} ({status}, +{} edges)",
                    node.as_str(),
                    outcome.delta.new_edges.len()
                ));
            }
            Err(e) => {
                rejected += 1;
                lines.push(format!("  ✗ #{position} {e}"));
            }
        }
    }

    ReplayReport {
        lines,
        rejected,
        snapshot: engine.snapshot(),
        metrics: GraphMetrics::from_engine(&engine),
    }
}

/// Replay a records file and print the outcome.
pub fn cmd_replay(file: &Path, json: bool) -> Result<(), LineageError> {
    let records = read_records(file)?;
    let report = replay_records(&records);

    if json {
        let output = serde_json::to_string_pretty(&SyncMessage::Init(report.snapshot))
            .map_err(|e| LineageError::SerializationError(e.to_string()))?;
        println!("{}", output);
        return Ok(());
    }

    for line in &report.lines {
        println!("{}", line);
    }
    let m = &report.metrics;
    println!();
    println!("Replayed {} records ({} rejected)", records.len(), report.rejected);
    println!(
        "  Nodes:    {} (main {}, revision {}, branch {})",
        m.node_count, m.main_nodes, m.revision_nodes, m.branch_nodes
    );
    println!(
        "  Edges:    {} (linear {}, branch {}, revision {})",
        m.edge_count, m.linear_edges, m.branch_edges, m.revision_edges
    );
    println!("  Branches: {}", m.branch_count);
    Ok(())
}

// =============================================================================
// VALIDATE COMMAND
// =============================================================================

/// Validation errors by 1-based record position.
pub fn validate_records(records: &[Value]) -> Vec<(usize, LineageError)> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, input)| RecordValidator::validate(input).err().map(|e| (index + 1, e)))
        .collect()
}

/// Validate a records file. Fails if any record is invalid.
pub fn cmd_validate(file: &Path) -> Result<(), LineageError> {
    let records = read_records(file)?;
    let errors = validate_records(&records);

    for (position, error) in &errors {
        println!("  ✗ #{position} {error}");
    }

    if errors.is_empty() {
        println!("All {} records valid", records.len());
        Ok(())
    } else {
        Err(LineageError::InvalidRecord(format!(
            "{} of {} records invalid",
            errors.len(),
            records.len()
        )))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn session() -> Value {
        json!([
            { "thought": "one", "thoughtNumber": 1, "totalThoughts": 3, "nextThoughtNeeded": true },
            { "thought": "two", "thoughtNumber": 2, "totalThoughts": 3, "nextThoughtNeeded": true },
            { "thought": "fork", "thoughtNumber": 3, "totalThoughts": 3, "nextThoughtNeeded": false,
              "branchFromThought": 1, "branchId": "alt" },
            { "thought": "bad", "thoughtNumber": 0, "totalThoughts": 3, "nextThoughtNeeded": false }
        ])
    }

    fn write_temp(value: &Value) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, "{}", value).expect("write");
        file
    }

    #[test]
    fn replay_reports_each_record() {
        let records = session().as_array().cloned().expect("array");
        let report = replay_records(&records);

        assert_eq!(report.lines.len(), 4);
        assert_eq!(report.rejected, 1);
        assert!(report.lines[0].contains("main-1"));
        assert!(report.lines[2].contains("alt-3 (new, +1 edges)"));
        assert!(report.lines[3].contains("✗ #4"));
        assert_eq!(report.metrics.node_count, 3);
        assert_eq!(report.metrics.linear_edges, 1);
        assert_eq!(report.metrics.branch_edges, 1);
        assert_eq!(report.snapshot.nodes.len(), 3);
    }

    #[test]
    fn validate_collects_positions() {
        let records = session().as_array().cloned().expect("array");
        let errors = validate_records(&records);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, 4);
    }

    #[test]
    fn read_records_from_file() {
        let file = write_temp(&session());
        let records = read_records(file.path()).expect("read");
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn read_records_rejects_non_array() {
        let file = write_temp(&json!({ "thought": "x" }));
        assert!(matches!(
            read_records(file.path()),
            Err(LineageError::SerializationError(_))
        ));
    }

    #[test]
    fn read_records_rejects_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(matches!(
            read_records(dir.path()),
            Err(LineageError::IoError(_))
        ));
    }

    #[test]
    fn validate_command_fails_on_invalid_record() {
        let file = write_temp(&session());
        assert!(cmd_validate(file.path()).is_err());

        let valid = write_temp(&json!([
            { "thought": "ok", "thoughtNumber": 1, "totalThoughts": 1, "nextThoughtNeeded": false }
        ]));
        assert!(cmd_validate(valid.path()).is_ok());
    }
}
