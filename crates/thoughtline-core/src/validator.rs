//! # Record Validator
//!
//! Turns untyped input into a validated [`ThoughtRecord`].
//!
//! - Reject malformed input before any graph mutation
//! - Enforce the relational invariants between revision and branch fields
//! - Raise `totalThoughts` to `thoughtNumber` when exceeded
//! - No semantic inference or enrichment

use crate::primitives::{MAIN_LINE_MARKER, MAX_BRANCH_ID_LENGTH, MAX_THOUGHT_LENGTH};
use crate::{LineageError, ThoughtRecord};
use serde_json::{Map, Value};

/// Validates raw records.
pub struct RecordValidator;

impl RecordValidator {
    /// Validate and normalize a raw record.
    ///
    /// Checks, in order:
    /// 1. Required fields: `thought`, `thoughtNumber`, `totalThoughts`, `nextThoughtNeeded`
    /// 2. Relational invariants between `isRevision`, `revisesThought`,
    ///    `branchId` and `branchFromThought`
    /// 3. Types of the optional fields that are present
    ///
    /// A JSON `null` counts as absent.
    pub fn validate(input: &Value) -> Result<ThoughtRecord, LineageError> {
        let obj = input
            .as_object()
            .ok_or_else(|| invalid("record must be a JSON object"))?;

        // Required fields
        let text = match present(obj, "thought") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::String(_)) => return Err(invalid("thought must not be empty")),
            _ => return Err(invalid("thought must be a string")),
        };
        if text.len() > MAX_THOUGHT_LENGTH {
            return Err(invalid(format!(
                "thought length {} exceeds maximum {} bytes",
                text.len(),
                MAX_THOUGHT_LENGTH
            )));
        }
        let thought_number = required_positive(obj, "thoughtNumber")?;
        let total_thoughts = required_positive(obj, "totalThoughts")?;
        let next_thought_needed = match present(obj, "nextThoughtNeeded") {
            Some(Value::Bool(b)) => *b,
            _ => return Err(invalid("nextThoughtNeeded must be a boolean")),
        };

        // Relational invariants
        let flagged_revision = matches!(present(obj, "isRevision"), Some(Value::Bool(true)));
        let has_revises = present(obj, "revisesThought").is_some();
        if flagged_revision && !has_revises {
            return Err(invalid("isRevision requires revisesThought"));
        }
        if has_revises && !flagged_revision {
            return Err(invalid("revisesThought requires isRevision to be true"));
        }
        if present(obj, "branchId").is_some() && present(obj, "branchFromThought").is_none() {
            return Err(invalid("branchId requires branchFromThought"));
        }

        // Optional field types
        let is_revision = optional_bool(obj, "isRevision")?;
        let revises_thought = optional_positive(obj, "revisesThought")?;
        let branch_from_thought = optional_positive(obj, "branchFromThought")?;
        let needs_more_thoughts = optional_bool(obj, "needsMoreThoughts")?;
        let branch_id = match present(obj, "branchId") {
            None => None,
            Some(Value::String(s)) if s.is_empty() => {
                return Err(invalid("branchId must not be empty"));
            }
            Some(Value::String(s)) if s == MAIN_LINE_MARKER => {
                return Err(invalid(format!(
                    "branchId \"{MAIN_LINE_MARKER}\" is reserved for the main line"
                )));
            }
            Some(Value::String(s)) if s.len() > MAX_BRANCH_ID_LENGTH => {
                return Err(invalid(format!(
                    "branchId length {} exceeds maximum {} bytes",
                    s.len(),
                    MAX_BRANCH_ID_LENGTH
                )));
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err(invalid("branchId must be a string")),
        };

        Ok(ThoughtRecord {
            text,
            thought_number,
            // The estimate only ever moves upward.
            total_thoughts: total_thoughts.max(thought_number),
            next_thought_needed,
            is_revision,
            revises_thought,
            branch_from_thought,
            branch_id,
            needs_more_thoughts,
        })
    }

    /// Re-validate an already typed record, e.g. one built in code or decoded
    /// from a replay file.
    pub fn validate_record(record: &ThoughtRecord) -> Result<ThoughtRecord, LineageError> {
        let value = serde_json::to_value(record)
            .map_err(|e| LineageError::SerializationError(e.to_string()))?;
        Self::validate(&value)
    }
}

fn invalid(msg: impl Into<String>) -> LineageError {
    LineageError::InvalidRecord(msg.into())
}

fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn positive(value: &Value, key: &str) -> Result<u32, LineageError> {
    value
        .as_u64()
        .filter(|n| *n >= 1)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| invalid(format!("{key} must be a positive integer")))
}

fn required_positive(obj: &Map<String, Value>, key: &str) -> Result<u32, LineageError> {
    match present(obj, key) {
        Some(v) => positive(v, key),
        None => Err(invalid(format!("{key} must be a positive integer"))),
    }
}

fn optional_positive(obj: &Map<String, Value>, key: &str) -> Result<Option<u32>, LineageError> {
    present(obj, key).map(|v| positive(v, key)).transpose()
}

fn optional_bool(obj: &Map<String, Value>, key: &str) -> Result<Option<bool>, LineageError> {
    match present(obj, key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(invalid(format!("{key} must be a boolean"))),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Value {
        json!({
            "thought": "consider the input",
            "thoughtNumber": 1,
            "totalThoughts": 3,
            "nextThoughtNeeded": true
        })
    }

    fn with(mut value: Value, key: &str, field: Value) -> Value {
        value[key] = field;
        value
    }

    fn message(result: Result<ThoughtRecord, LineageError>) -> String {
        match result.expect_err("record should be rejected") {
            LineageError::InvalidRecord(msg) => msg,
            other => other.to_string(),
        }
    }

    #[test]
    fn accepts_minimal_record() {
        let record = RecordValidator::validate(&base()).expect("valid");
        assert_eq!(record.thought_number, 1);
        assert_eq!(record.total_thoughts, 3);
        assert!(record.next_thought_needed);
        assert_eq!(record.branch_id, None);
    }

    #[test]
    fn rejects_non_object() {
        assert!(RecordValidator::validate(&json!([1, 2])).is_err());
    }

    #[test]
    fn rejects_missing_required_fields() {
        for key in ["thought", "thoughtNumber", "totalThoughts", "nextThoughtNeeded"] {
            let mut value = base();
            value.as_object_mut().expect("object").remove(key);
            assert!(RecordValidator::validate(&value).is_err(), "missing {key}");
        }
    }

    #[test]
    fn rejects_main_line_marker_as_branch_id() {
        let value = with(
            with(base(), "branchFromThought", json!(1)),
            "branchId",
            json!("main"),
        );
        assert_eq!(
            message(RecordValidator::validate(&value)),
            "branchId \"main\" is reserved for the main line"
        );

        let value = with(
            with(base(), "branchFromThought", json!(1)),
            "branchId",
            json!("mainline"),
        );
        assert!(RecordValidator::validate(&value).is_ok());
    }

    #[test]
    fn rejects_zero_thought_number() {
        let msg = message(RecordValidator::validate(&with(base(), "thoughtNumber", json!(0))));
        assert!(msg.contains("thoughtNumber"));
    }

    #[test]
    fn rejects_fractional_and_negative_numbers() {
        assert!(RecordValidator::validate(&with(base(), "thoughtNumber", json!(1.5))).is_err());
        assert!(RecordValidator::validate(&with(base(), "totalThoughts", json!(-2))).is_err());
    }

    #[test]
    fn rejects_empty_thought() {
        let msg = message(RecordValidator::validate(&with(base(), "thought", json!(""))));
        assert!(msg.contains("empty"));
    }

    #[test]
    fn rejects_revision_without_target() {
        let msg = message(RecordValidator::validate(&with(base(), "isRevision", json!(true))));
        assert_eq!(msg, "isRevision requires revisesThought");
    }

    #[test]
    fn rejects_target_without_revision_flag() {
        let value = with(base(), "revisesThought", json!(1));
        assert!(RecordValidator::validate(&value).is_err());

        let value = with(value, "isRevision", json!(false));
        assert!(RecordValidator::validate(&value).is_err());
    }

    #[test]
    fn rejects_branch_id_without_origin() {
        let msg = message(RecordValidator::validate(&with(base(), "branchId", json!("x"))));
        assert_eq!(msg, "branchId requires branchFromThought");
    }

    #[test]
    fn accepts_branch_origin_without_branch_id() {
        let record = RecordValidator::validate(&with(base(), "branchFromThought", json!(1)))
            .expect("valid");
        assert_eq!(record.branch_from_thought, Some(1));
        assert_eq!(record.branch_id, None);
    }

    #[test]
    fn rejects_wrongly_typed_optionals() {
        let value = with(base(), "needsMoreThoughts", json!("yes"));
        assert!(RecordValidator::validate(&value).is_err());

        let value = with(with(base(), "branchFromThought", json!(1)), "branchId", json!(7));
        assert!(RecordValidator::validate(&value).is_err());
    }

    #[test]
    fn null_optionals_are_absent() {
        let value = with(with(base(), "branchId", Value::Null), "isRevision", Value::Null);
        let record = RecordValidator::validate(&value).expect("valid");
        assert_eq!(record.is_revision, None);
        assert_eq!(record.branch_id, None);
    }

    #[test]
    fn raises_total_thoughts() {
        let value = with(base(), "thoughtNumber", json!(7));
        let record = RecordValidator::validate(&value).expect("valid");
        assert_eq!(record.total_thoughts, 7);

        let value = with(base(), "totalThoughts", json!(10));
        let record = RecordValidator::validate(&value).expect("valid");
        assert_eq!(record.total_thoughts, 10);
    }

    #[test]
    fn rejects_oversized_branch_id() {
        let value = with(
            with(base(), "branchFromThought", json!(1)),
            "branchId",
            json!("b".repeat(MAX_BRANCH_ID_LENGTH + 1)),
        );
        assert!(RecordValidator::validate(&value).is_err());
    }

    #[test]
    fn validate_record_applies_same_rules() {
        let mut record = ThoughtRecord::new("x", 1, 1);
        record.branch_id = Some("b".into());
        assert!(RecordValidator::validate_record(&record).is_err());

        let ok = ThoughtRecord::new("x", 4, 2);
        assert_eq!(
            RecordValidator::validate_record(&ok).expect("valid").total_thoughts,
            4
        );
    }
}
