//! # Engine Primitives
//!
//! Fixed constants of the lineage engine. They are compiled into the binary
//! and immutable at runtime.

/// Context marker used in node ids for records without a `branchId`.
///
/// - Main-line thought 3 has id `main-3`.
pub const MAIN_LINE_MARKER: &str = "main";

/// Distance between a thought and its linear predecessor on the same line.
///
/// Thought `n` continues thought `n - LINEAR_STEP` in the same branch context.
pub const LINEAR_STEP: u32 = 1;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length of the `thought` text in bytes (64KB).
///
/// Longer records are rejected by the validator.
pub const MAX_THOUGHT_LENGTH: usize = 65536;

/// Maximum length of a `branchId` in bytes.
pub const MAX_BRANCH_ID_LENGTH: usize = 256;

/// Maximum number of records accepted by a single replay batch.
pub const MAX_REPLAY_LENGTH: usize = 10000;

// =============================================================================
// DISPLAY
// =============================================================================

/// Maximum characters of thought text carried in a node tooltip.
pub const MAX_TOOLTIP_CHARS: usize = 280;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_step_is_one() {
        assert_eq!(LINEAR_STEP, 1);
    }

    #[test]
    fn main_marker() {
        assert_eq!(MAIN_LINE_MARKER, "main");
    }
}
