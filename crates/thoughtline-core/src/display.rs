//! # Console Display
//!
//! Human-readable rendering of an accepted record. Pure formatting; it has
//! no influence on graph state.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ 🔄 Revision 5/5 (revising thought 3) │
//! ├──────────────────────────────┤
//! │ reconsider the estimate      │
//! └──────────────────────────────┘
//! ```

use crate::ThoughtRecord;

/// Header line describing the record's role.
#[must_use]
pub fn header(record: &ThoughtRecord) -> String {
    let position = format!("{}/{}", record.thought_number, record.total_thoughts);

    if record.is_revision() {
        let target = record
            .revises_thought
            .map_or_else(|| "?".to_string(), |n| n.to_string());
        format!("🔄 Revision {position} (revising thought {target})")
    } else if let Some(origin) = record.branch_from_thought {
        let branch = record.branch_id.as_deref().unwrap_or("-");
        format!("🌿 Branch {position} (from thought {origin}, ID: {branch})")
    } else {
        format!("💭 Thought {position}")
    }
}

/// Render the record as a bordered box.
#[must_use]
pub fn format_thought(record: &ThoughtRecord) -> String {
    let header = header(record);
    let body: Vec<&str> = record.text.lines().collect();

    let width = body
        .iter()
        .map(|line| line.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
        + 2;
    let border = "─".repeat(width);

    let mut out = String::new();
    out.push_str(&format!("┌{border}┐\n"));
    out.push_str(&format!("│ {} │\n", pad(&header, width - 2)));
    out.push_str(&format!("├{border}┤\n"));
    for line in body {
        out.push_str(&format!("│ {} │\n", pad(line, width - 2)));
    }
    out.push_str(&format!("└{border}┘"));
    out
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{text}{}", " ".repeat(width.saturating_sub(len)))
}
