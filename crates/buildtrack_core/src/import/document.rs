//! Document parser for Markdown/plain-text task lists.
//!
//! Composes block splitting and field extraction. Text extracted from PDFs
//! goes through the same path once line breaks are reconstructed.

use crate::import::fields::{extract_fields, FieldError};
use crate::import::normalize::{normalize_records, NormalizedBatch};
use crate::import::splitter::split_blocks;
use crate::model::task::{ExtractedTaskRecord, RawTaskFields};
use log::debug;
use std::borrow::Cow;

/// Separator emitted between rendered blocks.
pub const BLOCK_SEPARATOR: &str = "\n\n---\n\n";

const DUE_DATE_LABEL: &str = "**Due Date:**";

/// Extracts raw field maps from every block that has a title line.
///
/// Blocks without a `# Task:` line are skipped. Output keeps block order.
pub fn extract_document(text: &str) -> Vec<RawTaskFields> {
    let mut extracted = Vec::new();
    let mut skipped = 0usize;

    for block in split_blocks(text) {
        match extract_fields(block) {
            Ok(fields) => extracted.push(fields),
            Err(FieldError::NoTitleFound) => skipped += 1,
        }
    }

    debug!(
        "event=document_extract module=import status=ok blocks_with_title={} blocks_skipped={}",
        extracted.len(),
        skipped
    );
    extracted
}

/// Parses a document into normalized records plus a rejection count.
pub fn parse_document_batch(text: &str) -> NormalizedBatch {
    normalize_records(extract_document(text))
}

/// Parses a document into canonical task records.
///
/// Returns an empty vector, not an error, when nothing yields a title.
pub fn parse_document(text: &str) -> Vec<ExtractedTaskRecord> {
    parse_document_batch(text).records
}

/// Renders one record in the canonical block template.
///
/// The due-date line is omitted when no date is set. In that case a
/// `**Due Date:**` label inside the description is written unbolded, so a
/// re-parse cannot pick a date up from the description. A description that
/// itself contains a `---` line will not survive a re-parse intact.
pub fn render_block(record: &ExtractedTaskRecord) -> String {
    let mut out = format!(
        "# Task: {}\n\n**Priority:** {}\n**Status:** {}\n",
        record.title,
        record.priority.as_str(),
        record.status.label()
    );
    let description = match record.due_date {
        Some(due_date) => {
            out.push_str(&format!("**Due Date:** {}\n", due_date.format("%Y-%m-%d")));
            Cow::Borrowed(record.description.as_str())
        }
        None => Cow::Owned(record.description.replace(DUE_DATE_LABEL, "Due Date:")),
    };
    out.push_str("\n**Description:**\n");
    out.push_str(&description);
    out
}

/// Renders records as one document, blocks separated by `---` lines.
pub fn render_document(records: &[ExtractedTaskRecord]) -> String {
    records
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::{extract_document, parse_document, render_block};
    use crate::model::task::{ExtractedTaskRecord, Priority, TaskStatus};
    use chrono::NaiveDate;

    #[test]
    fn skips_blocks_without_title() {
        let text = "# Task: A\n---\n**Priority:** High\n---\n# Task: B";
        let raws = extract_document(text);
        assert_eq!(raws.len(), 2);
        assert_eq!(raws[1].title.as_deref(), Some("B"));
    }

    #[test]
    fn empty_document_yields_no_records() {
        assert!(parse_document("").is_empty());
        assert!(parse_document("just some notes\nwithout tasks").is_empty());
    }

    #[test]
    fn render_block_matches_template() {
        let record = ExtractedTaskRecord {
            title: "Inspect formwork".to_string(),
            priority: Priority::High,
            status: TaskStatus::WaitingForApproval,
            description: "Check ties.".to_string(),
            due_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            assignee_email: None,
        };
        assert_eq!(
            render_block(&record),
            "# Task: Inspect formwork\n\n**Priority:** High\n**Status:** Waiting for Approval\n**Due Date:** 2025-03-01\n\n**Description:**\nCheck ties."
        );
    }

    #[test]
    fn undated_record_keeps_no_date_after_reparse() {
        let mut record = ExtractedTaskRecord::new("Pour footing");
        record.description = "Ask about **Due Date:** 2025-01-01 for pour.".to_string();

        let rendered = render_block(&record);
        assert!(rendered.ends_with("**Description:**\nAsk about Due Date: 2025-01-01 for pour."));

        let reparsed = parse_document(&rendered);
        assert_eq!(reparsed.len(), 1);
        assert_eq!(reparsed[0].due_date, None);
        assert_eq!(reparsed[0].description, "Ask about Due Date: 2025-01-01 for pour.");
    }

    #[test]
    fn dated_record_keeps_description_verbatim() {
        let mut record = ExtractedTaskRecord::new("Pour footing");
        record.due_date = NaiveDate::from_ymd_opt(2025, 4, 2);
        record.description = "Moved from **Due Date:** 2025-01-01.".to_string();

        let reparsed = parse_document(&render_block(&record));
        assert_eq!(reparsed[0].due_date, NaiveDate::from_ymd_opt(2025, 4, 2));
        assert_eq!(reparsed[0].description, record.description);
    }
}
