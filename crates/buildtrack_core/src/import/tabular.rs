//! Tabular parser for spreadsheet-shaped input.
//!
//! # Column contract
//! Row 0 is a header and is always discarded. Data rows are read by
//! position only:
//!
//! | column | field            |
//! |--------|------------------|
//! | 0      | `title`          |
//! | 1      | `priority`       |
//! | 2      | `status`         |
//! | 3      | `description`    |
//! | 4      | `due_date`       |
//! | 5      | `assignee_email` |
//!
//! Header names are not validated, so a reordered sheet misassigns fields.

use crate::import::normalize::{normalize_records, NormalizedBatch};
use crate::model::task::{ExtractedTaskRecord, RawTaskFields};
use log::debug;

pub const COL_TITLE: usize = 0;
pub const COL_PRIORITY: usize = 1;
pub const COL_STATUS: usize = 2;
pub const COL_DESCRIPTION: usize = 3;
pub const COL_DUE_DATE: usize = 4;
pub const COL_ASSIGNEE_EMAIL: usize = 5;

/// Header row written by export tooling; informational only.
pub const HEADER: [&str; 6] = [
    "title",
    "priority",
    "status",
    "description",
    "due_date",
    "assignee_email",
];

/// Extracts raw field maps from data rows, dropping rows without a title.
///
/// Short rows are fine: missing trailing cells are treated as absent.
pub fn extract_grid<S: AsRef<str>>(rows: &[Vec<S>]) -> Vec<RawTaskFields> {
    let mut extracted = Vec::new();
    let mut dropped = 0usize;

    for row in rows.iter().skip(1) {
        if cell(row, COL_TITLE).is_none() {
            dropped += 1;
            continue;
        }
        extracted.push(RawTaskFields {
            title: cell(row, COL_TITLE),
            priority: cell(row, COL_PRIORITY),
            status: cell(row, COL_STATUS),
            description: cell(row, COL_DESCRIPTION),
            due_date: cell(row, COL_DUE_DATE),
            assignee_email: cell(row, COL_ASSIGNEE_EMAIL),
        });
    }

    debug!(
        "event=grid_extract module=import status=ok rows_with_title={} rows_dropped={}",
        extracted.len(),
        dropped
    );
    extracted
}

/// Parses a grid into normalized records plus a rejection count.
pub fn parse_grid_batch<S: AsRef<str>>(rows: &[Vec<S>]) -> NormalizedBatch {
    normalize_records(extract_grid(rows))
}

/// Parses a grid into canonical task records in row order.
pub fn parse_grid<S: AsRef<str>>(rows: &[Vec<S>]) -> Vec<ExtractedTaskRecord> {
    parse_grid_batch(rows).records
}

fn cell<S: AsRef<str>>(row: &[S], index: usize) -> Option<String> {
    row.get(index)
        .map(|value| value.as_ref().trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::{extract_grid, parse_grid, HEADER};
    use crate::model::task::{Priority, TaskStatus};

    #[test]
    fn header_only_grid_yields_nothing() {
        assert!(parse_grid(&[HEADER.to_vec()]).is_empty());
        let empty: Vec<Vec<String>> = Vec::new();
        assert!(parse_grid(&empty).is_empty());
    }

    #[test]
    fn header_row_is_discarded_even_when_it_looks_like_data() {
        let rows = vec![vec!["Excavate trench", "High"], vec!["Backfill", "Low"]];
        let records = parse_grid(&rows);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Backfill");
    }

    #[test]
    fn short_rows_and_blank_titles() {
        let rows = vec![
            HEADER.to_vec(),
            vec!["Install windows"],
            vec!["", "High", "Done"],
            vec![],
            vec!["   ", "Low"],
            vec!["Seal roof", "high", "in progress", "Both slopes", "2025-06-30", "roofer@site.io"],
        ];
        let raws = extract_grid(&rows);
        assert_eq!(raws.len(), 2);

        let records = parse_grid(&rows);
        assert_eq!(records[0].title, "Install windows");
        assert_eq!(records[0].priority, Priority::Medium);
        assert_eq!(records[0].status, TaskStatus::Backlog);
        assert_eq!(records[1].status, TaskStatus::InProgress);
        assert_eq!(records[1].assignee_email.as_deref(), Some("roofer@site.io"));
        assert_eq!(records[1].due_date.unwrap().to_string(), "2025-06-30");
    }
}
