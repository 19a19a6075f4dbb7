//! Record normalization: raw field maps to canonical task records.
//!
//! # Responsibility
//! - Coerce priority/status text into enums, defaulting unknown values.
//! - Parse due dates leniently and drop malformed ones.
//! - Reject records whose title is blank.
//!
//! # Invariants
//! - Pure: no I/O, no shared state.
//! - Only a blank title is an error; every other defect degrades to a default.

use crate::model::task::{
    ExtractedTaskRecord, Priority, RawTaskFields, TaskStatus, TaskValidationError,
};
use chrono::NaiveDate;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid iso date regex"));

/// Normalized records plus the number of raw records that failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedBatch {
    /// Accepted records in input order.
    pub records: Vec<ExtractedTaskRecord>,
    /// Raw records rejected by [`normalize_record`].
    pub rejected: usize,
}

impl NormalizedBatch {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Converts one raw field map into a canonical record.
///
/// # Errors
/// - [`TaskValidationError::EmptyTitle`] when the title is absent or blank.
pub fn normalize_record(raw: RawTaskFields) -> Result<ExtractedTaskRecord, TaskValidationError> {
    let title = raw
        .title
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(TaskValidationError::EmptyTitle)?
        .to_string();

    let priority = raw
        .priority
        .as_deref()
        .and_then(Priority::parse_lenient)
        .unwrap_or_default();
    let status = raw
        .status
        .as_deref()
        .and_then(TaskStatus::parse_lenient)
        .unwrap_or_default();
    let description = raw
        .description
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    let due_date = raw.due_date.as_deref().and_then(parse_due_date);
    let assignee_email = raw
        .assignee_email
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    Ok(ExtractedTaskRecord {
        title,
        priority,
        status,
        description,
        due_date,
        assignee_email,
    })
}

/// Normalizes a sequence of raw records, preserving order.
///
/// Rejected records are counted, not returned.
pub fn normalize_records<I>(raws: I) -> NormalizedBatch
where
    I: IntoIterator<Item = RawTaskFields>,
{
    let mut batch = NormalizedBatch::default();
    for raw in raws {
        match normalize_record(raw) {
            Ok(record) => batch.records.push(record),
            Err(err) => {
                debug!("event=task_normalize module=import status=rejected reason={err}");
                batch.rejected += 1;
            }
        }
    }
    batch
}

/// Parses a strict `YYYY-MM-DD` calendar date.
///
/// Returns `None` for wrong shapes (`2024-1-5`, `15/12/2024`) and for
/// impossible dates (`2024-02-30`).
pub fn parse_due_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if !ISO_DATE_RE.is_match(trimmed) {
        debug!("event=due_date_parse module=import status=skipped reason=malformed_shape");
        return None;
    }
    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            debug!("event=due_date_parse module=import status=skipped reason=invalid_calendar_date");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_record, normalize_records, parse_due_date};
    use crate::model::task::{Priority, RawTaskFields, TaskStatus, TaskValidationError};
    use chrono::NaiveDate;

    fn raw(title: &str) -> RawTaskFields {
        RawTaskFields {
            title: Some(title.to_string()),
            ..RawTaskFields::default()
        }
    }

    #[test]
    fn title_only_record_gets_defaults() {
        let record = normalize_record(raw("  Pour footing  ")).unwrap();
        assert_eq!(record.title, "Pour footing");
        assert_eq!(record.priority, Priority::Medium);
        assert_eq!(record.status, TaskStatus::Backlog);
        assert_eq!(record.description, "");
        assert_eq!(record.due_date, None);
        assert_eq!(record.assignee_email, None);
    }

    #[test]
    fn blank_or_missing_title_is_rejected() {
        assert_eq!(
            normalize_record(raw(" \t ")).unwrap_err(),
            TaskValidationError::EmptyTitle
        );
        assert_eq!(
            normalize_record(RawTaskFields::default()).unwrap_err(),
            TaskValidationError::EmptyTitle
        );
    }

    #[test]
    fn unknown_enum_values_fall_back_to_defaults() {
        let mut fields = raw("Scaffold");
        fields.priority = Some("critical".to_string());
        fields.status = Some("archived".to_string());
        let record = normalize_record(fields).unwrap();
        assert_eq!(record.priority, Priority::Medium);
        assert_eq!(record.status, TaskStatus::Backlog);
    }

    #[test]
    fn known_enum_values_are_coerced() {
        let mut fields = raw("Scaffold");
        fields.priority = Some(" LOW ".to_string());
        fields.status = Some("waiting for approval".to_string());
        fields.assignee_email = Some("  crew@site.io ".to_string());
        let record = normalize_record(fields).unwrap();
        assert_eq!(record.priority, Priority::Low);
        assert_eq!(record.status, TaskStatus::WaitingForApproval);
        assert_eq!(record.assignee_email.as_deref(), Some("crew@site.io"));
    }

    #[test]
    fn due_date_parsing_is_strict_and_lenient_on_failure() {
        assert_eq!(
            parse_due_date(" 2024-12-15 "),
            NaiveDate::from_ymd_opt(2024, 12, 15)
        );
        assert_eq!(parse_due_date("2024-02-30"), None);
        assert_eq!(parse_due_date("2024-12-15T10:00"), None);
        assert_eq!(parse_due_date("12/15/2024"), None);
        assert_eq!(parse_due_date(""), None);
    }

    #[test]
    fn batch_counts_rejections_and_keeps_order() {
        let batch = normalize_records(vec![raw("first"), raw(""), raw("second"), raw("  ")]);
        let titles: Vec<_> = batch.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
        assert_eq!(batch.rejected, 2);
    }
}
