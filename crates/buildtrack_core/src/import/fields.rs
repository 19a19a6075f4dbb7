//! Labeled field extraction for one task block.
//!
//! # Responsibility
//! - Pull `title`, `priority`, `status`, `due_date` and `description` out of
//!   free text, each with its own named-capture pattern.
//!
//! # Invariants
//! - Patterns scan the whole block independently, so field order is free.
//! - When a label repeats, the first valid occurrence wins.
//! - Labels are case-sensitive; enumerated values are case-insensitive.
//! - Extraction never fails for malformed values; the field is left unset.

use crate::model::task::RawTaskFields;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*#{1,6}[ \t]*Task:[ \t]*(?P<title>\S[^\r\n]*?)[ \t]*\r?$")
        .expect("valid title regex")
});
static PRIORITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*Priority:\*\*[ \t]*(?i:(?P<priority>high|medium|low))\b")
        .expect("valid priority regex")
});
static STATUS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\*\*Status:\*\*[ \t]*(?i:(?P<status>waiting[ \t]+for[ \t]+approval|backlog|in[ \t]+progress|blocked|done))\b",
    )
    .expect("valid status regex")
});
static DUE_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*Due Date:\*\*[ \t]*(?P<due_date>[0-9]{4}-[0-9]{2}-[0-9]{2})\b")
        .expect("valid due date regex")
});
static DESCRIPTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\*\*Description:\*\*(?P<description>.*)").expect("valid description regex")
});

/// Block-level extraction outcome that causes the block to be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// No `# Task:` heading line in the block.
    NoTitleFound,
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoTitleFound => write!(f, "no `# Task:` title line found in block"),
        }
    }
}

impl Error for FieldError {}

/// Extracts every known label from `block`.
///
/// # Errors
/// - Returns [`FieldError::NoTitleFound`] when the block has no title line;
///   callers skip such blocks.
pub fn extract_fields(block: &str) -> Result<RawTaskFields, FieldError> {
    let title = extract_title(block).ok_or(FieldError::NoTitleFound)?;

    Ok(RawTaskFields {
        title: Some(title.to_string()),
        priority: extract_priority(block).map(str::to_string),
        status: extract_status(block).map(str::to_string),
        description: extract_description(block).map(str::to_string),
        due_date: extract_due_date(block).map(str::to_string),
        assignee_email: None,
    })
}

/// Returns the trimmed remainder of the first `# Task:` heading line.
pub fn extract_title(block: &str) -> Option<&str> {
    capture(&TITLE_RE, block, "title").map(str::trim)
}

/// Returns the raw priority token after `**Priority:**`.
pub fn extract_priority(block: &str) -> Option<&str> {
    capture(&PRIORITY_RE, block, "priority")
}

/// Returns the raw status phrase after `**Status:**`.
pub fn extract_status(block: &str) -> Option<&str> {
    capture(&STATUS_RE, block, "status")
}

/// Returns the `YYYY-MM-DD` token after `**Due Date:**`.
///
/// Only the shape is checked here; calendar validity is the normalizer's job.
pub fn extract_due_date(block: &str) -> Option<&str> {
    capture(&DUE_DATE_RE, block, "due_date")
}

/// Returns everything after `**Description:**` up to the end of the block,
/// trimmed.
pub fn extract_description(block: &str) -> Option<&str> {
    capture(&DESCRIPTION_RE, block, "description").map(str::trim)
}

fn capture<'a>(pattern: &Regex, block: &'a str, name: &str) -> Option<&'a str> {
    pattern
        .captures(block)
        .and_then(|caps| caps.name(name))
        .map(|m| m.as_str())
}
