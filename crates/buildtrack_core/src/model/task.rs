//! Task domain model.
//!
//! # Responsibility
//! - Define priority/status enums and their lenient text parsing.
//! - Define the raw field map, the canonical extracted record and the
//!   persisted task row.
//!
//! # Invariants
//! - `ExtractedTaskRecord::title` is never empty once built by the normalizer.
//! - `due_date`, when present, is a valid calendar date.

use crate::model::project::{ProjectId, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for persisted tasks.
pub type TaskId = Uuid;

/// Task priority. Unrecognized input falls back to `Medium`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Parses a priority label case-insensitively.
    ///
    /// Returns `None` for blank or unknown values; callers decide the default.
    pub fn parse_lenient(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    /// Canonical display label used by the document template.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Storage form, identical to the serde representation.
    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task lifecycle state. Unrecognized input falls back to `Backlog`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Proposed work pending sign-off.
    WaitingForApproval,
    #[default]
    Backlog,
    InProgress,
    Blocked,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::WaitingForApproval,
        TaskStatus::Backlog,
        TaskStatus::InProgress,
        TaskStatus::Blocked,
        TaskStatus::Done,
    ];

    /// Parses a status phrase case-insensitively.
    ///
    /// Word separators may be spaces, `_` or `-`, so `In Progress`,
    /// `in_progress` and `IN-PROGRESS` all resolve to `InProgress`.
    pub fn parse_lenient(value: &str) -> Option<Self> {
        let words = value
            .split(|ch: char| ch.is_whitespace() || ch == '_' || ch == '-')
            .filter(|word| !word.is_empty())
            .map(str::to_ascii_lowercase)
            .collect::<Vec<_>>()
            .join(" ");

        match words.as_str() {
            "waiting for approval" => Some(Self::WaitingForApproval),
            "backlog" => Some(Self::Backlog),
            "in progress" => Some(Self::InProgress),
            "blocked" => Some(Self::Blocked),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    /// Human-facing phrase, as written in import documents.
    pub fn label(self) -> &'static str {
        match self {
            Self::WaitingForApproval => "Waiting for Approval",
            Self::Backlog => "Backlog",
            Self::InProgress => "In Progress",
            Self::Blocked => "Blocked",
            Self::Done => "Done",
        }
    }

    /// Storage form, identical to the serde representation.
    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::WaitingForApproval => "waiting_for_approval",
            Self::Backlog => "backlog",
            Self::InProgress => "in_progress",
            Self::Blocked => "blocked",
            Self::Done => "done",
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Untyped field map produced by the document and tabular extractors.
///
/// Values are kept verbatim; trimming and coercion belong to the normalizer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTaskFields {
    pub title: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    /// Only filled by tabular input.
    pub assignee_email: Option<String>,
}

/// Canonical task record, ready for bulk insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedTaskRecord {
    pub title: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    /// Resolved to a user id by the persistence layer, never by the parser.
    pub assignee_email: Option<String>,
}

impl ExtractedTaskRecord {
    /// Builds a record with every optional field defaulted.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            priority: Priority::default(),
            status: TaskStatus::default(),
            description: String::new(),
            due_date: None,
            assignee_email: None,
        }
    }
}

/// Record-level validation failure raised by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is absent or blank after trimming.
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// Persisted task row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub title: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    /// Set when an imported `assignee_email` matched a known user.
    pub assignee_id: Option<UserId>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

#[cfg(test)]
mod tests {
    use super::{Priority, TaskStatus};

    #[test]
    fn priority_parse_is_case_insensitive() {
        assert_eq!(Priority::parse_lenient(" HIGH "), Some(Priority::High));
        assert_eq!(Priority::parse_lenient("low"), Some(Priority::Low));
        assert_eq!(Priority::parse_lenient("urgent"), None);
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn status_parse_accepts_phrases_and_storage_form() {
        assert_eq!(
            TaskStatus::parse_lenient("Waiting for Approval"),
            Some(TaskStatus::WaitingForApproval)
        );
        assert_eq!(
            TaskStatus::parse_lenient("in_progress"),
            Some(TaskStatus::InProgress)
        );
        assert_eq!(
            TaskStatus::parse_lenient("  in   PROGRESS "),
            Some(TaskStatus::InProgress)
        );
        assert_eq!(TaskStatus::parse_lenient("In Review"), None);
        assert_eq!(TaskStatus::default(), TaskStatus::Backlog);
    }

    #[test]
    fn status_storage_form_matches_serde() {
        for status in TaskStatus::ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, status.as_db_str());
            assert_eq!(TaskStatus::parse_lenient(status.as_db_str()), Some(status));
            assert_eq!(TaskStatus::parse_lenient(status.label()), Some(status));
        }
    }
}
