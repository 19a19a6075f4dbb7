//! Persistence port: repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the "insert records / query by filter / update by id" contracts
//!   the import and task services depend on.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate rows before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Missing rows surface as `RepoError::NotFound`, not as DB errors.

pub mod project_repo;
pub mod task_repo;
pub mod user_repo;

use crate::db::DbError;
use crate::model::project::ModelValidationError;
use crate::model::task::TaskValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by project, user and task persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(ModelValidationError),
    InvalidTask(TaskValidationError),
    Db(DbError),
    NotFound { entity: &'static str, id: Uuid },
    /// Write rejected by a uniqueness or state rule.
    Conflict(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidTask(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Conflict(message) => write!(f, "conflict: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::InvalidTask(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::Conflict(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::InvalidTask(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn parse_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
