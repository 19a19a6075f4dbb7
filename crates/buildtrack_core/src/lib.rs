//! Core domain logic for buildtrack.
//! Turns task documents and spreadsheets into project tasks.

pub mod db;
pub mod import;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use import::document::{parse_document, render_document};
pub use import::tabular::parse_grid;
pub use import::{parse_source, ImportBatch, ImportFormat, ImportSource, SourceError, TextRun};
pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status, LogTarget};
pub use model::project::{ModelValidationError, Project, ProjectId, User, UserId};
pub use model::task::{
    ExtractedTaskRecord, Priority, RawTaskFields, Task, TaskId, TaskStatus, TaskValidationError,
};
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::import_service::{ImportReport, ImportServiceError, TaskImportService};
pub use service::task_service::{TaskService, TaskServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
