//! Task import use-case service.
//!
//! # Responsibility
//! - Run the parse pipeline on an [`ImportSource`].
//! - Refuse empty results before touching persistence.
//! - Hand accepted records to the repository in one bulk insert.
//!
//! # Invariants
//! - Zero accepted records never reaches the repository.
//! - Rejected records are reported as a count, never as a fatal error.

use crate::import::{parse_source, ImportBatch, ImportSource};
use crate::model::project::ProjectId;
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoError;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Service error for task import.
#[derive(Debug)]
pub enum ImportServiceError {
    /// Parsing produced no valid task; nothing was written.
    NoValidTasks { rejected: usize },
    /// Target project does not exist.
    ProjectNotFound(ProjectId),
    /// Persistence-layer failure; the batch was rolled back.
    Repo(RepoError),
}

impl Display for ImportServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoValidTasks { .. } => write!(f, "no valid tasks found in document"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ImportServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                entity: "project",
                id,
            } => Self::ProjectNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Outcome of a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    /// Tasks created by the bulk insert.
    pub created: usize,
    /// Records dropped by validation.
    pub rejected: usize,
}

/// Import facade over a task repository.
pub struct TaskImportService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskImportService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Parses `source` without persisting anything.
    pub fn preview(&self, source: &ImportSource) -> ImportBatch {
        parse_source(source)
    }

    /// Parses `source` and bulk-inserts the accepted records into a project.
    ///
    /// # Errors
    /// - [`ImportServiceError::NoValidTasks`] when nothing survived parsing.
    /// - [`ImportServiceError::ProjectNotFound`] for an unknown project.
    /// - [`ImportServiceError::Repo`] for any other persistence failure.
    pub fn import_tasks(
        &mut self,
        project_id: ProjectId,
        source: &ImportSource,
    ) -> Result<ImportReport, ImportServiceError> {
        let started_at = Instant::now();
        let batch = parse_source(source);

        if batch.is_empty() {
            warn!(
                "event=task_import module=service status=empty project={} rejected={}",
                project_id, batch.rejected
            );
            return Err(ImportServiceError::NoValidTasks {
                rejected: batch.rejected,
            });
        }

        match self.repo.bulk_insert_tasks(project_id, &batch.records) {
            Ok(created) => {
                info!(
                    "event=task_import module=service status=ok project={} created={} rejected={} duration_ms={}",
                    project_id,
                    created,
                    batch.rejected,
                    started_at.elapsed().as_millis()
                );
                Ok(ImportReport {
                    created,
                    rejected: batch.rejected,
                })
            }
            Err(err) => {
                error!(
                    "event=task_import module=service status=error project={} duration_ms={} error={}",
                    project_id,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    /// Gives back the wrapped repository.
    pub fn into_inner(self) -> R {
        self.repo
    }
}
