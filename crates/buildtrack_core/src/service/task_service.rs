//! Task query/update use-case service.

use crate::model::task::{Task, TaskId, TaskStatus};
use crate::repo::task_repo::{TaskListQuery, TaskRepository};
use crate::repo::{RepoError, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    TaskNotFound(TaskId),
    Repo(RepoError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::TaskNotFound(_) => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity: "task", id } => Self::TaskNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Task facade over repository implementations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        self.repo.get_task(id)
    }

    pub fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        self.repo.list_tasks(query)
    }

    /// Moves a task to `status` and returns the updated row.
    pub fn update_status(&self, id: TaskId, status: TaskStatus) -> Result<Task, TaskServiceError> {
        self.repo.update_task_status(id, status)?;
        self.repo
            .get_task(id)?
            .ok_or(TaskServiceError::TaskNotFound(id))
    }
}
