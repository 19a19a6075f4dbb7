//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Bulk-insert imported records into one project in a single transaction.
//! - Resolve `assignee_email` to user ids during insertion.
//! - Query tasks by filter and update status by id.
//!
//! # Invariants
//! - Bulk insertion is all-or-nothing.
//! - Unknown assignee e-mails leave the task unassigned; they never fail
//!   the batch.
//! - Listing order is insertion order (`created_at`, then `rowid`).

use crate::model::project::{normalize_email, ProjectId, UserId};
use crate::model::task::{
    ExtractedTaskRecord, Priority, Task, TaskId, TaskStatus, TaskValidationError,
};
use crate::repo::{parse_bool, parse_uuid, RepoError, RepoResult};
use chrono::NaiveDate;
use log::{info, warn};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use std::collections::HashMap;
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    project_uuid,
    title,
    priority,
    status,
    description,
    due_date,
    assignee_uuid,
    created_at,
    updated_at
FROM tasks";

const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Query options for listing tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    pub project_id: Option<ProjectId>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub limit: Option<u32>,
    pub offset: u32,
}

impl TaskListQuery {
    /// Lists every task of one project.
    pub fn for_project(project_id: ProjectId) -> Self {
        Self {
            project_id: Some(project_id),
            ..Self::default()
        }
    }
}

/// Repository interface for task persistence.
pub trait TaskRepository {
    /// Inserts all records into `project_id` and returns the created count.
    fn bulk_insert_tasks(
        &mut self,
        project_id: ProjectId,
        records: &[ExtractedTaskRecord],
    ) -> RepoResult<usize>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
    fn update_task_status(&self, id: TaskId, status: TaskStatus) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn bulk_insert_tasks(
        &mut self,
        project_id: ProjectId,
        records: &[ExtractedTaskRecord],
    ) -> RepoResult<usize> {
        for record in records {
            if record.title.trim().is_empty() {
                return Err(TaskValidationError::EmptyTitle.into());
            }
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        ensure_project_writable(&tx, project_id)?;

        let project_text = project_id.to_string();
        let mut assignees: HashMap<String, Option<UserId>> = HashMap::new();
        let mut unresolved = 0usize;

        {
            let mut insert = tx.prepare(
                "INSERT INTO tasks (
                    uuid,
                    project_uuid,
                    title,
                    priority,
                    status,
                    description,
                    due_date,
                    assignee_uuid
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            )?;

            for record in records {
                let assignee_id = match record.assignee_email.as_deref() {
                    Some(email) => {
                        let key = normalize_email(email);
                        let resolved = match assignees.get(&key).copied() {
                            Some(cached) => cached,
                            None => {
                                let found = find_user_id_in_tx(&tx, &key)?;
                                assignees.insert(key, found);
                                found
                            }
                        };
                        if resolved.is_none() {
                            unresolved += 1;
                        }
                        resolved
                    }
                    None => None,
                };

                insert.execute(params![
                    Uuid::new_v4().to_string(),
                    project_text.as_str(),
                    record.title.trim(),
                    record.priority.as_db_str(),
                    record.status.as_db_str(),
                    record.description.as_str(),
                    record
                        .due_date
                        .map(|date| date.format(DUE_DATE_FORMAT).to_string()),
                    assignee_id.map(|id| id.to_string()),
                ])?;
            }
        }

        tx.commit()?;

        if unresolved > 0 {
            warn!(
                "event=task_bulk_insert module=repo status=partial unresolved_assignees={unresolved}"
            );
        }
        info!(
            "event=task_bulk_insert module=repo status=ok project={} created={}",
            project_id,
            records.len()
        );
        Ok(records.len())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(project_id) = query.project_id {
            sql.push_str(" AND project_uuid = ?");
            bind_values.push(Value::Text(project_id.to_string()));
        }
        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status.as_db_str().to_string()));
        }
        if let Some(priority) = query.priority {
            sql.push_str(" AND priority = ?");
            bind_values.push(Value::Text(priority.as_db_str().to_string()));
        }

        sql.push_str(" ORDER BY created_at ASC, rowid ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn update_task_status(&self, id: TaskId, status: TaskStatus) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                status = ?2,
                updated_at = (CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER))
             WHERE uuid = ?1;",
            params![id.to_string(), status.as_db_str()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: "task", id });
        }
        Ok(())
    }
}

fn ensure_project_writable(tx: &Transaction<'_>, project_id: ProjectId) -> RepoResult<()> {
    let mut stmt = tx.prepare("SELECT is_archived FROM projects WHERE uuid = ?1;")?;
    let mut rows = stmt.query([project_id.to_string()])?;
    let Some(row) = rows.next()? else {
        return Err(RepoError::NotFound {
            entity: "project",
            id: project_id,
        });
    };

    if parse_bool(row.get(0)?, "projects.is_archived")? {
        return Err(RepoError::Conflict(format!(
            "project {project_id} is archived"
        )));
    }
    Ok(())
}

fn find_user_id_in_tx(tx: &Transaction<'_>, email: &str) -> RepoResult<Option<UserId>> {
    let mut stmt = tx.prepare_cached("SELECT uuid FROM users WHERE email = ?1 COLLATE NOCASE;")?;
    let mut rows = stmt.query([email])?;
    if let Some(row) = rows.next()? {
        let uuid_text: String = row.get(0)?;
        return Ok(Some(parse_uuid(&uuid_text, "users.uuid")?));
    }
    Ok(None)
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let uuid_text: String = row.get("uuid")?;
    let project_text: String = row.get("project_uuid")?;

    let priority_text: String = row.get("priority")?;
    let priority = parse_priority(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid priority `{priority_text}` in tasks.priority"))
    })?;

    let status_text: String = row.get("status")?;
    let status = parse_task_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid task status `{status_text}` in tasks.status"))
    })?;

    let due_date = match row.get::<_, Option<String>>("due_date")? {
        Some(value) => Some(NaiveDate::parse_from_str(&value, DUE_DATE_FORMAT).map_err(|_| {
            RepoError::InvalidData(format!("invalid due date `{value}` in tasks.due_date"))
        })?),
        None => None,
    };

    let assignee_id = match row.get::<_, Option<String>>("assignee_uuid")? {
        Some(value) => Some(parse_uuid(&value, "tasks.assignee_uuid")?),
        None => None,
    };

    Ok(Task {
        id: parse_uuid(&uuid_text, "tasks.uuid")?,
        project_id: parse_uuid(&project_text, "tasks.project_uuid")?,
        title: row.get("title")?,
        priority,
        status,
        description: row.get("description")?,
        due_date,
        assignee_id,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_priority(value: &str) -> Option<Priority> {
    Priority::ALL
        .into_iter()
        .find(|priority| priority.as_db_str() == value)
}

fn parse_task_status(value: &str) -> Option<TaskStatus> {
    TaskStatus::ALL
        .into_iter()
        .find(|status| status.as_db_str() == value)
}
