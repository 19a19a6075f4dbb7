//! Project repository contract and SQLite implementation.

use crate::model::project::{Project, ProjectId};
use crate::repo::{bool_to_int, parse_bool, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

/// Repository interface for the projects tasks are imported into.
pub trait ProjectRepository {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    /// Archived projects reject further task imports.
    fn set_project_archived(&self, id: ProjectId, archived: bool) -> RepoResult<()>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        project.validate()?;

        self.conn.execute(
            "INSERT INTO projects (uuid, name, is_archived) VALUES (?1, ?2, ?3);",
            params![
                project.id.to_string(),
                project.name.as_str(),
                bool_to_int(project.is_archived),
            ],
        )?;

        Ok(project.id)
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uuid, name, is_archived FROM projects WHERE uuid = ?1;")?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_project_row(row)?));
        }
        Ok(None)
    }

    fn set_project_archived(&self, id: ProjectId, archived: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE projects
             SET
                is_archived = ?2,
                updated_at = (CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER))
             WHERE uuid = ?1;",
            params![id.to_string(), bool_to_int(archived)],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "project",
                id,
            });
        }
        Ok(())
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let uuid_text: String = row.get("uuid")?;
    let project = Project {
        id: parse_uuid(&uuid_text, "projects.uuid")?,
        name: row.get("name")?,
        is_archived: parse_bool(row.get("is_archived")?, "projects.is_archived")?,
    };
    project.validate()?;
    Ok(project)
}
