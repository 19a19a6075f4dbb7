//! User repository contract and SQLite implementation.
//!
//! # Invariants
//! - E-mail uniqueness is case-insensitive.
//! - Lookups normalize the e-mail the same way `User::new` does.

use crate::model::project::{normalize_email, User, UserId};
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

/// Repository interface for users referenced as task assignees.
pub trait UserRepository {
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        user.validate()?;
        if self.find_user_by_email(&user.email)?.is_some() {
            return Err(RepoError::Conflict(format!(
                "user with e-mail `{}` already exists",
                user.email
            )));
        }

        self.conn.execute(
            "INSERT INTO users (uuid, email, display_name) VALUES (?1, ?2, ?3);",
            params![
                user.id.to_string(),
                user.email.as_str(),
                user.display_name.as_deref(),
            ],
        )?;

        Ok(user.id)
    }

    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let normalized = normalize_email(email);
        if normalized.is_empty() {
            return Ok(None);
        }

        let mut stmt = self.conn.prepare(
            "SELECT uuid, email, display_name
             FROM users
             WHERE email = ?1 COLLATE NOCASE;",
        )?;
        let mut rows = stmt.query([normalized.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let uuid_text: String = row.get("uuid")?;
    let user = User {
        id: parse_uuid(&uuid_text, "users.uuid")?,
        email: row.get("email")?,
        display_name: row.get("display_name")?,
    };
    user.validate()?;
    Ok(user)
}
