//! Project and user rows referenced by imported tasks.
//!
//! # Responsibility
//! - Hold the minimal project/user shape the import path depends on:
//!   project existence and e-mail based assignee lookup.
//!
//! # Invariants
//! - Ids are never nil.
//! - `User::email` is trimmed, lowercased and contains `@`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type ProjectId = Uuid;
pub type UserId = Uuid;

/// Validation failure for project/user rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    NilId,
    EmptyName,
    InvalidEmail(String),
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "id must not be nil"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::InvalidEmail(value) => write!(f, "invalid e-mail address `{value}`"),
        }
    }
}

impl Error for ModelValidationError {}

/// A construction project owning imported tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub is_archived: bool,
}

impl Project {
    /// Creates a new active project with a generated id.
    pub fn new(name: impl Into<String>) -> Result<Self, ModelValidationError> {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Creates a project with a caller-provided id.
    pub fn with_id(id: ProjectId, name: impl Into<String>) -> Result<Self, ModelValidationError> {
        let project = Self {
            id,
            name: name.into().trim().to_string(),
            is_archived: false,
        };
        project.validate()?;
        Ok(project)
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.id.is_nil() {
            return Err(ModelValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(ModelValidationError::EmptyName);
        }
        Ok(())
    }
}

/// An application user that tasks can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub display_name: Option<String>,
}

impl User {
    /// Creates a user with a generated id and normalized e-mail.
    pub fn new(
        email: impl AsRef<str>,
        display_name: Option<String>,
    ) -> Result<Self, ModelValidationError> {
        let user = Self {
            id: Uuid::new_v4(),
            email: normalize_email(email.as_ref()),
            display_name: display_name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
        };
        user.validate()?;
        Ok(user)
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.id.is_nil() {
            return Err(ModelValidationError::NilId);
        }
        let valid = match self.email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty() && !domain.is_empty() && !self.email.contains(char::is_whitespace)
            }
            None => false,
        };
        if !valid {
            return Err(ModelValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }
}

/// Lowercases and trims an e-mail for lookup and storage.
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{ModelValidationError, Project, User};
    use uuid::Uuid;

    #[test]
    fn project_rejects_blank_name_and_nil_id() {
        assert_eq!(
            Project::new("   ").unwrap_err(),
            ModelValidationError::EmptyName
        );
        assert_eq!(
            Project::with_id(Uuid::nil(), "Tower B").unwrap_err(),
            ModelValidationError::NilId
        );
    }

    #[test]
    fn user_email_is_normalized_and_checked() {
        let user = User::new("  Site.Lead@Example.COM ", Some(" Dana ".to_string())).unwrap();
        assert_eq!(user.email, "site.lead@example.com");
        assert_eq!(user.display_name.as_deref(), Some("Dana"));

        let err = User::new("not-an-email", None).unwrap_err();
        assert!(matches!(err, ModelValidationError::InvalidEmail(_)));
    }
}
