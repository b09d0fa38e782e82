use cpt_engine_sdk::{CptError, Violation};
use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Post type not found: {slug}")]
    PostTypeNotFound { slug: String },

    #[error("Post not found: {id}")]
    PostNotFound { id: Uuid },

    #[error("Post type with slug '{slug}' already exists")]
    Conflict { slug: String },

    #[error("Invalid post type definition: {}", join(violations))]
    InvalidShape { violations: Vec<Violation> },

    #[error("Field validation failed: {}", join(violations))]
    Validation { violations: Vec<Violation> },

    #[error("Database error: {message}")]
    Database { message: String },
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl DomainError {
    #[must_use]
    pub fn post_type_not_found(slug: impl Into<String>) -> Self {
        Self::PostTypeNotFound { slug: slug.into() }
    }

    #[must_use]
    pub fn post_not_found(id: Uuid) -> Self {
        Self::PostNotFound { id }
    }

    #[must_use]
    pub fn conflict(slug: impl Into<String>) -> Self {
        Self::Conflict { slug: slug.into() }
    }

    #[must_use]
    pub fn invalid_shape(violations: Vec<Violation>) -> Self {
        Self::InvalidShape { violations }
    }

    #[must_use]
    pub fn validation(violations: Vec<Violation>) -> Self {
        Self::Validation { violations }
    }

    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::database(e.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        Self::database(format!("stored document is not valid JSON: {e}"))
    }
}

/// Convert domain errors to SDK errors for public API consumption.
impl From<DomainError> for CptError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::PostTypeNotFound { slug } => CptError::post_type_not_found(slug),
            DomainError::PostNotFound { id } => CptError::post_not_found(id),
            DomainError::Conflict { slug } => CptError::conflict(slug),
            DomainError::InvalidShape { violations } => CptError::invalid_shape(violations),
            DomainError::Validation { violations } => CptError::validation(violations),
            DomainError::Database { .. } => CptError::internal(),
        }
    }
}
