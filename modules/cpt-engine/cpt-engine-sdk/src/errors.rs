//! Public error types for the `cpt-engine` module.
//!
//! These errors are safe to expose to other modules and consumers.

use thiserror::Error;
use uuid::Uuid;

/// A single problem with a submitted post type definition or field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Field name or structural path, e.g. `rating` or `fieldGroups[0].name`.
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors that can be returned by the `CptEngineClientV1`.
#[derive(Error, Debug, Clone)]
pub enum CptError {
    /// No active post type with this slug.
    #[error("Post type not found: {slug}")]
    PostTypeNotFound { slug: String },

    /// No post with this id under the given post type.
    #[error("Post not found: {id}")]
    PostNotFound { id: Uuid },

    /// A post type with this slug already exists (active or not).
    #[error("Post type with slug '{slug}' already exists")]
    Conflict { slug: String },

    /// The post type definition is structurally malformed.
    #[error("Invalid post type definition ({} violation(s))", violations.len())]
    InvalidShape { violations: Vec<Violation> },

    /// Field values do not satisfy the post type schema.
    #[error("Field validation failed ({} error(s))", violations.len())]
    Validation { violations: Vec<Violation> },

    /// An internal error occurred.
    #[error("Internal error")]
    Internal,
}

impl CptError {
    pub fn post_type_not_found(slug: impl Into<String>) -> Self {
        Self::PostTypeNotFound { slug: slug.into() }
    }

    #[must_use]
    pub fn post_not_found(id: Uuid) -> Self {
        Self::PostNotFound { id }
    }

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
    pub fn internal() -> Self {
        Self::Internal
    }

    /// Violations carried by shape or value validation errors.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::InvalidShape { violations } | Self::Validation { violations } => violations,
            _ => &[],
        }
    }
}
