use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use cpt_engine_sdk::Violation;

use super::problem::{Problem, ValidationViolation};
use crate::domain::error::DomainError;

pub const CODE_INVALID_SHAPE: &str = "CPT_INVALID_SHAPE";
pub const CODE_VALIDATION: &str = "CPT_VALIDATION";
pub const CODE_CONFLICT: &str = "CPT_CONFLICT";
pub const CODE_POST_TYPE_NOT_FOUND: &str = "CPT_POST_TYPE_NOT_FOUND";
pub const CODE_POST_NOT_FOUND: &str = "CPT_POST_NOT_FOUND";
pub const CODE_BAD_REQUEST: &str = "CPT_BAD_REQUEST";
pub const CODE_INTERNAL: &str = "CPT_INTERNAL";

fn violations(list: &[Violation], code: &str) -> Vec<ValidationViolation> {
    list.iter()
        .map(|v| ValidationViolation {
            field: v.field.clone(),
            message: v.message.clone(),
            code: Some(code.to_owned()),
        })
        .collect()
}

/// Map domain error to RFC 9457 Problem
pub fn domain_error_to_problem(e: &DomainError, instance: &str) -> Problem {
    // Extract trace ID from current tracing span if available
    let trace_id = tracing::Span::current()
        .id()
        .map(|id| id.into_u64().to_string());

    let problem = match e {
        DomainError::PostTypeNotFound { slug } => Problem::new(
            StatusCode::NOT_FOUND,
            "Post Type Not Found",
            format!("Post type '{slug}' was not found"),
        )
        .with_code(CODE_POST_TYPE_NOT_FOUND),
        DomainError::PostNotFound { id } => Problem::new(
            StatusCode::NOT_FOUND,
            "Post Not Found",
            format!("Post with id {id} was not found"),
        )
        .with_code(CODE_POST_NOT_FOUND),
        DomainError::Conflict { slug } => Problem::new(
            StatusCode::CONFLICT,
            "Conflict",
            format!("Post type with slug '{slug}' already exists"),
        )
        .with_code(CODE_CONFLICT),
        DomainError::InvalidShape { violations: list } => Problem::new(
            StatusCode::BAD_REQUEST,
            "Invalid Post Type Definition",
            "The post type definition is malformed",
        )
        .with_code(CODE_INVALID_SHAPE)
        .with_errors(violations(list, CODE_INVALID_SHAPE)),
        DomainError::Validation { violations: list } => Problem::new(
            StatusCode::BAD_REQUEST,
            "Validation Failed",
            format!("{} field(s) failed validation", list.len()),
        )
        .with_code(CODE_VALIDATION)
        .with_errors(violations(list, CODE_VALIDATION)),
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "An internal database error occurred",
            )
            .with_code(CODE_INTERNAL)
        }
    };

    let problem = problem.with_instance(instance);
    match trace_id {
        Some(id) => problem.with_trace_id(id),
        None => problem,
    }
}

pub fn bad_request(detail: impl Into<String>) -> Problem {
    Problem::new(StatusCode::BAD_REQUEST, "Bad Request", detail).with_code(CODE_BAD_REQUEST)
}

impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        domain_error_to_problem(&e, "/")
    }
}

impl From<JsonRejection> for Problem {
    fn from(rejection: JsonRejection) -> Self {
        bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for Problem {
    fn from(rejection: QueryRejection) -> Self {
        bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for Problem {
    fn from(rejection: PathRejection) -> Self {
        bad_request(rejection.body_text())
    }
}
