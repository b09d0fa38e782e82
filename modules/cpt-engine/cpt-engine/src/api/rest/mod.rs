//! REST surface: axum handlers, DTOs and RFC 9457 error mapping.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod problem;
pub mod routes;

pub use problem::{APPLICATION_PROBLEM_JSON, ApiResult, Problem, ValidationViolation};
pub use routes::{openapi, router};
