//! CPT Engine SDK
//!
//! This crate provides the public API for the `cpt-engine` module:
//! - `CptEngineClientV1` trait
//! - Post type, field schema and custom post models
//! - Error type (`CptError`)
//!
//! ## Usage
//!
//! ```ignore
//! use cpt_engine_sdk::{CptEngineClientV1, NewCustomPost};
//!
//! let post = client.create_post("testimonial", new_post).await?;
//! let page = client.list_posts("testimonial", PostListQuery::default()).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod client;
pub mod errors;
pub mod models;

pub use client::CptEngineClientV1;
pub use errors::{CptError, Violation};
pub use models::{
    CustomPost, CustomPostPatch, DEFAULT_ICON, FieldGroup, FieldSchema, FieldType, FieldValue,
    FieldValues, NewCustomPost, NewPostType, Pagination, PostListQuery, PostPage, PostSortField,
    PostStatus, PostTypeDefinition, PostTypePatch, PostTypeSettings, PostTypeSettingsPatch,
    PostViolations, RevalidationReport, SortOrder, ValidationReport,
};
