//! CPT Engine Module
//!
//! Runtime-defined custom post types: a registry of post type definitions
//! with field schemas, a schema-driven validator, a generic post store and a
//! paginated query service, exposed over REST and as an in-process client.
//!
//! ## Public API
//!
//! The public API is defined in the `cpt-engine-sdk` crate and re-exported here:
//! - `CptEngineClientV1` - trait for in-process consumers
//! - `PostTypeDefinition`, `FieldSchema`, `CustomPost`, ... - data models
//! - `CptError` - error type
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
// === PUBLIC API (from SDK) ===
pub use cpt_engine_sdk::{
    CptEngineClientV1, CptError, CustomPost, FieldGroup, FieldSchema, FieldType, FieldValue,
    NewCustomPost, NewPostType, PostTypeDefinition,
};

// === MODULE DEFINITION ===
pub mod module;
pub use module::{CptEngine, CptServices};

pub mod config;
pub use config::CptEngineConfig;

// === LOCAL CLIENT ===
pub mod local_client;

// === INTERNAL MODULES ===
// Exposed for integration tests; only the SDK types are a stable API.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;

#[cfg(test)]
mod test_support;
