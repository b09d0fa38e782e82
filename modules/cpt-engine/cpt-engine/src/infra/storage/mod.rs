//! Storage layer backed by `SeaORM`.
//!
//! Post types and posts live in two shared tables. Structured values
//! (`field_groups`, `settings`, `fields`) are stored as JSON text, so
//! defining a new post type never needs a schema migration.

pub mod entity;
pub mod mapper;
pub mod migrations;
mod post_types_sea_repo;
mod posts_sea_repo;

pub use post_types_sea_repo::OrmPostTypesRepository;
pub use posts_sea_repo::OrmPostsRepository;
