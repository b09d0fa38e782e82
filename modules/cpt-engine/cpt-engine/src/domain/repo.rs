use async_trait::async_trait;
use cpt_engine_sdk::{
    CustomPost, PostSortField, PostStatus, PostTypeDefinition, SortOrder,
};
use uuid::Uuid;

use super::error::DomainError;

/// Port for post type persistence.
///
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait PostTypeRepository: Send + Sync {
    /// Load a definition by slug, active or not.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostTypeDefinition>, DomainError>;

    /// Insert a fully-formed definition.
    ///
    /// A slug collision with any stored definition (active or inactive) is
    /// reported as `DomainError::Conflict`, detected by the storage unique index.
    async fn insert(&self, def: &PostTypeDefinition) -> Result<(), DomainError>;

    /// Overwrite an existing definition (by `def.id`).
    async fn update(&self, def: &PostTypeDefinition) -> Result<(), DomainError>;

    /// All definitions ordered by creation time, newest first.
    async fn list(&self, active_only: bool) -> Result<Vec<PostTypeDefinition>, DomainError>;
}

/// Row filter for post listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub status: Option<PostStatus>,
    /// Case-insensitive substring matched against title and serialized fields.
    pub search: Option<String>,
}

/// Offset window and ordering for post listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostWindow {
    pub offset: u64,
    pub limit: u64,
    pub sort_by: PostSortField,
    pub sort_order: SortOrder,
}

/// Port for custom post persistence. Every call is scoped by post type slug.
#[async_trait]
pub trait CustomPostRepository: Send + Sync {
    async fn find_by_id(
        &self,
        post_type_slug: &str,
        id: Uuid,
    ) -> Result<Option<CustomPost>, DomainError>;

    async fn insert(&self, post: &CustomPost) -> Result<(), DomainError>;

    /// Overwrite an existing post (by `post.id`). Last writer wins.
    async fn update(&self, post: &CustomPost) -> Result<(), DomainError>;

    /// Hard delete. Returns the number of rows removed.
    async fn delete(&self, post_type_slug: &str, id: Uuid) -> Result<u64, DomainError>;

    async fn count(&self, post_type_slug: &str, filter: &PostFilter) -> Result<u64, DomainError>;

    async fn list(
        &self,
        post_type_slug: &str,
        filter: &PostFilter,
        window: PostWindow,
    ) -> Result<Vec<CustomPost>, DomainError>;

    /// Every post of the type, oldest first.
    async fn list_all(&self, post_type_slug: &str) -> Result<Vec<CustomPost>, DomainError>;
}
