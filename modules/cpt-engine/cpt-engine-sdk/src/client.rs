//! Object-safe client boundary for the `cpt-engine` module.
//!
//! Consumers hold it as `Arc<dyn CptEngineClientV1>`; the in-process
//! implementation lives in the `cpt-engine` crate.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::CptError;
use crate::models::{
    CustomPost, CustomPostPatch, NewCustomPost, NewPostType, PostListQuery, PostPage,
    PostTypeDefinition, PostTypePatch, RevalidationReport,
};

#[async_trait]
pub trait CptEngineClientV1: Send + Sync {
    // ==================== Post types ====================

    /// List post types, newest first. Inactive types are skipped when `active_only`.
    async fn list_post_types(&self, active_only: bool)
    -> Result<Vec<PostTypeDefinition>, CptError>;

    /// Get an active post type by slug.
    async fn get_post_type(&self, slug: &str) -> Result<PostTypeDefinition, CptError>;

    async fn create_post_type(&self, new_type: NewPostType)
    -> Result<PostTypeDefinition, CptError>;

    async fn update_post_type(
        &self,
        slug: &str,
        patch: PostTypePatch,
    ) -> Result<PostTypeDefinition, CptError>;

    /// Soft-delete a post type. Its posts are left in place.
    async fn delete_post_type(&self, slug: &str) -> Result<(), CptError>;

    // ==================== Posts ====================

    async fn get_post(&self, post_type_slug: &str, id: Uuid) -> Result<CustomPost, CptError>;

    async fn create_post(
        &self,
        post_type_slug: &str,
        new_post: NewCustomPost,
    ) -> Result<CustomPost, CptError>;

    async fn update_post(
        &self,
        post_type_slug: &str,
        id: Uuid,
        patch: CustomPostPatch,
    ) -> Result<CustomPost, CptError>;

    async fn delete_post(&self, post_type_slug: &str, id: Uuid) -> Result<(), CptError>;

    async fn list_posts(
        &self,
        post_type_slug: &str,
        query: PostListQuery,
    ) -> Result<PostPage, CptError>;

    /// Same as `list_posts` restricted to published posts.
    async fn list_public_posts(
        &self,
        post_type_slug: &str,
        query: PostListQuery,
    ) -> Result<PostPage, CptError>;

    /// Check every stored post of a type against the type's current schema.
    async fn revalidate_posts(&self, post_type_slug: &str)
    -> Result<RevalidationReport, CptError>;
}
