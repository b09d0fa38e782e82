//! Local implementation of `CptEngineClientV1`.
//!
//! Used for in-process consumers. It delegates to the domain services and
//! converts errors to the SDK error type.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use cpt_engine_sdk::{
    CptEngineClientV1, CptError, CustomPost, CustomPostPatch, NewCustomPost, NewPostType,
    PostListQuery, PostPage, PostTypeDefinition, PostTypePatch, RevalidationReport,
};

use crate::module::CptServices;

pub struct CptEngineLocalClient {
    services: Arc<CptServices>,
}

impl CptEngineLocalClient {
    #[must_use]
    pub fn new(services: Arc<CptServices>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl CptEngineClientV1 for CptEngineLocalClient {
    async fn list_post_types(
        &self,
        active_only: bool,
    ) -> Result<Vec<PostTypeDefinition>, CptError> {
        self.services
            .registry
            .list(active_only)
            .await
            .map_err(Into::into)
    }

    async fn get_post_type(&self, slug: &str) -> Result<PostTypeDefinition, CptError> {
        self.services
            .registry
            .get_by_slug(slug)
            .await
            .map_err(Into::into)
    }

    async fn create_post_type(
        &self,
        new_type: NewPostType,
    ) -> Result<PostTypeDefinition, CptError> {
        self.services
            .registry
            .create(new_type)
            .await
            .map_err(Into::into)
    }

    async fn update_post_type(
        &self,
        slug: &str,
        patch: PostTypePatch,
    ) -> Result<PostTypeDefinition, CptError> {
        self.services
            .registry
            .update(slug, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_post_type(&self, slug: &str) -> Result<(), CptError> {
        self.services
            .registry
            .delete(slug)
            .await
            .map_err(Into::into)
    }

    async fn get_post(&self, post_type_slug: &str, id: Uuid) -> Result<CustomPost, CptError> {
        self.services
            .posts
            .get_by_id(post_type_slug, id)
            .await
            .map_err(Into::into)
    }

    async fn create_post(
        &self,
        post_type_slug: &str,
        new_post: NewCustomPost,
    ) -> Result<CustomPost, CptError> {
        self.services
            .posts
            .create(post_type_slug, new_post)
            .await
            .map_err(Into::into)
    }

    async fn update_post(
        &self,
        post_type_slug: &str,
        id: Uuid,
        patch: CustomPostPatch,
    ) -> Result<CustomPost, CptError> {
        self.services
            .posts
            .update(post_type_slug, id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_post(&self, post_type_slug: &str, id: Uuid) -> Result<(), CptError> {
        self.services
            .posts
            .delete(post_type_slug, id)
            .await
            .map_err(Into::into)
    }

    async fn list_posts(
        &self,
        post_type_slug: &str,
        query: PostListQuery,
    ) -> Result<PostPage, CptError> {
        self.services
            .query
            .list(post_type_slug, query)
            .await
            .map_err(Into::into)
    }

    async fn list_public_posts(
        &self,
        post_type_slug: &str,
        query: PostListQuery,
    ) -> Result<PostPage, CptError> {
        self.services
            .query
            .list_public(post_type_slug, query)
            .await
            .map_err(Into::into)
    }

    async fn revalidate_posts(
        &self,
        post_type_slug: &str,
    ) -> Result<RevalidationReport, CptError> {
        self.services
            .posts
            .revalidate_all(post_type_slug)
            .await
            .map_err(Into::into)
    }
}
