use std::sync::Arc;

use chrono::Utc;
use cpt_engine_sdk::{
    CustomPost, CustomPostPatch, NewCustomPost, PostViolations, RevalidationReport,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::error::DomainError;
use super::registry::PostTypeRegistry;
use super::repo::CustomPostRepository;
use super::slug::derive_slug;
use super::validator::{apply_defaults, validate_fields};
use crate::config::CptEngineConfig;

#[derive(Debug, Clone)]
pub struct PostStoreConfig {
    /// Validate replaced field maps on update, not only on create.
    pub revalidate_on_update: bool,
}

impl Default for PostStoreConfig {
    fn default() -> Self {
        Self::from(&CptEngineConfig::default())
    }
}

impl From<&CptEngineConfig> for PostStoreConfig {
    fn from(cfg: &CptEngineConfig) -> Self {
        Self {
            revalidate_on_update: cfg.revalidate_on_update,
        }
    }
}

/// Generic store of custom posts, scoped by post type slug.
pub struct PostStore {
    registry: Arc<PostTypeRegistry>,
    repo: Arc<dyn CustomPostRepository>,
    config: PostStoreConfig,
}

impl PostStore {
    #[must_use]
    pub fn new(
        registry: Arc<PostTypeRegistry>,
        repo: Arc<dyn CustomPostRepository>,
        config: PostStoreConfig,
    ) -> Self {
        Self {
            registry,
            repo,
            config,
        }
    }

    /// Validate and persist a new post.
    ///
    /// Schema defaults fill absent keys before validation; nothing is written
    /// unless every field passes.
    ///
    /// # Errors
    /// `PostTypeNotFound` for an unknown or inactive type, `Validation` with
    /// every failing field otherwise.
    #[instrument(skip(self, new_post))]
    pub async fn create(
        &self,
        post_type_slug: &str,
        new_post: NewCustomPost,
    ) -> Result<CustomPost, DomainError> {
        let def = self.registry.get_by_slug(post_type_slug).await?;

        let mut fields = new_post.fields;
        apply_defaults(&def.field_groups, &mut fields);

        let report = validate_fields(&def.field_groups, &fields);
        if !report.is_valid() {
            debug!(errors = report.errors.len(), "Rejected post with invalid fields");
            return Err(DomainError::validation(report.errors));
        }

        let slug = match new_post.slug {
            Some(slug) if !slug.trim().is_empty() => slug,
            _ => derive_slug(&new_post.title),
        };
        let now = Utc::now();
        let post = CustomPost {
            id: Uuid::now_v7(),
            post_type_slug: def.slug,
            title: new_post.title,
            slug,
            published_at: new_post.status.is_published().then_some(now),
            status: new_post.status,
            fields,
            content: new_post.content,
            author_id: new_post.author_id,
            created_at: now,
            updated_at: now,
        };

        self.repo.insert(&post).await?;

        info!(post_id = %post.id, "Created post");
        Ok(post)
    }

    /// Merge a patch into a stored post. Concurrent updates are last-writer-wins.
    ///
    /// Replaced fields go through the same gate as on create (schema defaults,
    /// then validation) unless re-validation on update is disabled, in which
    /// case they are stored as given.
    ///
    /// # Errors
    /// `PostNotFound`, or `Validation` when replaced fields fail and
    /// re-validation on update is enabled.
    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        post_type_slug: &str,
        id: Uuid,
        patch: CustomPostPatch,
    ) -> Result<CustomPost, DomainError> {
        let mut post = self.get_by_id(post_type_slug, id).await?;

        if let Some(mut fields) = patch.fields {
            if self.config.revalidate_on_update {
                let def = self.registry.get_by_slug(post_type_slug).await?;
                apply_defaults(&def.field_groups, &mut fields);
                let report = validate_fields(&def.field_groups, &fields);
                if !report.is_valid() {
                    debug!(errors = report.errors.len(), "Rejected field update");
                    return Err(DomainError::validation(report.errors));
                }
            }
            post.fields = fields;
        }

        let now = Utc::now();
        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(slug) = patch.slug {
            post.slug = if slug.trim().is_empty() {
                derive_slug(&post.title)
            } else {
                slug
            };
        }
        if let Some(status) = patch.status {
            if status.is_published() && post.published_at.is_none() {
                post.published_at = Some(now);
            }
            post.status = status;
        }
        if let Some(content) = patch.content {
            post.content = Some(content);
        }
        if let Some(author_id) = patch.author_id {
            post.author_id = Some(author_id);
        }
        post.updated_at = now;

        self.repo.update(&post).await?;

        info!("Updated post");
        Ok(post)
    }

    /// Hard-delete a post.
    ///
    /// # Errors
    /// `PostNotFound` when no row was removed.
    #[instrument(skip(self))]
    pub async fn delete(&self, post_type_slug: &str, id: Uuid) -> Result<(), DomainError> {
        let affected = self.repo.delete(post_type_slug, id).await?;
        if affected == 0 {
            return Err(DomainError::post_not_found(id));
        }
        info!("Deleted post");
        Ok(())
    }

    /// # Errors
    /// `PostNotFound` when absent or owned by another post type.
    pub async fn get_by_id(&self, post_type_slug: &str, id: Uuid) -> Result<CustomPost, DomainError> {
        self.repo
            .find_by_id(post_type_slug, id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    /// Check every stored post of a type against the type's current schema.
    ///
    /// Read-only: offending posts are reported, never modified.
    ///
    /// # Errors
    /// `PostTypeNotFound` for an unknown or inactive type.
    #[instrument(skip(self))]
    pub async fn revalidate_all(
        &self,
        post_type_slug: &str,
    ) -> Result<RevalidationReport, DomainError> {
        let def = self.registry.get_by_slug(post_type_slug).await?;
        let posts = self.repo.list_all(post_type_slug).await?;

        let invalid: Vec<PostViolations> = posts
            .iter()
            .filter_map(|post| {
                let report = validate_fields(&def.field_groups, &post.fields);
                (!report.is_valid()).then(|| PostViolations {
                    post_id: post.id,
                    errors: report.errors,
                })
            })
            .collect();

        if !invalid.is_empty() {
            warn!(
                checked = posts.len(),
                invalid = invalid.len(),
                "Stored posts no longer match their schema"
            );
        }

        Ok(RevalidationReport {
            post_type_slug: def.slug,
            checked: u64::try_from(posts.len()).unwrap_or(u64::MAX),
            invalid,
        })
    }
}
