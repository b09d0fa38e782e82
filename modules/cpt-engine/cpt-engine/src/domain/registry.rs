use std::sync::Arc;

use chrono::Utc;
use cpt_engine_sdk::{NewPostType, PostTypeDefinition, PostTypePatch, PostTypeSettings};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::error::DomainError;
use super::repo::PostTypeRepository;
use super::shape::validate_definition;
use crate::config::CptEngineConfig;

#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub default_icon: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::from(&CptEngineConfig::default())
    }
}

impl From<&CptEngineConfig> for RegistryConfig {
    fn from(cfg: &CptEngineConfig) -> Self {
        Self {
            default_icon: cfg.default_icon.clone(),
        }
    }
}

/// CRUD and lookup over post type definitions.
///
/// Definitions are soft-deleted: an inactive definition is invisible to
/// lookups but still holds its slug.
pub struct PostTypeRegistry {
    repo: Arc<dyn PostTypeRepository>,
    config: RegistryConfig,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl PostTypeRegistry {
    #[must_use]
    pub fn new(repo: Arc<dyn PostTypeRepository>, config: RegistryConfig) -> Self {
        Self { repo, config }
    }

    /// Register a new post type.
    ///
    /// # Errors
    /// `InvalidShape` for a malformed definition, `Conflict` when the slug is
    /// already taken by any definition, active or not.
    #[instrument(skip(self, new_type), fields(slug = %new_type.slug))]
    pub async fn create(&self, new_type: NewPostType) -> Result<PostTypeDefinition, DomainError> {
        validate_definition(&new_type.slug, &new_type.name, &new_type.field_groups)?;

        let now = Utc::now();
        let singular_name = non_blank(new_type.singular_name).unwrap_or_else(|| new_type.name.clone());
        let def = PostTypeDefinition {
            id: Uuid::now_v7(),
            slug: new_type.slug,
            name: new_type.name,
            singular_name,
            description: new_type.description,
            icon: non_blank(new_type.icon).unwrap_or_else(|| self.config.default_icon.clone()),
            field_groups: new_type.field_groups,
            settings: new_type.settings.apply_to(PostTypeSettings::default()),
            active: true,
            created_at: now,
            updated_at: now,
        };

        self.repo.insert(&def).await?;

        info!(id = %def.id, "Created post type");
        Ok(def)
    }

    /// Fetch an active definition.
    ///
    /// # Errors
    /// `PostTypeNotFound` when the slug is unknown or soft-deleted.
    pub async fn get_by_slug(&self, slug: &str) -> Result<PostTypeDefinition, DomainError> {
        match self.repo.find_by_slug(slug).await? {
            Some(def) if def.active => Ok(def),
            _ => Err(DomainError::post_type_not_found(slug)),
        }
    }

    /// Merge a partial update into an active definition.
    ///
    /// A present `field_groups` replaces the whole array. Existing posts are
    /// not checked against the new schema.
    ///
    /// # Errors
    /// `PostTypeNotFound`, or `InvalidShape` when the merged definition is malformed.
    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        slug: &str,
        patch: PostTypePatch,
    ) -> Result<PostTypeDefinition, DomainError> {
        let mut def = self.get_by_slug(slug).await?;

        if let Some(name) = patch.name {
            def.name = name;
        }
        if let Some(singular_name) = patch.singular_name {
            def.singular_name = singular_name;
        }
        if let Some(description) = patch.description {
            def.description = Some(description);
        }
        if let Some(icon) = non_blank(patch.icon) {
            def.icon = icon;
        }
        if let Some(field_groups) = patch.field_groups {
            def.field_groups = field_groups;
        }
        if let Some(settings) = patch.settings {
            def.settings = settings.apply_to(def.settings);
        }

        validate_definition(&def.slug, &def.name, &def.field_groups)?;

        def.updated_at = Utc::now();
        self.repo.update(&def).await?;

        info!("Updated post type");
        Ok(def)
    }

    /// Soft-delete an active definition. Posts of the type are left in place.
    ///
    /// # Errors
    /// `PostTypeNotFound` when the slug is unknown or already inactive.
    #[instrument(skip(self))]
    pub async fn delete(&self, slug: &str) -> Result<(), DomainError> {
        let mut def = self.get_by_slug(slug).await?;
        def.active = false;
        def.updated_at = Utc::now();
        self.repo.update(&def).await?;

        info!("Deactivated post type");
        Ok(())
    }

    /// Definitions, newest first.
    ///
    /// # Errors
    /// Storage failures only.
    pub async fn list(&self, active_only: bool) -> Result<Vec<PostTypeDefinition>, DomainError> {
        let defs = self.repo.list(active_only).await?;
        debug!(count = defs.len(), active_only, "Listed post types");
        Ok(defs)
    }
}
