//! Conversions between `SeaORM` models and SDK types.
//!
//! Structured columns are JSON text; decoding can fail on rows written by
//! other tools, so the entity -> SDK direction is fallible.

use cpt_engine_sdk::{CustomPost, PostStatus, PostTypeDefinition};
use sea_orm::ActiveValue::Set;

use super::entity::{custom_post, post_type};
use crate::domain::error::DomainError;

impl TryFrom<post_type::Model> for PostTypeDefinition {
    type Error = DomainError;

    fn try_from(m: post_type::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: m.id,
            slug: m.slug,
            name: m.name,
            singular_name: m.singular_name,
            description: m.description,
            icon: m.icon,
            field_groups: serde_json::from_str(&m.field_groups)?,
            settings: serde_json::from_str(&m.settings)?,
            active: m.active,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

/// # Errors
/// Fails when a structured column cannot be encoded as JSON.
pub fn post_type_active_model(
    def: &PostTypeDefinition,
) -> Result<post_type::ActiveModel, DomainError> {
    Ok(post_type::ActiveModel {
        id: Set(def.id),
        slug: Set(def.slug.clone()),
        name: Set(def.name.clone()),
        singular_name: Set(def.singular_name.clone()),
        description: Set(def.description.clone()),
        icon: Set(def.icon.clone()),
        field_groups: Set(serde_json::to_string(&def.field_groups)?),
        settings: Set(serde_json::to_string(&def.settings)?),
        active: Set(def.active),
        created_at: Set(def.created_at),
        updated_at: Set(def.updated_at),
    })
}

impl TryFrom<custom_post::Model> for CustomPost {
    type Error = DomainError;

    fn try_from(m: custom_post::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: m.id,
            post_type_slug: m.post_type_slug,
            title: m.title,
            slug: m.slug,
            status: PostStatus::from(m.status),
            fields: serde_json::from_str(&m.fields)?,
            content: m.content,
            author_id: m.author_id,
            published_at: m.published_at,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

/// Search document of a post: its title and serialized fields, lowercased.
///
/// Folding happens here with Unicode rules because SQL `LOWER` only folds
/// ASCII on some backends.
#[must_use]
pub fn search_text(title: &str, fields_json: &str) -> String {
    let mut text = String::with_capacity(title.len() + fields_json.len() + 1);
    text.push_str(title);
    text.push('\n');
    text.push_str(fields_json);
    text.to_lowercase()
}

/// # Errors
/// Fails when the field map cannot be encoded as JSON.
pub fn custom_post_active_model(post: &CustomPost) -> Result<custom_post::ActiveModel, DomainError> {
    let fields = serde_json::to_string(&post.fields)?;
    Ok(custom_post::ActiveModel {
        id: Set(post.id),
        post_type_slug: Set(post.post_type_slug.clone()),
        title: Set(post.title.clone()),
        slug: Set(post.slug.clone()),
        status: Set(post.status.as_str().to_owned()),
        search_text: Set(search_text(&post.title, &fields)),
        fields: Set(fields),
        content: Set(post.content.clone()),
        author_id: Set(post.author_id),
        published_at: Set(post.published_at),
        created_at: Set(post.created_at),
        updated_at: Set(post.updated_at),
    })
}
