use chrono::{DateTime, Utc};
use cpt_engine_sdk::{
    CustomPost, CustomPostPatch, FieldGroup, FieldValues, NewCustomPost, NewPostType,
    Pagination, PostListQuery, PostPage, PostSortField, PostStatus, PostTypeDefinition,
    PostTypePatch, PostTypeSettings, PostTypeSettingsPatch, PostViolations, RevalidationReport,
    SortOrder,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::error::bad_request;
use super::problem::{Problem, ValidationViolation};
use crate::domain::error::DomainError;
use crate::domain::shape;

/// `{ "data": ... }` response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    #[must_use]
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

// ==================== Post types ====================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostTypeSettingsDto {
    pub public: bool,
    pub has_archive: bool,
    pub supports: Vec<String>,
}

impl From<PostTypeSettings> for PostTypeSettingsDto {
    fn from(s: PostTypeSettings) -> Self {
        Self {
            public: s.public,
            has_archive: s.has_archive,
            supports: s.supports,
        }
    }
}

/// Partial settings; absent keys keep their current (or default) value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostTypeSettingsReq {
    pub public: Option<bool>,
    pub has_archive: Option<bool>,
    pub supports: Option<Vec<String>>,
}

impl From<PostTypeSettingsReq> for PostTypeSettingsPatch {
    fn from(req: PostTypeSettingsReq) -> Self {
        Self {
            public: req.public,
            has_archive: req.has_archive,
            supports: req.supports,
        }
    }
}

/// REST DTO for post type representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostTypeDto {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub singular_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub icon: String,
    #[schema(value_type = Vec<Object>)]
    pub field_groups: Vec<FieldGroup>,
    pub settings: PostTypeSettingsDto,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PostTypeDefinition> for PostTypeDto {
    fn from(def: PostTypeDefinition) -> Self {
        Self {
            id: def.id,
            slug: def.slug,
            name: def.name,
            singular_name: def.singular_name,
            description: def.description,
            icon: def.icon,
            field_groups: def.field_groups,
            settings: def.settings.into(),
            active: def.active,
            created_at: def.created_at,
            updated_at: def.updated_at,
        }
    }
}

/// REST DTO for creating a post type
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostTypeReq {
    pub slug: String,
    pub name: String,
    pub singular_name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    /// Field groups in wire form; their shape is checked while decoding.
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub field_groups: Vec<serde_json::Value>,
    #[serde(default)]
    pub settings: PostTypeSettingsReq,
}

impl CreatePostTypeReq {
    /// # Errors
    /// `InvalidShape` when a field group or field is structurally malformed.
    pub fn into_new_post_type(self) -> Result<NewPostType, DomainError> {
        let field_groups = shape::decode_definition(&self.slug, &self.name, self.field_groups)?;
        Ok(NewPostType {
            slug: self.slug,
            name: self.name,
            singular_name: self.singular_name,
            description: self.description,
            icon: self.icon,
            field_groups,
            settings: self.settings.into(),
        })
    }
}

/// REST DTO for updating a post type (partial). `fieldGroups` replaces the whole array.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostTypeReq {
    pub name: Option<String>,
    pub singular_name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub field_groups: Option<Vec<serde_json::Value>>,
    pub settings: Option<PostTypeSettingsReq>,
}

impl UpdatePostTypeReq {
    /// # Errors
    /// `InvalidShape` when a replacement field group is structurally malformed.
    pub fn into_patch(self) -> Result<PostTypePatch, DomainError> {
        let field_groups = self
            .field_groups
            .map(shape::decode_field_groups)
            .transpose()?;
        Ok(PostTypePatch {
            name: self.name,
            singular_name: self.singular_name,
            description: self.description,
            icon: self.icon,
            field_groups,
            settings: self.settings.map(Into::into),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletedPostTypeDto {
    pub slug: String,
    pub active: bool,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListPostTypesQuery {
    /// Include soft-deleted post types
    pub include_inactive: Option<bool>,
}

// ==================== Posts ====================

/// REST DTO for custom post representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: Uuid,
    pub post_type_slug: String,
    pub title: String,
    pub slug: String,
    pub status: String,
    #[schema(value_type = Object)]
    pub fields: FieldValues,
    pub content: Option<String>,
    pub author_id: Option<Uuid>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CustomPost> for PostDto {
    fn from(post: CustomPost) -> Self {
        Self {
            id: post.id,
            post_type_slug: post.post_type_slug,
            title: post.title,
            slug: post.slug,
            status: post.status.into(),
            fields: post.fields,
            content: post.content,
            author_id: post.author_id,
            published_at: post.published_at,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// REST DTO for creating a custom post
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostReq {
    #[serde(default)]
    pub title: String,
    /// Derived from `title` when absent
    pub slug: Option<String>,
    /// Defaults to `draft`
    pub status: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub fields: FieldValues,
    pub content: Option<String>,
    pub author_id: Option<Uuid>,
}

impl From<CreatePostReq> for NewCustomPost {
    fn from(req: CreatePostReq) -> Self {
        Self {
            title: req.title,
            slug: req.slug,
            status: req.status.map(PostStatus::from).unwrap_or_default(),
            fields: req.fields,
            content: req.content,
            author_id: req.author_id,
        }
    }
}

/// REST DTO for updating a custom post (partial). `fields` replaces the whole map.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostReq {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub status: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub fields: Option<FieldValues>,
    pub content: Option<String>,
    pub author_id: Option<Uuid>,
}

impl From<UpdatePostReq> for CustomPostPatch {
    fn from(req: UpdatePostReq) -> Self {
        Self {
            title: req.title,
            slug: req.slug,
            status: req.status.map(PostStatus::from),
            fields: req.fields,
            content: req.content,
            author_id: req.author_id,
        }
    }
}

/// Query string of post listings.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListPostsQuery {
    /// 1-based page number
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<String>,
    /// Case-insensitive substring of the title or any field value
    pub search: Option<String>,
    /// `createdAt`, `updatedAt`, `publishedAt`, `title`, `slug` or `status`
    pub sort_by: Option<String>,
    /// `asc` or `desc`
    pub sort_order: Option<String>,
}

impl TryFrom<ListPostsQuery> for PostListQuery {
    type Error = Problem;

    fn try_from(q: ListPostsQuery) -> Result<Self, Self::Error> {
        let sort_by = match q.sort_by.as_deref() {
            None | Some("") => PostSortField::default(),
            Some(raw) => PostSortField::parse(raw)
                .ok_or_else(|| bad_request(format!("Unsupported sortBy '{raw}'")))?,
        };
        let sort_order = match q.sort_order.as_deref() {
            None | Some("") => SortOrder::default(),
            Some(raw) => SortOrder::parse(raw)
                .ok_or_else(|| bad_request(format!("Unsupported sortOrder '{raw}'")))?,
        };

        Ok(Self {
            page: q.page.unwrap_or(1).max(1),
            limit: q.limit,
            status: q
                .status
                .filter(|s| !s.trim().is_empty())
                .map(PostStatus::from),
            search: q.search,
            sort_by,
            sort_order,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationDto {
    pub current: u64,
    pub total: u64,
    pub count: u64,
    pub limit: u64,
    pub total_items: u64,
}

impl From<Pagination> for PaginationDto {
    fn from(p: Pagination) -> Self {
        Self {
            current: p.current,
            total: p.total,
            count: p.count,
            limit: p.limit,
            total_items: p.total_items,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostListDto {
    pub posts: Vec<PostDto>,
    pub pagination: PaginationDto,
}

impl From<PostPage> for PostListDto {
    fn from(page: PostPage) -> Self {
        Self {
            posts: page.items.into_iter().map(PostDto::from).collect(),
            pagination: page.pagination.into(),
        }
    }
}

// ==================== Re-validation ====================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostViolationsDto {
    pub post_id: Uuid,
    pub errors: Vec<ValidationViolation>,
}

impl From<PostViolations> for PostViolationsDto {
    fn from(v: PostViolations) -> Self {
        Self {
            post_id: v.post_id,
            errors: v
                .errors
                .into_iter()
                .map(|e| ValidationViolation {
                    field: e.field,
                    message: e.message,
                    code: None,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevalidationReportDto {
    pub post_type_slug: String,
    pub checked: u64,
    pub invalid: Vec<PostViolationsDto>,
}

impl From<RevalidationReport> for RevalidationReportDto {
    fn from(r: RevalidationReport) -> Self {
        Self {
            post_type_slug: r.post_type_slug,
            checked: r.checked,
            invalid: r.invalid.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cpt_engine_sdk::{FieldType, FieldValue};
    use serde_json::json;

    #[test]
    fn test_create_post_type_req_uses_camel_case() {
        let req: CreatePostTypeReq = serde_json::from_value(json!({
            "slug": "testimonial",
            "name": "Testimonials",
            "singularName": "Testimonial",
            "fieldGroups": [{
                "id": "g1",
                "name": "Main",
                "fields": [
                    {"id": "f1", "name": "text", "label": "Text", "type": "text", "required": true},
                    {"id": "f2", "name": "rating", "label": "Rating", "type": "number"}
                ]
            }],
            "settings": {"hasArchive": false}
        }))
        .unwrap();

        let new_type = req.into_new_post_type().unwrap();
        assert_eq!(new_type.singular_name.as_deref(), Some("Testimonial"));
        assert_eq!(new_type.field_groups[0].fields[1].field_type, FieldType::Number);
        assert!(new_type.field_groups[0].fields[0].required);
        assert_eq!(new_type.settings.has_archive, Some(false));
        assert_eq!(new_type.settings.public, None);
    }

    #[test]
    fn test_create_post_req_defaults() {
        let req: CreatePostReq = serde_json::from_value(json!({
            "title": "Great service",
            "fields": {"text": "Great!", "rating": 5, "tags": ["a", "b"]}
        }))
        .unwrap();

        let new_post = NewCustomPost::from(req);
        assert_eq!(new_post.status, PostStatus::Draft);
        assert_eq!(new_post.slug, None);
        assert_eq!(new_post.fields["rating"], FieldValue::Number(5.0));
        assert_eq!(
            new_post.fields["tags"],
            FieldValue::List(vec![FieldValue::from("a"), FieldValue::from("b")])
        );
    }

    #[test]
    fn test_post_dto_serializes_camel_case_and_integral_numbers() {
        let now = Utc::now();
        let dto = PostDto::from(CustomPost {
            id: Uuid::now_v7(),
            post_type_slug: "testimonial".to_owned(),
            title: "Great".to_owned(),
            slug: "great".to_owned(),
            status: PostStatus::Published,
            fields: [("rating".to_owned(), FieldValue::from(5))].into_iter().collect(),
            content: None,
            author_id: None,
            published_at: Some(now),
            created_at: now,
            updated_at: now,
        });

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["postTypeSlug"], "testimonial");
        assert_eq!(json["status"], "published");
        assert_eq!(json["fields"]["rating"], json!(5));
        assert!(json.get("publishedAt").is_some());
    }

    #[test]
    fn test_list_query_parsing() {
        let q = PostListQuery::try_from(ListPostsQuery {
            page: Some(0),
            sort_by: Some("title".to_owned()),
            sort_order: Some("ASC".to_owned()),
            status: Some("published".to_owned()),
            ..ListPostsQuery::default()
        })
        .unwrap();
        assert_eq!(q.page, 1);
        assert_eq!(q.sort_by, PostSortField::Title);
        assert_eq!(q.sort_order, SortOrder::Asc);
        assert_eq!(q.status, Some(PostStatus::Published));

        let err = PostListQuery::try_from(ListPostsQuery {
            sort_by: Some("rating".to_owned()),
            ..ListPostsQuery::default()
        })
        .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }
}
