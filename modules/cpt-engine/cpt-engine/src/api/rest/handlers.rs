use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Extension, OriginalUri, Path, Query};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use cpt_engine_sdk::PostListQuery;
use tracing::info;
use uuid::Uuid;

use super::dto::{
    CreatePostReq, CreatePostTypeReq, DataResponse, DeletedPostTypeDto, ListPostTypesQuery,
    ListPostsQuery, PostDto, PostListDto, PostTypeDto, RevalidationReportDto, UpdatePostReq,
    UpdatePostTypeReq,
};
use super::error::domain_error_to_problem;
use super::problem::{ApiResult, Problem};
use crate::domain::error::DomainError;
use crate::module::CptServices;

type JsonData<T> = Json<DataResponse<T>>;

fn at(uri: &OriginalUri) -> impl Fn(DomainError) -> Problem + '_ {
    move |e| domain_error_to_problem(&e, uri.path())
}

fn data<T>(value: T) -> JsonData<T> {
    Json(DataResponse::new(value))
}

// ==================== Post types ====================

/// List post types, newest first
#[utoipa::path(
    get,
    path = "/",
    tag = "Post types",
    params(ListPostTypesQuery),
    responses(
        (status = 200, description = "Post types", body = DataResponse<Vec<PostTypeDto>>),
        (status = 400, description = "Malformed query", body = Problem),
    )
)]
pub async fn list_post_types(
    uri: OriginalUri,
    Extension(svc): Extension<Arc<CptServices>>,
    query: Result<Query<ListPostTypesQuery>, QueryRejection>,
) -> ApiResult<JsonData<Vec<PostTypeDto>>> {
    let Query(query) = query?;
    let active_only = !query.include_inactive.unwrap_or(false);

    let defs = svc.registry.list(active_only).await.map_err(at(&uri))?;
    Ok(data(defs.into_iter().map(PostTypeDto::from).collect()))
}

/// Fetch an active post type
#[utoipa::path(
    get,
    path = "/{slug}",
    tag = "Post types",
    params(("slug" = String, Path, description = "Post type slug")),
    responses(
        (status = 200, description = "Post type", body = DataResponse<PostTypeDto>),
        (status = 404, description = "Unknown or inactive post type", body = Problem),
    )
)]
pub async fn get_post_type(
    uri: OriginalUri,
    Extension(svc): Extension<Arc<CptServices>>,
    Path(slug): Path<String>,
) -> ApiResult<JsonData<PostTypeDto>> {
    let def = svc.registry.get_by_slug(&slug).await.map_err(at(&uri))?;
    Ok(data(def.into()))
}

/// Create a post type
#[utoipa::path(
    post,
    path = "/",
    tag = "Post types",
    request_body = CreatePostTypeReq,
    responses(
        (status = 201, description = "Created", body = DataResponse<PostTypeDto>),
        (status = 400, description = "Malformed definition", body = Problem),
        (status = 409, description = "Slug already taken", body = Problem),
    )
)]
pub async fn create_post_type(
    uri: OriginalUri,
    Extension(svc): Extension<Arc<CptServices>>,
    payload: Result<Json<CreatePostTypeReq>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    info!(slug = %req.slug, "Creating post type");

    let new_type = req.into_new_post_type().map_err(at(&uri))?;
    let def = svc.registry.create(new_type).await.map_err(at(&uri))?;
    Ok((StatusCode::CREATED, data(PostTypeDto::from(def))))
}

/// Update a post type (partial)
#[utoipa::path(
    patch,
    path = "/{slug}",
    tag = "Post types",
    params(("slug" = String, Path, description = "Post type slug")),
    request_body = UpdatePostTypeReq,
    responses(
        (status = 200, description = "Updated", body = DataResponse<PostTypeDto>),
        (status = 400, description = "Malformed definition", body = Problem),
        (status = 404, description = "Unknown or inactive post type", body = Problem),
    )
)]
pub async fn update_post_type(
    uri: OriginalUri,
    Extension(svc): Extension<Arc<CptServices>>,
    Path(slug): Path<String>,
    payload: Result<Json<UpdatePostTypeReq>, JsonRejection>,
) -> ApiResult<JsonData<PostTypeDto>> {
    let Json(req) = payload?;
    let patch = req.into_patch().map_err(at(&uri))?;
    let def = svc
        .registry
        .update(&slug, patch)
        .await
        .map_err(at(&uri))?;
    Ok(data(def.into()))
}

/// Soft-delete a post type
#[utoipa::path(
    delete,
    path = "/{slug}",
    tag = "Post types",
    params(("slug" = String, Path, description = "Post type slug")),
    responses(
        (status = 200, description = "Deactivated", body = DataResponse<DeletedPostTypeDto>),
        (status = 404, description = "Unknown or inactive post type", body = Problem),
    )
)]
pub async fn delete_post_type(
    uri: OriginalUri,
    Extension(svc): Extension<Arc<CptServices>>,
    Path(slug): Path<String>,
) -> ApiResult<JsonData<DeletedPostTypeDto>> {
    svc.registry.delete(&slug).await.map_err(at(&uri))?;
    Ok(data(DeletedPostTypeDto {
        slug,
        active: false,
    }))
}

/// Check stored posts against the current schema
#[utoipa::path(
    post,
    path = "/{slug}/revalidate",
    tag = "Post types",
    params(("slug" = String, Path, description = "Post type slug")),
    responses(
        (status = 200, description = "Report", body = DataResponse<RevalidationReportDto>),
        (status = 404, description = "Unknown or inactive post type", body = Problem),
    )
)]
pub async fn revalidate_posts(
    uri: OriginalUri,
    Extension(svc): Extension<Arc<CptServices>>,
    Path(slug): Path<String>,
) -> ApiResult<JsonData<RevalidationReportDto>> {
    let report = svc.posts.revalidate_all(&slug).await.map_err(at(&uri))?;
    Ok(data(report.into()))
}

// ==================== Posts ====================

/// List posts of a type
#[utoipa::path(
    get,
    path = "/{slug}/posts",
    tag = "Posts",
    params(("slug" = String, Path, description = "Post type slug"), ListPostsQuery),
    responses(
        (status = 200, description = "One page of posts", body = DataResponse<PostListDto>),
        (status = 400, description = "Malformed query", body = Problem),
        (status = 404, description = "Unknown or inactive post type", body = Problem),
    )
)]
pub async fn list_posts(
    uri: OriginalUri,
    Extension(svc): Extension<Arc<CptServices>>,
    Path(slug): Path<String>,
    query: Result<Query<ListPostsQuery>, QueryRejection>,
) -> ApiResult<JsonData<PostListDto>> {
    let Query(query) = query?;
    let query = PostListQuery::try_from(query)?;

    let page = svc.query.list(&slug, query).await.map_err(at(&uri))?;
    Ok(data(page.into()))
}

/// List published posts of a type
#[utoipa::path(
    get,
    path = "/{slug}/posts/public",
    tag = "Posts",
    params(("slug" = String, Path, description = "Post type slug"), ListPostsQuery),
    responses(
        (status = 200, description = "One page of published posts", body = DataResponse<PostListDto>),
        (status = 400, description = "Malformed query", body = Problem),
        (status = 404, description = "Unknown or inactive post type", body = Problem),
    )
)]
pub async fn list_public_posts(
    uri: OriginalUri,
    Extension(svc): Extension<Arc<CptServices>>,
    Path(slug): Path<String>,
    query: Result<Query<ListPostsQuery>, QueryRejection>,
) -> ApiResult<JsonData<PostListDto>> {
    let Query(query) = query?;
    let query = PostListQuery::try_from(query)?;

    let page = svc
        .query
        .list_public(&slug, query)
        .await
        .map_err(at(&uri))?;
    Ok(data(page.into()))
}

/// Fetch one post
#[utoipa::path(
    get,
    path = "/{slug}/posts/{id}",
    tag = "Posts",
    params(
        ("slug" = String, Path, description = "Post type slug"),
        ("id" = Uuid, Path, description = "Post id"),
    ),
    responses(
        (status = 200, description = "Post", body = DataResponse<PostDto>),
        (status = 404, description = "Post not found", body = Problem),
    )
)]
pub async fn get_post(
    uri: OriginalUri,
    Extension(svc): Extension<Arc<CptServices>>,
    path: Result<Path<(String, Uuid)>, PathRejection>,
) -> ApiResult<JsonData<PostDto>> {
    let Path((slug, id)) = path?;
    let post = svc.posts.get_by_id(&slug, id).await.map_err(at(&uri))?;
    Ok(data(post.into()))
}

/// Create a post (validated against the post type schema)
#[utoipa::path(
    post,
    path = "/{slug}/posts",
    tag = "Posts",
    params(("slug" = String, Path, description = "Post type slug")),
    request_body = CreatePostReq,
    responses(
        (status = 201, description = "Created", body = DataResponse<PostDto>),
        (status = 400, description = "Field validation failed", body = Problem),
        (status = 404, description = "Unknown or inactive post type", body = Problem),
    )
)]
pub async fn create_post(
    uri: OriginalUri,
    Extension(svc): Extension<Arc<CptServices>>,
    Path(slug): Path<String>,
    payload: Result<Json<CreatePostReq>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    let post = svc
        .posts
        .create(&slug, req.into())
        .await
        .map_err(at(&uri))?;
    Ok((StatusCode::CREATED, data(PostDto::from(post))))
}

/// Update a post (partial)
#[utoipa::path(
    patch,
    path = "/{slug}/posts/{id}",
    tag = "Posts",
    params(
        ("slug" = String, Path, description = "Post type slug"),
        ("id" = Uuid, Path, description = "Post id"),
    ),
    request_body = UpdatePostReq,
    responses(
        (status = 200, description = "Updated", body = DataResponse<PostDto>),
        (status = 400, description = "Field validation failed", body = Problem),
        (status = 404, description = "Post not found", body = Problem),
    )
)]
pub async fn update_post(
    uri: OriginalUri,
    Extension(svc): Extension<Arc<CptServices>>,
    path: Result<Path<(String, Uuid)>, PathRejection>,
    payload: Result<Json<UpdatePostReq>, JsonRejection>,
) -> ApiResult<JsonData<PostDto>> {
    let Path((slug, id)) = path?;
    let Json(req) = payload?;
    let post = svc
        .posts
        .update(&slug, id, req.into())
        .await
        .map_err(at(&uri))?;
    Ok(data(post.into()))
}

/// Delete a post
#[utoipa::path(
    delete,
    path = "/{slug}/posts/{id}",
    tag = "Posts",
    params(
        ("slug" = String, Path, description = "Post type slug"),
        ("id" = Uuid, Path, description = "Post id"),
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Post not found", body = Problem),
    )
)]
pub async fn delete_post(
    uri: OriginalUri,
    Extension(svc): Extension<Arc<CptServices>>,
    path: Result<Path<(String, Uuid)>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path((slug, id)) = path?;
    svc.posts.delete(&slug, id).await.map_err(at(&uri))?;
    Ok(StatusCode::NO_CONTENT)
}
