use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use utoipa::OpenApi;

use super::dto::{
    CreatePostReq, CreatePostTypeReq, DeletedPostTypeDto, PaginationDto, PostDto, PostListDto,
    PostTypeDto, PostTypeSettingsDto, PostTypeSettingsReq, PostViolationsDto,
    RevalidationReportDto, UpdatePostReq, UpdatePostTypeReq,
};
use super::handlers;
use super::problem::{Problem, ValidationViolation};
use crate::module::CptServices;

#[derive(OpenApi)]
#[openapi(
    info(title = "CPT Engine API", description = "Runtime-defined post types and their posts"),
    paths(
        handlers::list_post_types,
        handlers::get_post_type,
        handlers::create_post_type,
        handlers::update_post_type,
        handlers::delete_post_type,
        handlers::revalidate_posts,
        handlers::list_posts,
        handlers::list_public_posts,
        handlers::get_post,
        handlers::create_post,
        handlers::update_post,
        handlers::delete_post,
    ),
    components(schemas(
        Problem,
        ValidationViolation,
        PostTypeDto,
        PostTypeSettingsDto,
        PostTypeSettingsReq,
        CreatePostTypeReq,
        UpdatePostTypeReq,
        DeletedPostTypeDto,
        PostDto,
        CreatePostReq,
        UpdatePostReq,
        PostListDto,
        PaginationDto,
        PostViolationsDto,
        RevalidationReportDto,
    )),
    tags(
        (name = "Post types", description = "Post type registry"),
        (name = "Posts", description = "Custom posts of a post type"),
    )
)]
struct ApiDoc;

/// OpenAPI document with every path mounted under `base_path`.
#[must_use]
pub fn openapi(base_path: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    let prefix = base_path.trim_end_matches('/');
    doc.paths.paths = std::mem::take(&mut doc.paths.paths)
        .into_iter()
        .map(|(path, item)| match (prefix, path.as_str()) {
            ("", _) => (path, item),
            (_, "/") => (prefix.to_owned(), item),
            _ => (format!("{prefix}{path}"), item),
        })
        .collect();
    doc
}

/// All REST routes, mounted under `base_path`.
#[must_use]
pub fn router(services: Arc<CptServices>, base_path: &str) -> Router {
    let doc = Arc::new(openapi(base_path));

    let routes = Router::new()
        .route(
            "/",
            get(handlers::list_post_types).post(handlers::create_post_type),
        )
        .route(
            "/openapi.json",
            get(move || {
                let doc = Arc::clone(&doc);
                async move { Json(doc.as_ref().clone()) }
            }),
        )
        .route(
            "/{slug}",
            get(handlers::get_post_type)
                .patch(handlers::update_post_type)
                .delete(handlers::delete_post_type),
        )
        .route("/{slug}/revalidate", post(handlers::revalidate_posts))
        .route(
            "/{slug}/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route("/{slug}/posts/public", get(handlers::list_public_posts))
        .route(
            "/{slug}/posts/{id}",
            get(handlers::get_post)
                .patch(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .layer(Extension(services));

    let base = base_path.trim_end_matches('/');
    if base.is_empty() {
        routes
    } else {
        Router::new().nest(base, routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_paths_are_prefixed() {
        let doc = openapi("/cpt");
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| *p == "/cpt"));
        assert!(paths.iter().any(|p| *p == "/cpt/{slug}/posts/{id}"));
        assert!(paths.iter().any(|p| *p == "/cpt/{slug}/posts/public"));
        assert!(paths.iter().all(|p| p.starts_with("/cpt")));
    }

    #[test]
    fn test_openapi_at_root() {
        let doc = openapi("/");
        assert!(doc.paths.paths.contains_key("/"));
        assert!(doc.paths.paths.contains_key("/{slug}"));
    }
}
