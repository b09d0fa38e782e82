#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Test support utilities for `cpt-engine` integration tests.
//!
//! Provides an in-memory database with migrations applied, wired services,
//! a REST router and request helpers.

#![allow(dead_code)] // Support module provides utilities that may not all be used

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;

use cpt_engine::infra::storage::migrations::Migrator;
use cpt_engine::{CptEngineConfig, CptServices};
use cpt_engine_sdk::{
    FieldGroup, FieldSchema, FieldType, FieldValue, FieldValues, NewCustomPost, NewPostType,
    PostStatus,
};

pub async fn inmem_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub struct TestContext {
    pub db: DatabaseConnection,
    pub services: Arc<CptServices>,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_config(CptEngineConfig::default()).await
    }

    pub async fn with_config(cfg: CptEngineConfig) -> Self {
        let db = inmem_db().await;
        let services = Arc::new(CptServices::with_db(&db, &cfg));
        Self { db, services }
    }

    pub fn router(&self) -> Router {
        cpt_engine::api::rest::router(Arc::clone(&self.services), "/cpt")
    }
}

/// `testimonial`: required `text`, required `author_name`, optional 1..=5 `rating`.
pub fn testimonial_type() -> NewPostType {
    NewPostType {
        slug: "testimonial".to_owned(),
        name: "Testimonials".to_owned(),
        singular_name: Some("Testimonial".to_owned()),
        field_groups: vec![FieldGroup::new(
            "details",
            "Details",
            vec![
                FieldSchema::new("f1", "text", "Text", FieldType::Textarea).required(),
                FieldSchema::new("f2", "author_name", "Author", FieldType::Text).required(),
                FieldSchema::new("f3", "rating", "Rating", FieldType::Number)
                    .with_range(Some(1.0), Some(5.0)),
            ],
        )],
        ..NewPostType::default()
    }
}

pub fn fields(pairs: &[(&str, FieldValue)]) -> FieldValues {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), v.clone()))
        .collect()
}

pub fn testimonial(title: &str, status: PostStatus) -> NewCustomPost {
    NewCustomPost {
        title: title.to_owned(),
        status,
        fields: fields(&[
            ("text", FieldValue::from("Great work")),
            ("author_name", FieldValue::from("Ann")),
        ]),
        ..NewCustomPost::default()
    }
}

/// Send one request through the router and decode the JSON body (if any).
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Option<String>, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send_request(router, req).await
}

pub async fn send_request(
    router: &Router,
    req: Request<Body>,
) -> (StatusCode, Option<String>, Value) {
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, content_type, json)
}
