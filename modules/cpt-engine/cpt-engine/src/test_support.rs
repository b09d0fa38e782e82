#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use cpt_engine_sdk::{FieldGroup, FieldSchema, FieldType, NewPostType};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use crate::config::CptEngineConfig;
use crate::module::CptServices;

pub async fn inmem_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    crate::infra::storage::migrations::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub fn build_services(db: &DatabaseConnection) -> Arc<CptServices> {
    Arc::new(CptServices::with_db(db, &CptEngineConfig::default()))
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
