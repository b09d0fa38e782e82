//! Post type registry over `SeaORM` storage.

#![allow(clippy::unwrap_used)]

use cpt_engine::domain::error::DomainError;
use cpt_engine_sdk::{
    DEFAULT_ICON, FieldGroup, FieldSchema, FieldType, PostTypePatch, PostTypeSettingsPatch,
};

mod support;
use support::{TestContext, testimonial_type};

#[tokio::test]
async fn test_create_fills_defaults_and_round_trips() {
    let ctx = TestContext::new().await;

    let created = ctx.services.registry.create(testimonial_type()).await.unwrap();
    assert!(created.active);
    assert_eq!(created.icon, DEFAULT_ICON);
    assert!(created.settings.public);
    assert!(created.settings.has_archive);
    assert_eq!(created.settings.supports, vec!["title".to_owned()]);

    let fetched = ctx.services.registry.get_by_slug("testimonial").await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.field_groups, created.field_groups);
    assert_eq!(fetched.settings, created.settings);
}

#[tokio::test]
async fn test_duplicate_slug_conflicts_via_unique_index() {
    let ctx = TestContext::new().await;
    ctx.services.registry.create(testimonial_type()).await.unwrap();

    let err = ctx
        .services
        .registry
        .create(testimonial_type())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { ref slug } if slug == "testimonial"));
}

#[tokio::test]
async fn test_soft_deleted_slug_stays_reserved() {
    let ctx = TestContext::new().await;
    ctx.services.registry.create(testimonial_type()).await.unwrap();
    ctx.services.registry.delete("testimonial").await.unwrap();

    let err = ctx
        .services
        .registry
        .get_by_slug("testimonial")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::PostTypeNotFound { .. }));

    let err = ctx
        .services
        .registry
        .create(testimonial_type())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }));

    let all = ctx.services.registry.list(false).await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(!all[0].active);
    assert!(ctx.services.registry.list(true).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_merges_settings_and_replaces_groups() {
    let ctx = TestContext::new().await;
    ctx.services.registry.create(testimonial_type()).await.unwrap();

    let patch = PostTypePatch {
        name: Some("Reviews".to_owned()),
        field_groups: Some(vec![FieldGroup::new(
            "main",
            "Main",
            vec![FieldSchema::new("a", "body", "Body", FieldType::Textarea).required()],
        )]),
        settings: Some(PostTypeSettingsPatch {
            public: Some(false),
            ..PostTypeSettingsPatch::default()
        }),
        ..PostTypePatch::default()
    };
    let updated = ctx
        .services
        .registry
        .update("testimonial", patch)
        .await
        .unwrap();

    assert_eq!(updated.name, "Reviews");
    assert_eq!(updated.singular_name, "Testimonial");
    assert!(!updated.settings.public);
    assert!(updated.settings.has_archive);
    assert_eq!(updated.fields().count(), 1);

    let fetched = ctx.services.registry.get_by_slug("testimonial").await.unwrap();
    assert_eq!(fetched.name, updated.name);
    assert_eq!(fetched.field_groups, updated.field_groups);
    assert_eq!(fetched.settings, updated.settings);
}

#[tokio::test]
async fn test_update_rejects_malformed_groups() {
    let ctx = TestContext::new().await;
    ctx.services.registry.create(testimonial_type()).await.unwrap();

    let patch = PostTypePatch {
        field_groups: Some(vec![FieldGroup::new(
            "main",
            "Main",
            vec![FieldSchema::new("a", "", "Body", FieldType::Textarea)],
        )]),
        ..PostTypePatch::default()
    };
    let err = ctx
        .services
        .registry
        .update("testimonial", patch)
        .await
        .unwrap_err();

    match err {
        DomainError::InvalidShape { violations } => {
            assert_eq!(violations[0].field, "fieldGroups[0].fields[0].name");
        }
        other => panic!("expected InvalidShape, got {other:?}"),
    }
}
