use async_trait::async_trait;
use cpt_engine_sdk::PostTypeDefinition;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, SqlErr,
};

use super::entity::post_type::{Column, Entity as PostTypeEntity};
use super::mapper::post_type_active_model;
use crate::domain::error::DomainError;
use crate::domain::repo::PostTypeRepository;

/// `SeaORM`-backed implementation of [`PostTypeRepository`].
#[derive(Clone)]
pub struct OrmPostTypesRepository {
    db: DatabaseConnection,
}

impl OrmPostTypesRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn insert_err(slug: &str, err: DbErr) -> DomainError {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return DomainError::conflict(slug);
    }
    err.into()
}

#[async_trait]
impl PostTypeRepository for OrmPostTypesRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostTypeDefinition>, DomainError> {
        let found = PostTypeEntity::find()
            .filter(Expr::col(Column::Slug).eq(slug))
            .one(&self.db)
            .await?;
        found.map(TryInto::try_into).transpose()
    }

    async fn insert(&self, def: &PostTypeDefinition) -> Result<(), DomainError> {
        let m = post_type_active_model(def)?;
        PostTypeEntity::insert(m)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| insert_err(&def.slug, e))?;
        Ok(())
    }

    async fn update(&self, def: &PostTypeDefinition) -> Result<(), DomainError> {
        let m = post_type_active_model(def)?;
        let _ = m.update(&self.db).await?;
        Ok(())
    }

    async fn list(&self, active_only: bool) -> Result<Vec<PostTypeDefinition>, DomainError> {
        let mut query = PostTypeEntity::find();
        if active_only {
            query = query.filter(Expr::col(Column::Active).eq(true));
        }
        query
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(TryInto::try_into)
            .collect()
    }
}
