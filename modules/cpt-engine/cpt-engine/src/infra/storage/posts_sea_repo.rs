use async_trait::async_trait;
use cpt_engine_sdk::{CustomPost, PostSortField, SortOrder};
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, Condition, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use super::entity::custom_post::{Column, Entity as PostEntity};
use super::mapper::custom_post_active_model;
use crate::domain::error::DomainError;
use crate::domain::repo::{CustomPostRepository, PostFilter, PostWindow};

/// `SeaORM`-backed implementation of [`CustomPostRepository`].
#[derive(Clone)]
pub struct OrmPostsRepository {
    db: DatabaseConnection,
}

impl OrmPostsRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Lowercased `%term%` with LIKE wildcards in the term escaped by `\`.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn scoped(post_type_slug: &str, filter: &PostFilter) -> Select<PostEntity> {
    let mut cond = Condition::all().add(Expr::col(Column::PostTypeSlug).eq(post_type_slug));

    if let Some(status) = &filter.status {
        cond = cond.add(Expr::col(Column::Status).eq(status.as_str()));
    }
    if let Some(term) = &filter.search {
        cond = cond.add(
            Expr::col(Column::SearchText).like(LikeExpr::new(like_pattern(term)).escape('\\')),
        );
    }

    PostEntity::find().filter(cond)
}

fn sort_column(field: PostSortField) -> Column {
    match field {
        PostSortField::CreatedAt => Column::CreatedAt,
        PostSortField::UpdatedAt => Column::UpdatedAt,
        PostSortField::PublishedAt => Column::PublishedAt,
        PostSortField::Title => Column::Title,
        PostSortField::Slug => Column::Slug,
        PostSortField::Status => Column::Status,
    }
}

fn to_posts(rows: Vec<super::entity::custom_post::Model>) -> Result<Vec<CustomPost>, DomainError> {
    rows.into_iter().map(TryInto::try_into).collect()
}

#[async_trait]
impl CustomPostRepository for OrmPostsRepository {
    async fn find_by_id(
        &self,
        post_type_slug: &str,
        id: Uuid,
    ) -> Result<Option<CustomPost>, DomainError> {
        let found = PostEntity::find()
            .filter(
                Condition::all()
                    .add(Expr::col(Column::Id).eq(id))
                    .add(Expr::col(Column::PostTypeSlug).eq(post_type_slug)),
            )
            .one(&self.db)
            .await?;
        found.map(TryInto::try_into).transpose()
    }

    async fn insert(&self, post: &CustomPost) -> Result<(), DomainError> {
        let m = custom_post_active_model(post)?;
        PostEntity::insert(m).exec_without_returning(&self.db).await?;
        Ok(())
    }

    async fn update(&self, post: &CustomPost) -> Result<(), DomainError> {
        let m = custom_post_active_model(post)?;
        let _ = m.update(&self.db).await?;
        Ok(())
    }

    async fn delete(&self, post_type_slug: &str, id: Uuid) -> Result<u64, DomainError> {
        let result = PostEntity::delete_many()
            .filter(
                Condition::all()
                    .add(Expr::col(Column::Id).eq(id))
                    .add(Expr::col(Column::PostTypeSlug).eq(post_type_slug)),
            )
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    async fn count(&self, post_type_slug: &str, filter: &PostFilter) -> Result<u64, DomainError> {
        Ok(scoped(post_type_slug, filter).count(&self.db).await?)
    }

    async fn list(
        &self,
        post_type_slug: &str,
        filter: &PostFilter,
        window: PostWindow,
    ) -> Result<Vec<CustomPost>, DomainError> {
        let order = match window.sort_order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };
        let rows = scoped(post_type_slug, filter)
            .order_by(sort_column(window.sort_by), order.clone())
            .order_by(Column::Id, order)
            .offset(window.offset)
            .limit(window.limit)
            .all(&self.db)
            .await?;
        to_posts(rows)
    }

    async fn list_all(&self, post_type_slug: &str) -> Result<Vec<CustomPost>, DomainError> {
        let rows = scoped(post_type_slug, &PostFilter::default())
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;
        to_posts(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Great"), "%great%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\"), "%c:\\\\%");
    }
}
