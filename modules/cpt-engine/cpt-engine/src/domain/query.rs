use std::sync::Arc;

use cpt_engine_sdk::{Pagination, PostListQuery, PostPage, PostStatus};
use tracing::{debug, instrument};

use super::error::DomainError;
use super::registry::PostTypeRegistry;
use super::repo::{CustomPostRepository, PostFilter, PostWindow};
use crate::config::CptEngineConfig;

#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self::from(&CptEngineConfig::default())
    }
}

impl From<&CptEngineConfig> for QueryConfig {
    fn from(cfg: &CptEngineConfig) -> Self {
        Self {
            default_page_size: cfg.default_page_size.max(1),
            max_page_size: cfg.max_page_size.max(1),
        }
    }
}

impl QueryConfig {
    /// Requested page size, defaulted and clamped to `1..=max_page_size`.
    #[must_use]
    pub fn effective_limit(&self, requested: Option<u64>) -> u64 {
        requested
            .filter(|&l| l > 0)
            .unwrap_or(self.default_page_size)
            .min(self.max_page_size)
    }
}

/// Row offset of `page`, or `None` when it does not fit a signed 64-bit SQL offset.
fn row_offset(page: u64, limit: u64) -> Option<u64> {
    (page - 1)
        .checked_mul(limit)
        .filter(|&offset| i64::try_from(offset).is_ok())
}

/// Paginated, filterable listings of a post type's posts.
pub struct PostQueryService {
    registry: Arc<PostTypeRegistry>,
    repo: Arc<dyn CustomPostRepository>,
    config: QueryConfig,
}

impl PostQueryService {
    #[must_use]
    pub fn new(
        registry: Arc<PostTypeRegistry>,
        repo: Arc<dyn CustomPostRepository>,
        config: QueryConfig,
    ) -> Self {
        Self {
            registry,
            repo,
            config,
        }
    }

    /// One page of posts matching the query's status and search filters.
    ///
    /// # Errors
    /// `PostTypeNotFound` for an unknown or inactive type.
    #[instrument(skip(self, query), fields(page = query.page))]
    pub async fn list(
        &self,
        post_type_slug: &str,
        query: PostListQuery,
    ) -> Result<PostPage, DomainError> {
        self.registry.get_by_slug(post_type_slug).await?;

        let limit = self.config.effective_limit(query.limit);
        let page = query.page.max(1);
        let filter = PostFilter {
            status: query.status,
            search: query
                .search
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty()),
        };

        let total_items = self.repo.count(post_type_slug, &filter).await?;
        let items = match row_offset(page, limit) {
            Some(offset) => {
                let window = PostWindow {
                    offset,
                    limit,
                    sort_by: query.sort_by,
                    sort_order: query.sort_order,
                };
                self.repo.list(post_type_slug, &filter, window).await?
            }
            None => {
                debug!(page, limit, "Page lies past any addressable row");
                Vec::new()
            }
        };

        let pagination = Pagination {
            current: page,
            total: total_items.div_ceil(limit),
            count: u64::try_from(items.len()).unwrap_or(u64::MAX),
            limit,
            total_items,
        };
        debug!(total_items, count = pagination.count, "Listed posts");

        Ok(PostPage { items, pagination })
    }

    /// Same as [`Self::list`] with the status forced to `published`.
    ///
    /// # Errors
    /// `PostTypeNotFound` for an unknown or inactive type.
    pub async fn list_public(
        &self,
        post_type_slug: &str,
        query: PostListQuery,
    ) -> Result<PostPage, DomainError> {
        let query = PostListQuery {
            status: Some(PostStatus::Published),
            ..query
        };
        self.list(post_type_slug, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_limit() {
        let cfg = QueryConfig {
            default_page_size: 10,
            max_page_size: 50,
        };
        assert_eq!(cfg.effective_limit(None), 10);
        assert_eq!(cfg.effective_limit(Some(0)), 10);
        assert_eq!(cfg.effective_limit(Some(25)), 25);
        assert_eq!(cfg.effective_limit(Some(500)), 50);
    }

    #[test]
    fn test_zero_sizes_in_config_are_raised() {
        let cfg = QueryConfig::from(&CptEngineConfig {
            default_page_size: 0,
            max_page_size: 0,
            ..CptEngineConfig::default()
        });
        assert_eq!(cfg.effective_limit(None), 1);
    }

    #[test]
    fn test_row_offset_stays_within_sql_range() {
        assert_eq!(row_offset(1, 10), Some(0));
        assert_eq!(row_offset(3, 10), Some(20));
        assert_eq!(row_offset(u64::MAX, 10), None);
        assert_eq!(row_offset(u64::MAX, 1), None);
        assert_eq!(row_offset(1 << 63, 1), Some(i64::MAX.unsigned_abs()));
        assert_eq!(row_offset((1 << 63) + 1, 1), None);
    }
}
