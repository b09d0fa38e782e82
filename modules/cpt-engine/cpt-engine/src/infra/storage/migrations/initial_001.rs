use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

const POSTGRES_UP: &str = r"
CREATE TABLE IF NOT EXISTS cpt_post_types (
    id UUID PRIMARY KEY NOT NULL,
    slug VARCHAR(64) NOT NULL,
    name TEXT NOT NULL,
    singular_name TEXT NOT NULL,
    description TEXT NULL,
    icon TEXT NOT NULL,
    field_groups TEXT NOT NULL,
    settings TEXT NOT NULL,
    active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_cpt_post_types_slug ON cpt_post_types(slug);

CREATE TABLE IF NOT EXISTS cpt_posts (
    id UUID PRIMARY KEY NOT NULL,
    post_type_slug VARCHAR(64) NOT NULL,
    title TEXT NOT NULL,
    slug TEXT NOT NULL,
    status TEXT NOT NULL,
    fields TEXT NOT NULL,
    search_text TEXT NOT NULL,
    content TEXT NULL,
    author_id UUID NULL,
    published_at TIMESTAMPTZ NULL,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_cpt_posts_type ON cpt_posts(post_type_slug);
CREATE INDEX IF NOT EXISTS idx_cpt_posts_type_status ON cpt_posts(post_type_slug, status);
";

const MYSQL_UP: &str = r"
CREATE TABLE IF NOT EXISTS cpt_post_types (
    id VARCHAR(36) PRIMARY KEY NOT NULL,
    slug VARCHAR(64) NOT NULL,
    name TEXT NOT NULL,
    singular_name TEXT NOT NULL,
    description TEXT NULL,
    icon TEXT NOT NULL,
    field_groups LONGTEXT NOT NULL,
    settings TEXT NOT NULL,
    active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL,
    UNIQUE KEY idx_cpt_post_types_slug (slug)
);

CREATE TABLE IF NOT EXISTS cpt_posts (
    id VARCHAR(36) PRIMARY KEY NOT NULL,
    post_type_slug VARCHAR(64) NOT NULL,
    title TEXT NOT NULL,
    slug TEXT NOT NULL,
    status TEXT NOT NULL,
    fields LONGTEXT NOT NULL,
    search_text LONGTEXT NOT NULL,
    content LONGTEXT NULL,
    author_id VARCHAR(36) NULL,
    published_at TIMESTAMP NULL,
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL,
    KEY idx_cpt_posts_type (post_type_slug),
    KEY idx_cpt_posts_type_status (post_type_slug, status(64))
);
";

const SQLITE_UP: &str = r"
CREATE TABLE IF NOT EXISTS cpt_post_types (
    id TEXT PRIMARY KEY NOT NULL,
    slug TEXT NOT NULL,
    name TEXT NOT NULL,
    singular_name TEXT NOT NULL,
    description TEXT NULL,
    icon TEXT NOT NULL,
    field_groups TEXT NOT NULL,
    settings TEXT NOT NULL,
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_cpt_post_types_slug ON cpt_post_types(slug);

CREATE TABLE IF NOT EXISTS cpt_posts (
    id TEXT PRIMARY KEY NOT NULL,
    post_type_slug TEXT NOT NULL,
    title TEXT NOT NULL,
    slug TEXT NOT NULL,
    status TEXT NOT NULL,
    fields TEXT NOT NULL,
    search_text TEXT NOT NULL,
    content TEXT NULL,
    author_id TEXT NULL,
    published_at TEXT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_cpt_posts_type ON cpt_posts(post_type_slug);
CREATE INDEX IF NOT EXISTS idx_cpt_posts_type_status ON cpt_posts(post_type_slug, status);
";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let conn = manager.get_connection();

        let sql = match backend {
            sea_orm::DatabaseBackend::Postgres => POSTGRES_UP,
            sea_orm::DatabaseBackend::MySql => MYSQL_UP,
            sea_orm::DatabaseBackend::Sqlite => SQLITE_UP,
        };

        conn.execute_unprepared(sql).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        let sql = "DROP TABLE IF EXISTS cpt_posts; DROP TABLE IF EXISTS cpt_post_types;";
        conn.execute_unprepared(sql).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Only ids and post type slugs have bounded width; their lengths are
    /// enforced before any write.
    #[test]
    fn test_only_identifier_columns_are_bounded() {
        for ddl in [POSTGRES_UP, MYSQL_UP] {
            for line in ddl.lines().map(str::trim).filter(|l| l.contains("VARCHAR")) {
                let column = line.split_whitespace().next().unwrap_or_default();
                assert!(
                    matches!(column, "id" | "slug" | "post_type_slug" | "author_id"),
                    "unexpected bounded column: {line}"
                );
            }
        }
    }

    #[test]
    fn test_posts_table_carries_search_text() {
        for ddl in [POSTGRES_UP, MYSQL_UP, SQLITE_UP] {
            assert!(ddl.contains("search_text"));
        }
    }
}
