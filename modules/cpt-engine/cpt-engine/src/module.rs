use std::sync::Arc;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use cpt_engine_sdk::CptEngineClientV1;

use crate::api::rest::routes;
use crate::config::CptEngineConfig;
use crate::domain::posts::{PostStore, PostStoreConfig};
use crate::domain::query::{PostQueryService, QueryConfig};
use crate::domain::registry::{PostTypeRegistry, RegistryConfig};
use crate::domain::repo::{CustomPostRepository, PostTypeRepository};
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{OrmPostTypesRepository, OrmPostsRepository};
use crate::local_client::CptEngineLocalClient;

/// Domain services shared by the REST handlers and the local client.
pub struct CptServices {
    pub registry: Arc<PostTypeRegistry>,
    pub posts: Arc<PostStore>,
    pub query: Arc<PostQueryService>,
}

impl CptServices {
    /// Wire the services over arbitrary repository implementations.
    #[must_use]
    pub fn new(
        types_repo: Arc<dyn PostTypeRepository>,
        posts_repo: Arc<dyn CustomPostRepository>,
        cfg: &CptEngineConfig,
    ) -> Self {
        let registry = Arc::new(PostTypeRegistry::new(types_repo, RegistryConfig::from(cfg)));
        let posts = Arc::new(PostStore::new(
            Arc::clone(&registry),
            Arc::clone(&posts_repo),
            PostStoreConfig::from(cfg),
        ));
        let query = Arc::new(PostQueryService::new(
            Arc::clone(&registry),
            posts_repo,
            QueryConfig::from(cfg),
        ));

        Self {
            registry,
            posts,
            query,
        }
    }

    /// Wire the services over `SeaORM` repositories sharing one connection.
    #[must_use]
    pub fn with_db(db: &DatabaseConnection, cfg: &CptEngineConfig) -> Self {
        Self::new(
            Arc::new(OrmPostTypesRepository::new(db.clone())),
            Arc::new(OrmPostsRepository::new(db.clone())),
            cfg,
        )
    }
}

/// Composition root of the CPT engine: storage, services, REST surface.
#[derive(Clone)]
pub struct CptEngine {
    services: Arc<CptServices>,
    config: CptEngineConfig,
}

impl CptEngine {
    /// Run pending migrations and build the services.
    ///
    /// # Errors
    /// Returns an error when a migration fails.
    pub async fn init(db: &DatabaseConnection, config: CptEngineConfig) -> anyhow::Result<Self> {
        info!("Initializing cpt_engine module");
        debug!(
            "Loaded cpt_engine config: base_path={}, default_page_size={}, max_page_size={}",
            config.base_path, config.default_page_size, config.max_page_size
        );

        Self::migrate(db).await?;

        let services = Arc::new(CptServices::with_db(db, &config));
        Ok(Self { services, config })
    }

    /// Apply the module's schema migrations.
    ///
    /// # Errors
    /// Returns an error when a migration fails.
    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running cpt_engine database migrations");
        Migrator::up(db, None).await?;
        info!("CPT engine database migrations completed successfully");
        Ok(())
    }

    #[must_use]
    pub fn services(&self) -> Arc<CptServices> {
        Arc::clone(&self.services)
    }

    #[must_use]
    pub fn config(&self) -> &CptEngineConfig {
        &self.config
    }

    /// REST routes mounted under the configured base path.
    #[must_use]
    pub fn router(&self) -> axum::Router {
        info!("Registering cpt_engine REST routes");
        routes::router(self.services(), &self.config.normalized_base_path())
    }

    /// In-process client for other components of the same binary.
    #[must_use]
    pub fn client(&self) -> Arc<dyn CptEngineClientV1> {
        Arc::new(CptEngineLocalClient::new(self.services()))
    }
}
