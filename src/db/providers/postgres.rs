use std::{sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{ConnectOptions, Database};

use super::registry::{StoreProvider, StoreProviderId};
use crate::{
    config::DatabaseConfig,
    db::{SqlTodoStore, TodoStore},
};

pub struct PostgresStoreProvider;

#[async_trait]
impl StoreProvider for PostgresStoreProvider {
    fn id(&self) -> StoreProviderId {
        StoreProviderId::Postgres
    }

    fn supports_url(&self, url: &str) -> bool {
        let normalized = url.trim().to_ascii_lowercase();
        normalized.starts_with("postgres://") || normalized.starts_with("postgresql://")
    }

    async fn connect(&self, cfg: &DatabaseConfig) -> Result<Arc<dyn TodoStore>> {
        let mut options = ConnectOptions::new(cfg.url.clone());
        options
            .max_connections(cfg.max_connections)
            .min_connections(cfg.min_idle)
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .sqlx_logging(false);

        let db = Database::connect(options).await?;
        let store = SqlTodoStore::new(db, self.id().as_str());
        store.sync_schema().await?;
        Ok(Arc::new(store))
    }
}
