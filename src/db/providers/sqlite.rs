use std::{sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{ConnectOptions, ConnectionTrait, Database};

use super::registry::{StoreProvider, StoreProviderId};
use crate::{
    config::DatabaseConfig,
    db::{SqlTodoStore, TodoStore},
};

const SQLITE_BUSY_TIMEOUT_MS: u64 = 5_000;

pub struct SqliteStoreProvider;

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[async_trait]
impl StoreProvider for SqliteStoreProvider {
    fn id(&self) -> StoreProviderId {
        StoreProviderId::Sqlite
    }

    fn supports_url(&self, url: &str) -> bool {
        url.trim().to_ascii_lowercase().starts_with("sqlite:")
    }

    async fn connect(&self, cfg: &DatabaseConfig) -> Result<Arc<dyn TodoStore>> {
        // Every connection to an in-memory database opens a fresh one.
        let (max_connections, min_idle) = if is_in_memory(&cfg.url) {
            (1, 1)
        } else {
            (cfg.max_connections, cfg.min_idle)
        };

        let mut options = ConnectOptions::new(cfg.url.clone());
        options
            .max_connections(max_connections)
            .min_connections(min_idle)
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .sqlx_logging(false);

        let db = Database::connect(options).await?;
        db.execute_unprepared(&format!("PRAGMA busy_timeout = {SQLITE_BUSY_TIMEOUT_MS}"))
            .await?;

        let store = SqlTodoStore::new(db, self.id().as_str());
        store.sync_schema().await?;
        Ok(Arc::new(store))
    }
}

#[cfg(test)]
mod tests {
    use super::is_in_memory;

    #[test]
    fn detects_in_memory_urls() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite:file:todo?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://./todo.db?mode=rwc"));
    }
}
