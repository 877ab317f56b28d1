use std::{collections::HashMap, sync::Arc};

use anyhow::{Result, bail};
use async_trait::async_trait;

use crate::{config::DatabaseConfig, db::store::TodoStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreProviderId {
    Scylla,
    Postgres,
    Sqlite,
}

impl StoreProviderId {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreProviderId::Scylla => "scylla",
            StoreProviderId::Postgres => "postgres",
            StoreProviderId::Sqlite => "sqlite",
        }
    }
}

#[async_trait]
pub trait StoreProvider: Send + Sync {
    fn id(&self) -> StoreProviderId;
    fn supports_url(&self, url: &str) -> bool;
    async fn connect(&self, cfg: &DatabaseConfig) -> Result<Arc<dyn TodoStore>>;
}

pub struct StoreProviders {
    providers: HashMap<StoreProviderId, Arc<dyn StoreProvider>>,
}

impl StoreProviders {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn StoreProvider>) -> Result<Self> {
        self.add(provider)?;
        Ok(self)
    }

    pub fn add(&mut self, provider: Arc<dyn StoreProvider>) -> Result<()> {
        let id = provider.id();
        if self.providers.contains_key(&id) {
            bail!("store provider already registered: {}", id.as_str());
        }
        self.providers.insert(id, provider);
        Ok(())
    }

    pub fn provider_for_url(&self, url: &str) -> Result<Arc<dyn StoreProvider>> {
        self.providers
            .values()
            .find(|provider| provider.supports_url(url))
            .cloned()
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "unsupported database url '{}'; expected scheme scylla://, cassandra://, postgres://, postgresql://, or sqlite:",
                    redact_url(url)
                )
            })
    }
}

impl Default for StoreProviders {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn redact_url(url: &str) -> String {
    let trimmed = url.trim();
    if let Some((scheme, _)) = trimmed.split_once("://") {
        format!("{scheme}://<redacted>")
    } else if let Some((scheme, _)) = trimmed.split_once(':') {
        format!("{scheme}:<redacted>")
    } else {
        "<invalid-url>".to_string()
    }
}
