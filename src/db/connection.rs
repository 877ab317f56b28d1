use std::sync::Arc;

use tracing::info;

use super::{TodoStore, providers};
use crate::config::DatabaseConfig;

/// Opens the process-wide store handle for `cfg.url`. Fails fast when the
/// backend is unreachable.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<Arc<dyn TodoStore>> {
    let registry = providers::default_registry()?;
    let provider = registry.provider_for_url(&cfg.url)?;
    info!(provider = provider.id().as_str(), "connecting to todo store");

    let store = provider.connect(cfg).await?;
    info!(backend = store.backend(), "todo store ready");
    Ok(store)
}
