use std::sync::Arc;

use axum::Router;

use crate::{
    config::{AppConfig, ListPolicy},
    db::{self, TodoStore},
    routes::app,
    state::AppState,
};

pub const MEMORY_DATABASE_URL: &str = "sqlite::memory:";

/// Defaults with a private in-memory SQLite store and the given list policy.
pub fn test_config(policy: ListPolicy) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.database.url = MEMORY_DATABASE_URL.to_string();
    cfg.listing.policy = policy;
    cfg
}

pub async fn test_state(policy: ListPolicy) -> Arc<AppState> {
    let cfg = test_config(policy);
    let store = db::connect(&cfg.database)
        .await
        .expect("connect to in-memory store");
    AppState::new(cfg, store)
}

/// Serves `store` through the same stack as the binary.
pub fn router_with_store(cfg: AppConfig, store: Arc<dyn TodoStore>) -> Router {
    app(AppState::new(cfg, store))
}

pub async fn test_router(policy: ListPolicy) -> Router {
    app(test_state(policy).await)
}
