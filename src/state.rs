use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::TodoStore,
    services::{MillisClock, TodoService},
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn TodoStore>,
    pub clock: Arc<MillisClock>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn TodoStore>) -> Arc<Self> {
        Arc::new(Self {
            config,
            store,
            clock: Arc::new(MillisClock::new()),
        })
    }

    pub fn todo_service(&self) -> TodoService {
        TodoService::new(
            Arc::clone(&self.store),
            self.config.listing.clone(),
            Arc::clone(&self.clock),
        )
    }
}
