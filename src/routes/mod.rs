use std::sync::Arc;

use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use crate::{
    middleware::{catch_panic_layer, json_error_middleware},
    state::AppState,
};

pub mod health;
pub mod todo;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(todo::router(state))
        .merge(health::router())
}

/// The routes wrapped in the error normalizer, panic catcher and request tracing.
pub fn app(state: Arc<AppState>) -> Router {
    router(state)
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http())
}
