use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::engine::SearchEngine;
use crate::metrics::SearchMetrics;

use super::handlers::*;

/// Application state shared across all handlers
pub struct AppState {
    pub engine: Arc<SearchEngine>,
    pub metrics: Arc<SearchMetrics>,
}

/// Create the HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        // Document operations
        .route("/v1/documents", post(create_document))
        .route("/v1/documents/:id", get(get_document))
        .route("/v1/documents/:id", put(update_document))
        .route("/v1/documents/:id", delete(delete_document))
        // Search
        .route("/v1/search", get(search))
        // Health and metrics
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
