// API module - HTTP endpoints

use axum::Router;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::clock::Clock;
use crate::db::RevisionStore;

pub mod health;
pub mod revisions;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RevisionStore>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(store: Arc<dyn RevisionStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

/// Full HTTP surface with CORS and request tracing
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(revisions::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
