//! HTTP presentation surface

pub mod handlers;
pub mod render;

use crate::extractor::Extractor;
use crate::utils::AppSettings;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

/// Everything a handler needs, passed through axum's `State` extractor.
pub struct AppState {
    pub extractor: Arc<dyn Extractor>,
    pub client: reqwest::Client,
    pub settings: AppSettings,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/fetch", get(handlers::fetch))
        .route("/search", get(handlers::search))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
