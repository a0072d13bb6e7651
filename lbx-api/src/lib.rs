//! lbx-api library - lesson content REST service
//!
//! Aggregates the Markdown lesson files of one content directory and serves
//! them with hierarchy, navigation, tag and search endpoints.

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod error;
pub mod store;

pub use error::{ApiError, ApiResult};
pub use store::ContentStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Lesson store backed by the content directory
    pub store: ContentStore,
}

impl AppState {
    /// Create new application state
    pub fn new(store: ContentStore) -> Self {
        Self { store }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/api", get(api::service_info))
        .route("/api/lessons", get(api::list_lessons))
        .route("/api/lessons/*path", get(api::get_lesson))
        .route("/api/navigation/*path", get(api::get_navigation))
        .route("/api/hierarchy", get(api::get_hierarchy))
        .route("/api/tags", get(api::get_tags))
        .route("/api/search", post(api::search_lessons))
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
