//! Hierarchy endpoint

use axum::extract::State;
use axum::Json;
use lbx_common::model::HierarchyResponse;

use crate::AppState;

/// GET /api/hierarchy
///
/// Lessons organized by declared parent, children sorted `(order, title)`.
pub async fn get_hierarchy(State(state): State<AppState>) -> Json<HierarchyResponse> {
    Json(HierarchyResponse {
        hierarchy: state.store.hierarchy(),
    })
}
