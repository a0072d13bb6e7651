//! Navigation endpoint: previous/next neighbors and breadcrumb

use axum::extract::{Path, State};
use axum::Json;
use lbx_common::model::NavigationInfo;

use crate::AppState;

/// GET /api/navigation/{path}
///
/// Neighbors of the lesson in the global ordering plus its breadcrumb.
/// An unknown path yields an empty payload rather than an error.
pub async fn get_navigation(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Json<NavigationInfo> {
    Json(state.store.navigation(&path))
}
