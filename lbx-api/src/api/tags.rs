//! Tag index endpoint

use axum::extract::State;
use axum::Json;
use lbx_common::model::TagsResponse;

use crate::AppState;

/// GET /api/tags
///
/// Every tag with its occurrence count across all lessons.
pub async fn get_tags(State(state): State<AppState>) -> Json<TagsResponse> {
    Json(TagsResponse {
        tags: state.store.tags(),
    })
}
