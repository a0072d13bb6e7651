//! Search endpoint

use axum::extract::State;
use axum::Json;
use lbx_common::model::{LessonList, SearchRequest};

use crate::AppState;

/// POST /api/search
///
/// Lessons matching a case-insensitive substring query over title and
/// content, optionally restricted to lessons carrying one of the requested
/// tags. Sorted `(order, title)`.
pub async fn search_lessons(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Json<LessonList> {
    Json(LessonList {
        lessons: state
            .store
            .search(&request.query, request.tags.as_deref()),
    })
}
