//! Lesson listing and retrieval endpoints

use axum::extract::{Path, State};
use axum::Json;
use lbx_common::model::{Lesson, LessonList};

use crate::{ApiResult, AppState};

/// GET /api/lessons
///
/// All lessons with their metadata, sorted `(order, title)`.
pub async fn list_lessons(State(state): State<AppState>) -> Json<LessonList> {
    Json(LessonList {
        lessons: state.store.scan(),
    })
}

/// GET /api/lessons/{path}
///
/// One lesson by path. 404 when no lesson matches.
pub async fn get_lesson(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> ApiResult<Json<Lesson>> {
    Ok(Json(state.store.lesson(&path)?))
}
