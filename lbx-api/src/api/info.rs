//! Service info endpoint

use axum::Json;
use serde_json::{json, Value};

/// GET /api
///
/// Service identification and endpoint index.
pub async fn service_info() -> Json<Value> {
    Json(json!({
        "message": "Lessonbox content API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "lessons": "/api/lessons",
            "lesson": "/api/lessons/{path}",
            "navigation": "/api/navigation/{path}",
            "hierarchy": "/api/hierarchy",
            "tags": "/api/tags",
            "search": "/api/search",
        },
    }))
}
