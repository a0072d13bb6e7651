//! Integration tests for `BackendSource` against a local stub of the
//! lesson REST API.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use lbx_client::{BackendSource, ContentSource};
use lbx_common::model::SearchRequest;
use lbx_common::Error;
use serde_json::json;

fn lesson_json(path: &str, title: &str, order: i64) -> serde_json::Value {
    json!({
        "path": path,
        "title": title,
        "order": order,
        "parent": null,
        "tags": ["basics"],
        "content": "body",
        "last_modified": "2024-06-01T10:00:00Z",
    })
}

async fn list_lessons() -> Json<serde_json::Value> {
    Json(json!({"lessons": [lesson_json("intro.md", "Intro", 1)]}))
}

async fn get_lesson(Path(path): Path<String>) -> impl IntoResponse {
    if path == "intro.md" {
        Json(lesson_json("intro.md", "Intro", 1)).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"code": "NOT_FOUND", "message": path}})),
        )
            .into_response()
    }
}

async fn get_navigation(Path(_path): Path<String>) -> Json<serde_json::Value> {
    Json(json!({
        "previous": null,
        "next": {"path": "basics/loops.md", "title": "Loops"},
        "breadcrumb": [{"path": "intro.md", "title": "Intro"}],
    }))
}

async fn get_tags() -> Json<serde_json::Value> {
    Json(json!({"tags": {"basics": 2, "control": 1}}))
}

async fn get_hierarchy() -> Json<serde_json::Value> {
    Json(json!({"hierarchy": [
        {
            "path": "intro.md", "title": "Intro", "order": 1, "parent": null,
            "tags": [], "content": "", "last_modified": "2024-06-01T10:00:00Z",
            "children": [],
        }
    ]}))
}

async fn search(Json(request): Json<SearchRequest>) -> Json<serde_json::Value> {
    if request.query == "intro" {
        Json(json!({"lessons": [lesson_json("intro.md", "Intro", 1)]}))
    } else {
        Json(json!({"lessons": []}))
    }
}

async fn start_stub() -> String {
    let router = Router::new()
        .route("/api/lessons", get(list_lessons))
        .route("/api/lessons/*path", get(get_lesson))
        .route("/api/navigation/*path", get(get_navigation))
        .route("/api/tags", get(get_tags))
        .route("/api/hierarchy", get(get_hierarchy))
        .route("/api/search", post(search));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_list_and_get() {
    let base = start_stub().await;
    let source = BackendSource::new(base).expect("source");

    let list = source.list_lessons().await.expect("list");
    assert_eq!(list.lessons.len(), 1);
    assert_eq!(list.lessons[0].title, "Intro");

    // rooted and bare spellings resolve to the same lesson
    let lesson = source.lesson("/intro.md").await.expect("get");
    assert_eq!(lesson.path, "intro.md");
}

#[tokio::test]
async fn test_missing_lesson_maps_to_not_found() {
    let base = start_stub().await;
    let source = BackendSource::new(base).expect("source");

    let err = source.lesson("missing.md").await.expect_err("should fail");
    assert!(matches!(err, Error::NotFound(path) if path == "missing.md"));
}

#[tokio::test]
async fn test_navigation_tags_hierarchy() {
    let base = start_stub().await;
    let source = BackendSource::new(base).expect("source");

    let nav = source.navigation("intro.md").await.expect("navigation");
    assert_eq!(nav.next.map(|n| n.path), Some("basics/loops.md".to_string()));

    let tags = source.list_tags().await.expect("tags");
    assert_eq!(tags.get("basics"), Some(&2));

    let roots = source.hierarchy().await.expect("hierarchy");
    assert_eq!(roots.len(), 1);
    assert!(roots[0].children.is_empty());
}

#[tokio::test]
async fn test_search_posts_query() {
    let base = start_stub().await;
    let source = BackendSource::new(base).expect("source");

    let hits = source.search("intro", None).await.expect("search");
    assert_eq!(hits.lessons.len(), 1);
    let none = source
        .search("nothing", Some(&["basics".to_string()]))
        .await
        .expect("search");
    assert!(none.lessons.is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_is_source_unavailable() {
    // bind-then-drop guarantees a port nothing is listening on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let source = BackendSource::new(format!("http://{addr}")).expect("source");
    let err = source.list_lessons().await.expect_err("should fail");
    assert!(matches!(err, Error::SourceUnavailable(_)));
}
