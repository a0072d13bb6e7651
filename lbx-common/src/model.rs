//! Shared domain types
//!
//! These types are the wire shapes exchanged between the content API and the
//! client, and the in-memory model both sides compute on. A `Lesson`'s `path`
//! is its canonical identity: every lookup (cache keys, parent matching,
//! navigation indexing) goes through the same normalized representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sort-last sentinel used when a lesson declares no explicit `order`.
pub const ORDER_LAST: i64 = 999;

fn default_order() -> i64 {
    ORDER_LAST
}

/// One Markdown-sourced content unit with its metadata.
///
/// Immutable after construction; superseded (never mutated) when a cache
/// entry expires and a fresh fetch occurs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    /// Canonical lesson path, relative to the content root
    /// (no leading `/`, no `content/` prefix).
    pub path: String,
    /// Display title (frontmatter `title`, or the filename stem).
    pub title: String,
    /// Position in the global lesson ordering; `ORDER_LAST` sorts last.
    #[serde(default = "default_order")]
    pub order: i64,
    /// Logical parent path, if the lesson declares one.
    #[serde(default)]
    pub parent: Option<String>,
    /// Tags in declaration order (may be empty).
    #[serde(default)]
    pub tags: Vec<String>,
    /// Raw Markdown body, frontmatter stripped.
    pub content: String,
    /// Source modification time.
    pub last_modified: DateTime<Utc>,
}

impl Lesson {
    /// Lesson with default metadata for a source document that could not be
    /// read. Keeps the path present in listings instead of dropping it.
    pub fn with_defaults(path: impl Into<String>, last_modified: DateTime<Utc>) -> Self {
        let path = path.into();
        let title = file_stem(&path).to_string();
        Self {
            path,
            title,
            order: ORDER_LAST,
            parent: None,
            tags: Vec::new(),
            content: String::new(),
            last_modified,
        }
    }
}

/// Lightweight `{path, title}` reference used in navigation payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonRef {
    pub path: String,
    pub title: String,
}

impl From<&Lesson> for LessonRef {
    fn from(lesson: &Lesson) -> Self {
        Self {
            path: lesson.path.clone(),
            title: lesson.title.clone(),
        }
    }
}

/// A lesson plus its children, sorted `(order, title)` recursively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    #[serde(flatten)]
    pub lesson: Lesson,
    #[serde(default)]
    pub children: Vec<HierarchyNode>,
}

/// Tag name to occurrence count (count >= 1). Derived on every fetch of the
/// tag collection, never persisted.
pub type TagIndex = BTreeMap<String, u32>;

/// Previous/next neighbors in the global lesson ordering plus the breadcrumb
/// chain from a hierarchy root down to the lesson.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NavigationInfo {
    pub previous: Option<LessonRef>,
    pub next: Option<LessonRef>,
    pub breadcrumb: Vec<LessonRef>,
}

// ========================================
// Request/response envelopes
// ========================================

/// `GET /api/lessons` and search responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonList {
    pub lessons: Vec<Lesson>,
}

/// `GET /api/hierarchy` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyResponse {
    pub hierarchy: Vec<HierarchyNode>,
}

/// `GET /api/tags` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagsResponse {
    pub tags: TagIndex,
}

/// `POST /api/search` request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Canonical form of a lesson path: no leading slash, no `content/` prefix.
///
/// Every lookup site must normalize through here, or lookups for differently
/// spelled paths silently miss.
pub fn normalize_path(path: &str) -> &str {
    let path = path.trim().trim_start_matches('/');
    path.strip_prefix("content/").unwrap_or(path)
}

/// Filename without directories or the `.md` extension.
pub fn file_stem(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.strip_suffix(".md").unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("basics/loops.md"), "basics/loops.md");
        assert_eq!(normalize_path("/basics/loops.md"), "basics/loops.md");
        assert_eq!(normalize_path("content/basics/loops.md"), "basics/loops.md");
        assert_eq!(normalize_path(" /content/intro.md"), "intro.md");
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("basics/loops.md"), "loops");
        assert_eq!(file_stem("intro.md"), "intro");
        assert_eq!(file_stem("notes.txt"), "notes.txt");
    }

    #[test]
    fn test_lesson_deserialize_defaults() {
        // order/parent/tags may be absent in source payloads
        let lesson: Lesson = serde_json::from_str(
            r#"{
                "path": "intro.md",
                "title": "Intro",
                "content": "Body",
                "last_modified": "2024-01-01T00:00:00Z"
            }"#,
        )
        .expect("should deserialize");
        assert_eq!(lesson.order, ORDER_LAST);
        assert_eq!(lesson.parent, None);
        assert!(lesson.tags.is_empty());
    }

    #[test]
    fn test_hierarchy_node_flattens_lesson() {
        let lesson = Lesson::with_defaults("intro.md", Utc::now());
        let node = HierarchyNode {
            lesson,
            children: Vec::new(),
        };
        let value = serde_json::to_value(&node).expect("should serialize");
        // lesson fields sit beside `children`, not nested under `lesson`
        assert_eq!(value["path"], "intro.md");
        assert!(value["children"].as_array().is_some_and(|c| c.is_empty()));
    }
}
