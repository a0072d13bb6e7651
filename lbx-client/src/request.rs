//! Logical fetch requests and cache-key normalization
//!
//! Callers name an operation explicitly instead of passing a free-form URL
//! path; `from_path` remains for path-style call sites and folds every
//! spelling of the same resource (`/api/lessons`, `/lessons`, `lessons`)
//! into the same request, so they share one cache entry.

use lbx_common::model::{
    normalize_path, HierarchyNode, Lesson, LessonList, NavigationInfo, TagIndex,
};
use lbx_common::{Error, Result};

/// One logical content operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    ListLessons,
    GetLesson(String),
    GetHierarchy,
    ListTags,
    GetNavigation(String),
    Search {
        query: String,
        tags: Option<Vec<String>>,
    },
}

impl FetchRequest {
    /// Parse a caller-supplied logical path into a request.
    ///
    /// Accepts API-style (`/api/lessons/intro.md`), root-relative
    /// (`/lessons/intro.md`) and bare (`lessons/intro.md`) spellings.
    pub fn from_path(path: &str) -> Result<Self> {
        let logical = path.trim().trim_start_matches('/');
        let logical = logical.strip_prefix("api/").unwrap_or(logical);
        let logical = logical.trim_end_matches('/');

        if logical == "lessons" {
            return Ok(Self::ListLessons);
        }
        if let Some(rest) = logical.strip_prefix("lessons/") {
            return Ok(Self::GetLesson(rest.to_string()));
        }
        if logical == "hierarchy" {
            return Ok(Self::GetHierarchy);
        }
        if logical == "tags" {
            return Ok(Self::ListTags);
        }
        if let Some(rest) = logical.strip_prefix("navigation/") {
            return Ok(Self::GetNavigation(rest.to_string()));
        }
        Err(Error::NotFound(format!(
            "no content operation matches path '{path}'"
        )))
    }

    /// Canonical cache key for this request.
    ///
    /// `Search` yields `None`: search results are never cached (the backing
    /// call is a POST and results change with every query).
    pub fn cache_key(&self) -> Option<String> {
        match self {
            Self::ListLessons => Some("lessons".to_string()),
            Self::GetLesson(path) => Some(format!("lessons/{}", normalize_path(path))),
            Self::GetHierarchy => Some("hierarchy".to_string()),
            Self::ListTags => Some("tags".to_string()),
            Self::GetNavigation(path) => Some(format!("navigation/{}", normalize_path(path))),
            Self::Search { .. } => None,
        }
    }
}

/// Result payload of a fetch, cached as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchValue {
    Lessons(LessonList),
    Lesson(Lesson),
    Hierarchy(Vec<HierarchyNode>),
    Tags(TagIndex),
    Navigation(NavigationInfo),
}

impl FetchValue {
    fn variant(&self) -> &'static str {
        match self {
            Self::Lessons(_) => "lessons",
            Self::Lesson(_) => "lesson",
            Self::Hierarchy(_) => "hierarchy",
            Self::Tags(_) => "tags",
            Self::Navigation(_) => "navigation",
        }
    }

    pub fn into_lessons(self) -> Result<LessonList> {
        match self {
            Self::Lessons(list) => Ok(list),
            other => Err(mismatch("lessons", &other)),
        }
    }

    pub fn into_lesson(self) -> Result<Lesson> {
        match self {
            Self::Lesson(lesson) => Ok(lesson),
            other => Err(mismatch("lesson", &other)),
        }
    }

    pub fn into_hierarchy(self) -> Result<Vec<HierarchyNode>> {
        match self {
            Self::Hierarchy(nodes) => Ok(nodes),
            other => Err(mismatch("hierarchy", &other)),
        }
    }

    pub fn into_tags(self) -> Result<TagIndex> {
        match self {
            Self::Tags(tags) => Ok(tags),
            other => Err(mismatch("tags", &other)),
        }
    }

    pub fn into_navigation(self) -> Result<NavigationInfo> {
        match self {
            Self::Navigation(nav) => Ok(nav),
            other => Err(mismatch("navigation", &other)),
        }
    }
}

fn mismatch(wanted: &str, got: &FetchValue) -> Error {
    Error::Internal(format!(
        "expected {wanted} payload, cache held {}",
        got.variant()
    ))
}
