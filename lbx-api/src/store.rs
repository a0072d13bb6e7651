//! Filesystem-backed lesson store
//!
//! Scans the content directory on every request rather than holding an
//! index: lesson sets are small, the directory may change underneath the
//! service, and the client keeps its own cache in front of this API anyway.

use chrono::{DateTime, Utc};
use lbx_common::model::{
    normalize_path, HierarchyNode, Lesson, NavigationInfo, TagIndex,
};
use lbx_common::{catalog, frontmatter, Error, Result};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Lesson store rooted at one content directory.
#[derive(Clone)]
pub struct ContentStore {
    content_dir: PathBuf,
}

impl ContentStore {
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// All lessons under the content directory, sorted `(order, title)`.
    /// An unreadable file degrades to default metadata instead of failing
    /// the listing.
    pub fn scan(&self) -> Vec<Lesson> {
        let mut lessons = Vec::new();
        if !self.content_dir.exists() {
            return lessons;
        }
        for entry in WalkDir::new(&self.content_dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension().and_then(|ext| ext.to_str()) != Some("md") {
                continue;
            }
            lessons.push(self.read_lesson_file(entry.path()));
        }
        catalog::sort_lessons(&mut lessons);
        lessons
    }

    /// One lesson by canonical path.
    pub fn lesson(&self, path: &str) -> Result<Lesson> {
        let normalized = normalize_path(path);
        // reject anything that could escape the content directory
        if normalized.split('/').any(|segment| segment == "..") {
            return Err(Error::NotFound(normalized.to_string()));
        }
        let file = self.content_dir.join(normalized);
        if !file.is_file() {
            return Err(Error::NotFound(normalized.to_string()));
        }
        Ok(self.read_lesson_file(&file))
    }

    pub fn navigation(&self, path: &str) -> NavigationInfo {
        catalog::navigation(&self.scan(), normalize_path(path))
    }

    pub fn hierarchy(&self) -> Vec<HierarchyNode> {
        catalog::build_hierarchy(&self.scan())
    }

    pub fn tags(&self) -> TagIndex {
        catalog::count_tags(&self.scan())
    }

    pub fn search(&self, query: &str, tags: Option<&[String]>) -> Vec<Lesson> {
        catalog::search(&self.scan(), query, tags)
    }

    fn read_lesson_file(&self, file: &Path) -> Lesson {
        let relative = file.strip_prefix(&self.content_dir).unwrap_or(file);
        let lesson_path = relative.to_string_lossy().replace('\\', "/");
        let last_modified = file
            .metadata()
            .and_then(|meta| meta.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        match std::fs::read_to_string(file) {
            Ok(raw) => frontmatter::lesson_from_markdown(lesson_path, &raw, last_modified),
            Err(err) => {
                warn!(file = %file.display(), error = %err, "unreadable lesson file");
                Lesson::with_defaults(lesson_path, last_modified)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture_store() -> (tempfile::TempDir, ContentStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("intro.md"),
            "---\ntitle: Intro\norder: 1\ntags: [basics]\n---\n# Welcome",
        )
        .expect("write intro");
        fs::create_dir(dir.path().join("basics")).expect("mkdir");
        fs::write(
            dir.path().join("basics/loops.md"),
            "---\ntitle: Loops\norder: 2\nparent: intro.md\ntags: [basics, control]\n---\nfor and while",
        )
        .expect("write loops");
        fs::write(dir.path().join("notes.txt"), "not a lesson").expect("write notes");
        let store = ContentStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_scan_collects_markdown_only() {
        let (_dir, store) = fixture_store();
        let lessons = store.scan();
        assert_eq!(lessons.len(), 2);
        assert_eq!(lessons[0].path, "intro.md");
        assert_eq!(lessons[1].path, "basics/loops.md");
    }

    #[test]
    fn test_lesson_lookup_and_not_found() {
        let (_dir, store) = fixture_store();
        let lesson = store.lesson("basics/loops.md").expect("lesson");
        assert_eq!(lesson.title, "Loops");

        assert!(matches!(
            store.lesson("nope.md"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_traversal_is_rejected() {
        let (_dir, store) = fixture_store();
        assert!(matches!(
            store.lesson("../../etc/passwd"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_missing_content_dir_is_empty() {
        let store = ContentStore::new("/nonexistent/lessonbox-content");
        assert!(store.scan().is_empty());
        assert!(store.tags().is_empty());
    }

    #[test]
    fn test_malformed_frontmatter_degrades() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("broken.md"), "---\ntitle: Broken\nno closing")
            .expect("write");
        let store = ContentStore::new(dir.path());
        let lessons = store.scan();
        assert_eq!(lessons.len(), 1);
        // unterminated block: whole text is content, title falls back to stem
        assert_eq!(lessons[0].title, "broken");
        assert!(lessons[0].content.contains("no closing"));
    }
}
